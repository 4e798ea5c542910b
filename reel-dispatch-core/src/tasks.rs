//! Task manager for in-flight logic invocations
//!
//! Every logic invocation runs as its own tokio task. The manager keeps an
//! abort handle per task so the runtime can tell when it is idle and can
//! tear everything down on shutdown.
//!
//! ```ignore
//! use reel_dispatch_core::tasks::{TaskKey, TaskManager};
//!
//! let mut tasks = TaskManager::new();
//! let key = TaskKey::new("FETCH_MOVIE_LIST#1");
//! tasks.spawn(key.clone(), async move { /* HTTP call, dispatch */ });
//!
//! // once the logic reports completion
//! tasks.finish(&key);
//!
//! // on shutdown
//! tasks.cancel_all();
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use tokio::task::AbortHandle;

/// Identifies one spawned task.
///
/// Spawning under a key that is still running aborts the older task, so
/// callers that want overlapping work must use distinct keys.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TaskKey(String);

impl TaskKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Key for the `sequence`-th invocation of a logic bound to `kind`
    pub fn invocation(kind: &str, sequence: u64) -> Self {
        Self(format!("{}#{}", kind, sequence))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TaskKey {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TaskKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Registry of running tasks keyed by [`TaskKey`].
#[derive(Default)]
pub struct TaskManager {
    tasks: HashMap<TaskKey, AbortHandle>,
}

impl fmt::Debug for TaskManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskManager")
            .field("running", &self.tasks.len())
            .finish()
    }
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task on the current tokio runtime.
    ///
    /// Must be called from within a runtime context.
    pub fn spawn<F>(&mut self, key: impl Into<TaskKey>, future: F) -> &mut Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let key = key.into();
        self.cancel(&key);

        let handle = tokio::spawn(future);
        self.tasks.insert(key, handle.abort_handle());
        self
    }

    /// Forget a task that reported completion.
    ///
    /// Returns `false` if the key was not tracked.
    pub fn finish(&mut self, key: &TaskKey) -> bool {
        self.tasks.remove(key).is_some()
    }

    /// Abort a task by key. No-op for unknown keys.
    pub fn cancel(&mut self, key: &TaskKey) {
        if let Some(handle) = self.tasks.remove(key) {
            handle.abort();
        }
    }

    /// Abort every running task
    pub fn cancel_all(&mut self) {
        for (key, handle) in self.tasks.drain() {
            tracing::debug!(task = %key, "Aborting task");
            handle.abort();
        }
    }

    pub fn is_running(&self, key: &TaskKey) -> bool {
        self.tasks.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn running_keys(&self) -> impl Iterator<Item = &TaskKey> {
        self.tasks.keys()
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[test]
    fn test_task_key() {
        let k1 = TaskKey::invocation("FETCH_MOVIE_LIST", 3);
        let k2: TaskKey = String::from("FETCH_MOVIE_LIST#3").into();

        assert_eq!(k1, k2);
        assert_eq!(k1.name(), "FETCH_MOVIE_LIST#3");
        assert_eq!(k1.to_string(), "FETCH_MOVIE_LIST#3");
    }

    #[tokio::test]
    async fn test_spawn_runs_and_finish_untracks() {
        let mut tasks = TaskManager::new();
        let (tx, rx) = oneshot::channel();
        let key = TaskKey::invocation("FETCH", 1);

        tasks.spawn(key.clone(), async move {
            let _ = tx.send(42);
        });
        assert!(tasks.is_running(&key));

        let value = tokio::time::timeout(Duration::from_millis(200), rx)
            .await
            .expect("timeout")
            .expect("sender dropped");
        assert_eq!(value, 42);

        assert!(tasks.finish(&key));
        assert!(!tasks.finish(&key));
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_distinct_keys_run_concurrently() {
        let mut tasks = TaskManager::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        for i in 1..=3 {
            let counter = counter.clone();
            let tx = tx.clone();
            tasks.spawn(TaskKey::invocation("FETCH", i), async move {
                counter.fetch_add(1, Ordering::SeqCst);
                let _ = tx.send(i);
            });
        }
        assert_eq!(tasks.len(), 3);

        for _ in 0..3 {
            tokio::time::timeout(Duration::from_millis(200), rx.recv())
                .await
                .expect("timeout");
        }
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_cancel_all_aborts() {
        let mut tasks = TaskManager::new();
        let (tx, rx) = oneshot::channel::<()>();

        tasks.spawn("slow", async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
            let _ = tx.send(());
        });
        tasks.spawn("slower", async {
            tokio::time::sleep(Duration::from_secs(20)).await;
        });
        assert_eq!(tasks.len(), 2);

        tasks.cancel_all();
        assert!(tasks.is_empty());

        // The aborted task drops its sender without sending
        let result = tokio::time::timeout(Duration::from_millis(200), rx).await;
        assert!(matches!(result, Ok(Err(_))));
    }
}

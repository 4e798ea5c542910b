//! Headless runtime: action queue, reducer, and logic interception.
//!
//! The runtime owns the store. Actions arrive on one queue, whether they
//! come from the front-end or from logics, and are reduced strictly one at
//! a time. After each reduction, the logics registered for the action's kind
//! are spawned as tokio tasks; they may suspend on I/O while the runtime
//! keeps reducing other actions.
//!
//! ```ignore
//! let logics = LogicRegistry::new().with(FetchLogic::new(api));
//! let mut runtime = LogicRuntime::new(AppState::default(), reducer, NoopMiddleware, logics);
//!
//! runtime.enqueue(Action::FetchMovieList { page: 1 });
//! runtime.run_until_idle().await;
//!
//! assert!(!runtime.state().movie_list.loading);
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::logic::{Dispatcher, Done, LogicContext, LogicRegistry};
use crate::store::{Middleware, NoopMiddleware, Reducer, StoreWithMiddleware};
use crate::tasks::{TaskKey, TaskManager};
use crate::Action;

/// Store plus logic layer driven by a single action queue.
pub struct LogicRuntime<S, A: Action, M: Middleware<A> = NoopMiddleware> {
    store: StoreWithMiddleware<S, A, M>,
    logics: LogicRegistry<S, A>,
    tasks: TaskManager,
    action_tx: mpsc::UnboundedSender<A>,
    action_rx: mpsc::UnboundedReceiver<A>,
    done_tx: mpsc::UnboundedSender<TaskKey>,
    done_rx: mpsc::UnboundedReceiver<TaskKey>,
    invocations: u64,
}

impl<S, A, M> LogicRuntime<S, A, M>
where
    S: Clone + Send + Sync + 'static,
    A: Action,
    M: Middleware<A>,
{
    /// Create a runtime from state, reducer, middleware and logics.
    pub fn new(
        state: S,
        reducer: Reducer<S, A>,
        middleware: M,
        logics: LogicRegistry<S, A>,
    ) -> Self {
        Self::from_store(StoreWithMiddleware::new(state, reducer, middleware), logics)
    }

    /// Create a runtime around an existing store.
    pub fn from_store(store: StoreWithMiddleware<S, A, M>, logics: LogicRegistry<S, A>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        Self {
            store,
            logics,
            tasks: TaskManager::new(),
            action_tx,
            action_rx,
            done_tx,
            done_rx,
            invocations: 0,
        }
    }

    /// Send an action into the runtime queue.
    pub fn enqueue(&self, action: A) {
        let _ = self.action_tx.send(action);
    }

    /// A dispatcher feeding this runtime's queue.
    pub fn dispatcher(&self) -> Dispatcher<A> {
        Dispatcher::new(self.action_tx.clone())
    }

    /// Access the current state.
    pub fn state(&self) -> &S {
        self.store.state()
    }

    /// Access the middleware, e.g. to read an action log.
    pub fn middleware(&self) -> &M {
        self.store.middleware()
    }

    /// Number of logic invocations that have not signalled completion.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Reduce one action immediately, bypassing the queue, and start the
    /// logics it triggers. Returns whether the state changed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, action: A) -> bool {
        let logics = self.logics.matching(&action);
        let changed = self.store.dispatch(action.clone());

        if logics.is_empty() {
            return changed;
        }

        let snapshot = Arc::new(self.store.state().clone());
        for logic in logics {
            self.invocations += 1;
            let key = TaskKey::invocation(logic.kind(), self.invocations);
            let ctx = LogicContext::new(
                snapshot.clone(),
                self.dispatcher(),
                Done::new(key.clone(), self.done_tx.clone()),
            );
            let action = action.clone();

            tracing::debug!(logic = %logic.name(), task = %key, "Starting logic");
            self.tasks.spawn(key, async move {
                logic.process(ctx, action).await;
            });
        }

        changed
    }

    fn complete(&mut self, key: TaskKey) {
        if self.tasks.finish(&key) {
            tracing::debug!(task = %key, "Logic done");
        } else {
            tracing::trace!(task = %key, "Completion for untracked task");
        }
    }

    /// Process queued actions until the queue is empty and no logic is in
    /// flight.
    pub async fn run_until_idle(&mut self) {
        loop {
            while let Ok(action) = self.action_rx.try_recv() {
                self.dispatch(action);
            }
            while let Ok(key) = self.done_rx.try_recv() {
                self.complete(key);
            }

            if self.tasks.is_empty() {
                // A logic dispatches before it signals, so anything it sent
                // is already queued by the time its completion is seen.
                match self.action_rx.try_recv() {
                    Ok(action) => {
                        self.dispatch(action);
                        continue;
                    }
                    Err(_) => return,
                }
            }

            tokio::select! {
                Some(action) = self.action_rx.recv() => {
                    self.dispatch(action);
                }
                Some(key) = self.done_rx.recv() => {
                    self.complete(key);
                }
                else => return,
            }
        }
    }

    /// Process actions until `shutdown` is cancelled, then abort whatever
    /// is still in flight.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                Some(action) = self.action_rx.recv() => {
                    self.dispatch(action);
                }
                Some(key) = self.done_rx.recv() => {
                    self.complete(key);
                }
                else => break,
            }
        }

        self.shutdown();
    }

    /// Abort all in-flight logic tasks.
    pub fn shutdown(&mut self) {
        self.tasks.cancel_all();
        // Aborted tasks drop their tokens later; a closed channel tells them
        // they were cancelled. New invocations get a fresh channel.
        self.done_rx.close();
        while self.done_rx.try_recv().is_ok() {}
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        self.done_tx = done_tx;
        self.done_rx = done_rx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Logic;
    use async_trait::async_trait;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq)]
    enum PagerAction {
        Fetch(u32),
        Loaded { page: u32, items: Vec<u32> },
        Failed(String),
    }

    impl Action for PagerAction {
        fn name(&self) -> &'static str {
            match self {
                PagerAction::Fetch(_) => "FETCH",
                PagerAction::Loaded { .. } => "LOADED",
                PagerAction::Failed(_) => "FAILED",
            }
        }
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    struct PagerState {
        items: Vec<u32>,
        page: u32,
        loading: bool,
        error: Option<String>,
    }

    fn reducer(state: &mut PagerState, action: PagerAction) -> bool {
        match action {
            PagerAction::Fetch(_) => {
                state.loading = true;
                true
            }
            PagerAction::Loaded { page, items } => {
                state.loading = false;
                state.page = page;
                state.items = items;
                true
            }
            PagerAction::Failed(error) => {
                state.loading = false;
                state.error = Some(error);
                true
            }
        }
    }

    /// Appends `page * 10` to the snapshot's items after `delay_ms * page`.
    struct SlowPager {
        delay_ms: u64,
    }

    #[async_trait]
    impl Logic<PagerState, PagerAction> for SlowPager {
        fn kind(&self) -> &'static str {
            "FETCH"
        }

        async fn process(&self, ctx: LogicContext<PagerState, PagerAction>, action: PagerAction) {
            let PagerAction::Fetch(page) = action else {
                return ctx.done();
            };
            if page == 0 {
                ctx.dispatch(PagerAction::Failed("page 0".into()));
                return ctx.done();
            }

            let mut items = ctx.get_state().items.clone();
            tokio::time::sleep(Duration::from_millis(self.delay_ms * u64::from(page))).await;
            items.push(page * 10);
            ctx.dispatch(PagerAction::Loaded { page, items });
            ctx.done();
        }
    }

    fn runtime(delay_ms: u64) -> LogicRuntime<PagerState, PagerAction> {
        let logics = LogicRegistry::new().with(SlowPager { delay_ms });
        LogicRuntime::new(PagerState::default(), reducer, NoopMiddleware, logics)
    }

    #[tokio::test]
    async fn test_run_until_idle_applies_outcome() {
        let mut runtime = runtime(1);

        runtime.enqueue(PagerAction::Fetch(1));
        runtime.run_until_idle().await;

        assert_eq!(runtime.in_flight(), 0);
        assert_eq!(runtime.state().items, vec![10]);
        assert_eq!(runtime.state().page, 1);
        assert!(!runtime.state().loading);
    }

    #[tokio::test]
    async fn test_sequential_fetches_accumulate() {
        let mut runtime = runtime(1);

        for page in 1..=3 {
            runtime.enqueue(PagerAction::Fetch(page));
            runtime.run_until_idle().await;
        }

        assert_eq!(runtime.state().items, vec![10, 20, 30]);
        assert_eq!(runtime.state().page, 3);
    }

    #[tokio::test]
    async fn test_overlapping_fetches_race_on_stale_snapshot() {
        let mut runtime = runtime(5);

        // Both logics snapshot an empty list; the slower page 2 lands last
        // and overwrites page 1's result.
        runtime.enqueue(PagerAction::Fetch(1));
        runtime.enqueue(PagerAction::Fetch(2));
        runtime.run_until_idle().await;

        assert_eq!(runtime.state().items, vec![20]);
        assert_eq!(runtime.state().page, 2);
    }

    #[tokio::test]
    async fn test_failure_outcome() {
        let mut runtime = runtime(1);

        runtime.enqueue(PagerAction::Fetch(0));
        runtime.run_until_idle().await;

        assert_eq!(runtime.state().error.as_deref(), Some("page 0"));
        assert!(!runtime.state().loading);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let mut runtime = runtime(10_000);
        let shutdown = CancellationToken::new();

        runtime.enqueue(PagerAction::Fetch(1));
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        tokio::time::timeout(Duration::from_secs(1), runtime.run(shutdown))
            .await
            .expect("runtime did not stop");

        assert_eq!(runtime.in_flight(), 0);
        assert!(runtime.state().loading);
        assert!(runtime.state().items.is_empty());
    }

    #[tokio::test]
    async fn test_runtime_usable_after_shutdown() {
        let mut runtime = runtime(10_000);

        runtime.dispatch(PagerAction::Fetch(1));
        assert_eq!(runtime.in_flight(), 1);
        runtime.shutdown();
        assert_eq!(runtime.in_flight(), 0);

        // Page 0 fails without sleeping; its completion must be counted.
        runtime.enqueue(PagerAction::Fetch(0));
        tokio::time::timeout(Duration::from_secs(1), runtime.run_until_idle())
            .await
            .expect("completion lost after shutdown");

        assert_eq!(runtime.state().error.as_deref(), Some("page 0"));
        assert_eq!(runtime.in_flight(), 0);
    }
}

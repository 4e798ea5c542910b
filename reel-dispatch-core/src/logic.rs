//! Logic: async side-effect handlers keyed by action kind
//!
//! A logic is the asynchronous counterpart of a reducer. After an action has
//! been reduced, the runtime hands it to every logic registered for its
//! kind. The logic gets a snapshot of the state as it was right after the
//! reduction, a [`Dispatcher`] to send follow-up actions, and a [`Done`]
//! token it signals when its unit of work is over.
//!
//! # Intent / outcome pattern
//!
//! 1. **Intent actions** trigger a logic (e.g. `FETCH_MOVIE_LIST`)
//! 2. The logic performs I/O
//! 3. **Outcome actions** carry the result back (e.g. `FETCH_DATA_SUCCESS`,
//!    `FETCH_DATA_FAILURE`)
//!
//! ```ignore
//! struct FetchLogic { api: Arc<dyn Api> }
//!
//! #[async_trait]
//! impl Logic<AppState, Action> for FetchLogic {
//!     fn kind(&self) -> &'static str {
//!         "FETCH_MOVIE_LIST"
//!     }
//!
//!     async fn process(&self, ctx: LogicContext<AppState, Action>, action: Action) {
//!         let Action::FetchMovieList { page } = action else {
//!             return ctx.done();
//!         };
//!         match self.api.fetch(page).await {
//!             Ok(data) => ctx.dispatch(Action::FetchDataSuccess(data)),
//!             Err(e) => ctx.dispatch(Action::FetchDataFailure(e.to_string())),
//!         };
//!         ctx.done();
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::tasks::TaskKey;
use crate::Action;

/// Handle for sending actions back into the store's queue.
pub struct Dispatcher<A> {
    tx: mpsc::UnboundedSender<A>,
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<A> fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl<A: Action> Dispatcher<A> {
    pub fn new(tx: mpsc::UnboundedSender<A>) -> Self {
        Self { tx }
    }

    /// Queue an action for the store.
    ///
    /// Returns `false` if the store is gone; the action is dropped.
    pub fn dispatch(&self, action: A) -> bool {
        let name = action.name();
        match self.tx.send(action) {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(action = %name, "Store is gone, dropping action");
                false
            }
        }
    }
}

/// Completion signal of one logic invocation.
///
/// [`signal`](Done::signal) consumes the token, so it can be called at most
/// once. A token dropped without being signalled (early return, panic)
/// signals on drop, so every invocation completes exactly once. Tokens of
/// tasks aborted by [`LogicRuntime::shutdown`](crate::LogicRuntime::shutdown)
/// find their channel closed and drop quietly.
pub struct Done {
    key: TaskKey,
    tx: Option<mpsc::UnboundedSender<TaskKey>>,
}

impl fmt::Debug for Done {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Done")
            .field("key", &self.key)
            .field("pending", &self.tx.is_some())
            .finish()
    }
}

impl Done {
    pub fn new(key: TaskKey, tx: mpsc::UnboundedSender<TaskKey>) -> Self {
        Self { key, tx: Some(tx) }
    }

    pub fn key(&self) -> &TaskKey {
        &self.key
    }

    /// Whether the runtime stopped listening for this invocation.
    pub fn is_cancelled(&self) -> bool {
        self.tx.as_ref().is_none_or(|tx| tx.is_closed())
    }

    /// Report that the invocation has finished.
    pub fn signal(mut self) {
        self.send();
    }

    fn send(&mut self) {
        if let Some(tx) = self.tx.take() {
            // The runtime may already be gone during shutdown.
            let _ = tx.send(self.key.clone());
        }
    }
}

impl Drop for Done {
    fn drop(&mut self) {
        if self.tx.is_none() {
            return;
        }
        if self.is_cancelled() {
            tracing::debug!(task = %self.key, "Logic cancelled");
            self.tx = None;
        } else {
            tracing::warn!(task = %self.key, "Logic finished without signalling done");
            self.send();
        }
    }
}

/// Everything a logic invocation may touch.
pub struct LogicContext<S, A> {
    state: Arc<S>,
    dispatcher: Dispatcher<A>,
    done: Done,
}

impl<S, A: Action> LogicContext<S, A> {
    pub fn new(state: Arc<S>, dispatcher: Dispatcher<A>, done: Done) -> Self {
        Self {
            state,
            dispatcher,
            done,
        }
    }

    /// State snapshot taken right after the triggering action was reduced.
    pub fn get_state(&self) -> &S {
        &self.state
    }

    /// Queue a follow-up action.
    pub fn dispatch(&self, action: A) -> bool {
        self.dispatcher.dispatch(action)
    }

    pub fn dispatcher(&self) -> &Dispatcher<A> {
        &self.dispatcher
    }

    pub fn task_key(&self) -> &TaskKey {
        self.done.key()
    }

    /// Whether the runtime has shut down; further dispatches go nowhere.
    pub fn is_cancelled(&self) -> bool {
        self.done.is_cancelled()
    }

    /// Signal completion, ending the invocation.
    pub fn done(self) {
        self.done.signal();
    }
}

/// An asynchronous handler triggered by one action kind.
#[async_trait]
pub trait Logic<S, A>: Send + Sync + 'static {
    /// The action kind ([`Action::name`]) that triggers this logic.
    fn kind(&self) -> &'static str;

    /// Name used in logs.
    fn name(&self) -> &'static str {
        self.kind()
    }

    /// Handle one triggering action.
    ///
    /// Errors must be turned into outcome actions here; nothing escapes.
    async fn process(&self, ctx: LogicContext<S, A>, action: A);
}

/// Logics indexed by the action kind they listen to.
pub struct LogicRegistry<S, A> {
    by_kind: HashMap<&'static str, Vec<Arc<dyn Logic<S, A>>>>,
}

impl<S, A> Default for LogicRegistry<S, A> {
    fn default() -> Self {
        Self {
            by_kind: HashMap::new(),
        }
    }
}

impl<S, A> fmt::Debug for LogicRegistry<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.by_kind.keys().collect();
        kinds.sort();
        f.debug_struct("LogicRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

impl<S, A> LogicRegistry<S, A>
where
    S: Send + Sync + 'static,
    A: Action,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a logic under its kind. Several logics may share a kind;
    /// they run in registration order.
    pub fn register<L: Logic<S, A>>(&mut self, logic: L) -> &mut Self {
        self.by_kind
            .entry(logic.kind())
            .or_default()
            .push(Arc::new(logic));
        self
    }

    /// Builder-style variant of [`register`](Self::register)
    pub fn with<L: Logic<S, A>>(mut self, logic: L) -> Self {
        self.register(logic);
        self
    }

    /// Logics triggered by `action`
    pub fn matching(&self, action: &A) -> Vec<Arc<dyn Logic<S, A>>> {
        self.by_kind
            .get(action.name())
            .cloned()
            .unwrap_or_default()
    }

    /// Total number of registered logics
    pub fn len(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }
}

//! Centralized state store with reducer pattern

use crate::Action;
use std::marker::PhantomData;

/// A reducer function that folds an action into state
///
/// Returns `true` if the state changed. Actions a reducer does not handle
/// must leave the state untouched and return `false`.
pub type Reducer<S, A> = fn(&mut S, A) -> bool;

/// Centralized state store with Redux-like reducer pattern
///
/// The store holds the application state and provides a single point
/// for state mutations through the `dispatch` method.
///
/// # Type Parameters
/// * `S` - The application state type
/// * `A` - The action type (must implement `Action`)
///
/// # Example
/// ```ignore
/// #[derive(Default)]
/// struct PagerState {
///     page: u32,
/// }
///
/// #[derive(Action, Clone, Debug)]
/// enum PagerAction {
///     NextPage,
///     Reset,
/// }
///
/// fn reducer(state: &mut PagerState, action: PagerAction) -> bool {
///     match action {
///         PagerAction::NextPage => {
///             state.page += 1;
///             true
///         }
///         PagerAction::Reset => {
///             *state = PagerState::default();
///             true
///         }
///     }
/// }
///
/// let mut store = Store::new(PagerState::default(), reducer);
/// store.dispatch(PagerAction::NextPage);
/// assert_eq!(store.state().page, 1);
/// ```
pub struct Store<S, A: Action> {
    state: S,
    reducer: Reducer<S, A>,
    _marker: PhantomData<A>,
}

impl<S, A: Action> Store<S, A> {
    /// Create a new store with initial state and reducer
    pub fn new(state: S, reducer: Reducer<S, A>) -> Self {
        Self {
            state,
            reducer,
            _marker: PhantomData,
        }
    }

    /// Dispatch an action to the store
    ///
    /// The reducer is called with the current state and action.
    /// Returns `true` if the state changed.
    pub fn dispatch(&mut self, action: A) -> bool {
        (self.reducer)(&mut self.state, action)
    }

    /// Get a reference to the current state
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Get a mutable reference to the state
    ///
    /// Use this sparingly - prefer dispatching actions for state changes.
    /// Mostly useful for seeding state in tests.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }
}

impl<S: Default, A: Action> Store<S, A> {
    /// Create a store starting from the state's default shape
    pub fn with_default(reducer: Reducer<S, A>) -> Self {
        Self::new(S::default(), reducer)
    }
}

/// Store with middleware support
///
/// Wraps a `Store` and lets middleware observe every action
/// before and after the reducer runs.
pub struct StoreWithMiddleware<S, A: Action, M: Middleware<A>> {
    store: Store<S, A>,
    middleware: M,
}

impl<S, A: Action, M: Middleware<A>> StoreWithMiddleware<S, A, M> {
    /// Create a new store with middleware
    pub fn new(state: S, reducer: Reducer<S, A>, middleware: M) -> Self {
        Self {
            store: Store::new(state, reducer),
            middleware,
        }
    }

    /// Dispatch an action through middleware and store
    pub fn dispatch(&mut self, action: A) -> bool {
        self.middleware.before(&action);
        let changed = self.store.dispatch(action.clone());
        self.middleware.after(&action, changed);
        changed
    }

    /// Get a reference to the current state
    pub fn state(&self) -> &S {
        self.store.state()
    }

    /// Get a mutable reference to the state
    pub fn state_mut(&mut self) -> &mut S {
        self.store.state_mut()
    }

    /// Get a reference to the middleware
    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    /// Get a mutable reference to the middleware
    pub fn middleware_mut(&mut self) -> &mut M {
        &mut self.middleware
    }
}

/// Middleware trait for observing actions
///
/// Middleware sees every action that reaches the reducer. Side effects that
/// produce new actions belong in a [`Logic`](crate::logic::Logic) instead.
pub trait Middleware<A: Action> {
    /// Called before the action is dispatched to the reducer
    fn before(&mut self, action: &A);

    /// Called after the action is processed by the reducer
    fn after(&mut self, action: &A, state_changed: bool);
}

/// A no-op middleware that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<A: Action> Middleware<A> for NoopMiddleware {
    fn before(&mut self, _action: &A) {}
    fn after(&mut self, _action: &A, _state_changed: bool) {}
}

/// Middleware that logs action kinds via `tracing`
#[derive(Debug, Clone, Default)]
pub struct LoggingMiddleware {
    /// Whether to log before dispatch
    pub log_before: bool,
    /// Whether to log after dispatch
    pub log_after: bool,
}

impl LoggingMiddleware {
    /// Create a new logging middleware with default settings (log after only)
    pub fn new() -> Self {
        Self {
            log_before: false,
            log_after: true,
        }
    }

    /// Create a logging middleware that logs both before and after
    pub fn verbose() -> Self {
        Self {
            log_before: true,
            log_after: true,
        }
    }
}

impl<A: Action> Middleware<A> for LoggingMiddleware {
    fn before(&mut self, action: &A) {
        if self.log_before {
            tracing::debug!(action = %action.name(), "Dispatching action");
        }
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        if self.log_after {
            tracing::debug!(
                action = %action.name(),
                state_changed = state_changed,
                "Action reduced"
            );
        }
    }
}

/// Two middleware run as one
///
/// The first element wraps the second: it sees `before` first and `after`
/// last. Each half stays reachable as `.0` / `.1`, so nest pairs to stack
/// more than two.
impl<A: Action, Outer: Middleware<A>, Inner: Middleware<A>> Middleware<A> for (Outer, Inner) {
    fn before(&mut self, action: &A) {
        self.0.before(action);
        self.1.before(action);
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        self.1.after(action, state_changed);
        self.0.after(action, state_changed);
    }
}

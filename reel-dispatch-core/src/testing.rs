//! Test utilities for reel-dispatch applications
//!
//! - [`TestHarness`]: state plus a captured action channel, and a factory
//!   for [`LogicContext`]s so a logic can be driven directly
//! - Assertion macros for verifying dispatched actions
//!
//! # Example
//!
//! ```ignore
//! use reel_dispatch::testing::TestHarness;
//! use reel_dispatch::assert_emitted;
//!
//! let mut harness = TestHarness::<AppState, Action>::new(AppState::default());
//!
//! FetchMovieListLogic::new(api)
//!     .process(harness.context(), Action::FetchMovieList { page: 1 })
//!     .await;
//!
//! let actions = harness.drain_emitted();
//! assert_emitted!(actions, Action::FetchDataSuccess(_));
//! assert_eq!(harness.completions(), 1);
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::logic::{Dispatcher, Done, LogicContext};
use crate::tasks::TaskKey;
use crate::Action;

/// Harness that stands in for the runtime around a logic or reducer.
///
/// Actions sent through its dispatchers are captured instead of reduced,
/// and completion signals are counted.
pub struct TestHarness<S, A: Action> {
    /// The state handed to logics as their snapshot
    pub state: S,
    tx: mpsc::UnboundedSender<A>,
    rx: mpsc::UnboundedReceiver<A>,
    done_tx: mpsc::UnboundedSender<TaskKey>,
    done_rx: mpsc::UnboundedReceiver<TaskKey>,
    contexts: u64,
}

impl<S, A: Action> TestHarness<S, A> {
    pub fn new(state: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        Self {
            state,
            tx,
            rx,
            done_tx,
            done_rx,
            contexts: 0,
        }
    }

    /// Dispatcher whose actions end up in [`drain_emitted`](Self::drain_emitted)
    pub fn dispatcher(&self) -> Dispatcher<A> {
        Dispatcher::new(self.tx.clone())
    }

    /// Completion token counted by [`completions`](Self::completions)
    pub fn done(&mut self) -> Done {
        self.contexts += 1;
        Done::new(TaskKey::invocation("test", self.contexts), self.done_tx.clone())
    }

    /// Emit an action as if a handler had dispatched it
    pub fn emit(&self, action: A) {
        let _ = self.tx.send(action);
    }

    /// Drain all captured actions, in dispatch order
    pub fn drain_emitted(&mut self) -> Vec<A> {
        let mut actions = Vec::new();
        while let Ok(action) = self.rx.try_recv() {
            actions.push(action);
        }
        actions
    }

    /// Kinds of all captured actions, draining them
    pub fn drain_names(&mut self) -> Vec<&'static str> {
        self.drain_emitted().iter().map(Action::name).collect()
    }

    pub fn has_emitted(&mut self) -> bool {
        !self.drain_emitted().is_empty()
    }

    /// Number of completion signals received since the last call
    pub fn completions(&mut self) -> usize {
        let mut count = 0;
        while self.done_rx.try_recv().is_ok() {
            count += 1;
        }
        count
    }
}

impl<S: Clone, A: Action> TestHarness<S, A> {
    /// Logic context over a snapshot of the harness state
    pub fn context(&mut self) -> LogicContext<S, A> {
        let done = self.done();
        LogicContext::new(Arc::new(self.state.clone()), self.dispatcher(), done)
    }
}

impl<S: Default, A: Action> Default for TestHarness<S, A> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

/// Assert that an action matching a pattern was emitted.
///
/// ```ignore
/// let actions = harness.drain_emitted();
/// assert_emitted!(actions, Action::ResetMovieList);
/// assert_emitted!(actions, Action::FetchMovieList { page: 1 });
/// ```
#[macro_export]
macro_rules! assert_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` to be emitted, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that no action matching a pattern was emitted.
#[macro_export]
macro_rules! assert_not_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` NOT to be emitted, but it was: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// First emitted action matching a pattern.
///
/// ```ignore
/// if let Some(Action::FetchDataSuccess(page)) = find_emitted!(actions, Action::FetchDataSuccess(_)) {
///     assert_eq!(page.current_page, 1);
/// }
/// ```
#[macro_export]
macro_rules! find_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().find(|a| matches!(a, $pattern $(if $guard)?))
    };
}

/// Count emitted actions matching a pattern.
#[macro_export]
macro_rules! count_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().filter(|a| matches!(a, $pattern $(if $guard)?)).count()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Fetch(u32),
        Reset,
    }

    impl crate::Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Fetch(_) => "FETCH",
                TestAction::Reset => "RESET",
            }
        }
    }

    #[test]
    fn test_harness_captures_in_order() {
        let mut harness = TestHarness::<(), TestAction>::new(());
        let dispatcher = harness.dispatcher();

        dispatcher.dispatch(TestAction::Reset);
        harness.emit(TestAction::Fetch(1));

        assert_eq!(
            harness.drain_emitted(),
            vec![TestAction::Reset, TestAction::Fetch(1)]
        );
        assert!(harness.drain_emitted().is_empty());
    }

    #[test]
    fn test_harness_counts_completions() {
        let mut harness = TestHarness::<u8, TestAction>::new(7);

        let ctx = harness.context();
        assert_eq!(*ctx.get_state(), 7);
        ctx.dispatch(TestAction::Fetch(2));
        ctx.done();

        // Dropped without signalling: still exactly one completion
        drop(harness.context());

        assert_eq!(harness.completions(), 2);
        assert_eq!(harness.drain_names(), vec!["FETCH"]);
    }

    #[test]
    fn test_assert_macros() {
        let actions = vec![TestAction::Fetch(1), TestAction::Reset, TestAction::Fetch(2)];

        assert_emitted!(actions, TestAction::Reset);
        assert_emitted!(actions, TestAction::Fetch(p) if *p == 2);
        assert_not_emitted!(actions, TestAction::Fetch(3));

        let found = find_emitted!(actions, TestAction::Fetch(_));
        assert_eq!(found, Some(&TestAction::Fetch(1)));
        assert_eq!(count_emitted!(actions, TestAction::Fetch(_)), 2);
    }
}

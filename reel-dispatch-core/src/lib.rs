//! Core traits and types for reel-dispatch
//!
//! A Redux-style state container whose side effects live in *logics*:
//! async handlers keyed by action kind that run after an action has been
//! reduced and report back by dispatching more actions.
//!
//! # Core Concepts
//!
//! - **Action**: Intents and outcomes; the only input to state transitions
//! - **Store**: Centralized state container with reducer pattern
//! - **Middleware**: Observers around every reduction (logging, action log)
//! - **Logic**: Async side-effect handler with a dispatcher and a done signal
//! - **LogicRuntime**: Single action queue tying store and logics together
//!
//! # Basic Example
//!
//! ```ignore
//! use reel_dispatch::prelude::*;
//!
//! #[derive(Action, Clone, Debug)]
//! #[action(rename_all = "SCREAMING_SNAKE_CASE")]
//! enum ListAction {
//!     Reset,
//!     Loaded(Vec<String>),
//! }
//!
//! #[derive(Default)]
//! struct ListState {
//!     items: Vec<String>,
//! }
//!
//! fn reducer(state: &mut ListState, action: ListAction) -> bool {
//!     match action {
//!         ListAction::Reset => { *state = ListState::default(); true }
//!         ListAction::Loaded(items) => { state.items.extend(items); true }
//!     }
//! }
//!
//! let mut store = Store::new(ListState::default(), reducer);
//! store.dispatch(ListAction::Loaded(vec!["Favourites".into()]));
//! ```
//!
//! # Logic Pattern
//!
//! 1. **Intent actions** trigger logics (e.g. `FETCH_MOVIE_LIST`)
//! 2. **Outcome actions** carry the result back (e.g. `FETCH_DATA_SUCCESS`,
//!    `FETCH_DATA_FAILURE`)
//!
//! The runtime reduces the intent first, then starts every logic registered
//! for its kind with a snapshot of the resulting state. See [`logic`] and
//! [`runtime`].

pub mod action;
pub mod action_log;
pub mod logic;
pub mod runtime;
pub mod store;
pub mod tasks;
pub mod testing;

// Core trait exports
pub use action::{Action, ActionSummary};

// Store exports
pub use store::{
    LoggingMiddleware, Middleware, NoopMiddleware, Reducer, Store, StoreWithMiddleware,
};

// Logic exports
pub use logic::{Dispatcher, Done, Logic, LogicContext, LogicRegistry};
pub use runtime::LogicRuntime;
pub use tasks::{TaskKey, TaskManager};

// Action log exports
pub use action_log::{
    ActionLog, ActionLogConfig, ActionLogEntry, ActionLoggerConfig, ActionLoggerMiddleware,
};

// Testing exports
pub use testing::TestHarness;

// Re-exported so logic implementors need no direct dependency
pub use async_trait::async_trait;
pub use tokio_util::sync::CancellationToken;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionSummary};
    pub use crate::action_log::{ActionLogConfig, ActionLoggerConfig, ActionLoggerMiddleware};
    pub use crate::logic::{Dispatcher, Done, Logic, LogicContext, LogicRegistry};
    pub use crate::runtime::LogicRuntime;
    pub use crate::store::{
        LoggingMiddleware, Middleware, NoopMiddleware, Reducer, Store, StoreWithMiddleware,
    };
    pub use async_trait::async_trait;
}

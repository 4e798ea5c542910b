//! reel-dispatch: Redux-style state management with async logic middleware
//!
//! State lives in one store and changes only through reducers. Side effects
//! (HTTP calls, navigation) live in logics that react to action kinds and
//! report back by dispatching more actions.
//!
//! # Example
//! ```ignore
//! use reel_dispatch::prelude::*;
//!
//! #[derive(Action, Clone, Debug)]
//! #[action(rename_all = "SCREAMING_SNAKE_CASE")]
//! enum ListAction {
//!     FetchMovieList { page: u32 },
//!     ResetMovieList,
//! }
//!
//! assert_eq!(ListAction::ResetMovieList.name(), "RESET_MOVIE_LIST");
//! ```

// Re-export everything from core
pub use reel_dispatch_core::*;

// Re-export derive macros
pub use reel_dispatch_macros::Action;

/// Prelude for convenient imports
pub mod prelude {
    // Traits
    pub use reel_dispatch_core::{Action, ActionSummary};

    // Store
    pub use reel_dispatch_core::{
        LoggingMiddleware, Middleware, NoopMiddleware, Reducer, Store, StoreWithMiddleware,
    };

    // Logic layer
    pub use reel_dispatch_core::{
        async_trait, CancellationToken, Dispatcher, Done, Logic, LogicContext, LogicRegistry,
        LogicRuntime,
    };

    // Action log
    pub use reel_dispatch_core::{ActionLogConfig, ActionLoggerConfig, ActionLoggerMiddleware};

    // Derive macros
    pub use reel_dispatch_macros::Action;
}

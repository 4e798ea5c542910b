//! Movie lists: browse and create TMDB lists through a Redux-style store
//!
//! - [`action`]: the action catalog
//! - [`state`] and [`reducer`]: the two slices and their reducers
//! - [`logic`]: the fetch and create logics, over [`api::MovieListApi`]
//! - [`screens`]: headless stand-ins for the lists screen and create form

pub mod action;
pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod navigation;
pub mod reducer;
pub mod screens;
pub mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use action::Action;
pub use api::{ApiError, MovieListApi, TmdbClient};
pub use config::{ApiConfig, ConfigError};
pub use error::AppError;
pub use navigation::{NavigationHandle, Navigator, RecordingNavigator, Screen};
pub use state::{AppState, CreateSlice, ListSlice, MovieListItem, MovieListPage};

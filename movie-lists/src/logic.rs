//! Logics: the API side of the store
//!
//! - `FETCH_MOVIE_LIST` -> [`FetchMovieListLogic`] -> `FETCH_DATA_SUCCESS` |
//!   `FETCH_DATA_FAILURE`
//! - `CREATE_MOVIE_LIST` -> [`CreateListLogic`] -> `CREATE_LIST_SUCCESS`,
//!   `RESET_MOVIE_LIST`, `FETCH_MOVIE_LIST { page: 1 }` | `CREATE_LIST_FAILURE`
//!
//! Both convert every error into a failure action and signal done once.

use std::sync::Arc;

use async_trait::async_trait;
use reel_dispatch::{Logic, LogicContext, LogicRegistry};

use crate::action::{
    create_list_failure, create_list_success, fetch_data_failure, fetch_data_success,
    fetch_movie_list, kinds, reset_movie_list, Action, CreateListRequest,
};
use crate::api::{ApiError, MovieListApi, NewList};
use crate::navigation::Screen;
use crate::state::{AppState, MovieListPage};

pub const FETCH_FALLBACK_MESSAGE: &str = "Failed to fetch movie list";
pub const CREATE_FALLBACK_MESSAGE: &str = "Failed to create movie list";

/// Message for `FETCH_DATA_FAILURE`: the error text, or the fallback
pub fn fetch_failure_message(err: &ApiError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        FETCH_FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}

/// Message for `CREATE_LIST_FAILURE`: the server's status message, or the
/// fallback
pub fn create_failure_message(err: &ApiError) -> String {
    err.status_message()
        .filter(|message| !message.trim().is_empty())
        .unwrap_or(CREATE_FALLBACK_MESSAGE)
        .to_string()
}

/// Both logics over one API client
pub fn logics(api: Arc<dyn MovieListApi>) -> LogicRegistry<AppState, Action> {
    LogicRegistry::new()
        .with(FetchMovieListLogic::new(api.clone()))
        .with(CreateListLogic::new(api))
}

/// Loads one page and appends it to what the store already holds
pub struct FetchMovieListLogic {
    api: Arc<dyn MovieListApi>,
}

impl FetchMovieListLogic {
    pub fn new(api: Arc<dyn MovieListApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Logic<AppState, Action> for FetchMovieListLogic {
    fn kind(&self) -> &'static str {
        kinds::FETCH_MOVIE_LIST
    }

    fn name(&self) -> &'static str {
        "fetch_movie_list"
    }

    async fn process(&self, ctx: LogicContext<AppState, Action>, action: Action) {
        let Action::FetchMovieList { page } = action else {
            return ctx.done();
        };

        // Snapshot from when this request was reduced; overlapping fetches
        // each append to their own snapshot.
        let mut list = ctx.get_state().movie_list.movie_list().to_vec();

        match self.api.fetch_lists(page).await {
            Ok(response) => {
                tracing::info!(
                    page,
                    total_pages = response.total_pages,
                    results = response.results.len(),
                    "Movie lists loaded"
                );
                list.extend(response.results);
                ctx.dispatch(fetch_data_success(MovieListPage {
                    list,
                    total_pages: response.total_pages,
                    current_page: page,
                }));
            }
            Err(err) => {
                tracing::warn!(page, error = %err, "Fetching movie lists failed");
                ctx.dispatch(fetch_data_failure(fetch_failure_message(&err)));
            }
        }

        ctx.done();
    }
}

/// Creates a list, refreshes the first page and returns to the lists screen
pub struct CreateListLogic {
    api: Arc<dyn MovieListApi>,
}

impl CreateListLogic {
    pub fn new(api: Arc<dyn MovieListApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Logic<AppState, Action> for CreateListLogic {
    fn kind(&self) -> &'static str {
        kinds::CREATE_MOVIE_LIST
    }

    fn name(&self) -> &'static str {
        "create_list"
    }

    async fn process(&self, ctx: LogicContext<AppState, Action>, action: Action) {
        let Action::CreateMovieList(CreateListRequest {
            movie_name,
            movie_description,
            navigation,
        }) = action
        else {
            return ctx.done();
        };

        let body = NewList::new(movie_name, movie_description);

        match self.api.create_list(&body).await {
            Ok(payload) => {
                tracing::info!(name = %body.name, "Movie list created");
                ctx.dispatch(create_list_success(payload));
                ctx.dispatch(reset_movie_list());
                ctx.dispatch(fetch_movie_list(1));

                // The list exists at this point; a failed transition is not
                // a create failure.
                if let Err(err) = navigation.navigate(Screen::Lists) {
                    tracing::error!(error = %err, "Navigation after create failed");
                }
            }
            Err(err) => {
                tracing::warn!(name = %body.name, error = %err, "Creating movie list failed");
                ctx.dispatch(create_list_failure(create_failure_message(&err)));
            }
        }

        ctx.done();
    }
}

//! Headless screens
//!
//! Each function plays one screen of the app against a runtime: it only
//! dispatches actions and reads slices, the way the UI would. Mount and
//! unmount dispatches are kept (`RESET_MOVIE_LIST` when the lists screen
//! goes away, `RESET_CREATE_LIST_ERROR` when the form closes on an error).

use std::sync::Arc;

use reel_dispatch::{LogicRuntime, Middleware};
use serde_json::Value;

use crate::action::{
    create_movie_list, fetch_movie_list, reset_create_error, reset_movie_list, Action,
};
use crate::api::MovieListApi;
use crate::logic::logics;
use crate::navigation::{NavigationError, NavigationHandle, Screen};
use crate::reducer::reducer;
use crate::state::{AppState, ListSlice};

pub type AppRuntime<M> = LogicRuntime<AppState, Action, M>;

/// Runtime with both logics registered over `api`
pub fn runtime<M: Middleware<Action>>(
    api: Arc<dyn MovieListApi>,
    middleware: M,
) -> AppRuntime<M> {
    LogicRuntime::new(AppState::default(), reducer, middleware, logics(api))
}

/// Lists screen: load the first page, keep loading more while the screen
/// would (at most `max_pages` requests), then unmount.
///
/// Returns the slice as it was just before unmounting.
pub async fn browse<M: Middleware<Action>>(
    runtime: &mut AppRuntime<M>,
    max_pages: u32,
) -> ListSlice {
    let first = runtime.state().movie_list.current_page();
    runtime.enqueue(fetch_movie_list(first));
    runtime.run_until_idle().await;

    let mut requested = 1;
    while requested < max_pages {
        let slice = &runtime.state().movie_list;
        if slice.loading || slice.error.is_some() {
            break;
        }
        let Some(next) = slice.next_page() else {
            break;
        };

        runtime.enqueue(fetch_movie_list(next));
        runtime.run_until_idle().await;
        requested += 1;
    }

    let snapshot = runtime.state().movie_list.clone();
    runtime.enqueue(reset_movie_list());
    runtime.run_until_idle().await;
    snapshot
}

/// Open the detail screen for list `id`, if it is loaded.
///
/// Returns `Ok(false)` when no loaded list has that id.
pub fn open_detail(
    slice: &ListSlice,
    id: u64,
    navigation: &NavigationHandle,
) -> Result<bool, NavigationError> {
    let Some(item) = slice.movie_list().iter().find(|item| item.id == id) else {
        return Ok(false);
    };
    navigation.navigate(Screen::ListDetail {
        title: item.name.clone(),
        description: item.description.clone(),
        items_count: item.item_count,
    })?;
    Ok(true)
}

/// What the create form ends up showing
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOutcome {
    /// Server payload when the list was created
    pub created: Option<Value>,
    pub error: Option<String>,
    /// The lists slice after the post-create refresh
    pub lists: ListSlice,
}

/// Create form: submit, wait for the logic and the refresh it triggers,
/// then close the form.
pub async fn create<M: Middleware<Action>>(
    runtime: &mut AppRuntime<M>,
    name: &str,
    description: &str,
    navigation: NavigationHandle,
) -> CreateOutcome {
    runtime.enqueue(create_movie_list(name, description, navigation));
    runtime.run_until_idle().await;

    let state = runtime.state();
    let outcome = CreateOutcome {
        created: state.add_movie_list.data.clone(),
        error: state.add_movie_list.error.clone(),
        lists: state.movie_list.clone(),
    };

    if outcome.error.is_some() {
        runtime.enqueue(reset_create_error());
        runtime.run_until_idle().await;
    }
    outcome
}

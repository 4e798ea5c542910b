//! Store, logics and screens together, over a scripted API

use std::sync::Arc;
use std::time::Duration;

use reel_dispatch::{ActionLoggerMiddleware, LoggingMiddleware, NoopMiddleware};
use serde_json::json;

use movie_lists::action::{create_movie_list, fetch_movie_list, kinds};
use movie_lists::api::{ApiError, NewList};
use movie_lists::screens::{self, AppRuntime};
use movie_lists::testing::MockApi;
use movie_lists::{ListSlice, MovieListItem, NavigationHandle, RecordingNavigator, Screen};

fn item(id: u64) -> MovieListItem {
    MovieListItem {
        id,
        name: format!("M{}", id),
        description: format!("list {}", id),
        item_count: id as u32,
        ..Default::default()
    }
}

fn ids(slice: &ListSlice) -> Vec<u64> {
    slice.movie_list().iter().map(|i| i.id).collect()
}

fn runtime(api: &Arc<MockApi>) -> AppRuntime<NoopMiddleware> {
    screens::runtime(api.clone(), NoopMiddleware)
}

#[tokio::test]
async fn test_fetch_first_page_through_runtime() {
    let api = Arc::new(MockApi::new().with_page(1, 2, vec![item(1)]));
    let mut runtime = runtime(&api);

    runtime.enqueue(fetch_movie_list(1));
    runtime.run_until_idle().await;

    let slice = &runtime.state().movie_list;
    assert!(!slice.loading);
    assert_eq!(ids(slice), vec![1]);
    assert_eq!(slice.current_page(), 1);
    assert_eq!(slice.total_pages(), Some(2));
    assert_eq!(runtime.in_flight(), 0);
}

#[tokio::test]
async fn test_browse_loads_pages_in_order_then_resets() {
    let api = Arc::new(
        MockApi::new()
            .with_page(1, 3, vec![item(1), item(2)])
            .with_page(2, 3, vec![item(3)])
            .with_page(3, 3, vec![item(4)]),
    );
    let mut runtime = runtime(&api);

    let slice = screens::browse(&mut runtime, 3).await;

    assert_eq!(ids(&slice), vec![1, 2, 3, 4]);
    assert_eq!(slice.current_page(), 3);
    assert_eq!(api.fetched_pages(), vec![1, 2, 3]);
    // Unmounted
    assert_eq!(runtime.state().movie_list, ListSlice::default());
}

#[tokio::test]
async fn test_browse_requests_one_page_past_the_last() {
    let api = Arc::new(MockApi::new().with_page(1, 1, vec![item(1)]));
    let mut runtime = runtime(&api);

    let slice = screens::browse(&mut runtime, 10).await;

    // current_page <= total_pages allows page 2; its empty answer ends it
    assert_eq!(api.fetched_pages(), vec![1, 2]);
    assert_eq!(ids(&slice), vec![1]);
    assert_eq!(slice.current_page(), 2);
    assert_eq!(slice.next_page(), None);
}

#[tokio::test]
async fn test_browse_stops_on_failure() {
    let api = Arc::new(
        MockApi::new()
            .with_page(1, 3, vec![item(1)])
            .with_fetch_error(2, ApiError::Transport("Network Error".into())),
    );
    let mut runtime = runtime(&api);

    let slice = screens::browse(&mut runtime, 3).await;

    assert_eq!(api.fetched_pages(), vec![1, 2]);
    assert_eq!(slice.error.as_deref(), Some("Network Error"));
    assert_eq!(ids(&slice), vec![1]);
    assert!(!slice.loading);
}

#[tokio::test]
async fn test_browse_empty_account() {
    let api = Arc::new(MockApi::new().with_page(1, 1, vec![]));
    let mut runtime = runtime(&api);

    let slice = screens::browse(&mut runtime, 1).await;

    assert!(slice.is_empty_result());
}

#[tokio::test]
async fn test_overlapping_fetches_lose_a_page() {
    let api = Arc::new(
        MockApi::new()
            .with_page(1, 2, vec![item(1)])
            .with_page(2, 2, vec![item(2)])
            .with_fetch_delay(2, Duration::from_millis(30)),
    );
    let mut runtime = runtime(&api);

    // Both requests snapshot an empty list; the slow page 2 lands last.
    runtime.enqueue(fetch_movie_list(1));
    runtime.enqueue(fetch_movie_list(2));
    runtime.run_until_idle().await;

    let slice = &runtime.state().movie_list;
    assert_eq!(ids(slice), vec![2]);
    assert_eq!(slice.current_page(), 2);
    assert!(!slice.loading);
}

#[tokio::test]
async fn test_create_refreshes_first_page_and_navigates() {
    let api = Arc::new(
        MockApi::new()
            .with_created(json!({"success": true, "list_id": 123}))
            .with_page(1, 1, vec![item(1), item(123)]),
    );
    let navigator = Arc::new(RecordingNavigator::new());
    let mut runtime = runtime(&api);

    let outcome = screens::create(
        &mut runtime,
        "Noir",
        "Best of",
        NavigationHandle::shared(navigator.clone()),
    )
    .await;

    assert_eq!(outcome.created, Some(json!({"success": true, "list_id": 123})));
    assert_eq!(outcome.error, None);
    assert_eq!(ids(&outcome.lists), vec![1, 123]);
    assert_eq!(api.created_lists(), vec![NewList::new("Noir", "Best of")]);
    assert_eq!(api.fetched_pages(), vec![1]);
    assert_eq!(navigator.history(), vec![Screen::Lists]);
    assert!(!runtime.state().add_movie_list.is_creating());
}

#[tokio::test]
async fn test_create_failure_is_cleared_on_close() {
    let api = Arc::new(MockApi::new().with_create_error(ApiError::Status {
        status: 401,
        status_message: Some("Authentication failed: You do not have permissions.".into()),
    }));
    let navigator = Arc::new(RecordingNavigator::new());
    let mut runtime = runtime(&api);

    let outcome = screens::create(
        &mut runtime,
        "X",
        "Y",
        NavigationHandle::shared(navigator.clone()),
    )
    .await;

    assert_eq!(
        outcome.error.as_deref(),
        Some("Authentication failed: You do not have permissions.")
    );
    assert_eq!(outcome.created, None);
    assert!(api.fetched_pages().is_empty());
    assert!(navigator.history().is_empty());
    assert_eq!(runtime.state().add_movie_list.error, None);
}

#[tokio::test]
async fn test_open_detail_for_loaded_list() {
    let api = Arc::new(MockApi::new().with_page(1, 1, vec![item(7)]));
    let navigator = Arc::new(RecordingNavigator::new());
    let navigation = NavigationHandle::shared(navigator.clone());
    let mut runtime = runtime(&api);

    let slice = screens::browse(&mut runtime, 1).await;

    assert!(!screens::open_detail(&slice, 99, &navigation).unwrap());
    assert!(screens::open_detail(&slice, 7, &navigation).unwrap());
    assert_eq!(
        navigator.history(),
        vec![Screen::ListDetail {
            title: "M7".into(),
            description: "list 7".into(),
            items_count: 7,
        }]
    );
}

#[tokio::test]
async fn test_action_log_records_create_flow() {
    let api = Arc::new(
        MockApi::new()
            .with_created(json!({"list_id": 1}))
            .with_page(1, 1, vec![item(1)]),
    );
    let middleware = (
        LoggingMiddleware::verbose(),
        ActionLoggerMiddleware::with_default_log(),
    );
    let mut runtime = screens::runtime(api.clone(), middleware);

    runtime.enqueue(create_movie_list(
        "X",
        "Y",
        NavigationHandle::new(RecordingNavigator::new()),
    ));
    runtime.run_until_idle().await;

    let log = runtime.middleware().1.log().unwrap();
    assert_eq!(
        log.names(),
        vec![
            kinds::CREATE_MOVIE_LIST,
            kinds::CREATE_LIST_SUCCESS,
            kinds::RESET_MOVIE_LIST,
            kinds::FETCH_MOVIE_LIST,
            kinds::FETCH_DATA_SUCCESS,
        ]
    );
    assert!(log.entries().all(|e| e.state_changed == Some(true)));
}

#[tokio::test]
async fn test_inactive_action_log_still_reduces_through_logging() {
    let api = Arc::new(MockApi::new().with_page(1, 1, vec![item(1)]));
    let middleware = (
        LoggingMiddleware::new(),
        ActionLoggerMiddleware::with_default_log().active(false),
    );
    let mut runtime = screens::runtime(api.clone(), middleware);

    let slice = screens::browse(&mut runtime, 1).await;

    assert_eq!(ids(&slice), vec![1]);
    assert!(!runtime.middleware().1.is_active());
    assert!(runtime.middleware().1.log().unwrap().is_empty());
}

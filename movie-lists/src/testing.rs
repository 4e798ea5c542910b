//! Scripted API double for logic and runtime tests
//!
//! ```ignore
//! let api = MockApi::new()
//!     .with_page(1, 2, vec![item(1)])
//!     .with_created(json!({"list_id": 123}));
//! let api = Arc::new(api);
//! let logic = FetchMovieListLogic::new(api.clone());
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::{ApiError, ListsResponse, MovieListApi, NewList};
use crate::state::MovieListItem;

/// [`MovieListApi`] answering from a script and recording every request.
///
/// Pages without a scripted response come back empty (`total_pages: 1`).
/// Creates are answered in order; an exhausted script fails with a
/// transport error.
#[derive(Debug, Default)]
pub struct MockApi {
    pages: HashMap<u32, Result<ListsResponse, ApiError>>,
    delays: HashMap<u32, Duration>,
    creates: Mutex<VecDeque<Result<Value, ApiError>>>,
    fetched: Mutex<Vec<u32>>,
    created: Mutex<Vec<NewList>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32, total_pages: u32, results: Vec<MovieListItem>) -> Self {
        self.pages.insert(
            page,
            Ok(ListsResponse {
                total_pages,
                results,
            }),
        );
        self
    }

    pub fn with_fetch_error(mut self, page: u32, error: ApiError) -> Self {
        self.pages.insert(page, Err(error));
        self
    }

    /// Hold the response for `page` back by `delay`
    pub fn with_fetch_delay(mut self, page: u32, delay: Duration) -> Self {
        self.delays.insert(page, delay);
        self
    }

    pub fn with_created(self, payload: Value) -> Self {
        lock(&self.creates).push_back(Ok(payload));
        self
    }

    pub fn with_create_error(self, error: ApiError) -> Self {
        lock(&self.creates).push_back(Err(error));
        self
    }

    /// Pages requested so far, in call order
    pub fn fetched_pages(&self) -> Vec<u32> {
        lock(&self.fetched).clone()
    }

    /// Create bodies sent so far, in call order
    pub fn created_lists(&self) -> Vec<NewList> {
        lock(&self.created).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl MovieListApi for MockApi {
    async fn fetch_lists(&self, page: u32) -> Result<ListsResponse, ApiError> {
        lock(&self.fetched).push(page);

        if let Some(delay) = self.delays.get(&page) {
            tokio::time::sleep(*delay).await;
        }

        self.pages.get(&page).cloned().unwrap_or(Ok(ListsResponse {
            total_pages: 1,
            results: Vec::new(),
        }))
    }

    async fn create_list(&self, list: &NewList) -> Result<Value, ApiError> {
        lock(&self.created).push(list.clone());

        let next = lock(&self.creates).pop_front();
        next.unwrap_or_else(|| Err(ApiError::Transport("no scripted response".into())))
    }
}

//! Application state - single source of truth
//!
//! Two slices, mutated only by the reducers:
//! - `movie_list`: the paginated browse view
//! - `add_movie_list`: the create form

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Read `null` the same as a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// One list returned by the account lists endpoint
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieListItem {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub item_count: u32,

    // Passthrough metadata
    #[serde(default)]
    pub favorite_count: Option<u64>,
    #[serde(default)]
    pub iso_639_1: Option<String>,
    #[serde(default)]
    pub list_type: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Accumulated pages, as carried by `FETCH_DATA_SUCCESS`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovieListPage {
    /// Every item loaded so far, earlier pages first
    pub list: Vec<MovieListItem>,
    pub total_pages: u32,
    /// Page whose response produced this value
    pub current_page: u32,
}

/// Browse slice
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListSlice {
    pub data: Option<MovieListPage>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ListSlice {
    /// Items loaded so far (empty before the first page arrives)
    pub fn movie_list(&self) -> &[MovieListItem] {
        self.data
            .as_ref()
            .map(|d| d.list.as_slice())
            .unwrap_or_default()
    }

    /// Last page loaded, 1 when nothing has been loaded yet
    pub fn current_page(&self) -> u32 {
        self.data
            .as_ref()
            .map(|d| d.current_page)
            .filter(|page| *page > 0)
            .unwrap_or(1)
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.data.as_ref().map(|d| d.total_pages)
    }

    /// Page to request when the user scrolls to the end.
    ///
    /// Mirrors the list screen's `current_page <= total_pages` check, so the
    /// last page is followed by one more (empty) request.
    pub fn next_page(&self) -> Option<u32> {
        let total = self.total_pages()?;
        let current = self.current_page();
        if current <= total {
            current.checked_add(1)
        } else {
            None
        }
    }

    /// Nothing to show and nothing pending: the "No result" case
    pub fn is_empty_result(&self) -> bool {
        !self.loading && self.error.is_none() && self.movie_list().is_empty()
    }
}

/// What the create form submitted, minus the navigation handle
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListDraft {
    pub name: String,
    pub description: String,
}

/// Create slice
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CreateSlice {
    /// The submitted draft while a create request is in flight
    pub creating: Option<ListDraft>,
    pub error: Option<String>,
    /// Server payload of the last created list
    pub data: Option<Value>,
}

impl CreateSlice {
    pub fn is_creating(&self) -> bool {
        self.creating.is_some()
    }
}

/// Root state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    pub movie_list: ListSlice,
    pub add_movie_list: CreateSlice,
}

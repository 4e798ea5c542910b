//! Action catalog
//!
//! Intents come from the front-end (`FetchMovieList`, `ResetMovieList`,
//! `CreateMovieList`, `ResetCreateListError`); outcomes come from the
//! logics. Kinds are the wire names, e.g. `FETCH_MOVIE_LIST`.

use serde_json::Value;

use reel_dispatch::ActionSummary;

use crate::navigation::NavigationHandle;
use crate::state::{ListDraft, MovieListPage};

/// Kind strings, for registering logics
pub mod kinds {
    pub const FETCH_MOVIE_LIST: &str = "FETCH_MOVIE_LIST";
    pub const RESET_MOVIE_LIST: &str = "RESET_MOVIE_LIST";
    pub const CREATE_MOVIE_LIST: &str = "CREATE_MOVIE_LIST";
    pub const FETCH_DATA_SUCCESS: &str = "FETCH_DATA_SUCCESS";
    pub const FETCH_DATA_FAILURE: &str = "FETCH_DATA_FAILURE";
    pub const CREATE_LIST_SUCCESS: &str = "CREATE_LIST_SUCCESS";
    pub const CREATE_LIST_FAILURE: &str = "CREATE_LIST_FAILURE";
    pub const RESET_CREATE_LIST_ERROR: &str = "RESET_CREATE_LIST_ERROR";
}

/// Payload of `CREATE_MOVIE_LIST`
#[derive(Clone, Debug, PartialEq)]
pub struct CreateListRequest {
    pub movie_name: String,
    pub movie_description: String,
    pub navigation: NavigationHandle,
}

impl CreateListRequest {
    pub fn draft(&self) -> ListDraft {
        ListDraft {
            name: self.movie_name.clone(),
            description: self.movie_description.clone(),
        }
    }
}

#[derive(reel_dispatch::Action, Clone, Debug, PartialEq)]
#[action(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Intent: load one page of the account's lists
    FetchMovieList { page: u32 },

    /// Intent: drop everything loaded so far (list screen unmount)
    ResetMovieList,

    /// Intent: create a list, then go back to the lists screen
    CreateMovieList(CreateListRequest),

    /// Result: accumulated pages including the one just loaded
    FetchDataSuccess(MovieListPage),

    /// Result: fetch failed
    FetchDataFailure(String),

    /// Result: server payload of the created list
    CreateListSuccess(Value),

    /// Result: create failed
    CreateListFailure(String),

    /// Intent: dismiss the create error (form unmount)
    ResetCreateListError,
}

pub fn fetch_movie_list(page: u32) -> Action {
    Action::FetchMovieList { page }
}

pub fn reset_movie_list() -> Action {
    Action::ResetMovieList
}

pub fn create_movie_list(
    movie_name: impl Into<String>,
    movie_description: impl Into<String>,
    navigation: NavigationHandle,
) -> Action {
    Action::CreateMovieList(CreateListRequest {
        movie_name: movie_name.into(),
        movie_description: movie_description.into(),
        navigation,
    })
}

pub fn fetch_data_success(page: MovieListPage) -> Action {
    Action::FetchDataSuccess(page)
}

pub fn fetch_data_failure(message: impl Into<String>) -> Action {
    Action::FetchDataFailure(message.into())
}

pub fn create_list_success(payload: Value) -> Action {
    Action::CreateListSuccess(payload)
}

pub fn create_list_failure(message: impl Into<String>) -> Action {
    Action::CreateListFailure(message.into())
}

pub fn reset_create_error() -> Action {
    Action::ResetCreateListError
}

/// Concise log lines: counts instead of whole lists
impl ActionSummary for Action {
    fn summary(&self) -> String {
        match self {
            Action::FetchDataSuccess(page) => format!(
                "FetchDataSuccess {{ items: {}, page: {}/{} }}",
                page.list.len(),
                page.current_page,
                page.total_pages
            ),
            Action::CreateMovieList(request) => {
                format!("CreateMovieList {{ name: {:?} }}", request.movie_name)
            }
            Action::CreateListSuccess(payload) => {
                let id = payload
                    .get("list_id")
                    .or_else(|| payload.get("id"))
                    .map(Value::to_string)
                    .unwrap_or_else(|| "?".into());
                format!("CreateListSuccess {{ id: {} }}", id)
            }
            _ => format!("{:?}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::RecordingNavigator;
    use crate::state::MovieListItem;
    use reel_dispatch::Action as _;
    use serde_json::json;

    #[test]
    fn test_names_are_wire_kinds() {
        let nav = NavigationHandle::new(RecordingNavigator::new());
        let cases = [
            (fetch_movie_list(1), kinds::FETCH_MOVIE_LIST),
            (reset_movie_list(), kinds::RESET_MOVIE_LIST),
            (create_movie_list("X", "Y", nav), kinds::CREATE_MOVIE_LIST),
            (
                fetch_data_success(MovieListPage::default()),
                kinds::FETCH_DATA_SUCCESS,
            ),
            (fetch_data_failure("e"), kinds::FETCH_DATA_FAILURE),
            (create_list_success(json!({})), kinds::CREATE_LIST_SUCCESS),
            (create_list_failure("e"), kinds::CREATE_LIST_FAILURE),
            (reset_create_error(), kinds::RESET_CREATE_LIST_ERROR),
        ];

        for (action, kind) in cases {
            assert_eq!(action.name(), kind);
        }
        assert_eq!(Action::kinds().len(), 8);
    }

    #[test]
    fn test_create_payload_shapes_draft() {
        let nav = NavigationHandle::new(RecordingNavigator::new());
        let Action::CreateMovieList(request) = create_movie_list("Noir", "Best of", nav.clone())
        else {
            panic!("wrong variant");
        };

        assert_eq!(request.navigation, nav);
        assert_eq!(
            request.draft(),
            ListDraft {
                name: "Noir".into(),
                description: "Best of".into()
            }
        );
    }

    #[test]
    fn test_summary_counts_items() {
        let page = MovieListPage {
            list: vec![MovieListItem::default(); 3],
            total_pages: 4,
            current_page: 2,
        };
        assert_eq!(
            fetch_data_success(page).summary(),
            "FetchDataSuccess { items: 3, page: 2/4 }"
        );
        assert_eq!(
            create_list_success(json!({"list_id": 123})).summary(),
            "CreateListSuccess { id: 123 }"
        );
        assert_eq!(reset_movie_list().summary(), "ResetMovieList");
    }
}

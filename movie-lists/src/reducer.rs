//! Reducers - pure functions: (state, action) -> changed
//!
//! Each slice has its own reducer; actions it does not handle leave the
//! slice untouched and return `false`.

use crate::action::Action;
use crate::state::{AppState, CreateSlice, ListSlice};

/// Root reducer, handed to the runtime
pub fn reducer(state: &mut AppState, action: Action) -> bool {
    match action {
        Action::FetchMovieList { .. }
        | Action::ResetMovieList
        | Action::FetchDataSuccess(_)
        | Action::FetchDataFailure(_) => movie_list_reducer(&mut state.movie_list, action),

        Action::CreateMovieList(_)
        | Action::CreateListSuccess(_)
        | Action::CreateListFailure(_)
        | Action::ResetCreateListError => create_list_reducer(&mut state.add_movie_list, action),
    }
}

/// Browse slice reducer
pub fn movie_list_reducer(state: &mut ListSlice, action: Action) -> bool {
    match action {
        Action::FetchMovieList { .. } => {
            state.loading = true;
            state.error = None;
            true
        }

        Action::FetchDataSuccess(page) => {
            state.loading = false;
            state.data = Some(page);
            true
        }

        Action::FetchDataFailure(message) => {
            state.loading = false;
            state.error = Some(message);
            true
        }

        Action::ResetMovieList => {
            *state = ListSlice::default();
            true
        }

        _ => false,
    }
}

/// Create slice reducer
pub fn create_list_reducer(state: &mut CreateSlice, action: Action) -> bool {
    match action {
        Action::CreateMovieList(request) => {
            state.creating = Some(request.draft());
            true
        }

        Action::CreateListSuccess(payload) => {
            state.creating = None;
            state.data = Some(payload);
            true
        }

        Action::CreateListFailure(message) => {
            state.creating = None;
            state.error = Some(message);
            true
        }

        Action::ResetCreateListError => {
            state.error = None;
            true
        }

        _ => false,
    }
}

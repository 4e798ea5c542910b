//! Navigation boundary
//!
//! The create logic moves the user back to the lists screen once a list
//! exists. The front-end supplies a [`Navigator`] inside the create action;
//! the core only ever calls it.

use std::fmt;
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Screens the front-end can show
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Lists,
    CreateList,
    ListDetail {
        title: String,
        description: String,
        items_count: u32,
    },
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Lists => write!(f, "Lists"),
            Screen::CreateList => write!(f, "CreateList"),
            Screen::ListDetail { title, .. } => write!(f, "ListDetail({})", title),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("cannot navigate to {screen}: {reason}")]
    Rejected { screen: Screen, reason: String },
}

pub trait Navigator: Send + Sync + 'static {
    fn navigate(&self, screen: Screen) -> Result<(), NavigationError>;
}

/// Opaque, cheaply cloned navigator reference carried by actions.
///
/// Two handles are equal when they point at the same navigator.
#[derive(Clone)]
pub struct NavigationHandle(Arc<dyn Navigator>);

impl NavigationHandle {
    pub fn new<N: Navigator>(navigator: N) -> Self {
        Self(Arc::new(navigator))
    }

    /// Wrap a navigator the caller keeps its own reference to
    pub fn shared<N: Navigator>(navigator: Arc<N>) -> Self {
        Self(navigator)
    }

    pub fn navigate(&self, screen: Screen) -> Result<(), NavigationError> {
        self.0.navigate(screen)
    }
}

impl PartialEq for NavigationHandle {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Debug for NavigationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NavigationHandle(..)")
    }
}

/// Navigator that records every route it is asked for.
///
/// Stands in for a screen stack: the CLI prints its history and tests
/// assert on it. A rejecting recorder fails every call and records nothing.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Screen>>,
    reject_with: Option<String>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            history: Mutex::default(),
            reject_with: Some(reason.into()),
        }
    }

    pub fn history(&self) -> Vec<Screen> {
        match self.history.lock() {
            Ok(history) => history.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, screen: Screen) -> Result<(), NavigationError> {
        if let Some(reason) = &self.reject_with {
            return Err(NavigationError::Rejected {
                screen,
                reason: reason.clone(),
            });
        }
        tracing::debug!(screen = %screen, "Navigate");
        match self.history.lock() {
            Ok(mut history) => history.push(screen),
            Err(poisoned) => poisoned.into_inner().push(screen),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_navigator_keeps_order() {
        let navigator = Arc::new(RecordingNavigator::new());
        let handle = NavigationHandle::shared(navigator.clone());

        handle.navigate(Screen::CreateList).unwrap();
        handle.navigate(Screen::Lists).unwrap();

        assert_eq!(navigator.history(), vec![Screen::CreateList, Screen::Lists]);
    }

    #[test]
    fn test_rejecting_navigator() {
        let handle = NavigationHandle::new(RecordingNavigator::rejecting("unmounted"));
        let err = handle.navigate(Screen::Lists).unwrap_err();
        assert_eq!(err.to_string(), "cannot navigate to Lists: unmounted");
    }

    #[test]
    fn test_handle_equality_is_identity() {
        let a = NavigationHandle::new(RecordingNavigator::new());
        let b = NavigationHandle::new(RecordingNavigator::new());

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(format!("{:?}", a), "NavigationHandle(..)");
    }
}

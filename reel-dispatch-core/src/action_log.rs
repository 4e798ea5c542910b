//! Action logging with glob filtering and an in-memory ring buffer
//!
//! `ActionLoggerMiddleware` sits in front of the reducer. Every action whose
//! kind passes the filter is reported through `tracing` with its
//! [`ActionSummary`], and optionally kept in an [`ActionLog`] so a front-end
//! can show what happened recently.
//!
//! ```ignore
//! use reel_dispatch_core::action_log::{ActionLogConfig, ActionLoggerMiddleware};
//!
//! let middleware = ActionLoggerMiddleware::with_log(ActionLogConfig::with_capacity(50));
//! // ... after a few dispatches
//! for entry in middleware.log().unwrap().recent(5) {
//!     println!("#{} {}", entry.sequence, entry.summary);
//! }
//! ```

use crate::action::ActionSummary;
use crate::store::Middleware;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Which action kinds get logged.
///
/// Patterns are globs: `*` matches any run of characters, `?` exactly one.
/// `FETCH_*` covers `FETCH_MOVIE_LIST`, `FETCH_DATA_SUCCESS` and
/// `FETCH_DATA_FAILURE`; `*_FAILURE` covers every failure outcome.
#[derive(Debug, Clone, Default)]
pub struct ActionLoggerConfig {
    /// If non-empty, only kinds matching one of these are logged
    pub include_patterns: Vec<String>,
    /// Kinds matching any of these are dropped (checked after include)
    pub exclude_patterns: Vec<String>,
}

impl ActionLoggerConfig {
    /// Build a config from comma-separated pattern lists.
    ///
    /// ```
    /// use reel_dispatch_core::action_log::ActionLoggerConfig;
    ///
    /// let config = ActionLoggerConfig::new(Some("FETCH_*, CREATE_*"), Some("*_SUCCESS"));
    /// assert!(config.should_log("FETCH_MOVIE_LIST"));
    /// assert!(config.should_log("CREATE_LIST_FAILURE"));
    /// assert!(!config.should_log("FETCH_DATA_SUCCESS"));
    /// assert!(!config.should_log("RESET_MOVIE_LIST"));
    /// ```
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Self {
        Self {
            include_patterns: include.map(split_patterns).unwrap_or_default(),
            exclude_patterns: exclude.map(split_patterns).unwrap_or_default(),
        }
    }

    /// Create a config with specific pattern vectors
    pub fn with_patterns(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            include_patterns: include,
            exclude_patterns: exclude,
        }
    }

    /// Check an action kind against the include/exclude patterns
    pub fn should_log(&self, action_name: &str) -> bool {
        let included = self.include_patterns.is_empty()
            || self
                .include_patterns
                .iter()
                .any(|p| glob_match(p, action_name));

        included
            && !self
                .exclude_patterns
                .iter()
                .any(|p| glob_match(p, action_name))
    }
}

fn split_patterns(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

/// One logged action
#[derive(Debug, Clone)]
pub struct ActionLogEntry {
    /// Action kind
    pub name: &'static str,
    /// Output of [`ActionSummary::summary`]
    pub summary: String,
    /// When the action reached the middleware
    pub timestamp: Instant,
    /// Monotonic sequence number, never reused after eviction
    pub sequence: u64,
    /// Whether the reducer changed state; `None` until the reducer has run
    pub state_changed: Option<bool>,
}

impl ActionLogEntry {
    pub fn new(name: &'static str, summary: String, sequence: u64) -> Self {
        Self {
            name,
            summary,
            timestamp: Instant::now(),
            sequence,
            state_changed: None,
        }
    }

    /// Time since this action was logged
    pub fn elapsed(&self) -> Duration {
        self.timestamp.elapsed()
    }
}

/// Configuration for the action log ring buffer
#[derive(Debug, Clone)]
pub struct ActionLogConfig {
    /// Maximum number of entries to keep
    pub capacity: usize,
    pub filter: ActionLoggerConfig,
}

impl Default for ActionLogConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            filter: ActionLoggerConfig::default(),
        }
    }
}

impl ActionLogConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    pub fn new(capacity: usize, filter: ActionLoggerConfig) -> Self {
        Self { capacity, filter }
    }
}

/// Ring buffer of recently dispatched actions.
///
/// The oldest entry is evicted once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct ActionLog {
    entries: VecDeque<ActionLogEntry>,
    config: ActionLogConfig,
    next_sequence: u64,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new(ActionLogConfig::default())
    }
}

impl ActionLog {
    pub fn new(config: ActionLogConfig) -> Self {
        Self {
            entries: VecDeque::with_capacity(config.capacity),
            config,
            next_sequence: 0,
        }
    }

    /// Record an action if its kind passes the filter.
    ///
    /// Returns the new entry, or `None` when the action was filtered out.
    pub fn log<A: ActionSummary>(&mut self, action: &A) -> Option<&ActionLogEntry> {
        let name = action.name();
        if !self.config.filter.should_log(name) || self.config.capacity == 0 {
            return None;
        }

        let entry = ActionLogEntry::new(name, action.summary(), self.next_sequence);
        self.next_sequence += 1;

        while self.entries.len() >= self.config.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        self.entries.back()
    }

    /// Attach the reducer outcome to the newest entry
    pub fn update_last_state_changed(&mut self, changed: bool) {
        if let Some(entry) = self.entries.back_mut() {
            entry.state_changed = Some(changed);
        }
    }

    /// All entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &ActionLogEntry> {
        self.entries.iter()
    }

    /// The newest `count` entries, newest first
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &ActionLogEntry> {
        self.entries.iter().rev().take(count)
    }

    /// Kinds of all stored entries, oldest first
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn config(&self) -> &ActionLogConfig {
        &self.config
    }
}

/// Middleware that reports filtered actions through `tracing` and,
/// optionally, an [`ActionLog`].
#[derive(Debug, Clone)]
pub struct ActionLoggerMiddleware {
    config: ActionLoggerConfig,
    log: Option<ActionLog>,
    // Only the entry logged in `before` may receive the `after` outcome.
    last_action_logged: bool,
    active: bool,
}

impl Default for ActionLoggerMiddleware {
    fn default() -> Self {
        Self::new(ActionLoggerConfig::default())
    }
}

impl ActionLoggerMiddleware {
    /// Tracing only, no in-memory storage
    pub fn new(config: ActionLoggerConfig) -> Self {
        Self {
            config,
            log: None,
            last_action_logged: false,
            active: true,
        }
    }

    /// Tracing plus in-memory storage
    pub fn with_log(config: ActionLogConfig) -> Self {
        Self {
            config: config.filter.clone(),
            log: Some(ActionLog::new(config)),
            last_action_logged: false,
            active: true,
        }
    }

    pub fn with_default_log() -> Self {
        Self::with_log(ActionLogConfig::default())
    }

    /// Switch the middleware on or off; when off every hook is a no-op.
    ///
    /// ```ignore
    /// let middleware = ActionLoggerMiddleware::with_default_log().active(args.debug);
    /// ```
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn log(&self) -> Option<&ActionLog> {
        self.log.as_ref()
    }

    pub fn log_mut(&mut self) -> Option<&mut ActionLog> {
        self.log.as_mut()
    }

    pub fn config(&self) -> &ActionLoggerConfig {
        &self.config
    }
}

impl<A: ActionSummary> Middleware<A> for ActionLoggerMiddleware {
    fn before(&mut self, action: &A) {
        if !self.active {
            return;
        }

        let name = action.name();
        if self.config.should_log(name) {
            tracing::debug!(action = %name, summary = %action.summary(), "action");
        }

        self.last_action_logged = self
            .log
            .as_mut()
            .is_some_and(|log| log.log(action).is_some());
    }

    fn after(&mut self, _action: &A, state_changed: bool) {
        if !self.active || !self.last_action_logged {
            return;
        }
        if let Some(log) = self.log.as_mut() {
            log.update_last_state_changed(state_changed);
        }
    }
}

/// Glob matching with `*` (any run, including empty) and `?` (one char).
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    // matches[j]: pattern[..i] matches text[..j]
    let mut matches = vec![false; text.len() + 1];
    matches[0] = true;

    for p in &pattern {
        let mut next = vec![false; text.len() + 1];
        match p {
            '*' => {
                let mut seen = false;
                for j in 0..=text.len() {
                    seen |= matches[j];
                    next[j] = seen;
                }
            }
            _ => {
                for j in 1..=text.len() {
                    next[j] = matches[j - 1] && (*p == '?' || *p == text[j - 1]);
                }
            }
        }
        matches = next;
    }

    matches[text.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_match() {
        assert!(glob_match("FETCH_MOVIE_LIST", "FETCH_MOVIE_LIST"));
        assert!(!glob_match("FETCH_MOVIE_LIST", "FETCH_MOVIE_LISTS"));

        assert!(glob_match("FETCH_*", "FETCH_DATA_SUCCESS"));
        assert!(glob_match("*_FAILURE", "CREATE_LIST_FAILURE"));
        assert!(glob_match("*LIST*", "RESET_CREATE_LIST_ERROR"));
        assert!(!glob_match("FETCH_*", "RESET_MOVIE_LIST"));

        assert!(glob_match("RESET_?OVIE_LIST", "RESET_MOVIE_LIST"));
        assert!(!glob_match("RESET?", "RESET"));
        assert!(glob_match("*", ""));
        assert!(!glob_match("?", ""));
    }

    #[test]
    fn test_config_include_and_exclude() {
        let config = ActionLoggerConfig::new(Some("*_FAILURE, *_SUCCESS"), Some("CREATE_*"));
        assert!(config.should_log("FETCH_DATA_FAILURE"));
        assert!(config.should_log("FETCH_DATA_SUCCESS"));
        assert!(!config.should_log("CREATE_LIST_FAILURE"));
        assert!(!config.should_log("FETCH_MOVIE_LIST"));
    }

    #[test]
    fn test_config_default_logs_everything() {
        let config = ActionLoggerConfig::default();
        assert!(config.should_log("FETCH_MOVIE_LIST"));
        assert!(config.should_log("RESET_CREATE_LIST_ERROR"));
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Fetch(u32),
        Reset,
    }

    impl crate::Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Fetch(_) => "FETCH",
                TestAction::Reset => "RESET",
            }
        }
    }

    impl ActionSummary for TestAction {}

    #[test]
    fn test_action_log_capacity_evicts_oldest() {
        let mut log = ActionLog::new(ActionLogConfig::with_capacity(2));

        log.log(&TestAction::Fetch(1));
        log.log(&TestAction::Fetch(2));
        log.log(&TestAction::Reset);

        assert_eq!(log.len(), 2);
        assert_eq!(log.names(), vec!["FETCH", "RESET"]);
        assert_eq!(log.entries().next().unwrap().sequence, 1);
        assert_eq!(log.recent(1).next().unwrap().summary, "Reset");
    }

    #[test]
    fn test_middleware_records_state_changed() {
        let config = ActionLogConfig::new(10, ActionLoggerConfig::new(None, Some("RESET")));
        let mut middleware = ActionLoggerMiddleware::with_log(config);

        middleware.before(&TestAction::Fetch(3));
        middleware.after(&TestAction::Fetch(3), true);

        // Filtered out: must not overwrite the previous entry's outcome
        middleware.before(&TestAction::Reset);
        middleware.after(&TestAction::Reset, false);

        let log = middleware.log().unwrap();
        assert_eq!(log.len(), 1);
        let entry = log.entries().next().unwrap();
        assert_eq!(entry.summary, "Fetch(3)");
        assert_eq!(entry.state_changed, Some(true));
    }

    #[test]
    fn test_inactive_middleware_is_noop() {
        let mut middleware = ActionLoggerMiddleware::with_default_log().active(false);

        middleware.before(&TestAction::Fetch(1));
        middleware.after(&TestAction::Fetch(1), true);

        assert!(middleware.log().unwrap().is_empty());
    }
}

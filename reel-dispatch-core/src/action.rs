//! Action trait for type-safe state mutations

use std::fmt::Debug;

/// Marker trait for actions that can be dispatched to the store
///
/// Actions represent intents or outcomes. They should be:
/// - Clone: Actions are logged, handed to reducers and to logics
/// - Debug: For debugging and logging
/// - Send + 'static: Logics dispatch them from spawned tasks
///
/// Use `#[derive(Action)]` from `reel-dispatch-macros` to auto-implement this trait.
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the action kind.
    ///
    /// Logics are registered against this name, so it doubles as the
    /// routing key of the logic layer.
    fn name(&self) -> &'static str;
}

/// Compact, human-readable description of an action for logs.
///
/// The default implementation uses the `Debug` output. Override it for
/// actions that carry large payloads.
pub trait ActionSummary: Action {
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    enum Ping {
        Once,
        Many(Vec<u8>),
    }

    impl Action for Ping {
        fn name(&self) -> &'static str {
            match self {
                Ping::Once => "PING_ONCE",
                Ping::Many(_) => "PING_MANY",
            }
        }
    }

    impl ActionSummary for Ping {
        fn summary(&self) -> String {
            match self {
                Ping::Many(bytes) => format!("PING_MANY({} bytes)", bytes.len()),
                other => format!("{:?}", other),
            }
        }
    }

    #[test]
    fn test_summary_override() {
        assert_eq!(Ping::Once.summary(), "Once");
        assert_eq!(Ping::Many(vec![1, 2, 3]).summary(), "PING_MANY(3 bytes)");
        assert_eq!(Ping::Many(vec![]).name(), "PING_MANY");
    }
}

//! API configuration
//!
//! Values come from command-line flags, falling back to `MOVIE_LISTS_*`
//! environment variables.

use clap::Args;
use thiserror::Error;

pub const DEFAULT_BASE_API: &str = "https://api.themoviedb.org/3";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing {field}: pass --{flag} or set {env}")]
    MissingField {
        field: &'static str,
        flag: &'static str,
        env: &'static str,
    },
}

/// Connection settings for the movie database API
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// API root, without a trailing slash
    #[arg(long, env = "MOVIE_LISTS_BASE_API", default_value = DEFAULT_BASE_API)]
    pub base_api: String,

    /// Account whose lists are browsed
    #[arg(long, env = "MOVIE_LISTS_ACCOUNT_ID", default_value = "")]
    pub account_id: String,

    #[arg(long, env = "MOVIE_LISTS_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, env = "MOVIE_LISTS_SESSION_ID", default_value = "", hide_env_values = true)]
    pub session_id: String,
}

impl ApiConfig {
    pub fn new(
        base_api: impl Into<String>,
        account_id: impl Into<String>,
        api_key: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            base_api: base_api.into(),
            account_id: account_id.into(),
            api_key: api_key.into(),
            session_id: session_id.into(),
        }
    }

    /// Check that every value is present and normalize the base URL.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        self.base_api = self.base_api.trim().trim_end_matches('/').to_string();

        let fields = [
            ("base_api", "base-api", "MOVIE_LISTS_BASE_API", &self.base_api),
            ("account_id", "account-id", "MOVIE_LISTS_ACCOUNT_ID", &self.account_id),
            ("api_key", "api-key", "MOVIE_LISTS_API_KEY", &self.api_key),
            ("session_id", "session-id", "MOVIE_LISTS_SESSION_ID", &self.session_id),
        ];
        for (field, flag, env, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField { field, flag, env });
            }
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims_base_api() {
        let config = ApiConfig::new("http://localhost:8080/3/", "42", "key", "session")
            .validate()
            .unwrap();
        assert_eq!(config.base_api, "http://localhost:8080/3");
    }

    #[test]
    fn test_validate_reports_first_missing_field() {
        let err = ApiConfig::new(DEFAULT_BASE_API, "42", "", "")
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingField {
                field: "api_key",
                flag: "api-key",
                env: "MOVIE_LISTS_API_KEY"
            }
        );
        assert_eq!(
            err.to_string(),
            "missing api_key: pass --api-key or set MOVIE_LISTS_API_KEY"
        );
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let err = ApiConfig::new(DEFAULT_BASE_API, "  ", "key", "session")
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingField {
                field: "account_id",
                ..
            }
        ));
    }
}

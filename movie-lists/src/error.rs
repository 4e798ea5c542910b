use thiserror::Error;

use crate::config::ConfigError;

/// Errors that end the command-line front-end
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("could not build HTTP client: {0}")]
    Client(String),

    #[error("could not write output: {0}")]
    Io(#[from] std::io::Error),
}

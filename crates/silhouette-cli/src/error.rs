//! Error handling for the command line tool

use silhouette_registry::RegistryError;
use thiserror::Error;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Silhouette error: {0}")]
    Silhouette(#[from] silhouette::SilhouetteError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<silhouette::ConfigError> for CliError {
    fn from(err: silhouette::ConfigError) -> Self {
        CliError::Silhouette(err.into())
    }
}

//! Error types for the silhouette registry
//!
//! Missing templates are not errors: lookups and resolution report absence
//! through their return values. Shadowed or unrecognised templates found
//! while rebuilding are reported as [`crate::Diagnostic`]s, not errors.

use thiserror::Error;

/// Registry-specific errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Template source error: {location} - {reason}")]
    Source { location: String, reason: String },

    #[error("Render error: {template} - {reason}")]
    Render { template: String, reason: String },

    #[error("Stale composition: version {version} is older than published version {current}")]
    StaleComposition { version: u64, current: u64 },

    #[error("Shape table rebuild lock is poisoned")]
    Lock,

    #[error("Silhouette error: {0}")]
    Silhouette(#[from] silhouette::SilhouetteError),
}

impl RegistryError {
    /// Create a render error for a template or shape method
    pub fn render(template: impl Into<String>, reason: impl ToString) -> Self {
        RegistryError::Render {
            template: template.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a source error for a discovery location
    pub fn source(location: impl Into<String>, reason: impl ToString) -> Self {
        RegistryError::Source {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

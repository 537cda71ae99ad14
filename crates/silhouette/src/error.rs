//! Error types for the silhouette library
//!
//! Absence of a template is never an error here: lookups and resolution
//! return explicit "not found" values. The errors below cover malformed
//! input at construction time and configuration problems.

use thiserror::Error;

/// Main error type for the silhouette library
#[derive(Error, Debug)]
pub enum SilhouetteError {
    /// Shape construction errors (base name, properties, attributes)
    #[error("Shape error: {0}")]
    Shape(#[from] ShapeError),

    /// Property serialization errors
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Configuration and environment errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Shape construction errors
///
/// These are programming errors on the caller side and are raised as soon
/// as the malformed shape is built, never during resolution.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ShapeError {
    #[error("Shape is missing a base name")]
    MissingBaseName,

    #[error("Invalid shape name '{name}': character '{character}' is outside [A-Za-z0-9_]")]
    InvalidBaseName { name: String, character: char },

    #[error("Property key must not be empty")]
    EmptyPropertyKey,

    #[error("Unknown contextual attribute: {name}")]
    UnknownAttribute { name: String },
}

/// Property (de)serialization errors
#[derive(Error, Debug)]
pub enum DataError {
    #[error("JSON serialization failed: {reason}")]
    Serialization { reason: String },

    #[error("JSON deserialization failed: {reason}")]
    Deserialization { reason: String },
}

/// Configuration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration: {setting} - {reason}")]
    InvalidConfig { setting: String, reason: String },

    #[error("Environment variable error: {var} - {reason}")]
    Environment { var: String, reason: String },
}

/// Shorthand result type for silhouette operations
pub type Result<T> = std::result::Result<T, SilhouetteError>;

impl From<serde_json::Error> for SilhouetteError {
    fn from(error: serde_json::Error) -> Self {
        let reason = error.to_string();
        if error.is_syntax() || error.is_data() || error.is_eof() {
            SilhouetteError::Data(DataError::Deserialization { reason })
        } else {
            SilhouetteError::Data(DataError::Serialization { reason })
        }
    }
}

impl SilhouetteError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            SilhouetteError::Shape(ShapeError::MissingBaseName) => {
                "A shape must be created with a base name".to_string()
            }
            SilhouetteError::Shape(ShapeError::InvalidBaseName { name, .. }) => {
                format!("'{}' is not a valid shape name", name)
            }
            SilhouetteError::Shape(e) => format!("Shape error: {}", e),
            SilhouetteError::Data(_) => {
                "Failed to convert shape properties. Please check the property values.".to_string()
            }
            SilhouetteError::Config(e) => format!("Configuration error: {}", e),
        }
    }

    /// Check if this error is recoverable
    ///
    /// Malformed shapes and configuration never fix themselves on retry.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SilhouetteError::Shape(_) => false,
            SilhouetteError::Config(_) => false,
            SilhouetteError::Data(_) => true,
        }
    }
}

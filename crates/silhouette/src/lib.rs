//! Silhouette resolves dynamic view-model "shapes" to the template that
//! renders them.
//!
//! This crate holds the pure parts of the pipeline: the shape model, the
//! transliteration between template paths and canonical shape names, and the
//! alternate generator that derives candidate names for a shape occurrence.
//! The registry, resolver and display pipeline live in `silhouette-registry`.

pub mod alternates;
pub mod config;
pub mod error;
pub mod name;
pub mod shape;

// Re-export core types
pub use alternates::{
    AlternateRule, Candidate, CandidateOrigin, ShapeCategory, generate_alternates,
    generate_candidates,
};
pub use config::NamingConfig;
pub use error::{ConfigError, DataError, Result, ShapeError, SilhouetteError};
pub use name::{
    ShapeName, alternate_suffix, canonicalize, encode_alternate_value, path_to_shape_name,
    shape_name_to_candidate_paths,
};
pub use shape::{
    ContextAttribute, PropertyBag, Shape, ShapeFactory, ShapeMethod, ShapeOccurrence,
    ShapeOccurrenceBuilder,
};

/// Get the library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! # Silhouette Registry
//!
//! Template registry and resolution engine for silhouette shapes:
//! - Template discovery across enabled modules and themes
//! - Provenance layering (module < base theme < active theme)
//! - Most-specific-first resolution over generated alternates
//! - Wrapper resolution with explicit placement overrides
//! - Atomic registry publication for lock-free concurrent reads
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use silhouette::{ContextAttribute, NamingConfig, ShapeOccurrence};
//! use silhouette_registry::*;
//!
//! # async fn example() -> Result<()> {
//! let theme = MemorySource::new("TheTheme", Provenance::ActiveTheme)
//!     .with_template("Views/Content.Summary-BlogPost.cshtml");
//! let sources: Vec<Arc<dyn TemplateSource>> = vec![Arc::new(theme)];
//!
//! let table = ShapeTable::new(NamingConfig::default());
//! table.refresh(1, &sources).await?;
//!
//! let occurrence = ShapeOccurrence::builder("Content")
//!     .display_type("Summary")
//!     .attribute(ContextAttribute::ContentType, "BlogPost")
//!     .build()?;
//!
//! if let Resolution::Template(template) = table.resolve(&occurrence) {
//!     println!("rendering {} from {}", template.shape_name, template.source);
//! }
//! # Ok(())
//! # }
//! ```

pub mod composition;
pub mod descriptor;
pub mod display;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod source;
pub mod table;

pub use composition::{CompositionSnapshot, DiscoveredTemplate};
pub use descriptor::{Provenance, SourceLocation, TemplateDescriptor, TemplateHandle};
pub use display::{Binding, DisplayManager, TemplateExecutor};
pub use error::{RegistryError, Result};
pub use registry::{Diagnostic, TemplateRegistry};
pub use resolver::{Resolution, ResolutionTrace, Resolver, TraceStep};
pub use source::{MemorySource, TemplateSource};
pub use table::{RebuildReport, ShapeTable};

#[cfg(feature = "fs")]
pub use source::FileSystemSource;

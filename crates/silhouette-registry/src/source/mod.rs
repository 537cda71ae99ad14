//! Template discovery across enabled modules and themes

#[cfg(feature = "fs")]
mod file;
#[cfg(feature = "fs")]
pub use file::FileSystemSource;

use async_trait::async_trait;

use crate::composition::DiscoveredTemplate;
use crate::descriptor::{Provenance, TemplateHandle};
use crate::error::Result;

/// Enumerates the template files one module or theme contributes
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Name of the module or theme
    fn feature(&self) -> &str;

    /// Precedence tier of every template this source reports
    fn provenance(&self) -> Provenance;

    /// List templates in a stable enumeration order
    async fn discover(&self) -> Result<Vec<DiscoveredTemplate>>;
}

/// In-memory source for tests and embedding
#[derive(Debug, Clone)]
pub struct MemorySource {
    feature: String,
    provenance: Provenance,
    templates: Vec<(String, TemplateHandle)>,
}

impl MemorySource {
    pub fn new(feature: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            feature: feature.into(),
            provenance,
            templates: Vec::new(),
        }
    }

    /// Add a template whose handle is its relative path
    pub fn with_template(self, path: impl Into<String>) -> Self {
        let path = path.into();
        let handle = TemplateHandle::new(&path);
        self.with_template_handle(path, handle)
    }

    /// Add a template with an explicit executor handle
    pub fn with_template_handle(mut self, path: impl Into<String>, handle: TemplateHandle) -> Self {
        self.templates.push((path.into(), handle));
        self
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[async_trait]
impl TemplateSource for MemorySource {
    fn feature(&self) -> &str {
        &self.feature
    }

    fn provenance(&self) -> Provenance {
        self.provenance
    }

    async fn discover(&self) -> Result<Vec<DiscoveredTemplate>> {
        Ok(self
            .templates
            .iter()
            .map(|(path, handle)| DiscoveredTemplate {
                feature: self.feature.clone(),
                path: path.clone(),
                provenance: self.provenance,
                handle: handle.clone(),
            })
            .collect())
    }
}

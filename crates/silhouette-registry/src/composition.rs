//! Composition snapshots: the templates of every enabled module and theme
//!
//! A snapshot is captured once per module/theme enablement state and handed
//! to [`crate::ShapeTable::rebuild`]. The order of `templates` is the
//! enumeration order used to break ties between templates with the same
//! name and provenance: the one enumerated later shadows the earlier.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::descriptor::{Provenance, SourceLocation, TemplateHandle};
use crate::error::Result;
use crate::source::TemplateSource;

/// One template file reported by a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredTemplate {
    /// Module or theme that provides the file
    pub feature: String,
    /// Path relative to the feature root, `/`-separated
    pub path: String,
    pub provenance: Provenance,
    pub handle: TemplateHandle,
}

impl DiscoveredTemplate {
    pub fn new(feature: impl Into<String>, path: impl Into<String>, provenance: Provenance) -> Self {
        let path = path.into();
        Self {
            feature: feature.into(),
            handle: TemplateHandle::new(&path),
            path,
            provenance,
        }
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(&self.feature, &self.path)
    }

    /// File name component of the path
    pub fn file_name(&self) -> &str {
        self.path.rsplit(['/', '\\']).next().unwrap_or(&self.path)
    }
}

/// Versioned, immutable view of the enabled templates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionSnapshot {
    /// Composition version, increasing with every enablement change
    pub version: u64,
    /// Templates in enumeration order
    pub templates: Vec<DiscoveredTemplate>,
    #[serde(with = "time::serde::rfc3339")]
    pub captured_at: OffsetDateTime,
}

impl CompositionSnapshot {
    pub fn new(version: u64, templates: Vec<DiscoveredTemplate>) -> Self {
        Self {
            version,
            templates,
            captured_at: OffsetDateTime::now_utc(),
        }
    }

    /// Run discovery on every source, in order
    ///
    /// Sources are listed lowest precedence first by convention (modules,
    /// then base themes, then the active theme); only the relative order of
    /// sources with equal provenance affects the result.
    #[tracing::instrument(skip_all, fields(version = version, sources = sources.len()))]
    pub async fn collect(version: u64, sources: &[Arc<dyn TemplateSource>]) -> Result<Self> {
        let mut templates = Vec::new();
        for source in sources {
            let discovered = source.discover().await?;
            tracing::debug!(
                feature = source.feature(),
                provenance = %source.provenance(),
                count = discovered.len(),
                "collected templates"
            );
            templates.extend(discovered);
        }
        Ok(Self::new(version, templates))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    #[tokio::test]
    async fn test_collect_keeps_source_order() {
        let module = MemorySource::new("Blogs", Provenance::Module)
            .with_template("Views/Content.cshtml")
            .with_template("Views/Parts/Blog.Summary.cshtml");
        let theme = MemorySource::new("TheTheme", Provenance::ActiveTheme)
            .with_template("Views/Content.cshtml");
        let sources: Vec<Arc<dyn TemplateSource>> = vec![Arc::new(module), Arc::new(theme)];

        let snapshot = CompositionSnapshot::collect(3, &sources).await.unwrap();

        assert_eq!(snapshot.version, 3);
        let locations: Vec<String> = snapshot
            .templates
            .iter()
            .map(|t| t.location().to_string())
            .collect();
        assert_eq!(
            locations,
            vec![
                "Blogs:Views/Content.cshtml",
                "Blogs:Views/Parts/Blog.Summary.cshtml",
                "TheTheme:Views/Content.cshtml",
            ]
        );
    }

    #[test]
    fn test_file_name() {
        let template = DiscoveredTemplate::new("Blogs", "Views/Parts/Blog.Summary.cshtml", Provenance::Module);
        assert_eq!(template.file_name(), "Blog.Summary.cshtml");
    }

    #[test]
    fn test_snapshot_serializes_timestamp_as_rfc3339() {
        let snapshot = CompositionSnapshot::new(1, Vec::new());
        let json = serde_json::to_value(&snapshot).unwrap();
        let captured_at = json["captured_at"].as_str().unwrap();
        assert!(captured_at.contains('T'));
    }
}

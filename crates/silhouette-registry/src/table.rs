//! The published shape table
//!
//! Readers load the current registry snapshot without locking and resolve
//! against it. Rebuilds construct a complete registry off to the side under
//! a mutex and publish it with one atomic store, so any in-flight call sees
//! either the old or the new registry in full.

use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use serde::Serialize;
use silhouette::{NamingConfig, ShapeName, ShapeOccurrence};

use crate::composition::CompositionSnapshot;
use crate::descriptor::TemplateDescriptor;
use crate::error::{RegistryError, Result};
use crate::registry::{Diagnostic, TemplateRegistry};
use crate::resolver::{Resolution, ResolutionTrace, Resolver};
use crate::source::TemplateSource;

/// Summary of a published rebuild
#[derive(Debug, Clone, Serialize)]
pub struct RebuildReport {
    pub version: u64,
    /// Distinct shape names
    pub names: usize,
    /// Registered templates across all names
    pub templates: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Current template registry with atomic publication
#[derive(Debug)]
pub struct ShapeTable {
    current: ArcSwap<TemplateRegistry>,
    naming: NamingConfig,
    rebuild_lock: Mutex<()>,
}

impl ShapeTable {
    /// Create a table holding an empty registry at version 0
    pub fn new(naming: NamingConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(TemplateRegistry::new(0, naming.clone())),
            naming,
            rebuild_lock: Mutex::new(()),
        }
    }

    /// Create a table that publishes an already built registry
    pub fn from_registry(registry: TemplateRegistry) -> Self {
        Self {
            naming: registry.naming().clone(),
            current: ArcSwap::from_pointee(registry),
            rebuild_lock: Mutex::new(()),
        }
    }

    pub fn naming(&self) -> &NamingConfig {
        &self.naming
    }

    /// Pin the currently published registry
    pub fn snapshot(&self) -> Arc<TemplateRegistry> {
        self.current.load_full()
    }

    pub fn version(&self) -> u64 {
        self.current.load().version()
    }

    /// Replace the registry with one built from `composition`
    ///
    /// A composition older than the published registry is rejected with
    /// [`RegistryError::StaleComposition`] and the current registry stays in
    /// place. An equal version is rebuilt and republished.
    #[tracing::instrument(skip_all, fields(version = composition.version))]
    pub fn rebuild(&self, composition: &CompositionSnapshot) -> Result<RebuildReport> {
        let _guard = self.rebuild_lock.lock().map_err(|_| RegistryError::Lock)?;

        // checked under the lock so overlapping refreshes publish in order
        let current = self.current.load().version();
        if composition.version < current {
            tracing::warn!(
                version = composition.version,
                current_version = current,
                "ignoring stale composition"
            );
            return Err(RegistryError::StaleComposition {
                version: composition.version,
                current,
            });
        }

        let (registry, diagnostics) = TemplateRegistry::build(composition, &self.naming);
        let report = RebuildReport {
            version: registry.version(),
            names: registry.len(),
            templates: registry.template_count(),
            diagnostics,
        };

        let previous = self.current.swap(Arc::new(registry));
        tracing::info!(
            version = report.version,
            previous_version = previous.version(),
            names = report.names,
            templates = report.templates,
            diagnostics = report.diagnostics.len(),
            "published shape table"
        );

        Ok(report)
    }

    /// Discover templates from `sources` and publish the result
    pub async fn refresh(
        &self,
        version: u64,
        sources: &[Arc<dyn TemplateSource>],
    ) -> Result<RebuildReport> {
        let composition = CompositionSnapshot::collect(version, sources).await?;
        self.rebuild(&composition)
    }

    /// Select the template for an occurrence
    pub fn resolve(&self, occurrence: &ShapeOccurrence) -> Resolution {
        let registry = self.current.load();
        Resolver::new(&registry).resolve(occurrence)
    }

    /// Wrappers for an occurrence whose template resolved to `selected`
    pub fn resolve_wrappers(
        &self,
        occurrence: &ShapeOccurrence,
        selected: &ShapeName,
    ) -> Vec<TemplateDescriptor> {
        let registry = self.current.load();
        Resolver::new(&registry).resolve_wrappers(occurrence, selected)
    }

    /// Template and wrappers resolved against a single snapshot
    pub fn resolve_with_wrappers(
        &self,
        occurrence: &ShapeOccurrence,
    ) -> (Resolution, Vec<TemplateDescriptor>) {
        let registry = self.current.load();
        let resolver = Resolver::new(&registry);
        let resolution = resolver.resolve(occurrence);
        let selected = resolution
            .template()
            .map(|template| template.shape_name.clone())
            .unwrap_or_else(|| occurrence.shape_type().clone());
        let wrappers = resolver.resolve_wrappers(occurrence, &selected);
        (resolution, wrappers)
    }

    /// Candidate-by-candidate account of a resolution
    pub fn trace(&self, occurrence: &ShapeOccurrence) -> ResolutionTrace {
        let registry = self.current.load();
        Resolver::new(&registry).trace(occurrence)
    }
}

impl Default for ShapeTable {
    fn default() -> Self {
        Self::new(NamingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::DiscoveredTemplate;
    use crate::descriptor::Provenance;

    fn composition(version: u64, paths: &[&str]) -> CompositionSnapshot {
        CompositionSnapshot::new(
            version,
            paths
                .iter()
                .map(|path| DiscoveredTemplate::new("Theme", *path, Provenance::ActiveTheme))
                .collect(),
        )
    }

    #[test]
    fn test_new_table_is_empty() {
        let table = ShapeTable::default();
        assert_eq!(table.version(), 0);
        assert!(table.snapshot().is_empty());
        assert_eq!(
            table.resolve(&ShapeOccurrence::new("Content").unwrap()),
            Resolution::NotFound
        );
    }

    #[test]
    fn test_rebuild_replaces_whole_registry() {
        let table = ShapeTable::default();
        table
            .rebuild(&composition(1, &["Views/Content.cshtml", "Views/Zone.cshtml"]))
            .unwrap();
        let pinned = table.snapshot();

        let report = table.rebuild(&composition(2, &["Views/Widget.cshtml"])).unwrap();
        assert_eq!(report.version, 2);
        assert_eq!(report.names, 1);

        assert!(
            !table
                .resolve(&ShapeOccurrence::new("Content").unwrap())
                .is_found()
        );
        assert!(
            table
                .resolve(&ShapeOccurrence::new("Widget").unwrap())
                .is_found()
        );

        // a pinned snapshot keeps the registry it was taken from
        assert_eq!(pinned.version(), 1);
        assert_eq!(pinned.len(), 2);
    }

    #[test]
    fn test_older_composition_is_rejected() {
        let table = ShapeTable::default();
        table.rebuild(&composition(5, &["Views/Content.cshtml"])).unwrap();

        let result = table.rebuild(&composition(4, &[]));
        assert!(matches!(
            result,
            Err(RegistryError::StaleComposition {
                version: 4,
                current: 5
            })
        ));
        assert_eq!(table.version(), 5);
        assert_eq!(table.snapshot().len(), 1);
    }

    #[test]
    fn test_equal_version_is_republished() {
        let table = ShapeTable::default();
        table.rebuild(&composition(3, &["Views/Content.cshtml"])).unwrap();

        let report = table.rebuild(&composition(3, &[])).unwrap();
        assert_eq!(report.version, 3);
        assert!(table.snapshot().is_empty());
    }

    #[test]
    fn test_resolve_with_wrappers_uses_selected_name() {
        let table = ShapeTable::default();
        table
            .rebuild(&composition(
                1,
                &[
                    "Views/Content-BlogPost.cshtml",
                    "Views/Content-BlogPost.Wrapper.cshtml",
                    "Views/Content.Wrapper.cshtml",
                ],
            ))
            .unwrap();

        let occurrence = ShapeOccurrence::builder("Content")
            .attribute(silhouette::ContextAttribute::ContentType, "BlogPost")
            .build()
            .unwrap();
        let (resolution, wrappers) = table.resolve_with_wrappers(&occurrence);

        assert_eq!(
            resolution.template().unwrap().shape_name.as_str(),
            "Content__BlogPost"
        );
        assert_eq!(wrappers.len(), 1);
        assert_eq!(wrappers[0].shape_name.as_str(), "Content__BlogPost_Wrapper");
    }
}

//! Template registry: canonical shape names to provenance-ordered templates

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use silhouette::{NamingConfig, ShapeName, path_to_shape_name};

use crate::composition::CompositionSnapshot;
use crate::descriptor::{Provenance, SourceLocation, TemplateDescriptor};

/// Non-fatal findings while building a registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Two templates claim the same name at the same provenance; the one
    /// registered later wins
    Shadowed {
        name: ShapeName,
        winner: SourceLocation,
        shadowed: SourceLocation,
        provenance: Provenance,
    },
    /// A discovered file that does not map to a template
    Unrecognized {
        location: SourceLocation,
        reason: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Shadowed {
                name,
                winner,
                shadowed,
                provenance,
            } => write!(
                f,
                "{} ({}) shadows {} for shape {}",
                winner, provenance, shadowed, name
            ),
            Diagnostic::Unrecognized { location, reason } => {
                write!(f, "{} ignored: {}", location, reason)
            }
        }
    }
}

/// Immutable-once-published mapping from shape names to templates
///
/// Each name maps to its templates ordered by provenance, highest first;
/// among equal provenance the most recently registered comes first.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    version: u64,
    naming: NamingConfig,
    entries: HashMap<ShapeName, Vec<TemplateDescriptor>>,
}

impl TemplateRegistry {
    /// Create an empty registry
    pub fn new(version: u64, naming: NamingConfig) -> Self {
        Self {
            version,
            naming,
            entries: HashMap::new(),
        }
    }

    /// Build a complete registry from a composition snapshot
    pub fn build(snapshot: &CompositionSnapshot, naming: &NamingConfig) -> (Self, Vec<Diagnostic>) {
        let mut registry = Self::new(snapshot.version, naming.clone());
        let mut diagnostics = Vec::new();

        for template in &snapshot.templates {
            let location = template.location();

            if naming.strip_extension(template.file_name()).is_none() {
                diagnostics.push(Diagnostic::Unrecognized {
                    location,
                    reason: "not a recognised template extension".to_string(),
                });
                continue;
            }

            let shape_name = path_to_shape_name(&template.path, naming);
            if shape_name.is_empty() {
                diagnostics.push(Diagnostic::Unrecognized {
                    location,
                    reason: "path maps to an empty shape name".to_string(),
                });
                continue;
            }

            let descriptor = TemplateDescriptor {
                shape_name,
                source: location,
                provenance: template.provenance,
                handle: template.handle.clone(),
            };
            if let Some(diagnostic) = registry.register(descriptor) {
                tracing::warn!(%diagnostic, "template shadowed");
                diagnostics.push(diagnostic);
            }
        }

        (registry, diagnostics)
    }

    /// Register a template
    ///
    /// Re-registering the same source location under the same name updates
    /// the entry in place. A new template with the same provenance as an
    /// existing one shadows it and the shadowing is reported.
    pub fn register(&mut self, descriptor: TemplateDescriptor) -> Option<Diagnostic> {
        let templates = self
            .entries
            .entry(descriptor.shape_name.clone())
            .or_default();

        if let Some(index) = templates.iter().position(|t| t.source == descriptor.source) {
            if templates[index].provenance == descriptor.provenance {
                templates[index] = descriptor;
                return None;
            }
            templates.remove(index);
        }

        let shadowed = templates
            .iter()
            .find(|t| t.provenance == descriptor.provenance)
            .map(|t| t.source.clone());

        let index = templates
            .iter()
            .position(|t| t.provenance <= descriptor.provenance)
            .unwrap_or(templates.len());

        let diagnostic = shadowed.map(|shadowed| Diagnostic::Shadowed {
            name: descriptor.shape_name.clone(),
            winner: descriptor.source.clone(),
            shadowed,
            provenance: descriptor.provenance,
        });
        templates.insert(index, descriptor);
        diagnostic
    }

    /// Templates registered under exactly `name`, highest provenance first
    ///
    /// Empty when nothing is registered.
    pub fn lookup(&self, name: &ShapeName) -> &[TemplateDescriptor] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The winning template for exactly `name`
    pub fn best(&self, name: &ShapeName) -> Option<&TemplateDescriptor> {
        self.lookup(name).first()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn naming(&self) -> &NamingConfig {
        &self.naming
    }

    /// Number of distinct shape names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of registered templates across all names
    pub fn template_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Registered shape names in case-insensitive order
    pub fn names(&self) -> Vec<&ShapeName> {
        let mut names: Vec<&ShapeName> = self.entries.keys().collect();
        names.sort();
        names
    }
}

//! Template resolution
//!
//! Specificity is the primary key: candidates are tried most specific first
//! and the first name with any registered template wins. Provenance only
//! chooses among templates registered under that same name, so a less
//! specific template from a higher tier never beats a more specific one.

use serde::Serialize;
use silhouette::{
    Candidate, ContextAttribute, ShapeCategory, ShapeName, ShapeOccurrence, alternate_suffix,
    generate_candidates,
};

use crate::descriptor::TemplateDescriptor;
use crate::registry::TemplateRegistry;

/// Outcome of resolving a shape occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Resolution {
    Template(TemplateDescriptor),
    /// No template anywhere in the shape's alternate group. The shape may
    /// still render through a shape method.
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Template(_))
    }

    pub fn template(&self) -> Option<&TemplateDescriptor> {
        match self {
            Resolution::Template(template) => Some(template),
            Resolution::NotFound => None,
        }
    }

    pub fn into_template(self) -> Option<TemplateDescriptor> {
        match self {
            Resolution::Template(template) => Some(template),
            Resolution::NotFound => None,
        }
    }
}

/// One candidate examined while tracing a resolution
#[derive(Debug, Clone, Serialize)]
pub struct TraceStep {
    pub candidate: Candidate,
    /// Templates registered under the candidate, highest provenance first
    pub templates: Vec<TemplateDescriptor>,
}

/// Full account of how a shape occurrence resolves
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionTrace {
    pub shape_type: ShapeName,
    pub registry_version: u64,
    pub steps: Vec<TraceStep>,
    pub selected: Option<TemplateDescriptor>,
    pub wrapper_candidates: Vec<ShapeName>,
    pub wrappers: Vec<TemplateDescriptor>,
}

/// Resolves occurrences against one registry snapshot
///
/// Holds no state of its own; every call is a pure function of the
/// occurrence and the borrowed registry.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a TemplateRegistry,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a TemplateRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a TemplateRegistry {
        self.registry
    }

    /// Select the template for an occurrence
    pub fn resolve(&self, occurrence: &ShapeOccurrence) -> Resolution {
        let candidates = generate_candidates(occurrence);
        let tried = candidates.len();

        for (index, candidate) in candidates.into_iter().enumerate() {
            if let Some(template) = self.registry.best(&candidate.name) {
                tracing::debug!(
                    shape_type = %occurrence.shape_type(),
                    candidate = %candidate.name,
                    source = %template.source,
                    tried = index + 1,
                    "resolved shape template"
                );
                return Resolution::Template(template.clone());
            }
        }

        tracing::debug!(
            shape_type = %occurrence.shape_type(),
            tried,
            "no template in alternate group"
        );
        Resolution::NotFound
    }

    /// Wrapper names tried by convention, in order
    ///
    /// `Selected_Wrapper` (when the selected name is an alternate), then
    /// `Base__[ContextValue]_Wrapper` for the content type and zone name in
    /// the order the category's alternate table ranks them, then
    /// `Base_Wrapper`.
    pub fn wrapper_candidates(
        &self,
        occurrence: &ShapeOccurrence,
        selected: &ShapeName,
    ) -> Vec<ShapeName> {
        let marker = self.registry.naming().wrapper_marker.as_str();
        let base = occurrence.shape_type();
        let mut names = Vec::new();

        let display_base = occurrence.display_qualified_type();
        let selected_in_group = selected.is_alternate_of(base.as_str())
            || display_base
                .as_ref()
                .is_some_and(|qualified| selected.is_alternate_of(qualified.as_str()));
        if selected != base && selected_in_group {
            names.push(selected.qualified(marker));
        }

        for attribute in wrapper_attributes(ShapeCategory::of(base.as_str())) {
            if let Some(value) = occurrence.attribute(attribute).and_then(alternate_suffix) {
                names.push(base.alternate(&value).qualified(marker));
            }
        }

        names.push(base.qualified(marker));

        let mut unique = Vec::with_capacity(names.len());
        for name in names {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        unique
    }

    /// Wrappers to apply around the shape's output, outermost first
    ///
    /// An explicit wrapper override on the occurrence is used alone and does
    /// not chain with convention. An empty sequence means no wrapper.
    pub fn resolve_wrappers(
        &self,
        occurrence: &ShapeOccurrence,
        selected: &ShapeName,
    ) -> Vec<TemplateDescriptor> {
        if let Some(wrapper) = occurrence.wrapper() {
            return match self.registry.best(wrapper) {
                Some(template) => vec![template.clone()],
                None => {
                    tracing::warn!(
                        shape_type = %occurrence.shape_type(),
                        wrapper = %wrapper,
                        "explicit wrapper override names no registered template"
                    );
                    Vec::new()
                }
            };
        }

        self.wrapper_candidates(occurrence, selected)
            .iter()
            .find_map(|name| self.registry.best(name))
            .map(|template| vec![template.clone()])
            .unwrap_or_default()
    }

    /// Examine every candidate and wrapper, for debugging
    pub fn trace(&self, occurrence: &ShapeOccurrence) -> ResolutionTrace {
        let steps: Vec<TraceStep> = generate_candidates(occurrence)
            .into_iter()
            .map(|candidate| TraceStep {
                templates: self.registry.lookup(&candidate.name).to_vec(),
                candidate,
            })
            .collect();

        let selected = steps
            .iter()
            .find_map(|step| step.templates.first().cloned());
        let selected_name = selected
            .as_ref()
            .map(|template| template.shape_name.clone())
            .unwrap_or_else(|| occurrence.shape_type().clone());

        let wrapper_candidates = match occurrence.wrapper() {
            Some(wrapper) => vec![wrapper.clone()],
            None => self.wrapper_candidates(occurrence, &selected_name),
        };

        ResolutionTrace {
            shape_type: occurrence.shape_type().clone(),
            registry_version: self.registry.version(),
            steps,
            wrappers: self.resolve_wrappers(occurrence, &selected_name),
            selected,
            wrapper_candidates,
        }
    }
}

const WRAPPER_ATTRIBUTES: [ContextAttribute; 2] =
    [ContextAttribute::ContentType, ContextAttribute::ZoneName];

/// Context attributes usable in wrapper names, most specific first
///
/// Follows the single-attribute plain forms of the category's table; an
/// attribute the table does not rank comes after the ones it does.
fn wrapper_attributes(category: Option<ShapeCategory>) -> Vec<ContextAttribute> {
    let mut order: Vec<ContextAttribute> = category
        .map(|category| category.rules())
        .unwrap_or_default()
        .iter()
        .filter(|rule| !rule.display_type)
        .filter_map(|rule| match rule.attributes {
            [attribute] if WRAPPER_ATTRIBUTES.contains(attribute) => Some(*attribute),
            _ => None,
        })
        .collect();
    for attribute in WRAPPER_ATTRIBUTES {
        if !order.contains(&attribute) {
            order.push(attribute);
        }
    }
    order
}

//! Alternate name generation
//!
//! Every shape category has a fixed table of documented alternate forms.
//! Generation walks the table for the occurrence's category, keeps the forms
//! whose attributes are all present, and orders them from the most to the
//! least specific. Forms with equal specificity keep their table order.
//!
//! | Category | Forms (table order) |
//! |---|---|
//! | Content | `Content_[DisplayType]__[Id]`, `Content_[DisplayType]__[ContentType]`, `Content__[Id]`, `Content__[ContentType]`, `Content_[DisplayType]` |
//! | ContentEdit | `Content_Edit__[Id]`, `Content_Edit__[ContentType]` |
//! | Part | `Parts_X_[DisplayType]__[ContentType]`, `Parts_X__[Id]`, `Parts_X__[ContentType]`, `Parts_X_[DisplayType]` |
//! | Field | `Fields_X__[ContentType]__[PartName]__[FieldName]`, `Fields_X__[ContentType]__[FieldName]`, `Fields_X__[ContentType]__[PartName]`, `Fields_X__[PartName]__[FieldName]`, `Fields_X__[FieldName]`, `Fields_X__[PartName]` |
//! | Menu | `Menu__[MenuName]__[ContentType]`, `Menu__[MenuName]`, `Menu__[ContentType]` |
//! | Widget | `Widget__[ContentType]`, `Widget__[ZoneName]` |
//! | Zone | `Zone__[ZoneName]` |
//! | Resource | `Style__[FileName]` |

use std::collections::HashSet;

use serde::Serialize;

use crate::name::{ShapeName, alternate_suffix};
use crate::shape::{ContextAttribute, ShapeOccurrence};

/// Families of shapes sharing one alternate table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ShapeCategory {
    Content,
    ContentEdit,
    Part,
    Field,
    Menu,
    Widget,
    Zone,
    Resource,
}

impl ShapeCategory {
    /// Category of a base shape name, if any table applies to it
    pub fn of(shape_type: &str) -> Option<Self> {
        let lower = shape_type.to_ascii_lowercase();
        match lower.as_str() {
            "content" => Some(ShapeCategory::Content),
            "content_edit" => Some(ShapeCategory::ContentEdit),
            "menu" | "menuitem" | "menuitemlink" => Some(ShapeCategory::Menu),
            "widget" => Some(ShapeCategory::Widget),
            "zone" => Some(ShapeCategory::Zone),
            "style" | "script" | "resource" => Some(ShapeCategory::Resource),
            _ if lower.starts_with("parts_") => Some(ShapeCategory::Part),
            _ if lower.starts_with("fields_") => Some(ShapeCategory::Field),
            _ => None,
        }
    }

    /// The documented alternate forms, in declared precedence order
    pub fn rules(&self) -> &'static [AlternateRule] {
        use ContextAttribute::*;

        const CONTENT: &[AlternateRule] = &[
            AlternateRule::display(&[Id]),
            AlternateRule::display(&[ContentType]),
            AlternateRule::plain(&[Id]),
            AlternateRule::plain(&[ContentType]),
            AlternateRule::display(&[]),
        ];
        const CONTENT_EDIT: &[AlternateRule] = &[
            AlternateRule::plain(&[Id]),
            AlternateRule::plain(&[ContentType]),
        ];
        const PART: &[AlternateRule] = &[
            AlternateRule::display(&[ContentType]),
            AlternateRule::plain(&[Id]),
            AlternateRule::plain(&[ContentType]),
            AlternateRule::display(&[]),
        ];
        const FIELD: &[AlternateRule] = &[
            AlternateRule::plain(&[ContentType, PartName, FieldName]),
            AlternateRule::plain(&[ContentType, FieldName]),
            AlternateRule::plain(&[ContentType, PartName]),
            AlternateRule::plain(&[PartName, FieldName]),
            AlternateRule::plain(&[FieldName]),
            AlternateRule::plain(&[PartName]),
        ];
        const MENU: &[AlternateRule] = &[
            AlternateRule::plain(&[MenuName, ContentType]),
            AlternateRule::plain(&[MenuName]),
            AlternateRule::plain(&[ContentType]),
        ];
        const WIDGET: &[AlternateRule] = &[
            AlternateRule::plain(&[ContentType]),
            AlternateRule::plain(&[ZoneName]),
        ];
        const ZONE: &[AlternateRule] = &[AlternateRule::plain(&[ZoneName])];
        const RESOURCE: &[AlternateRule] = &[AlternateRule::plain(&[FileName])];

        match self {
            ShapeCategory::Content => CONTENT,
            ShapeCategory::ContentEdit => CONTENT_EDIT,
            ShapeCategory::Part => PART,
            ShapeCategory::Field => FIELD,
            ShapeCategory::Menu => MENU,
            ShapeCategory::Widget => WIDGET,
            ShapeCategory::Zone => ZONE,
            ShapeCategory::Resource => RESOURCE,
        }
    }
}

/// One documented alternate form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlternateRule {
    /// Whether the display type qualifies the base (`Base_[DisplayType]`)
    pub display_type: bool,
    /// Attributes appended as `__value` suffixes, in suffix order
    pub attributes: &'static [ContextAttribute],
}

impl AlternateRule {
    const fn plain(attributes: &'static [ContextAttribute]) -> Self {
        AlternateRule {
            display_type: false,
            attributes,
        }
    }

    const fn display(attributes: &'static [ContextAttribute]) -> Self {
        AlternateRule {
            display_type: true,
            attributes,
        }
    }

    /// Number of contextual values folded into the name
    pub fn specificity(&self) -> usize {
        self.attributes.len() + usize::from(self.display_type)
    }

    /// Build the alternate name, or `None` when a required value is missing
    /// or encodes to nothing
    pub fn apply(&self, occurrence: &ShapeOccurrence) -> Option<ShapeName> {
        let mut name = occurrence.shape_type().clone();
        if self.display_type {
            name = name.qualified(&alternate_suffix(occurrence.display_type()?)?);
        }
        for attribute in self.attributes {
            name = name.alternate(&alternate_suffix(occurrence.attribute(*attribute)?)?);
        }
        Some(name)
    }
}

/// Where a candidate name came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CandidateOrigin {
    /// Declared explicitly on the shape metadata
    Declared,
    /// Produced by a rule of the category table
    Rule,
    /// The bare base name
    Base,
}

/// A candidate name together with how specific it is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub name: ShapeName,
    pub specificity: usize,
    pub origin: CandidateOrigin,
}

/// Ordered candidates for an occurrence, most specific first
///
/// Declared alternates come first, the last declared leading. Rule-derived
/// alternates follow by descending specificity and the base name is always
/// last. Candidates outside the base's alternate group, or the group of the
/// display-qualified base, are dropped; duplicates keep their first position.
pub fn generate_candidates(occurrence: &ShapeOccurrence) -> Vec<Candidate> {
    let base = occurrence.shape_type();
    let display_base = occurrence.display_qualified_type();
    let in_group = |name: &ShapeName| {
        name.is_alternate_of(base.as_str())
            || display_base
                .as_ref()
                .is_some_and(|qualified| name.is_alternate_of(qualified.as_str()))
    };

    let mut candidates = Vec::new();

    for declared in occurrence.declared_alternates().iter().rev() {
        if in_group(declared) {
            candidates.push(Candidate {
                name: declared.clone(),
                specificity: usize::MAX,
                origin: CandidateOrigin::Declared,
            });
        } else {
            tracing::debug!(
                shape_type = %base,
                alternate = %declared,
                "declared alternate is outside the shape's alternate group"
            );
        }
    }

    if let Some(category) = ShapeCategory::of(base.as_str()) {
        let mut derived: Vec<Candidate> = category
            .rules()
            .iter()
            .filter_map(|rule| {
                rule.apply(occurrence).map(|name| Candidate {
                    name,
                    specificity: rule.specificity(),
                    origin: CandidateOrigin::Rule,
                })
            })
            .filter(|candidate| in_group(&candidate.name))
            .collect();
        // stable: equal specificity keeps table order
        derived.sort_by(|a, b| b.specificity.cmp(&a.specificity));
        candidates.extend(derived);
    }

    candidates.push(Candidate {
        name: base.clone(),
        specificity: 0,
        origin: CandidateOrigin::Base,
    });

    let mut seen = HashSet::new();
    candidates.retain(|candidate| seen.insert(candidate.name.clone()));
    candidates
}

/// Ordered alternate names for an occurrence, most specific first, with the
/// base name last
pub fn generate_alternates(occurrence: &ShapeOccurrence) -> Vec<ShapeName> {
    generate_candidates(occurrence)
        .into_iter()
        .map(|candidate| candidate.name)
        .collect()
}

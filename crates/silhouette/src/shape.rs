//! Shapes, their metadata and the factory that creates them
//!
//! A shape is always created under its base type name. Everything that
//! influences template selection lives on the [`ShapeOccurrence`]: display
//! type, contextual attributes, declared alternates and an explicit wrapper
//! override. Two occurrences with equal metadata resolve identically.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShapeError};
use crate::name::{ShapeName, alternate_suffix, canonicalize};

/// Contextual attributes that alternate rules fold into shape names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContextAttribute {
    ContentType,
    Id,
    ZoneName,
    FieldName,
    PartName,
    MenuName,
    FileName,
}

impl ContextAttribute {
    pub const ALL: [ContextAttribute; 7] = [
        ContextAttribute::ContentType,
        ContextAttribute::Id,
        ContextAttribute::ZoneName,
        ContextAttribute::FieldName,
        ContextAttribute::PartName,
        ContextAttribute::MenuName,
        ContextAttribute::FileName,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContextAttribute::ContentType => "ContentType",
            ContextAttribute::Id => "Id",
            ContextAttribute::ZoneName => "ZoneName",
            ContextAttribute::FieldName => "FieldName",
            ContextAttribute::PartName => "PartName",
            ContextAttribute::MenuName => "MenuName",
            ContextAttribute::FileName => "FileName",
        }
    }
}

impl fmt::Display for ContextAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContextAttribute {
    type Err = ShapeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ContextAttribute::ALL
            .into_iter()
            .find(|attribute| attribute.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ShapeError::UnknownAttribute {
                name: s.to_string(),
            })
    }
}

/// Resolution metadata of one shape occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeOccurrence {
    shape_type: ShapeName,
    display_type: Option<String>,
    attributes: BTreeMap<ContextAttribute, String>,
    alternates: Vec<ShapeName>,
    wrapper: Option<ShapeName>,
}

impl ShapeOccurrence {
    /// Create an occurrence with no metadata besides its base name
    pub fn new(shape_type: impl Into<String>) -> Result<Self> {
        Self::builder(shape_type).build()
    }

    /// Create a new occurrence builder
    pub fn builder(shape_type: impl Into<String>) -> ShapeOccurrenceBuilder {
        ShapeOccurrenceBuilder::new(shape_type)
    }

    pub fn shape_type(&self) -> &ShapeName {
        &self.shape_type
    }

    /// Display type, never empty when present
    pub fn display_type(&self) -> Option<&str> {
        self.display_type.as_deref()
    }

    /// Value of a contextual attribute, never empty when present
    pub fn attribute(&self, attribute: ContextAttribute) -> Option<&str> {
        self.attributes.get(&attribute).map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (ContextAttribute, &str)> {
        self.attributes.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Alternates declared by placement or drivers, in declaration order
    pub fn declared_alternates(&self) -> &[ShapeName] {
        &self.alternates
    }

    /// Explicit wrapper override
    pub fn wrapper(&self) -> Option<&ShapeName> {
        self.wrapper.as_ref()
    }

    /// The base name qualified with the display type (`Content_Summary`)
    ///
    /// `None` when there is no display type or it encodes to nothing.
    pub fn display_qualified_type(&self) -> Option<ShapeName> {
        let display_type = alternate_suffix(self.display_type.as_deref()?)?;
        Some(self.shape_type.qualified(&display_type))
    }
}

/// Builder for shape occurrences with a fluent API
#[derive(Debug, Clone)]
pub struct ShapeOccurrenceBuilder {
    shape_type: String,
    display_type: Option<String>,
    attributes: BTreeMap<ContextAttribute, String>,
    alternates: Vec<ShapeName>,
    wrapper: Option<ShapeName>,
}

impl ShapeOccurrenceBuilder {
    pub fn new(shape_type: impl Into<String>) -> Self {
        ShapeOccurrenceBuilder {
            shape_type: shape_type.into(),
            display_type: None,
            attributes: BTreeMap::new(),
            alternates: Vec::new(),
            wrapper: None,
        }
    }

    /// Set the display type; blank values are ignored
    pub fn display_type(mut self, display_type: impl Into<String>) -> Self {
        let display_type = display_type.into();
        self.display_type = (!display_type.trim().is_empty()).then_some(display_type);
        self
    }

    /// Set a contextual attribute; blank values remove it
    pub fn attribute(mut self, attribute: ContextAttribute, value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            self.attributes.remove(&attribute);
        } else {
            self.attributes.insert(attribute, value);
        }
        self
    }

    /// Set a contextual attribute by its name
    pub fn attribute_named(self, attribute: &str, value: impl Into<String>) -> Result<Self> {
        let attribute = attribute.parse::<ContextAttribute>()?;
        Ok(self.attribute(attribute, value))
    }

    /// Declare an additional alternate
    pub fn alternate(mut self, alternate: impl AsRef<str>) -> Self {
        let alternate = canonicalize(alternate.as_ref().trim());
        if !alternate.is_empty() {
            self.alternates.push(alternate);
        }
        self
    }

    /// Set the explicit wrapper override
    pub fn wrapper(mut self, wrapper: impl AsRef<str>) -> Self {
        let wrapper = canonicalize(wrapper.as_ref().trim());
        self.wrapper = (!wrapper.is_empty()).then_some(wrapper);
        self
    }

    /// Build the occurrence
    ///
    /// Fails on a missing base name or one outside `[A-Za-z0-9_]`.
    pub fn build(self) -> Result<ShapeOccurrence> {
        let shape_type = validate_shape_type(&self.shape_type)?;
        Ok(ShapeOccurrence {
            shape_type,
            display_type: self.display_type,
            attributes: self.attributes,
            alternates: self.alternates,
            wrapper: self.wrapper,
        })
    }
}

fn validate_shape_type(shape_type: &str) -> std::result::Result<ShapeName, ShapeError> {
    if shape_type.is_empty() {
        return Err(ShapeError::MissingBaseName);
    }
    if let Some(character) = shape_type
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        return Err(ShapeError::InvalidBaseName {
            name: shape_type.to_string(),
            character,
        });
    }
    Ok(ShapeName::new(shape_type))
}

/// Ordered key/value properties attached to a shape at creation time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag {
    entries: IndexMap<String, serde_json::Value>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a property, keeping its original position on replace
    pub fn insert(&mut self, key: impl Into<String>, value: impl Serialize) -> Result<&mut Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(ShapeError::EmptyPropertyKey.into());
        }
        self.entries.insert(key, serde_json::to_value(value)?);
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.entries.get(key)
    }

    /// Deserialize a property into a concrete type
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.entries.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.entries.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

type MethodFn = dyn Fn(&Shape) -> Result<String> + Send + Sync;

/// Code-level render capability that bypasses templates
#[derive(Clone)]
pub struct ShapeMethod(Arc<MethodFn>);

impl ShapeMethod {
    pub fn new(method: impl Fn(&Shape) -> Result<String> + Send + Sync + 'static) -> Self {
        ShapeMethod(Arc::new(method))
    }

    pub fn invoke(&self, shape: &Shape) -> Result<String> {
        (self.0)(shape)
    }
}

impl fmt::Debug for ShapeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ShapeMethod(..)")
    }
}

/// A shape instance handed to the display pipeline
#[derive(Debug, Clone)]
pub struct Shape {
    occurrence: ShapeOccurrence,
    properties: PropertyBag,
    method: Option<ShapeMethod>,
}

impl Shape {
    pub fn occurrence(&self) -> &ShapeOccurrence {
        &self.occurrence
    }

    pub fn shape_type(&self) -> &ShapeName {
        self.occurrence.shape_type()
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }

    /// Direct render capability, when the shape type was bound to one
    pub fn method(&self) -> Option<&ShapeMethod> {
        self.method.as_ref()
    }
}

/// Creates shapes and attaches shape method bindings
///
/// Method bindings are declared once per shape type; every shape created for
/// that type afterwards carries the binding.
#[derive(Debug, Clone, Default)]
pub struct ShapeFactory {
    methods: HashMap<ShapeName, ShapeMethod>,
}

impl ShapeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a shape type to a direct render capability
    pub fn bind_method(&mut self, shape_type: &str, method: ShapeMethod) -> Result<()> {
        let shape_type = validate_shape_type(shape_type)?;
        tracing::debug!(shape_type = %shape_type, "bound shape method");
        self.methods.insert(shape_type, method);
        Ok(())
    }

    pub fn has_method(&self, shape_type: &str) -> bool {
        self.methods.contains_key(&ShapeName::new(shape_type))
    }

    /// Create a shape with no metadata or properties
    pub fn create(&self, shape_type: &str) -> Result<Shape> {
        Ok(self.create_with(ShapeOccurrence::new(shape_type)?, PropertyBag::new()))
    }

    /// Create a shape from prepared metadata and properties
    pub fn create_with(&self, occurrence: ShapeOccurrence, properties: PropertyBag) -> Shape {
        let method = self.methods.get(occurrence.shape_type()).cloned();
        Shape {
            occurrence,
            properties,
            method,
        }
    }
}

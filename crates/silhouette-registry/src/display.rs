//! Display pipeline: bind a shape, render it, then apply its wrappers
//!
//! Wrappers come from the resolver outermost first. They are executed from
//! the innermost outwards, each receiving the markup produced so far as its
//! child content.

use std::sync::Arc;

use silhouette::{Shape, ShapeMethod};

use crate::descriptor::TemplateDescriptor;
use crate::error::{RegistryError, Result};
use crate::resolver::Resolver;
use crate::table::ShapeTable;

/// How a shape renders its own output
#[derive(Debug, Clone)]
pub enum Binding {
    Template(TemplateDescriptor),
    /// Code-level render capability declared for the shape type
    Method(ShapeMethod),
}

/// The view engine executing templates
pub trait TemplateExecutor: Send + Sync {
    /// Render `descriptor` for `shape`; wrappers receive the wrapped markup
    /// as `child`
    fn execute(
        &self,
        descriptor: &TemplateDescriptor,
        shape: &Shape,
        child: Option<&str>,
    ) -> Result<String>;
}

/// Renders shapes against the published shape table
#[derive(Debug, Clone)]
pub struct DisplayManager {
    table: Arc<ShapeTable>,
}

impl DisplayManager {
    pub fn new(table: Arc<ShapeTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &Arc<ShapeTable> {
        &self.table
    }

    /// Decide how a shape renders; a method binding takes precedence
    pub fn bind(&self, shape: &Shape) -> Option<Binding> {
        if let Some(method) = shape.method() {
            return Some(Binding::Method(method.clone()));
        }
        self.table
            .resolve(shape.occurrence())
            .into_template()
            .map(Binding::Template)
    }

    /// Render a shape with its wrappers
    ///
    /// Returns `Ok(None)` when the shape has neither a template nor a method
    /// binding.
    #[tracing::instrument(skip_all, fields(shape_type = %shape.shape_type()))]
    pub fn display(&self, shape: &Shape, executor: &dyn TemplateExecutor) -> Result<Option<String>> {
        let registry = self.table.snapshot();
        let resolver = Resolver::new(&registry);
        let occurrence = shape.occurrence();

        let (mut markup, selected) = match shape.method() {
            Some(method) => {
                let markup = method
                    .invoke(shape)
                    .map_err(|e| RegistryError::render(shape.shape_type().as_str(), e))?;
                (markup, shape.shape_type().clone())
            }
            None => match resolver.resolve(occurrence).into_template() {
                Some(template) => {
                    let markup = executor.execute(&template, shape, None)?;
                    (markup, template.shape_name)
                }
                None => {
                    tracing::debug!("shape has no template and no method binding");
                    return Ok(None);
                }
            },
        };

        for wrapper in resolver.resolve_wrappers(occurrence, &selected).iter().rev() {
            markup = executor.execute(wrapper, shape, Some(&markup))?;
        }

        Ok(Some(markup))
    }
}

//! Template descriptors and provenance

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use silhouette::{ConfigError, ShapeName};

/// Precedence tier of the module or theme that provides a template
///
/// Higher tiers win among templates registered under the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    Module,
    BaseTheme,
    ActiveTheme,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Module => "module",
            Provenance::BaseTheme => "base-theme",
            Provenance::ActiveTheme => "theme",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provenance {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "module" => Ok(Provenance::Module),
            "base-theme" | "base_theme" | "basetheme" => Ok(Provenance::BaseTheme),
            "theme" | "active-theme" | "active_theme" => Ok(Provenance::ActiveTheme),
            other => Err(ConfigError::InvalidConfig {
                setting: "provenance".to_string(),
                reason: format!("unknown provenance '{}'", other),
            }),
        }
    }
}

/// Human-readable origin of a template, `<feature>:<relative path>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceLocation(String);

impl SourceLocation {
    pub fn new(feature: &str, path: &str) -> Self {
        SourceLocation(format!("{}:{}", feature, path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceLocation {
    fn from(s: &str) -> Self {
        SourceLocation(s.to_string())
    }
}

/// Opaque locator handed to the template executor
///
/// The registry never interprets it; for file system sources it is the
/// absolute path of the template file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateHandle(Arc<str>);

impl TemplateHandle {
    pub fn new(handle: impl AsRef<str>) -> Self {
        TemplateHandle(Arc::from(handle.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateDescriptor {
    /// Canonical name of the shape the template renders
    pub shape_name: ShapeName,
    /// Where the template came from, for humans
    pub source: SourceLocation,
    /// Precedence tier of the providing feature
    pub provenance: Provenance,
    /// Render capability understood by the template executor
    pub handle: TemplateHandle,
}

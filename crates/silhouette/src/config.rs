//! Naming configuration

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Conventions shared by the transliterator and the wrapper lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Directory prefixes stripped from template paths before transliteration
    pub view_roots: Vec<String>,

    /// File extensions recognised as templates
    pub extensions: Vec<String>,

    /// Marker appended to a shape name to look up its wrapper
    pub wrapper_marker: String,

    /// Extension used when generating candidate paths for a shape name
    pub default_extension: String,
}

impl NamingConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            view_roots: lookup("SILHOUETTE_VIEW_ROOTS")
                .map(|s| split_list(&s))
                .unwrap_or(defaults.view_roots),
            extensions: lookup("SILHOUETTE_EXTENSIONS")
                .map(|s| split_list(&s))
                .unwrap_or(defaults.extensions),
            wrapper_marker: lookup("SILHOUETTE_WRAPPER_MARKER")
                .map(|s| s.trim().to_string())
                .unwrap_or(defaults.wrapper_marker),
            default_extension: lookup("SILHOUETTE_DEFAULT_EXTENSION")
                .map(|s| s.trim().trim_start_matches('.').to_string())
                .unwrap_or(defaults.default_extension),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the transliterator relies on
    pub fn validate(&self) -> Result<()> {
        if self.wrapper_marker.is_empty() {
            return Err(ConfigError::InvalidConfig {
                setting: "wrapper_marker".to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        if let Some(bad) = self
            .wrapper_marker
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(ConfigError::InvalidConfig {
                setting: "wrapper_marker".to_string(),
                reason: format!("character '{}' is outside [A-Za-z0-9_]", bad),
            }
            .into());
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::Environment {
                var: "SILHOUETTE_EXTENSIONS".to_string(),
                reason: "at least one template extension is required".to_string(),
            }
            .into());
        }
        if let Some(bad) = self
            .extensions
            .iter()
            .find(|extension| !is_plain_extension(extension))
        {
            return Err(ConfigError::InvalidConfig {
                setting: "extensions".to_string(),
                reason: format!("'{}' must be a single extension without separators", bad),
            }
            .into());
        }
        if self.default_extension.is_empty() {
            return Err(ConfigError::InvalidConfig {
                setting: "default_extension".to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        // generated candidate paths must map back through strip_extension
        let default_extension = self.default_extension.trim_start_matches('.');
        if !self
            .extensions
            .iter()
            .any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(default_extension))
        {
            return Err(ConfigError::InvalidConfig {
                setting: "default_extension".to_string(),
                reason: format!(
                    "'{}' is not one of the template extensions",
                    self.default_extension
                ),
            }
            .into());
        }
        // only the first path segment is ever stripped as a view root
        if let Some(bad) = self
            .view_roots
            .iter()
            .find(|root| matches!(root.as_str(), "" | "." | "..") || root.contains(['/', '\\']))
        {
            return Err(ConfigError::InvalidConfig {
                setting: "view_roots".to_string(),
                reason: format!("'{}' must be a single directory name", bad),
            }
            .into());
        }
        Ok(())
    }

    /// Returns the file name without its extension when the extension is a
    /// recognised template extension
    pub fn strip_extension<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        let (stem, extension) = file_name.rsplit_once('.')?;
        self.extensions
            .iter()
            .any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(extension))
            .then_some(stem)
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            view_roots: vec!["Views".to_string()],
            extensions: vec![
                "cshtml".to_string(),
                "liquid".to_string(),
                "html".to_string(),
            ],
            wrapper_marker: "Wrapper".to_string(),
            default_extension: "cshtml".to_string(),
        }
    }
}

fn is_plain_extension(extension: &str) -> bool {
    let extension = extension.trim_start_matches('.');
    !extension.is_empty() && !extension.contains(['.', '/', '\\'])
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().trim_start_matches('.').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SilhouetteError;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = NamingConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, NamingConfig::default());
    }

    #[test]
    fn test_overrides_from_lookup() {
        let config = NamingConfig::from_lookup(lookup_from(&[
            ("SILHOUETTE_VIEW_ROOTS", "Views, Templates"),
            ("SILHOUETTE_EXTENSIONS", ".liquid,hbs"),
            ("SILHOUETTE_WRAPPER_MARKER", "Frame"),
            ("SILHOUETTE_DEFAULT_EXTENSION", ".HBS"),
        ]))
        .unwrap();

        assert_eq!(config.view_roots, vec!["Views", "Templates"]);
        assert_eq!(config.extensions, vec!["liquid", "hbs"]);
        assert_eq!(config.wrapper_marker, "Frame");
        assert_eq!(config.default_extension, "HBS");
    }

    #[test]
    fn test_default_extension_must_be_recognised() {
        let result = NamingConfig::from_lookup(lookup_from(&[
            ("SILHOUETTE_EXTENSIONS", "liquid,hbs"),
        ]));
        assert!(matches!(
            result,
            Err(SilhouetteError::Config(ConfigError::InvalidConfig { ref setting, .. }))
                if setting == "default_extension"
        ));

        let config = NamingConfig {
            default_extension: "txt".to_string(),
            ..NamingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_view_roots_must_be_single_segments() {
        for root in ["Themes/Views", "Themes\\Views", "..", "."] {
            let config = NamingConfig {
                view_roots: vec!["Views".to_string(), root.to_string()],
                ..NamingConfig::default()
            };
            assert!(
                matches!(
                    config.validate(),
                    Err(SilhouetteError::Config(ConfigError::InvalidConfig { ref setting, .. }))
                        if setting == "view_roots"
                ),
                "{} should be rejected",
                root
            );
        }

        let config = NamingConfig {
            view_roots: Vec::new(),
            ..NamingConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_compound_extension_is_rejected() {
        let result = NamingConfig::from_lookup(lookup_from(&[
            ("SILHOUETTE_EXTENSIONS", "cshtml,tpl.html"),
        ]));
        assert!(matches!(
            result,
            Err(SilhouetteError::Config(ConfigError::InvalidConfig { ref setting, .. }))
                if setting == "extensions"
        ));
    }

    #[test]
    fn test_empty_extension_list_is_rejected() {
        let result = NamingConfig::from_lookup(lookup_from(&[("SILHOUETTE_EXTENSIONS", " , ")]));
        assert!(matches!(
            result,
            Err(SilhouetteError::Config(ConfigError::Environment { .. }))
        ));
    }

    #[test]
    fn test_marker_with_separator_is_rejected() {
        let result =
            NamingConfig::from_lookup(lookup_from(&[("SILHOUETTE_WRAPPER_MARKER", "My-Wrapper")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_strip_extension() {
        let config = NamingConfig::default();
        assert_eq!(config.strip_extension("Hello.World-85.cshtml"), Some("Hello.World-85"));
        assert_eq!(config.strip_extension("Content.LIQUID"), Some("Content"));
        assert_eq!(config.strip_extension("readme.txt"), None);
        assert_eq!(config.strip_extension("Content"), None);
    }
}

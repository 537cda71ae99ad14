//! Canonical shape names and the transliteration to and from template paths
//!
//! A canonical name is made of segments joined by `_`; a double underscore
//! `__` marks an alternate boundary. Template files map onto canonical names
//! by replacing every `.` and path separator with `_` and every `-` with `__`,
//! so `Views/Hello.World-85.cshtml` renders the shape `Hello_World__85`.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::config::NamingConfig;

/// Separator between a base name and an alternate suffix
pub const ALTERNATE_SEPARATOR: &str = "__";

/// A canonical shape name
///
/// Equality, hashing and ordering ignore ASCII case; the original spelling is
/// kept for display and error messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeName(String);

impl ShapeName {
    pub fn new(name: impl Into<String>) -> Self {
        ShapeName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercased form used as a registry key
    pub fn key(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    /// The name with every trailing `__segment` group removed
    pub fn base(&self) -> &str {
        let mut current = self.0.as_str();
        while let Some(parent) = strip_alternate(current) {
            current = parent;
        }
        current
    }

    /// The name with its last `__segment` group removed, if it has one
    pub fn parent(&self) -> Option<ShapeName> {
        strip_alternate(&self.0).map(ShapeName::new)
    }

    /// Whether this name belongs to the alternate group of `base`
    ///
    /// True when stripping trailing `__segment` groups from this name
    /// eventually yields exactly `base`.
    pub fn is_alternate_of(&self, base: &str) -> bool {
        let mut current = self.0.as_str();
        loop {
            if current.eq_ignore_ascii_case(base) {
                return true;
            }
            match strip_alternate(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Appends an alternate suffix: `Base` + `__` + `suffix`
    pub fn alternate(&self, suffix: &str) -> ShapeName {
        ShapeName(format!("{}{}{}", self.0, ALTERNATE_SEPARATOR, suffix))
    }

    /// Appends a plain segment: `Base` + `_` + `segment`
    pub fn qualified(&self, segment: &str) -> ShapeName {
        ShapeName(format!("{}_{}", self.0, segment))
    }
}

fn strip_alternate(name: &str) -> Option<&str> {
    let index = name.rfind(ALTERNATE_SEPARATOR)?;
    // "A___B" must strip to "A", not "A_"
    let mut cut = index;
    while cut > 0 && name.as_bytes()[cut - 1] == b'_' {
        cut -= 1;
    }
    if cut == 0 { None } else { Some(&name[..cut]) }
}

impl PartialEq for ShapeName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for ShapeName {}

impl PartialEq<str> for ShapeName {
    fn eq(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for ShapeName {
    fn eq(&self, other: &&str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl Hash for ShapeName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl PartialOrd for ShapeName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ShapeName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .bytes()
            .map(|b| b.to_ascii_lowercase())
            .cmp(other.0.bytes().map(|b| b.to_ascii_lowercase()))
    }
}

impl fmt::Display for ShapeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeName {
    fn from(s: &str) -> Self {
        ShapeName(s.to_string())
    }
}

impl From<String> for ShapeName {
    fn from(s: String) -> Self {
        ShapeName(s)
    }
}

impl AsRef<str> for ShapeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Applies the replacement rules to a free-form name
///
/// `.`, `/` and `\` become `_`, `-` becomes `__`. Everything else, including
/// existing underscores, is kept verbatim.
pub fn canonicalize(name: &str) -> ShapeName {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '.' | '/' | '\\' => out.push('_'),
            '-' => out.push_str(ALTERNATE_SEPARATOR),
            other => out.push(other),
        }
    }
    ShapeName(out)
}

/// Maps a template path to the canonical shape name it renders
///
/// The first segment is dropped when it is one of the configured view roots
/// and a recognised template extension is removed from the file name. An
/// empty path yields an empty name.
pub fn path_to_shape_name(path: &str, config: &NamingConfig) -> ShapeName {
    let mut segments: Vec<&str> = path
        .split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    if segments.len() > 1
        && config
            .view_roots
            .iter()
            .any(|root| root.eq_ignore_ascii_case(segments[0]))
    {
        segments.remove(0);
    }

    if let Some(last) = segments.last_mut() {
        if let Some(stem) = config.strip_extension(last) {
            *last = stem;
        }
    }

    canonicalize(&segments.join("/"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Literal(char),
    Separator,
    Hyphen,
}

fn tokenize(name: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' {
            if chars.peek() == Some(&'_') {
                chars.next();
                tokens.push(Token::Hyphen);
            } else {
                tokens.push(Token::Separator);
            }
        } else {
            tokens.push(Token::Literal(c));
        }
    }
    tokens
}

/// Generates the relative template paths that would render `name`
///
/// The dotted form comes first (`Hello.World-85.cshtml`), followed by forms
/// where leading separators of the base become directories
/// (`Hello/World-85.cshtml`). Every candidate maps back to `name` through
/// [`path_to_shape_name`].
pub fn shape_name_to_candidate_paths(name: &str, config: &NamingConfig) -> Vec<String> {
    if name.is_empty() {
        return Vec::new();
    }

    let tokens = tokenize(name);
    let first_hyphen = tokens
        .iter()
        .position(|t| *t == Token::Hyphen)
        .unwrap_or(tokens.len());

    // Separators that can become directories without producing empty segments
    let splittable: Vec<usize> = (0..first_hyphen)
        .filter(|&i| {
            tokens[i] == Token::Separator
                && i > 0
                && i + 1 < tokens.len()
                && matches!(tokens[i - 1], Token::Literal(_))
                && matches!(tokens[i + 1], Token::Literal(_))
        })
        .collect();

    let prefix = config
        .view_roots
        .first()
        .map(|root| format!("{}/", root))
        .unwrap_or_default();

    (0..=splittable.len())
        .map(|depth| {
            let directories = &splittable[..depth];
            let mut path = prefix.clone();
            for (i, token) in tokens.iter().enumerate() {
                match token {
                    Token::Literal(c) => path.push(*c),
                    Token::Hyphen => path.push('-'),
                    Token::Separator if directories.contains(&i) => path.push('/'),
                    Token::Separator => path.push('.'),
                }
            }
            path.push('.');
            path.push_str(&config.default_extension);
            path
        })
        .collect()
}

/// Normalises a contextual attribute value for use as an alternate suffix
///
/// `-` becomes `__`; runs of spaces, dots, slashes and other punctuation
/// collapse to one `_`. Underscores already in the value pass through
/// verbatim, so a value containing `__` creates extra alternate boundaries.
/// Choosing values that avoid this is the caller's responsibility.
///
/// Only ASCII letters and digits survive: non-ASCII letters such as `Ü` are
/// folded into `_` like punctuation, matching the `[A-Za-z0-9_]` alphabet of
/// base names.
pub fn encode_alternate_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_run = false;
    for c in value.trim().chars() {
        if c == '-' {
            out.push_str(ALTERNATE_SEPARATOR);
            in_run = false;
        } else if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// Encodes a contextual value into the segment appended to a shape name
///
/// Leading and trailing underscores are dropped. A value with no letter or
/// digit left (`"!"`, `"-"`) yields `None` and must be treated as absent, so
/// no alternate ever ends in an empty segment.
pub fn alternate_suffix(value: &str) -> Option<String> {
    let encoded = encode_alternate_value(value);
    let trimmed = encoded.trim_matches('_');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config() -> NamingConfig {
        NamingConfig::default()
    }

    fn custom_config() -> NamingConfig {
        let config = NamingConfig {
            view_roots: vec!["Templates".to_string(), "Views".to_string()],
            extensions: vec!["hbs".to_string(), "liquid".to_string()],
            wrapper_marker: "Frame".to_string(),
            default_extension: "liquid".to_string(),
        };
        config.validate().unwrap();
        config
    }

    #[test]
    fn test_path_with_dots_and_hyphen() {
        let name = path_to_shape_name("Views/Hello.World-85.cshtml", &config());
        assert_eq!(name.as_str(), "Hello_World__85");
        assert!(name.is_alternate_of("Hello_World"));
        assert!(!name.is_alternate_of("Hello_World_Shape"));
        assert!(!name.is_alternate_of("Hello"));
    }

    #[test]
    fn test_path_with_directories() {
        assert_eq!(
            path_to_shape_name("Views/Parts/Common.Metadata-BlogPost.cshtml", &config()).as_str(),
            "Parts_Common_Metadata__BlogPost"
        );
        assert_eq!(
            path_to_shape_name("views\\Content.Summary.liquid", &config()).as_str(),
            "Content_Summary"
        );
    }

    #[test]
    fn test_unknown_extension_is_kept() {
        assert_eq!(
            path_to_shape_name("Views/notes.txt", &config()).as_str(),
            "notes_txt"
        );
    }

    #[test]
    fn test_empty_path_yields_empty_name() {
        assert!(path_to_shape_name("", &config()).is_empty());
        assert!(path_to_shape_name("/", &config()).is_empty());
    }

    #[test]
    fn test_view_root_only_stripped_as_leading_directory() {
        assert_eq!(path_to_shape_name("Views.cshtml", &config()).as_str(), "Views");
        assert_eq!(
            path_to_shape_name("Views/Views/Item.cshtml", &config()).as_str(),
            "Views_Item"
        );
    }

    #[test]
    fn test_names_compare_case_insensitively() {
        let a = ShapeName::new("Content_Summary__BlogPost");
        let b = ShapeName::new("content_summary__blogpost");
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
        assert_eq!(a.cmp(&b), Ordering::Equal);
        assert_eq!(a.to_string(), "Content_Summary__BlogPost");
    }

    #[test]
    fn test_base_and_parent() {
        let name = ShapeName::new("Hello_World__85__Orange");
        assert_eq!(name.base(), "Hello_World");
        assert_eq!(name.parent(), Some(ShapeName::new("Hello_World__85")));
        assert!(name.is_alternate_of("Hello_World__85"));
        assert!(name.is_alternate_of("Hello_World"));
        assert_eq!(ShapeName::new("Content").parent(), None);
    }

    #[test]
    fn test_single_underscore_never_ends_the_base() {
        let name = ShapeName::new("Hello_World_Shape");
        assert!(!name.is_alternate_of("Hello_World"));
        assert_eq!(name.base(), "Hello_World_Shape");
    }

    #[test]
    fn test_candidate_paths() {
        let paths = shape_name_to_candidate_paths("Hello_World__85", &config());
        assert_eq!(
            paths,
            vec!["Views/Hello.World-85.cshtml", "Views/Hello/World-85.cshtml"]
        );
        assert!(shape_name_to_candidate_paths("", &config()).is_empty());
    }

    #[test]
    fn test_candidate_paths_avoid_empty_segments() {
        let paths = shape_name_to_candidate_paths("_Private__X", &config());
        assert_eq!(paths, vec!["Views/.Private-X.cshtml"]);
    }

    #[test]
    fn test_encode_alternate_value() {
        assert_eq!(encode_alternate_value("BlogPost"), "BlogPost");
        assert_eq!(encode_alternate_value("Blog Post"), "Blog_Post");
        assert_eq!(encode_alternate_value("about-us"), "about__us");
        assert_eq!(encode_alternate_value("site.css"), "site_css");
        assert_eq!(encode_alternate_value("a , b"), "a_b");
        assert_eq!(encode_alternate_value("Already__Split"), "Already__Split");
        assert_eq!(encode_alternate_value("Über"), "_ber");
    }

    #[test]
    fn test_alternate_suffix_drops_empty_segments() {
        assert_eq!(alternate_suffix("BlogPost").as_deref(), Some("BlogPost"));
        assert_eq!(alternate_suffix(" blog post. ").as_deref(), Some("blog_post"));
        assert_eq!(alternate_suffix("-draft").as_deref(), Some("draft"));
        assert_eq!(alternate_suffix("!"), None);
        assert_eq!(alternate_suffix("-"), None);
        assert_eq!(alternate_suffix("__"), None);
        assert_eq!(alternate_suffix(""), None);
    }

    #[test]
    fn test_candidate_paths_follow_custom_config() {
        let config = custom_config();
        let paths = shape_name_to_candidate_paths("Content_Summary__BlogPost", &config);
        assert_eq!(
            paths,
            vec![
                "Templates/Content.Summary-BlogPost.liquid",
                "Templates/Content/Summary-BlogPost.liquid",
            ]
        );
        for path in &paths {
            assert_eq!(
                path_to_shape_name(path, &config).as_str(),
                "Content_Summary__BlogPost"
            );
        }
        assert_eq!(
            path_to_shape_name("Views/Content.hbs", &config).as_str(),
            "Content"
        );
    }

    proptest! {
        #[test]
        fn prop_candidate_paths_round_trip(
            name in "[A-Za-z0-9]{1,6}(_{1,2}[A-Za-z0-9]{1,6}){0,4}",
            custom in any::<bool>(),
        ) {
            let config = if custom { custom_config() } else { config() };
            let paths = shape_name_to_candidate_paths(&name, &config);
            prop_assert!(!paths.is_empty());
            for path in paths {
                prop_assert_eq!(path_to_shape_name(&path, &config), ShapeName::new(name.clone()));
            }
        }

        #[test]
        fn prop_alternates_stay_in_group(
            base in "[A-Za-z0-9]{1,6}(_[A-Za-z0-9]{1,6}){0,2}",
            suffixes in proptest::collection::vec("[A-Za-z0-9]{1,6}(_[A-Za-z0-9]{1,4})?", 0..4),
        ) {
            let mut name = ShapeName::new(base.clone());
            for suffix in &suffixes {
                name = name.alternate(suffix);
            }
            prop_assert!(name.is_alternate_of(&base));
            prop_assert_eq!(name.base(), base.as_str());
        }

        #[test]
        fn prop_extended_base_is_not_in_group(
            base in "[A-Za-z0-9]{1,6}",
            extra in "[A-Za-z0-9]{1,6}",
        ) {
            let name = ShapeName::new(format!("{}_{}", base, extra));
            prop_assert!(!name.is_alternate_of(&base));
        }
    }
}

//! Recipe tags such as "breakfast" or "dinner".

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::TagId;

/// Maximum length of tag names and slugs.
pub const TAG_TEXT_MAX: usize = 200;

/// Colour assigned to tags created without one.
pub const DEFAULT_TAG_COLOR: &str = "#FF0000";

/// Validation errors for tag fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagValidationError {
    #[error("tag name must not be empty")]
    EmptyName,
    #[error("tag {field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("tag colour must be a #RRGGBB hex value")]
    InvalidColor,
    #[error("tag slug may only contain lowercase letters, digits, '-' and '_'")]
    InvalidSlug,
}

static SLUG_RE: OnceLock<Regex> = OnceLock::new();
static COLOR_RE: OnceLock<Regex> = OnceLock::new();

fn slug_regex() -> &'static Regex {
    SLUG_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9_-]+$")
            .unwrap_or_else(|error| panic!("slug regex failed to compile: {error}"))
    })
}

fn color_regex() -> &'static Regex {
    COLOR_RE.get_or_init(|| {
        Regex::new(r"^#[0-9A-Fa-f]{6}$")
            .unwrap_or_else(|error| panic!("colour regex failed to compile: {error}"))
    })
}

/// URL-safe unique tag key used by recipe filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagSlug(String);

impl TagSlug {
    /// Validate a slug.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::TagSlug;
    ///
    /// assert!(TagSlug::new("late_dinner").is_ok());
    /// assert!(TagSlug::new("Late Dinner").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, TagValidationError> {
        let value = value.into();
        if value.chars().count() > TAG_TEXT_MAX {
            return Err(TagValidationError::TooLong {
                field: "slug",
                max: TAG_TEXT_MAX,
            });
        }
        if !slug_regex().is_match(&value) {
            return Err(TagValidationError::InvalidSlug);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for TagSlug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TagSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// `#RRGGBB` colour, stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagColor(String);

impl TagColor {
    /// Validate a hex colour.
    pub fn new(value: impl AsRef<str>) -> Result<Self, TagValidationError> {
        let value = value.as_ref();
        if !color_regex().is_match(value) {
            return Err(TagValidationError::InvalidColor);
        }
        Ok(Self(value.to_ascii_uppercase()))
    }
}

impl Default for TagColor {
    fn default() -> Self {
        Self(DEFAULT_TAG_COLOR.to_owned())
    }
}

impl AsRef<str> for TagColor {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A tag attached to recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub color: TagColor,
    pub slug: TagSlug,
}

impl Tag {
    /// Build a tag from validated parts, checking the display name.
    pub fn new(
        id: TagId,
        name: impl Into<String>,
        color: TagColor,
        slug: TagSlug,
    ) -> Result<Self, TagValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TagValidationError::EmptyName);
        }
        if name.chars().count() > TAG_TEXT_MAX {
            return Err(TagValidationError::TooLong {
                field: "name",
                max: TAG_TEXT_MAX,
            });
        }
        Ok(Self {
            id,
            name,
            color,
            slug,
        })
    }
}

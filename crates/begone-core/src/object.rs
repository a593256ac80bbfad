//! Object identifiers (`category:path`).
//!
//! Parsing rules:
//! - A bare `path` gets the default category (`minecraft`), matching the host
//!   identifier convention.
//! - Category: `[a-z0-9_.-]+`. Path: `[a-z0-9_.-/]+`.
//! - Anything else is `InvalidRule`; parsing never panics.

use std::fmt;
use std::str::FromStr;

use crate::error::{BegoneError, Result};

/// Category assumed when an identifier has no `:` separator.
pub const DEFAULT_CATEGORY: &str = "minecraft";

/// Fully-qualified object identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    category: String,
    path: String,
}

impl ObjectId {
    /// Parse `category:path` (or bare `path`).
    pub fn parse(raw: &str) -> Result<Self> {
        let (category, path) = match raw.split_once(':') {
            Some((c, p)) => (c, p),
            None => (DEFAULT_CATEGORY, raw),
        };

        if !is_valid_category(category) {
            return Err(BegoneError::InvalidRule(format!(
                "Invalid category '{category}' in object id '{raw}'!"
            )));
        }
        if path.is_empty() || !path.chars().all(|c| is_category_char(c) || c == '/') {
            return Err(BegoneError::InvalidRule(format!(
                "Invalid object id '{raw}'!"
            )));
        }

        Ok(Self {
            category: category.to_string(),
            path: path.to_string(),
        })
    }

    /// Category (namespace) half.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Path half.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.path)
    }
}

impl FromStr for ObjectId {
    type Err = BegoneError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Whether `s` is a syntactically valid category prefix.
pub fn is_valid_category(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_category_char)
}

fn is_category_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bare_path_gets_default_category() {
        let id = ObjectId::parse("stone").unwrap();
        assert_eq!(id.category(), "minecraft");
        assert_eq!(id.to_string(), "minecraft:stone");
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in ["", ":plank", "wood:", "Wood:plank", "wood:pl ank", "a:b:c"] {
            let err = ObjectId::parse(bad).unwrap_err();
            assert_eq!(err.code().as_str(), "INVALID_RULE", "input={bad:?}");
        }
    }

    #[test]
    fn nested_paths_are_allowed() {
        let id = ObjectId::parse("create:crushed/iron").unwrap();
        assert_eq!(id.category(), "create");
        assert_eq!(id.path(), "crushed/iron");
    }
}

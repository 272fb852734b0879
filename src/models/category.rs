//! Patient Category Model
//!
//! A category is an opaque short code naming a patient type. Which codes are
//! valid is configuration, held by [`CategorySet`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Validation errors for category codes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryError {
    #[error("Invalid category code '{0}': expected 1-32 characters of [A-Za-z0-9_-], starting alphanumeric")]
    Malformed(String),

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    #[error("Category set must not be empty")]
    EmptySet,
}

#[allow(clippy::expect_used)]
fn category_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{0,31}$").expect("category pattern is a valid regex")
    })
}

/// Identifier for a patient/session type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Parse a category code, trimming surrounding whitespace
    pub fn parse(code: &str) -> Result<Self, CategoryError> {
        let trimmed = code.trim();
        if category_pattern().is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(CategoryError::Malformed(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Category {
    type Error = CategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

/// The configured set of valid categories, in configuration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    categories: Vec<Category>,
}

impl CategorySet {
    /// Build a set from raw codes; duplicates are dropped, order is kept
    pub fn new<I, S>(codes: I) -> Result<Self, CategoryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut categories: Vec<Category> = Vec::new();
        for code in codes {
            let category = Category::parse(code.as_ref())?;
            if !categories.contains(&category) {
                categories.push(category);
            }
        }

        if categories.is_empty() {
            return Err(CategoryError::EmptySet);
        }

        Ok(Self { categories })
    }

    /// Resolve a caller-supplied code against the configured set
    pub fn resolve(&self, code: &str) -> Result<Category, CategoryError> {
        let category = Category::parse(code)?;
        if self.contains(&category) {
            Ok(category)
        } else {
            Err(CategoryError::UnknownCategory(category.0))
        }
    }

    pub fn contains(&self, category: &Category) -> bool {
        self.categories.contains(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self {
            categories: ["A", "B", "C", "D"]
                .into_iter()
                .map(|code| Category(code.to_string()))
                .collect(),
        }
    }
}

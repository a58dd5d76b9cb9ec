//! Validated name newtypes for domain entities
//!
//! These newtypes ensure that names are valid by construction:
//! - Within length limits (counted in characters, not bytes)
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

pub const MIN_CHARACTER_NAME_LENGTH: usize = 3;
pub const MAX_CHARACTER_NAME_LENGTH: usize = 20;

pub const MIN_ITEM_NAME_LENGTH: usize = 3;
pub const MAX_ITEM_NAME_LENGTH: usize = 50;

const MAX_STATUS_LENGTH: usize = 32;

fn trimmed_within(
    kind: &str,
    value: String,
    min: usize,
    max: usize,
) -> Result<String, DomainError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < min {
        return Err(DomainError::validation(format!(
            "{} must be at least {} characters",
            kind, min
        )));
    }
    if len > max {
        return Err(DomainError::validation(format!(
            "{} cannot exceed {} characters",
            kind, max
        )));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// CharacterName
// ============================================================================

/// A validated character name (3..=20 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CharacterName(String);

impl CharacterName {
    /// Create a new validated character name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the trimmed name is shorter than
    /// 3 or longer than 20 characters.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        trimmed_within(
            "Character name",
            name.into(),
            MIN_CHARACTER_NAME_LENGTH,
            MAX_CHARACTER_NAME_LENGTH,
        )
        .map(Self)
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CharacterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CharacterName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CharacterName> for String {
    fn from(name: CharacterName) -> String {
        name.0
    }
}

// ============================================================================
// ItemName
// ============================================================================

/// A validated item name (3..=50 chars, trimmed). Inventory stacks are keyed
/// by this name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        trimmed_within(
            "Item name",
            name.into(),
            MIN_ITEM_NAME_LENGTH,
            MAX_ITEM_NAME_LENGTH,
        )
        .map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stack matching is exact after trimming.
    pub fn matches(&self, name: &str) -> bool {
        self.0 == name.trim()
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ItemName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ItemName> for String {
    fn from(name: ItemName) -> String {
        name.0
    }
}

// ============================================================================
// StatusName
// ============================================================================

/// A status effect label such as "poisoned". Stored lowercase so the status
/// set stays unique regardless of how callers capitalise it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StatusName(String);

impl StatusName {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        trimmed_within("Status", name.into(), 1, MAX_STATUS_LENGTH)
            .map(|s| Self(s.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatusName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for StatusName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<StatusName> for String {
    fn from(name: StatusName) -> String {
        name.0
    }
}

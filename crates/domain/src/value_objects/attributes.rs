//! The six core attributes and their play-time bounds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Lowest value any attribute may hold.
pub const MIN_ATTRIBUTE_VALUE: i32 = 8;

/// Highest value any attribute may hold during play.
pub const MAX_ATTRIBUTE_VALUE: i32 = 20;

/// One of the six core attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Attribute {
    /// All attributes in sheet order.
    pub const ALL: [Attribute; 6] = [
        Attribute::Strength,
        Attribute::Dexterity,
        Attribute::Constitution,
        Attribute::Intelligence,
        Attribute::Wisdom,
        Attribute::Charisma,
    ];

    /// Three-letter key used in interaction ids (`attr_str_up`).
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Strength => "str",
            Self::Dexterity => "dex",
            Self::Constitution => "con",
            Self::Intelligence => "int",
            Self::Wisdom => "wis",
            Self::Charisma => "cha",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Dexterity => "dexterity",
            Self::Constitution => "constitution",
            Self::Intelligence => "intelligence",
            Self::Wisdom => "wisdom",
            Self::Charisma => "charisma",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Strength => 0,
            Self::Dexterity => 1,
            Self::Constitution => 2,
            Self::Intelligence => 3,
            Self::Wisdom => 4,
            Self::Charisma => 5,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = DomainError;

    /// Accepts either the full name or the three-letter abbreviation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|attr| {
                key.eq_ignore_ascii_case(attr.as_str()) || key.eq_ignore_ascii_case(attr.abbreviation())
            })
            .ok_or_else(|| DomainError::parse(format!("Unknown attribute: {}", s)))
    }
}

/// A full set of attribute scores.
///
/// # Invariants
///
/// - Every score is within `[MIN_ATTRIBUTE_VALUE, MAX_ATTRIBUTE_VALUE]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    strength: i32,
    dexterity: i32,
    constitution: i32,
    intelligence: i32,
    wisdom: i32,
    charisma: i32,
}

impl Attributes {
    /// Create a validated attribute set, in sheet order.
    pub fn new(
        strength: i32,
        dexterity: i32,
        constitution: i32,
        intelligence: i32,
        wisdom: i32,
        charisma: i32,
    ) -> Result<Self, DomainError> {
        let attrs = Self::from_scores([
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
        ]);
        attrs.validate()?;
        Ok(attrs)
    }

    /// Every attribute at the floor value.
    pub const fn floor() -> Self {
        Self::from_scores([MIN_ATTRIBUTE_VALUE; 6])
    }

    /// Build from a trusted score array (static class tables).
    pub(crate) const fn from_scores(scores: [i32; 6]) -> Self {
        Self {
            strength: scores[0],
            dexterity: scores[1],
            constitution: scores[2],
            intelligence: scores[3],
            wisdom: scores[4],
            charisma: scores[5],
        }
    }

    fn scores(&self) -> [i32; 6] {
        [
            self.strength,
            self.dexterity,
            self.constitution,
            self.intelligence,
            self.wisdom,
            self.charisma,
        ]
    }

    pub fn get(&self, attribute: Attribute) -> i32 {
        self.scores()[attribute.index()]
    }

    /// Set one score, rejecting values outside the play-time bounds.
    pub fn set(&mut self, attribute: Attribute, value: i32) -> Result<(), DomainError> {
        check_bounds(attribute, value)?;
        let slot = match attribute {
            Attribute::Strength => &mut self.strength,
            Attribute::Dexterity => &mut self.dexterity,
            Attribute::Constitution => &mut self.constitution,
            Attribute::Intelligence => &mut self.intelligence,
            Attribute::Wisdom => &mut self.wisdom,
            Attribute::Charisma => &mut self.charisma,
        };
        *slot = value;
        Ok(())
    }

    /// Iterate `(attribute, score)` pairs in sheet order.
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, i32)> + '_ {
        Attribute::ALL.into_iter().map(|attr| (attr, self.get(attr)))
    }

    pub fn strength(&self) -> i32 {
        self.strength
    }

    pub fn dexterity(&self) -> i32 {
        self.dexterity
    }

    pub fn constitution(&self) -> i32 {
        self.constitution
    }

    pub fn intelligence(&self) -> i32 {
        self.intelligence
    }

    pub fn wisdom(&self) -> i32 {
        self.wisdom
    }

    pub fn charisma(&self) -> i32 {
        self.charisma
    }

    /// Re-check the bounds (used after deserialization).
    pub fn validate(&self) -> Result<(), DomainError> {
        self.iter()
            .try_for_each(|(attr, value)| check_bounds(attr, value))
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::floor()
    }
}

fn check_bounds(attribute: Attribute, value: i32) -> Result<(), DomainError> {
    if !(MIN_ATTRIBUTE_VALUE..=MAX_ATTRIBUTE_VALUE).contains(&value) {
        return Err(DomainError::validation(format!(
            "{} must be between {} and {} (got {})",
            attribute, MIN_ATTRIBUTE_VALUE, MAX_ATTRIBUTE_VALUE, value
        )));
    }
    Ok(())
}

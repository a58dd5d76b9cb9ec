//! Wizard events and the interaction ids that carry them.
//!
//! Transports deliver string ids of the form `category_action[_target]`
//! (`class_warrior`, `attr_str_up`, `attr_confirm`, `background_noble`,
//! `skill_stealth`, `skills_confirm`, `confirm`). [`EventKey::parse`] splits
//! the id and [`WizardEvent::from_key`] maps it onto the closed event set.

use std::fmt;

use crate::error::DomainError;
use crate::types::{Background, CharacterClass, Skill};
use crate::value_objects::Attribute;

/// Direction of a point-buy adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Adjustment {
    Increase,
    Decrease,
}

/// Every input the creation wizard reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardEvent {
    ClassChosen(CharacterClass),
    AdjustAttribute {
        attribute: Attribute,
        adjustment: Adjustment,
    },
    ConfirmAttributes,
    BackgroundChosen(Background),
    ToggleSkill(Skill),
    ConfirmSkills,
    Finalize,
}

impl WizardEvent {
    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            WizardEvent::ClassChosen(_) => "class_chosen",
            WizardEvent::AdjustAttribute { .. } => "adjust_attribute",
            WizardEvent::ConfirmAttributes => "confirm_attributes",
            WizardEvent::BackgroundChosen(_) => "background_chosen",
            WizardEvent::ToggleSkill(_) => "toggle_skill",
            WizardEvent::ConfirmSkills => "confirm_skills",
            WizardEvent::Finalize => "finalize",
        }
    }

    /// Map a parsed id onto an event.
    ///
    /// # Errors
    ///
    /// - `DomainError::Parse` when the id has an unknown shape
    /// - `DomainError::Validation` when the shape is right but the named
    ///   class, background, skill or attribute does not exist
    pub fn from_key(key: &EventKey) -> Result<Self, DomainError> {
        let action = key.action.as_deref();
        let target = key.target.as_deref();
        match (key.category.as_str(), action, target) {
            ("confirm", None, None) => Ok(WizardEvent::Finalize),
            ("class", Some(class), None) => class
                .parse()
                .map(WizardEvent::ClassChosen)
                .map_err(|_| DomainError::validation(format!("Unknown class: {}", class))),
            ("attr", Some("confirm"), None) => Ok(WizardEvent::ConfirmAttributes),
            ("attr", Some(attr), Some(direction)) => {
                let attribute = attr.parse::<Attribute>().map_err(|_| {
                    DomainError::validation(format!("Unknown attribute: {}", attr))
                })?;
                let adjustment = match direction {
                    "up" => Adjustment::Increase,
                    "down" => Adjustment::Decrease,
                    other => {
                        return Err(DomainError::parse(format!(
                            "Unknown attribute direction: {}",
                            other
                        )))
                    }
                };
                Ok(WizardEvent::AdjustAttribute {
                    attribute,
                    adjustment,
                })
            }
            ("background", Some(bg), None) => bg
                .parse()
                .map(WizardEvent::BackgroundChosen)
                .map_err(|_| DomainError::validation(format!("Unknown background: {}", bg))),
            ("skills", Some("confirm"), None) => Ok(WizardEvent::ConfirmSkills),
            ("skill", Some(skill), None) => skill
                .parse()
                .map(WizardEvent::ToggleSkill)
                .map_err(|_| DomainError::validation(format!("Unknown skill: {}", skill))),
            _ => Err(DomainError::parse(format!("Unrecognized event id: {}", key))),
        }
    }

    /// Parse a raw interaction id straight into an event.
    pub fn parse(id: &str) -> Result<Self, DomainError> {
        Self::from_key(&EventKey::parse(id)?)
    }
}

/// A `category_action[_target]` id split into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub category: String,
    pub action: Option<String>,
    pub target: Option<String>,
}

impl EventKey {
    pub fn new(
        category: impl Into<String>,
        action: Option<String>,
        target: Option<String>,
    ) -> Self {
        Self {
            category: category.into(),
            action,
            target,
        }
    }

    /// Split an id on the first two underscores.
    ///
    /// Empty ids and empty segments (`class_`, `_warrior`, `attr__up`) are
    /// rejected as malformed.
    pub fn parse(id: &str) -> Result<Self, DomainError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(DomainError::parse("Empty event id"));
        }
        let mut parts = id.splitn(3, '_');
        let mut segment = || -> Result<Option<String>, DomainError> {
            match parts.next() {
                None => Ok(None),
                Some("") => Err(DomainError::parse(format!("Malformed event id: {}", id))),
                Some(part) => Ok(Some(part.to_string())),
            }
        };
        let category = segment()?
            .ok_or_else(|| DomainError::parse(format!("Malformed event id: {}", id)))?;
        let action = segment()?;
        let target = segment()?;
        Ok(Self {
            category,
            action,
            target,
        })
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.category)?;
        if let Some(action) = &self.action {
            write!(f, "_{}", action)?;
        }
        if let Some(target) = &self.target {
            write!(f, "_{}", target)?;
        }
        Ok(())
    }
}

//! Unified error types for the domain layer
//!
//! Every rule check in the domain reports failure through [`DomainError`].
//! Callers distinguish two broad classes with [`DomainError::is_protocol`]:
//! events that arrived in a state that does not accept them, and everything
//! else, which the player can correct and retry.

use thiserror::Error;

use crate::rules::EquipRejection;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Business rule violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Parse error (for value objects and wizard event keys)
    #[error("Parse error: {0}")]
    Parse(String),

    /// State transition not allowed
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// Container is at capacity
    #[error("Container full: {current}/{max} items")]
    ContainerFull { current: u32, max: u32 },

    /// Item cannot be equipped by this character
    #[error("Cannot equip item: {0}")]
    Ineligible(EquipRejection),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// # Example
    /// ```ignore
    /// if amount < 0 {
    ///     return Err(DomainError::validation("Experience cannot be negative"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }

    /// Create a container full error
    pub fn container_full(current: usize, max: usize) -> Self {
        Self::ContainerFull {
            current: u32::try_from(current).unwrap_or(u32::MAX),
            max: u32::try_from(max).unwrap_or(u32::MAX),
        }
    }

    /// True when the error means "this event is not valid right now" rather
    /// than "this value breaks a rule".
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::InvalidStateTransition(_))
    }
}

impl From<EquipRejection> for DomainError {
    fn from(rejection: EquipRejection) -> Self {
        Self::Ineligible(rejection)
    }
}

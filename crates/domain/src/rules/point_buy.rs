//! Attribute point-buy used during character creation.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{Attribute, Attributes, MIN_ATTRIBUTE_VALUE};

/// Points available to spend on attributes.
pub const POINT_BUY_BUDGET: i32 = 27;

/// Lowest score during allocation (and the free starting value).
pub const POINT_BUY_FLOOR: i32 = MIN_ATTRIBUTE_VALUE;

/// Highest score reachable by spending points.
pub const POINT_BUY_CEILING: i32 = 15;

/// Cost of raising an attribute to `value` from one below it.
pub fn point_cost(value: i32) -> i32 {
    match value {
        v if v <= POINT_BUY_FLOOR => 0,
        v if v <= 13 => 1,
        14 => 2,
        _ => 3,
    }
}

/// Total spent to bring one attribute from the floor to `value`.
pub fn cumulative_cost(value: i32) -> i32 {
    ((POINT_BUY_FLOOR + 1)..=value).map(point_cost).sum()
}

/// Running point-buy allocation.
///
/// # Invariants
///
/// - Every score is within `[POINT_BUY_FLOOR, POINT_BUY_CEILING]`
/// - `remaining()` is never negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeBudget {
    attributes: Attributes,
}

impl AttributeBudget {
    /// All six attributes at the floor, full budget available.
    pub fn new() -> Self {
        Self {
            attributes: Attributes::floor(),
        }
    }

    /// Start from a pre-filled array such as a class baseline.
    ///
    /// # Errors
    ///
    /// Fails if any score is outside the allocation range or the array
    /// already costs more than the budget.
    pub fn from_attributes(attributes: Attributes) -> Result<Self, DomainError> {
        if let Some((attr, value)) = attributes
            .iter()
            .find(|(_, v)| !(POINT_BUY_FLOOR..=POINT_BUY_CEILING).contains(v))
        {
            return Err(DomainError::validation(format!(
                "{} must be between {} and {} during creation (got {})",
                attr, POINT_BUY_FLOOR, POINT_BUY_CEILING, value
            )));
        }
        let budget = Self { attributes };
        if budget.remaining() < 0 {
            return Err(DomainError::validation(format!(
                "Attribute array costs {} points, budget is {}",
                budget.spent(),
                POINT_BUY_BUDGET
            )));
        }
        Ok(budget)
    }

    /// Raise one attribute by a point.
    pub fn increase(&mut self, attribute: Attribute) -> Result<(), DomainError> {
        let current = self.attributes.get(attribute);
        if current >= POINT_BUY_CEILING {
            return Err(DomainError::validation(format!(
                "{} is already at the creation maximum of {}",
                attribute, POINT_BUY_CEILING
            )));
        }
        let cost = point_cost(current + 1);
        let remaining = self.remaining();
        if cost > remaining {
            return Err(DomainError::validation(format!(
                "Not enough points to raise {}: costs {}, {} left",
                attribute, cost, remaining
            )));
        }
        self.attributes.set(attribute, current + 1)
    }

    /// Lower one attribute by a point, refunding its cost.
    pub fn decrease(&mut self, attribute: Attribute) -> Result<(), DomainError> {
        let current = self.attributes.get(attribute);
        if current <= POINT_BUY_FLOOR {
            return Err(DomainError::validation(format!(
                "{} is already at the minimum of {}",
                attribute, POINT_BUY_FLOOR
            )));
        }
        self.attributes.set(attribute, current - 1)
    }

    pub fn spent(&self) -> i32 {
        self.attributes.iter().map(|(_, v)| cumulative_cost(v)).sum()
    }

    pub fn remaining(&self) -> i32 {
        POINT_BUY_BUDGET - self.spent()
    }

    pub fn is_fully_spent(&self) -> bool {
        self.remaining() == 0
    }

    /// Guard for confirming the allocation step.
    pub fn ensure_fully_spent(&self) -> Result<(), DomainError> {
        match self.remaining() {
            0 => Ok(()),
            left => Err(DomainError::validation(format!(
                "You still have {} attribute points to spend",
                left
            ))),
        }
    }

    pub fn attributes(&self) -> Attributes {
        self.attributes
    }
}

impl Default for AttributeBudget {
    fn default() -> Self {
        Self::new()
    }
}

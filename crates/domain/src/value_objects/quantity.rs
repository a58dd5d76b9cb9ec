//! Stack quantity arithmetic for inventory items

use serde::{Deserialize, Serialize};

/// Largest quantity a single inventory stack may hold.
pub const MAX_ITEM_QUANTITY: u32 = 99;

/// Result of taking units out of a stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackChange {
    /// Units left in the stack after removal
    Remaining(u32),
    /// The stack is empty and should be dropped
    Depleted,
}

impl StackChange {
    /// Remove `amount` from a stack holding `current`.
    ///
    /// Returns `None` when the stack does not hold enough units; callers treat
    /// that as a failed removal and leave the stack untouched.
    pub fn take(current: u32, amount: u32) -> Option<Self> {
        match current.checked_sub(amount)? {
            0 => Some(Self::Depleted),
            left => Some(Self::Remaining(left)),
        }
    }

    pub fn should_remove(&self) -> bool {
        matches!(self, Self::Depleted)
    }

    pub fn remaining(&self) -> u32 {
        match self {
            Self::Remaining(qty) => *qty,
            Self::Depleted => 0,
        }
    }
}

/// Combined size of two stacks, or `None` if it would pass the stack cap.
pub fn merged_quantity(current: u32, incoming: u32) -> Option<u32> {
    current
        .checked_add(incoming)
        .filter(|total| *total <= MAX_ITEM_QUANTITY)
}

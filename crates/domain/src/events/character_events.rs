//! Character-related domain events
//!
//! These types communicate what happened when character state was modified,
//! allowing callers to react appropriately (announce a level-up, report a
//! knocked-out character, and so on).

use crate::types::EquipmentSlot;
use crate::value_objects::{ItemName, StatusName};

/// Result of granting experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperienceGain {
    pub gained: u64,
    pub total: u64,
    pub previous_level: u8,
    pub new_level: u8,
}

impl ExperienceGain {
    pub fn leveled_up(&self) -> bool {
        self.new_level > self.previous_level
    }

    pub fn levels_gained(&self) -> u8 {
        self.new_level.saturating_sub(self.previous_level)
    }
}

/// Outcome of applying damage to a character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Character was already at zero health, no effect
    AlreadyDown,
    /// Character took damage and is still standing
    Wounded { damage_dealt: i32, remaining_hp: i32 },
    /// This damage brought the character to zero
    Downed { damage_dealt: i32 },
}

impl DamageOutcome {
    pub fn reached_zero(&self) -> bool {
        matches!(self, Self::Downed { .. } | Self::AlreadyDown)
    }
}

/// Outcome of healing a character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealOutcome {
    /// Healing applied
    Healed { amount_healed: i32, new_hp: i32 },
    /// Already at max HP
    AlreadyFull,
}

/// Outcome of adding an item to the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemAdded {
    /// Merged into an existing stack
    Stacked { name: ItemName, quantity: u32 },
    /// Stored as a new stack
    NewStack { name: ItemName, quantity: u32 },
}

/// Outcome of equipping an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipOutcome {
    pub equipped: ItemName,
    pub slot: EquipmentSlot,
    /// Previous occupant of the slot, now back in the inventory
    pub displaced: Option<ItemName>,
}

/// Outcome of adding a status effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    Added(StatusName),
    AlreadyPresent(StatusName),
}

/// Gold balance before and after a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoldChange {
    pub previous: u64,
    pub current: u64,
}

//! Equip eligibility checks.

use thiserror::Error;

use crate::types::{CharacterClass, Item, ItemType};

/// First reason an item cannot be equipped.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EquipRejection {
    #[error("{0} items cannot be equipped")]
    NotEquippable(ItemType),

    #[error("item requires level {required} (character is level {actual})")]
    LevelTooLow { required: u8, actual: u8 },

    #[error("item is restricted to other classes than {0}")]
    ClassNotAllowed(CharacterClass),

    #[error("{class} cannot use {kind} equipment")]
    KindNotAllowedForClass { class: CharacterClass, kind: ItemType },

    #[error("item has no equipment slot")]
    NoSlot,
}

/// Check whether a character of `level` and `class` may wear `item`.
///
/// Order: kind is equippable, level requirement, the item's class list,
/// the class's trained kinds, then a slot is present. Returns the first
/// failure.
pub fn can_equip(level: u8, class: CharacterClass, item: &Item) -> Result<(), EquipRejection> {
    let kind = item.item_type();
    if !kind.is_equippable() {
        return Err(EquipRejection::NotEquippable(kind));
    }
    if item.required_level() > level {
        return Err(EquipRejection::LevelTooLow {
            required: item.required_level(),
            actual: level,
        });
    }
    let classes = item.required_classes();
    if !classes.is_empty() && !classes.contains(&class) {
        return Err(EquipRejection::ClassNotAllowed(class));
    }
    if !class.equipment_kinds().contains(&kind) {
        return Err(EquipRejection::KindNotAllowedForClass { class, kind });
    }
    if item.slot().is_none() {
        return Err(EquipRejection::NoSlot);
    }
    Ok(())
}

//! Closed vocabularies of the rules system: classes, skills, backgrounds,
//! and items.
//!
//! Pure data types with static rule tables attached. No I/O, no async.

mod background;
mod class;
mod item;
mod skill;

pub use background::Background;
pub use class::CharacterClass;
pub use item::{
    EquipmentSlot, Item, ItemRarity, ItemStats, ItemType, MAX_ITEM_STAT, MIN_ITEM_STAT,
};
pub use skill::{Skill, SkillProficiency};

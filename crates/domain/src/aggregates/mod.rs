//! Aggregate roots

mod character;

pub use character::{
    Character, CombatStats, MAX_EQUIPMENT_SIZE, MAX_INVENTORY_SIZE, STARTING_GOLD,
};

pub(crate) use character::NewCharacter;

//! Outcome types returned by aggregate mutations.

mod character_events;

pub use character_events::{
    DamageOutcome, EquipOutcome, ExperienceGain, GoldChange, HealOutcome, ItemAdded, StatusChange,
};

//! # Sagaforge Domain
//!
//! Character rules and the creation wizard for a chat-bot tabletop RPG.
//!
//! This crate is the innermost layer: pure, synchronous, no I/O. The engine
//! crate wraps it with persistence, concurrency and configuration.
//!
//! - [`rules`] - point-buy, progression formulas, equip eligibility
//! - [`aggregates::Character`] - the persistent character and its mutations
//! - [`creation`] - the wizard state machine that mints characters

pub mod aggregates;
pub mod creation;
pub mod error;
pub mod events;
pub mod ids;
pub mod rules;
pub mod types;
pub mod value_objects;

pub use aggregates::{
    Character, CombatStats, MAX_EQUIPMENT_SIZE, MAX_INVENTORY_SIZE, STARTING_GOLD,
};
pub use creation::{
    Adjustment, CharacterDraft, CreationSession, CreationStep, DraftSeed, Effect, EventKey,
    SessionView, Transition, WizardEvent,
};
pub use error::DomainError;
pub use events::{
    DamageOutcome, EquipOutcome, ExperienceGain, GoldChange, HealOutcome, ItemAdded, StatusChange,
};
pub use ids::{ActorId, CharacterId, ScopeId};
pub use rules::{AttributeBudget, EquipRejection, MAX_LEVEL};
pub use types::{
    Background, CharacterClass, EquipmentSlot, Item, ItemRarity, ItemStats, ItemType, Skill,
    SkillProficiency,
};
pub use value_objects::{
    Attribute, Attributes, CharacterName, ItemName, StackChange, StatusName,
};

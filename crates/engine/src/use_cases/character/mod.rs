//! Gameplay use cases on an existing character.
//!
//! Each operation loads the actor's active character in a scope, applies one
//! aggregate mutation, saves, and returns the mutation's outcome.

mod error;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sagaforge_domain::{
    ActorId, Attributes, Background, Character, CharacterClass, CombatStats, DamageOutcome,
    DomainError, EquipOutcome, ExperienceGain, GoldChange, HealOutcome, Item, ItemAdded, ScopeId,
    Skill, StackChange, StatusChange, StatusName,
};
use serde::Serialize;

use crate::entities;
use crate::infrastructure::ports::ClockPort;

pub use error::CharacterOpError;

/// Read model of a character with derived numbers filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSheet {
    pub name: String,
    pub class: CharacterClass,
    pub background: Background,
    pub level: u8,
    pub experience: u64,
    pub experience_to_next_level: Option<u64>,
    pub gold: u64,
    pub attributes: Attributes,
    pub combat: CombatStats,
    pub attack_bonus: i32,
    pub skill_modifiers: Vec<(Skill, i32)>,
    pub inventory: Vec<Item>,
    pub equipment: Vec<Item>,
    pub status_effects: Vec<String>,
}

impl From<&Character> for CharacterSheet {
    fn from(c: &Character) -> Self {
        Self {
            name: c.name().to_string(),
            class: c.class(),
            background: c.background(),
            level: c.level(),
            experience: c.experience(),
            experience_to_next_level: c.experience_to_next_level(),
            gold: c.gold(),
            attributes: *c.attributes(),
            combat: c.combat(),
            attack_bonus: c.attack_bonus(),
            skill_modifiers: c.skill_modifiers(),
            inventory: c.inventory().to_vec(),
            equipment: c.equipment().to_vec(),
            status_effects: c
                .status_effects()
                .iter()
                .map(|s| s.as_str().to_string())
                .collect(),
        }
    }
}

/// Character gameplay operations.
pub struct CharacterOps {
    characters: Arc<entities::Character>,
    clock: Arc<dyn ClockPort>,
}

impl CharacterOps {
    pub fn new(characters: Arc<entities::Character>, clock: Arc<dyn ClockPort>) -> Self {
        Self { characters, clock }
    }

    pub async fn view(
        &self,
        actor: &ActorId,
        scope: &ScopeId,
    ) -> Result<CharacterSheet, CharacterOpError> {
        let character = self.load(actor, scope).await?;
        Ok(CharacterSheet::from(&character))
    }

    pub async fn add_experience(
        &self,
        actor: &ActorId,
        scope: &ScopeId,
        amount: i64,
    ) -> Result<ExperienceGain, CharacterOpError> {
        let gain = self
            .update(actor, scope, |c, now| c.add_experience(amount, now))
            .await?;
        if gain.leveled_up() {
            tracing::info!(
                actor = %actor,
                scope = %scope,
                level = gain.new_level,
                "Character leveled up"
            );
        }
        Ok(gain)
    }

    pub async fn add_gold(
        &self,
        actor: &ActorId,
        scope: &ScopeId,
        delta: i64,
    ) -> Result<GoldChange, CharacterOpError> {
        self.update(actor, scope, |c, now| Ok(c.add_gold(delta, now)))
            .await
    }

    pub async fn spend_gold(
        &self,
        actor: &ActorId,
        scope: &ScopeId,
        amount: u64,
    ) -> Result<GoldChange, CharacterOpError> {
        self.update(actor, scope, |c, now| c.spend_gold(amount, now))
            .await
    }

    pub async fn add_item(
        &self,
        actor: &ActorId,
        scope: &ScopeId,
        item: Item,
    ) -> Result<ItemAdded, CharacterOpError> {
        self.update(actor, scope, move |c, now| c.add_item(item, now))
            .await
    }

    pub async fn remove_item(
        &self,
        actor: &ActorId,
        scope: &ScopeId,
        name: &str,
        quantity: u32,
    ) -> Result<StackChange, CharacterOpError> {
        self.update(actor, scope, |c, now| c.remove_item(name, quantity, now))
            .await
    }

    pub async fn equip(
        &self,
        actor: &ActorId,
        scope: &ScopeId,
        name: &str,
    ) -> Result<EquipOutcome, CharacterOpError> {
        self.update(actor, scope, |c, now| c.equip(name, now)).await
    }

    pub async fn unequip(
        &self,
        actor: &ActorId,
        scope: &ScopeId,
        name: &str,
    ) -> Result<ItemAdded, CharacterOpError> {
        self.update(actor, scope, |c, now| c.unequip(name, now)).await
    }

    pub async fn take_damage(
        &self,
        actor: &ActorId,
        scope: &ScopeId,
        amount: i32,
    ) -> Result<DamageOutcome, CharacterOpError> {
        let outcome = self
            .update(actor, scope, |c, now| c.take_damage(amount, now))
            .await?;
        if outcome.reached_zero() {
            tracing::info!(actor = %actor, scope = %scope, "Character downed");
        }
        Ok(outcome)
    }

    pub async fn heal(
        &self,
        actor: &ActorId,
        scope: &ScopeId,
        amount: i32,
    ) -> Result<HealOutcome, CharacterOpError> {
        self.update(actor, scope, |c, now| c.heal(amount, now)).await
    }

    pub async fn add_status(
        &self,
        actor: &ActorId,
        scope: &ScopeId,
        status: &str,
    ) -> Result<StatusChange, CharacterOpError> {
        let status = StatusName::new(status)?;
        self.update(actor, scope, move |c, now| Ok(c.add_status(status, now)))
            .await
    }

    pub async fn remove_status(
        &self,
        actor: &ActorId,
        scope: &ScopeId,
        status: &str,
    ) -> Result<StatusName, CharacterOpError> {
        self.update(actor, scope, |c, now| c.remove_status(status, now))
            .await
    }

    /// Retire the character; the actor may create a new one afterwards.
    pub async fn deactivate(
        &self,
        actor: &ActorId,
        scope: &ScopeId,
    ) -> Result<(), CharacterOpError> {
        self.update(actor, scope, |c, now| c.deactivate(now)).await?;
        tracing::info!(actor = %actor, scope = %scope, "Character deactivated");
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn load(
        &self,
        actor: &ActorId,
        scope: &ScopeId,
    ) -> Result<Character, CharacterOpError> {
        self.characters
            .find_active(actor, scope)
            .await?
            .ok_or_else(|| CharacterOpError::NotFound {
                actor: actor.clone(),
                scope: scope.clone(),
            })
    }

    /// Load → mutate → save. Nothing is written when `op` fails.
    async fn update<T>(
        &self,
        actor: &ActorId,
        scope: &ScopeId,
        op: impl FnOnce(&mut Character, DateTime<Utc>) -> Result<T, DomainError>,
    ) -> Result<T, CharacterOpError> {
        let mut character = self.load(actor, scope).await?;
        let outcome = op(&mut character, self.clock.now()).map_err(|e| {
            tracing::debug!(
                actor = %actor,
                character_id = %character.id(),
                error = %e,
                "Character operation rejected"
            );
            e
        })?;
        self.characters.save(&character).await.map_err(|e| {
            tracing::error!(character_id = %character.id(), error = %e, "Failed to save character");
            e
        })?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests;

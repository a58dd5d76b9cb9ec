//! Character aggregate - a player's persistent adventurer
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: state only changes through the methods below
//! - **Derived combat numbers**: max health, armor and initiative are computed
//!   from level and attributes on every read, never stored
//! - **Outcome types**: mutations return what happened (`ExperienceGain`,
//!   `DamageOutcome`, `EquipOutcome`, ...)
//! - **All-or-nothing**: a failed mutation leaves the character untouched
//!
//! Characters are only minted by the creation wizard (see
//! [`CharacterDraft::build`](crate::creation::CharacterDraft::build)) or
//! loaded back from storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainError;
use crate::events::{
    DamageOutcome, EquipOutcome, ExperienceGain, GoldChange, HealOutcome, ItemAdded, StatusChange,
};
use crate::ids::{ActorId, CharacterId, ScopeId};
use crate::rules::{self, MAX_LEVEL, STARTING_LEVEL};
use crate::types::{Background, CharacterClass, EquipmentSlot, Item, Skill, SkillProficiency};
use crate::value_objects::{
    merged_quantity, Attribute, Attributes, CharacterName, StackChange, StatusName,
    MAX_ITEM_QUANTITY,
};

/// Gold every character starts with.
pub const STARTING_GOLD: u64 = 100;

/// Maximum number of stacks in the inventory.
pub const MAX_INVENTORY_SIZE: usize = 50;

/// One item per equipment slot.
pub const MAX_EQUIPMENT_SIZE: usize = 11;

/// Derived combat block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatStats {
    pub current_health: i32,
    pub max_health: i32,
    pub armor: i32,
    pub initiative: i32,
}

/// A player character bound to one actor within one scope.
///
/// # Invariants
///
/// - `1 <= level <= MAX_LEVEL`
/// - `0 <= current_health <= max_health()`
/// - Inventory holds at most `MAX_INVENTORY_SIZE` stacks, each within
///   `1..=MAX_ITEM_QUANTITY`, none flagged as equipped
/// - Equipment holds at most one item per slot, all flagged as equipped
/// - Every skill record belongs to the class skill list
/// - Status effects are unique
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    id: CharacterId,
    owner: ActorId,
    scope: ScopeId,
    name: CharacterName,
    class: CharacterClass,
    background: Background,
    level: u8,
    experience: u64,
    gold: u64,
    attributes: Attributes,
    skills: Vec<SkillProficiency>,
    inventory: Vec<Item>,
    equipment: Vec<Item>,
    current_health: i32,
    status_effects: Vec<StatusName>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Fields a new character is minted from.
pub(crate) struct NewCharacter {
    pub id: CharacterId,
    pub owner: ActorId,
    pub scope: ScopeId,
    pub name: CharacterName,
    pub class: CharacterClass,
    pub background: Background,
    pub attributes: Attributes,
    pub skills: Vec<SkillProficiency>,
}

impl Character {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Mint a level-1 character at full health with starting gold.
    pub(crate) fn create(fields: NewCharacter, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let mut character = Self {
            id: fields.id,
            owner: fields.owner,
            scope: fields.scope,
            name: fields.name,
            class: fields.class,
            background: fields.background,
            level: STARTING_LEVEL,
            experience: 0,
            gold: STARTING_GOLD,
            attributes: fields.attributes,
            skills: fields.skills,
            inventory: Vec::new(),
            equipment: Vec::new(),
            current_health: 0,
            status_effects: Vec::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        character.current_health = character.max_health();
        character.validate()?;
        Ok(character)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn owner(&self) -> &ActorId {
        &self.owner
    }

    pub fn scope(&self) -> &ScopeId {
        &self.scope
    }

    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    pub fn class(&self) -> CharacterClass {
        self.class
    }

    pub fn background(&self) -> Background {
        self.background
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn experience(&self) -> u64 {
        self.experience
    }

    /// Experience still needed for the next level, `None` at the cap.
    pub fn experience_to_next_level(&self) -> Option<u64> {
        if self.level >= MAX_LEVEL {
            return None;
        }
        rules::exp_for_level(self.level + 1).map(|needed| needed.saturating_sub(self.experience))
    }

    pub fn gold(&self) -> u64 {
        self.gold
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn skills(&self) -> &[SkillProficiency] {
        &self.skills
    }

    pub fn inventory(&self) -> &[Item] {
        &self.inventory
    }

    pub fn equipment(&self) -> &[Item] {
        &self.equipment
    }

    pub fn equipped_in(&self, slot: EquipmentSlot) -> Option<&Item> {
        self.equipment.iter().find(|item| item.slot() == Some(slot))
    }

    pub fn current_health(&self) -> i32 {
        self.current_health
    }

    pub fn max_health(&self) -> i32 {
        rules::max_health(self.level, self.attributes.constitution())
    }

    pub fn combat(&self) -> CombatStats {
        CombatStats {
            current_health: self.current_health,
            max_health: self.max_health(),
            armor: rules::armor_class(self.level, &self.attributes),
            initiative: rules::initiative(self.level, &self.attributes),
        }
    }

    pub fn status_effects(&self) -> &[StatusName] {
        &self.status_effects
    }

    pub fn has_status(&self, name: &str) -> bool {
        self.find_status(name).is_some()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // =========================================================================
    // Derived rule values
    // =========================================================================

    pub fn skill_modifier(&self, skill: Skill) -> i32 {
        let record = self.skills.iter().find(|p| p.skill == skill);
        rules::skill_modifier(skill, &self.attributes, record, self.level)
    }

    /// Modifiers for every skill on the class list, in class order.
    pub fn skill_modifiers(&self) -> Vec<(Skill, i32)> {
        self.class
            .skills()
            .iter()
            .map(|skill| (*skill, self.skill_modifier(*skill)))
            .collect()
    }

    pub fn class_bonus(&self) -> i32 {
        rules::class_bonus(self.class, &self.attributes)
    }

    pub fn attack_bonus(&self) -> i32 {
        rules::attack_bonus(self.class, self.level, &self.attributes)
    }

    // =========================================================================
    // Progression
    // =========================================================================

    /// Grant experience, promoting as many levels as the total reaches.
    ///
    /// Every promotion restores health to the new maximum.
    pub fn add_experience(
        &mut self,
        amount: i64,
        now: DateTime<Utc>,
    ) -> Result<ExperienceGain, DomainError> {
        let gained = u64::try_from(amount)
            .map_err(|_| DomainError::validation("Experience amount cannot be negative"))?;

        let previous_level = self.level;
        self.experience = self.experience.saturating_add(gained);
        while self.level < MAX_LEVEL {
            match rules::exp_for_level(self.level + 1) {
                Some(needed) if self.experience >= needed => {
                    self.level += 1;
                    self.current_health = self.max_health();
                }
                _ => break,
            }
        }
        self.updated_at = now;

        Ok(ExperienceGain {
            gained,
            total: self.experience,
            previous_level,
            new_level: self.level,
        })
    }

    // =========================================================================
    // Gold
    // =========================================================================

    /// Adjust gold by `delta`; the balance bottoms out at zero.
    pub fn add_gold(&mut self, delta: i64, now: DateTime<Utc>) -> GoldChange {
        let previous = self.gold;
        self.gold = if delta >= 0 {
            self.gold.saturating_add(delta.unsigned_abs())
        } else {
            self.gold.saturating_sub(delta.unsigned_abs())
        };
        self.updated_at = now;
        GoldChange {
            previous,
            current: self.gold,
        }
    }

    /// Pay `amount`, failing without change if the balance is short.
    pub fn spend_gold(&mut self, amount: u64, now: DateTime<Utc>) -> Result<GoldChange, DomainError> {
        let current = self.gold.checked_sub(amount).ok_or_else(|| {
            DomainError::constraint(format!(
                "Not enough gold: have {}, need {}",
                self.gold, amount
            ))
        })?;
        let previous = self.gold;
        self.gold = current;
        self.updated_at = now;
        Ok(GoldChange { previous, current })
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    /// Put an item in the inventory, merging with an identical stack.
    ///
    /// Incoming items always land unequipped; only `equip` sets the flag.
    pub fn add_item(
        &mut self,
        mut item: Item,
        now: DateTime<Utc>,
    ) -> Result<ItemAdded, DomainError> {
        item.validate()?;
        item.set_equipped(false);
        let added = stow(&mut self.inventory, item)?;
        self.updated_at = now;
        Ok(added)
    }

    /// Take `quantity` units out of the named stack, dropping it when empty.
    pub fn remove_item(
        &mut self,
        name: &str,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> Result<StackChange, DomainError> {
        if quantity == 0 {
            return Err(DomainError::validation("Quantity must be at least 1"));
        }
        let index = self
            .inventory_index(name)
            .ok_or_else(|| DomainError::not_found("Item", name.trim()))?;
        let held = self.inventory[index].quantity();
        let change = StackChange::take(held, quantity).ok_or_else(|| {
            DomainError::validation(format!(
                "Only {} of {} in the inventory",
                held,
                self.inventory[index].name()
            ))
        })?;

        match change {
            StackChange::Depleted => {
                self.inventory.remove(index);
            }
            StackChange::Remaining(left) => self.inventory[index].set_quantity(left),
        }
        self.updated_at = now;
        Ok(change)
    }

    /// Equip one unit of the named inventory stack.
    ///
    /// Whatever occupied the target slot goes back to the inventory first.
    pub fn equip(&mut self, name: &str, now: DateTime<Utc>) -> Result<EquipOutcome, DomainError> {
        let index = match self.inventory_index(name) {
            Some(index) => index,
            None if self.equipment_index(name).is_some() => {
                return Err(DomainError::constraint(format!(
                    "{} is already equipped",
                    name.trim()
                )))
            }
            None => return Err(DomainError::not_found("Item", name.trim())),
        };

        let candidate = &self.inventory[index];
        rules::can_equip(self.level, self.class, candidate)?;
        let slot = candidate
            .slot()
            .ok_or(DomainError::Ineligible(rules::EquipRejection::NoSlot))?;
        let occupant = self
            .equipment
            .iter()
            .position(|item| item.slot() == Some(slot));
        if occupant.is_none() && self.equipment.len() >= MAX_EQUIPMENT_SIZE {
            return Err(DomainError::container_full(
                self.equipment.len(),
                MAX_EQUIPMENT_SIZE,
            ));
        }

        // Stage the inventory so a failed stow of the displaced item rolls back
        let mut staged = self.inventory.clone();
        let mut worn = staged[index].split(1);
        match StackChange::take(staged[index].quantity(), 1) {
            Some(StackChange::Remaining(left)) => staged[index].set_quantity(left),
            _ => {
                staged.remove(index);
            }
        }

        let displaced = match occupant {
            Some(slot_index) => {
                let mut previous = self.equipment[slot_index].clone();
                previous.set_equipped(false);
                let previous_name = previous.name().clone();
                stow(&mut staged, previous)?;
                self.equipment.remove(slot_index);
                Some(previous_name)
            }
            None => None,
        };

        worn.set_equipped(true);
        let equipped = worn.name().clone();
        self.equipment.push(worn);
        self.inventory = staged;
        self.updated_at = now;

        Ok(EquipOutcome {
            equipped,
            slot,
            displaced,
        })
    }

    /// Move an equipped item back to the inventory.
    pub fn unequip(&mut self, name: &str, now: DateTime<Utc>) -> Result<ItemAdded, DomainError> {
        let index = self
            .equipment_index(name)
            .ok_or_else(|| DomainError::not_found("Equipped item", name.trim()))?;

        let mut item = self.equipment[index].clone();
        item.set_equipped(false);
        let added = stow(&mut self.inventory, item)?;
        self.equipment.remove(index);
        self.updated_at = now;
        Ok(added)
    }

    fn inventory_index(&self, name: &str) -> Option<usize> {
        self.inventory.iter().position(|item| item.name().matches(name))
    }

    fn equipment_index(&self, name: &str) -> Option<usize> {
        self.equipment.iter().position(|item| item.name().matches(name))
    }

    // =========================================================================
    // Combat
    // =========================================================================

    pub fn take_damage(&mut self, amount: i32, now: DateTime<Utc>) -> Result<DamageOutcome, DomainError> {
        if amount < 0 {
            return Err(DomainError::validation("Damage cannot be negative"));
        }
        if self.current_health == 0 {
            return Ok(DamageOutcome::AlreadyDown);
        }
        let before = self.current_health;
        self.current_health = (before - amount).max(0);
        self.updated_at = now;

        let damage_dealt = before - self.current_health;
        if self.current_health == 0 {
            Ok(DamageOutcome::Downed { damage_dealt })
        } else {
            Ok(DamageOutcome::Wounded {
                damage_dealt,
                remaining_hp: self.current_health,
            })
        }
    }

    pub fn heal(&mut self, amount: i32, now: DateTime<Utc>) -> Result<HealOutcome, DomainError> {
        if amount < 0 {
            return Err(DomainError::validation("Healing cannot be negative"));
        }
        let max = self.max_health();
        if self.current_health >= max {
            return Ok(HealOutcome::AlreadyFull);
        }
        let before = self.current_health;
        self.current_health = before.saturating_add(amount).min(max);
        self.updated_at = now;
        Ok(HealOutcome::Healed {
            amount_healed: self.current_health - before,
            new_hp: self.current_health,
        })
    }

    // =========================================================================
    // Status effects
    // =========================================================================

    pub fn add_status(&mut self, status: StatusName, now: DateTime<Utc>) -> StatusChange {
        if self.status_effects.contains(&status) {
            return StatusChange::AlreadyPresent(status);
        }
        self.status_effects.push(status.clone());
        self.updated_at = now;
        StatusChange::Added(status)
    }

    pub fn remove_status(&mut self, name: &str, now: DateTime<Utc>) -> Result<StatusName, DomainError> {
        let index = self
            .find_status(name)
            .ok_or_else(|| DomainError::not_found("Status", name.trim()))?;
        let removed = self.status_effects.remove(index);
        self.updated_at = now;
        Ok(removed)
    }

    fn find_status(&self, name: &str) -> Option<usize> {
        let key = name.trim().to_lowercase();
        self.status_effects.iter().position(|s| s.as_str() == key)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Retire the character. It stays in storage but no longer counts as the
    /// owner's active character in its scope.
    pub fn deactivate(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if !self.is_active {
            return Err(DomainError::invalid_state_transition(
                "Character is already inactive",
            ));
        }
        self.is_active = false;
        self.updated_at = now;
        Ok(())
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Re-check every invariant. Used after loading from storage.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(STARTING_LEVEL..=MAX_LEVEL).contains(&self.level) {
            return Err(DomainError::validation(format!(
                "Level must be between {} and {}",
                STARTING_LEVEL, MAX_LEVEL
            )));
        }
        self.attributes.validate()?;

        if !(0..=self.max_health()).contains(&self.current_health) {
            return Err(DomainError::validation(format!(
                "Health {} outside 0..={}",
                self.current_health,
                self.max_health()
            )));
        }

        for (i, record) in self.skills.iter().enumerate() {
            if !self.class.allows_skill(record.skill) {
                return Err(DomainError::validation(format!(
                    "{} is not a {} skill",
                    record.skill, self.class
                )));
            }
            if self.skills[..i].iter().any(|p| p.skill == record.skill) {
                return Err(DomainError::validation(format!(
                    "Duplicate skill record: {}",
                    record.skill
                )));
            }
        }

        if self.inventory.len() > MAX_INVENTORY_SIZE {
            return Err(DomainError::container_full(
                self.inventory.len(),
                MAX_INVENTORY_SIZE,
            ));
        }
        for item in &self.inventory {
            item.validate()?;
            if item.is_equipped() {
                return Err(DomainError::validation(format!(
                    "{} is in the inventory but flagged as equipped",
                    item.name()
                )));
            }
        }

        if self.equipment.len() > MAX_EQUIPMENT_SIZE {
            return Err(DomainError::container_full(
                self.equipment.len(),
                MAX_EQUIPMENT_SIZE,
            ));
        }
        for (i, item) in self.equipment.iter().enumerate() {
            item.validate()?;
            let slot = item.slot().ok_or_else(|| {
                DomainError::validation(format!("{} is equipped without a slot", item.name()))
            })?;
            if !item.is_equipped() {
                return Err(DomainError::validation(format!(
                    "{} is worn but not flagged as equipped",
                    item.name()
                )));
            }
            if self.equipment[..i].iter().any(|other| other.slot() == Some(slot)) {
                return Err(DomainError::validation(format!(
                    "More than one item in the {} slot",
                    slot
                )));
            }
        }

        for (i, status) in self.status_effects.iter().enumerate() {
            if self.status_effects[..i].contains(status) {
                return Err(DomainError::validation(format!(
                    "Duplicate status: {}",
                    status
                )));
            }
        }
        Ok(())
    }
}

/// Add `item` to `inventory`, merging into an unequipped stack with the same
/// properties. Same-named items that differ keep separate stacks. Checks
/// capacity before touching the vector.
fn stow(inventory: &mut Vec<Item>, item: Item) -> Result<ItemAdded, DomainError> {
    if inventory.len() >= MAX_INVENTORY_SIZE {
        return Err(DomainError::container_full(
            inventory.len(),
            MAX_INVENTORY_SIZE,
        ));
    }

    let existing = inventory
        .iter()
        .position(|stack| !stack.is_equipped() && stack.stacks_with(&item));
    match existing {
        Some(index) => {
            let stack = &mut inventory[index];
            let total = merged_quantity(stack.quantity(), item.quantity()).ok_or_else(|| {
                DomainError::ContainerFull {
                    current: stack.quantity().saturating_add(item.quantity()),
                    max: MAX_ITEM_QUANTITY,
                }
            })?;
            stack.set_quantity(total);
            Ok(ItemAdded::Stacked {
                name: stack.name().clone(),
                quantity: total,
            })
        }
        None => {
            let added = ItemAdded::NewStack {
                name: item.name().clone(),
                quantity: item.quantity(),
            };
            inventory.push(item);
            Ok(added)
        }
    }
}

// ============================================================================
// Serde Implementation
// ============================================================================

/// Storage format. The combat block is written for readers but only
/// `currentHealth` is read back; the rest is recomputed.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharacterWireFormat {
    id: CharacterId,
    owner: ActorId,
    scope: ScopeId,
    name: CharacterName,
    class: CharacterClass,
    background: Background,
    level: u8,
    experience: u64,
    gold: u64,
    attributes: Attributes,
    #[serde(default)]
    skills: Vec<SkillProficiency>,
    #[serde(default)]
    inventory: Vec<Item>,
    #[serde(default)]
    equipment: Vec<Item>,
    combat: CombatStats,
    #[serde(default)]
    status: Vec<StatusName>,
    #[serde(default = "default_true")]
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl Serialize for Character {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = CharacterWireFormat {
            id: self.id,
            owner: self.owner.clone(),
            scope: self.scope.clone(),
            name: self.name.clone(),
            class: self.class,
            background: self.background,
            level: self.level,
            experience: self.experience,
            gold: self.gold,
            attributes: self.attributes,
            skills: self.skills.clone(),
            inventory: self.inventory.clone(),
            equipment: self.equipment.clone(),
            combat: self.combat(),
            status: self.status_effects.clone(),
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Character {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = CharacterWireFormat::deserialize(deserializer)?;

        let character = Character {
            id: wire.id,
            owner: wire.owner,
            scope: wire.scope,
            name: wire.name,
            class: wire.class,
            background: wire.background,
            level: wire.level,
            experience: wire.experience,
            gold: wire.gold,
            attributes: wire.attributes,
            skills: wire.skills,
            inventory: wire.inventory,
            equipment: wire.equipment,
            current_health: wire.combat.current_health,
            status_effects: wire.status,
            is_active: wire.is_active,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        };
        character.validate().map_err(serde::de::Error::custom)?;
        Ok(character)
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Items: kinds, rarities, equipment slots, and the item record itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::types::CharacterClass;
use crate::value_objects::{ItemName, MAX_ITEM_QUANTITY};

/// Lowest value an item stat may carry (cursed items).
pub const MIN_ITEM_STAT: i32 = -5;
/// Highest value an item stat may carry.
pub const MAX_ITEM_STAT: i32 = 10;

const MIN_DESCRIPTION_LENGTH: usize = 10;
const MAX_DESCRIPTION_LENGTH: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemType {
    Weapon,
    Armor,
    Accessory,
    Consumable,
    Quest,
}

impl ItemType {
    /// Weapons, armor and accessories can be worn; everything else only
    /// lives in the bag.
    pub fn is_equippable(&self) -> bool {
        matches!(self, ItemType::Weapon | ItemType::Armor | ItemType::Accessory)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Weapon => "weapon",
            ItemType::Armor => "armor",
            ItemType::Accessory => "accessory",
            ItemType::Consumable => "consumable",
            ItemType::Quest => "quest",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weapon" => Ok(ItemType::Weapon),
            "armor" => Ok(ItemType::Armor),
            "accessory" => Ok(ItemType::Accessory),
            "consumable" => Ok(ItemType::Consumable),
            "quest" => Ok(ItemType::Quest),
            _ => Err(DomainError::parse(format!("Unknown item type: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemRarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythical,
}

impl ItemRarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemRarity::Common => "common",
            ItemRarity::Uncommon => "uncommon",
            ItemRarity::Rare => "rare",
            ItemRarity::Epic => "epic",
            ItemRarity::Legendary => "legendary",
            ItemRarity::Mythical => "mythical",
        }
    }
}

impl fmt::Display for ItemRarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named equipment position. A character holds at most one item per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EquipmentSlot {
    Head,
    Neck,
    Chest,
    Legs,
    Feet,
    MainHand,
    OffHand,
    Ring1,
    Ring2,
    Trinket1,
    Trinket2,
}

impl EquipmentSlot {
    pub fn all() -> &'static [EquipmentSlot] {
        &[
            EquipmentSlot::Head,
            EquipmentSlot::Neck,
            EquipmentSlot::Chest,
            EquipmentSlot::Legs,
            EquipmentSlot::Feet,
            EquipmentSlot::MainHand,
            EquipmentSlot::OffHand,
            EquipmentSlot::Ring1,
            EquipmentSlot::Ring2,
            EquipmentSlot::Trinket1,
            EquipmentSlot::Trinket2,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentSlot::Head => "head",
            EquipmentSlot::Neck => "neck",
            EquipmentSlot::Chest => "chest",
            EquipmentSlot::Legs => "legs",
            EquipmentSlot::Feet => "feet",
            EquipmentSlot::MainHand => "mainHand",
            EquipmentSlot::OffHand => "offHand",
            EquipmentSlot::Ring1 => "ring1",
            EquipmentSlot::Ring2 => "ring2",
            EquipmentSlot::Trinket1 => "trinket1",
            EquipmentSlot::Trinket2 => "trinket2",
        }
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combat stat block carried by an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStats {
    attack: i32,
    defense: i32,
    magic_power: i32,
}

impl ItemStats {
    pub fn new(attack: i32, defense: i32, magic_power: i32) -> Result<Self, DomainError> {
        let stats = Self {
            attack,
            defense,
            magic_power,
        };
        stats.validate()?;
        Ok(stats)
    }

    pub fn attack(&self) -> i32 {
        self.attack
    }

    pub fn defense(&self) -> i32 {
        self.defense
    }

    pub fn magic_power(&self) -> i32 {
        self.magic_power
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        for (label, value) in [
            ("attack", self.attack),
            ("defense", self.defense),
            ("magic power", self.magic_power),
        ] {
            if !(MIN_ITEM_STAT..=MAX_ITEM_STAT).contains(&value) {
                return Err(DomainError::validation(format!(
                    "Item {} must be between {} and {}",
                    label, MIN_ITEM_STAT, MAX_ITEM_STAT
                )));
            }
        }
        Ok(())
    }
}

/// An item stack owned by a character.
///
/// # Invariants
///
/// - `quantity` is within `1..=MAX_ITEM_QUANTITY`
/// - `equipped` is true only while the item sits in a character's equipment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    name: ItemName,
    item_type: ItemType,
    #[serde(default)]
    rarity: ItemRarity,
    #[serde(default)]
    required_level: u8,
    #[serde(default)]
    required_classes: Vec<CharacterClass>,
    #[serde(default)]
    slot: Option<EquipmentSlot>,
    #[serde(default)]
    stats: ItemStats,
    quantity: u32,
    #[serde(default)]
    equipped: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    value: u32,
}

impl Item {
    /// A single common item with no restrictions.
    pub fn new(name: ItemName, item_type: ItemType) -> Self {
        Self {
            name,
            item_type,
            rarity: ItemRarity::Common,
            required_level: 0,
            required_classes: Vec::new(),
            slot: None,
            stats: ItemStats::default(),
            quantity: 1,
            equipped: false,
            description: None,
            value: 0,
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    pub fn with_rarity(mut self, rarity: ItemRarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_required_level(mut self, level: u8) -> Self {
        self.required_level = level;
        self
    }

    pub fn with_required_classes(mut self, classes: impl IntoIterator<Item = CharacterClass>) -> Self {
        self.required_classes = classes.into_iter().collect();
        self
    }

    pub fn with_slot(mut self, slot: EquipmentSlot) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn with_stats(mut self, stats: ItemStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Result<Self, DomainError> {
        check_quantity(quantity)?;
        self.quantity = quantity;
        Ok(self)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Result<Self, DomainError> {
        let description = description.into().trim().to_string();
        let len = description.chars().count();
        if !(MIN_DESCRIPTION_LENGTH..=MAX_DESCRIPTION_LENGTH).contains(&len) {
            return Err(DomainError::validation(format!(
                "Item description must be between {} and {} characters",
                MIN_DESCRIPTION_LENGTH, MAX_DESCRIPTION_LENGTH
            )));
        }
        self.description = Some(description);
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn name(&self) -> &ItemName {
        &self.name
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    pub fn rarity(&self) -> ItemRarity {
        self.rarity
    }

    pub fn required_level(&self) -> u8 {
        self.required_level
    }

    pub fn required_classes(&self) -> &[CharacterClass] {
        &self.required_classes
    }

    pub fn slot(&self) -> Option<EquipmentSlot> {
        self.slot
    }

    pub fn stats(&self) -> &ItemStats {
        &self.stats
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn is_equipped(&self) -> bool {
        self.equipped
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    // =========================================================================
    // Crate-internal mutation (owned by the Character aggregate)
    // =========================================================================

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub(crate) fn set_equipped(&mut self, equipped: bool) {
        self.equipped = equipped;
    }

    /// Split `amount` units off into a new stack with the same properties.
    pub(crate) fn split(&self, amount: u32) -> Item {
        Item {
            quantity: amount,
            equipped: false,
            ..self.clone()
        }
    }

    /// True when `other` can merge into this stack: every property except
    /// quantity and the equipped flag matches.
    pub fn stacks_with(&self, other: &Item) -> bool {
        self.split(1) == other.split(1)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        check_quantity(self.quantity)?;
        self.stats.validate()
    }
}

fn check_quantity(quantity: u32) -> Result<(), DomainError> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(DomainError::validation(format!(
            "Item quantity must be between 1 and {}",
            MAX_ITEM_QUANTITY
        )));
    }
    Ok(())
}

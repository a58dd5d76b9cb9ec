//! Character classes and their static rule tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::types::{ItemType, Skill};
use crate::value_objects::{Attribute, Attributes};

/// One of the twelve playable classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
    Ranger,
    Paladin,
    Druid,
    Barbarian,
    Monk,
    Bard,
    Warlock,
    Sorcerer,
}

impl CharacterClass {
    pub fn all() -> &'static [CharacterClass] {
        &[
            CharacterClass::Warrior,
            CharacterClass::Mage,
            CharacterClass::Rogue,
            CharacterClass::Cleric,
            CharacterClass::Ranger,
            CharacterClass::Paladin,
            CharacterClass::Druid,
            CharacterClass::Barbarian,
            CharacterClass::Monk,
            CharacterClass::Bard,
            CharacterClass::Warlock,
            CharacterClass::Sorcerer,
        ]
    }

    /// Lowercase id used in storage and interaction ids (`class_warrior`).
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "warrior",
            CharacterClass::Mage => "mage",
            CharacterClass::Rogue => "rogue",
            CharacterClass::Cleric => "cleric",
            CharacterClass::Ranger => "ranger",
            CharacterClass::Paladin => "paladin",
            CharacterClass::Druid => "druid",
            CharacterClass::Barbarian => "barbarian",
            CharacterClass::Monk => "monk",
            CharacterClass::Bard => "bard",
            CharacterClass::Warlock => "warlock",
            CharacterClass::Sorcerer => "sorcerer",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Mage => "Mage",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Cleric => "Cleric",
            CharacterClass::Ranger => "Ranger",
            CharacterClass::Paladin => "Paladin",
            CharacterClass::Druid => "Druid",
            CharacterClass::Barbarian => "Barbarian",
            CharacterClass::Monk => "Monk",
            CharacterClass::Bard => "Bard",
            CharacterClass::Warlock => "Warlock",
            CharacterClass::Sorcerer => "Sorcerer",
        }
    }

    /// Starting attribute array seeded into a new draft.
    ///
    /// Every baseline stays within the point-buy ceiling and budget, so the
    /// player only ever has points left to spend, never to refund.
    pub fn baseline_attributes(&self) -> Attributes {
        let scores = match self {
            CharacterClass::Warrior => [15, 12, 14, 8, 10, 10],
            CharacterClass::Ranger => [12, 15, 12, 10, 14, 8],
            CharacterClass::Mage => [8, 12, 10, 15, 14, 12],
            CharacterClass::Paladin => [14, 10, 13, 8, 12, 14],
            CharacterClass::Druid => [10, 12, 12, 10, 15, 12],
            CharacterClass::Cleric => [12, 10, 12, 10, 15, 12],
            CharacterClass::Bard => [8, 12, 10, 12, 10, 15],
            CharacterClass::Warlock => [8, 12, 12, 13, 10, 15],
            CharacterClass::Sorcerer => [8, 12, 12, 12, 10, 15],
            CharacterClass::Rogue => [10, 15, 12, 12, 10, 12],
            CharacterClass::Monk => [12, 15, 12, 10, 13, 8],
            CharacterClass::Barbarian => [15, 12, 14, 8, 10, 8],
        };
        Attributes::from_scores(scores)
    }

    pub fn primary_attribute(&self) -> Attribute {
        match self {
            CharacterClass::Warrior | CharacterClass::Barbarian => Attribute::Strength,
            CharacterClass::Ranger | CharacterClass::Monk | CharacterClass::Rogue => {
                Attribute::Dexterity
            }
            CharacterClass::Mage => Attribute::Intelligence,
            CharacterClass::Cleric | CharacterClass::Druid => Attribute::Wisdom,
            CharacterClass::Paladin
            | CharacterClass::Bard
            | CharacterClass::Warlock
            | CharacterClass::Sorcerer => Attribute::Charisma,
        }
    }

    /// Skills this class may hold. Also the default proficiency list seeded
    /// during creation.
    pub fn skills(&self) -> &'static [Skill] {
        use Skill::*;
        match self {
            CharacterClass::Warrior => &[Athletics, Intimidation, Perception, Survival],
            CharacterClass::Mage => &[Arcana, History, Investigation, Medicine],
            CharacterClass::Ranger => &[AnimalHandling, Athletics, Nature, Stealth, Survival],
            CharacterClass::Cleric => &[Insight, Medicine, Persuasion, Religion],
            CharacterClass::Paladin => &[Athletics, Intimidation, Medicine, Persuasion],
            CharacterClass::Druid => &[AnimalHandling, Nature, Medicine, Survival],
            CharacterClass::Barbarian => &[Athletics, Intimidation, Nature, Survival],
            CharacterClass::Monk => &[Acrobatics, Athletics, Stealth, Insight],
            CharacterClass::Bard => &[Deception, Performance, Persuasion, SleightOfHand],
            CharacterClass::Warlock => &[Arcana, Deception, Intimidation, Persuasion],
            CharacterClass::Sorcerer => &[Arcana, Deception, Intimidation, Persuasion],
            CharacterClass::Rogue => &[Acrobatics, Deception, SleightOfHand, Stealth],
        }
    }

    pub fn allows_skill(&self, skill: Skill) -> bool {
        self.skills().contains(&skill)
    }

    /// Item kinds the class is trained to equip.
    pub fn equipment_kinds(&self) -> &'static [ItemType] {
        match self {
            CharacterClass::Warrior
            | CharacterClass::Ranger
            | CharacterClass::Cleric
            | CharacterClass::Paladin
            | CharacterClass::Barbarian
            | CharacterClass::Rogue => &[ItemType::Weapon, ItemType::Armor],
            CharacterClass::Mage
            | CharacterClass::Druid
            | CharacterClass::Monk
            | CharacterClass::Bard
            | CharacterClass::Warlock
            | CharacterClass::Sorcerer => &[ItemType::Weapon, ItemType::Accessory],
        }
    }

    /// Recommended minimum scores for the class.
    pub fn requirements(&self) -> &'static [(Attribute, i32)] {
        use Attribute::*;
        match self {
            CharacterClass::Warrior => &[(Strength, 13), (Constitution, 12)],
            CharacterClass::Mage => &[(Intelligence, 13), (Wisdom, 12)],
            CharacterClass::Ranger => &[(Dexterity, 13), (Constitution, 12)],
            CharacterClass::Cleric => &[(Wisdom, 13), (Constitution, 12)],
            CharacterClass::Paladin => &[(Strength, 12), (Charisma, 13)],
            CharacterClass::Druid => &[(Wisdom, 13), (Intelligence, 12)],
            CharacterClass::Barbarian => &[(Strength, 13), (Constitution, 13)],
            CharacterClass::Monk => &[(Dexterity, 13), (Wisdom, 12)],
            CharacterClass::Bard => &[(Charisma, 13), (Dexterity, 12)],
            CharacterClass::Warlock => &[(Charisma, 13), (Intelligence, 12)],
            CharacterClass::Sorcerer => &[(Charisma, 13), (Constitution, 12)],
            CharacterClass::Rogue => &[(Dexterity, 13), (Intelligence, 12)],
        }
    }

    /// Requirements the given scores fall short of, as `(attribute, minimum)`.
    pub fn unmet_requirements(&self, attributes: &Attributes) -> Vec<(Attribute, i32)> {
        self.requirements()
            .iter()
            .copied()
            .filter(|(attr, min)| attributes.get(*attr) < *min)
            .collect()
    }

    pub fn meets_requirements(&self, attributes: &Attributes) -> bool {
        self.unmet_requirements(attributes).is_empty()
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for CharacterClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|class| key.eq_ignore_ascii_case(class.as_str()))
            .ok_or_else(|| DomainError::parse(format!("Unknown class: {}", s)))
    }
}

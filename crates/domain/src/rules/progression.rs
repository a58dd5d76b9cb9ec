//! Progression formulas: leveling curve, health, and modifiers.
//!
//! Everything here is a pure function of its arguments.

use crate::types::{CharacterClass, Skill, SkillProficiency};
use crate::value_objects::{Attribute, Attributes};

/// Level cap.
pub const MAX_LEVEL: u8 = 20;

/// Level every new character starts at.
pub const STARTING_LEVEL: u8 = 1;

/// Base health gained per level before the constitution modifier.
const HEALTH_PER_LEVEL: i32 = 10;

/// Experience needed to reach each level, `⌊100 · 1.5^(level-1)⌋`.
/// Index is level - 1 (so level 1 = index 0).
const EXP_THRESHOLDS: [u64; MAX_LEVEL as usize] = [
    0,      // Level 1
    150,    // Level 2
    225,    // Level 3
    337,    // Level 4
    506,    // Level 5
    759,    // Level 6
    1139,   // Level 7
    1708,   // Level 8
    2562,   // Level 9
    3844,   // Level 10
    5766,   // Level 11
    8649,   // Level 12
    12974,  // Level 13
    19461,  // Level 14
    29192,  // Level 15
    43789,  // Level 16
    65684,  // Level 17
    98526,  // Level 18
    147789, // Level 19
    221683, // Level 20
];

/// Experience required to reach `level`.
///
/// Returns `None` beyond `MAX_LEVEL`: there is no next level to reach.
pub fn exp_for_level(level: u8) -> Option<u64> {
    match level {
        0 | 1 => Some(0),
        l if l <= MAX_LEVEL => Some(EXP_THRESHOLDS[usize::from(l) - 1]),
        _ => None,
    }
}

/// Highest level whose threshold `experience` has reached.
pub fn level_for_experience(experience: u64) -> u8 {
    (STARTING_LEVEL..=MAX_LEVEL)
        .take_while(|l| exp_for_level(*l).is_some_and(|needed| experience >= needed))
        .last()
        .unwrap_or(STARTING_LEVEL)
}

/// Attribute modifier, `⌊(value - 10) / 2⌋`.
pub fn attribute_modifier(value: i32) -> i32 {
    // Floor division, so 9 gives -1 rather than 0
    (value - 10).div_euclid(2)
}

/// Proficiency bonus for a level: +2 at level 1, one more every four levels.
pub fn proficiency_bonus(level: u8) -> i32 {
    2 + (i32::from(level.max(1)) - 1) / 4
}

/// Maximum health, `max(1, (10 + mod(con)) · level)`.
///
/// `level` is clamped into `1..=MAX_LEVEL`.
pub fn max_health(level: u8, constitution: i32) -> i32 {
    let level = i32::from(level.clamp(STARTING_LEVEL, MAX_LEVEL));
    ((HEALTH_PER_LEVEL + attribute_modifier(constitution)) * level).max(1)
}

/// Total modifier for a skill check.
///
/// A proficiency record for a different skill is ignored.
pub fn skill_modifier(
    skill: Skill,
    attributes: &Attributes,
    proficiency: Option<&SkillProficiency>,
    level: u8,
) -> i32 {
    let mut modifier = attribute_modifier(attributes.get(skill.base_attribute()));
    if let Some(record) = proficiency.filter(|p| p.skill == skill) {
        if record.is_proficient {
            modifier += proficiency_bonus(level);
        }
        modifier += record.bonus;
    }
    modifier
}

/// Same as [`skill_modifier`] but keyed by skill id; unknown ids score zero.
pub fn skill_modifier_by_id(
    skill_id: &str,
    attributes: &Attributes,
    proficiency: Option<&SkillProficiency>,
    level: u8,
) -> i32 {
    skill_id
        .parse::<Skill>()
        .map(|skill| skill_modifier(skill, attributes, proficiency, level))
        .unwrap_or(0)
}

/// Class-specific bonus on top of the primary attribute modifier.
pub fn class_bonus(class: CharacterClass, attributes: &Attributes) -> i32 {
    let base = attribute_modifier(attributes.get(class.primary_attribute()));
    let extra = match class {
        CharacterClass::Warrior => 2,
        CharacterClass::Mage => 1,
        CharacterClass::Ranger if attributes.dexterity() >= 15 => 1,
        CharacterClass::Barbarian if attributes.constitution() >= 15 => 1,
        _ => 0,
    };
    base + extra
}

/// Same as [`class_bonus`] but keyed by class id; unknown ids score zero.
pub fn class_bonus_by_id(class_id: &str, attributes: &Attributes) -> i32 {
    class_id
        .parse::<CharacterClass>()
        .map(|class| class_bonus(class, attributes))
        .unwrap_or(0)
}

/// Proficiency bonus plus the primary attribute modifier.
pub fn attack_bonus(class: CharacterClass, level: u8, attributes: &Attributes) -> i32 {
    proficiency_bonus(level) + attribute_modifier(attributes.get(class.primary_attribute()))
}

pub fn armor_class(level: u8, attributes: &Attributes) -> i32 {
    10 + attribute_modifier(attributes.get(Attribute::Dexterity)) + i32::from(level) / 5
}

pub fn initiative(level: u8, attributes: &Attributes) -> i32 {
    attribute_modifier(attributes.get(Attribute::Dexterity)) + i32::from(level) / 4
}

//! Shared builders for engine tests.

use chrono::{DateTime, TimeZone, Utc};
use sagaforge_domain::{
    ActorId, Adjustment, Attribute, Background, Character, CharacterClass, CharacterId,
    CharacterName, CreationSession, DraftSeed, ScopeId, WizardEvent,
};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
}

pub fn seed(scope: &str, name: &str) -> DraftSeed {
    DraftSeed::new(ScopeId::new(scope), CharacterName::new(name).unwrap())
}

/// Wizard events that take a fresh session all the way to `Confirm` as a
/// warrior (baseline spends 25 of 27 points; wis and cha take the rest).
pub fn warrior_events() -> Vec<WizardEvent> {
    vec![
        WizardEvent::ClassChosen(CharacterClass::Warrior),
        WizardEvent::AdjustAttribute {
            attribute: Attribute::Wisdom,
            adjustment: Adjustment::Increase,
        },
        WizardEvent::AdjustAttribute {
            attribute: Attribute::Charisma,
            adjustment: Adjustment::Increase,
        },
        WizardEvent::ConfirmAttributes,
        WizardEvent::BackgroundChosen(Background::Commoner),
        WizardEvent::ConfirmSkills,
    ]
}

/// A freshly created level-1 warrior.
pub fn character(owner: &str, scope: &str) -> Character {
    let mut session = CreationSession::new(ActorId::new(owner), seed(scope, "Brakka"));
    for event in warrior_events() {
        session.apply(&event).unwrap();
    }
    session.draft().build(CharacterId::new(), now()).unwrap()
}

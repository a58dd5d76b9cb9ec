//! Creation session - the character creation wizard state machine
//!
//! ```text
//! ClassSelect -> AttributeAllocate -> BackgroundSelect -> SkillSelect -> Confirm -> Complete
//! ```
//!
//! [`CreationSession::transition`] is a pure function of the current state
//! and one event: it either rejects the event (state untouched) or returns
//! the next step, the updated draft, and an [`Effect`] for the caller to
//! carry out. `Finalize` does not move to `Complete` by itself; the caller
//! persists the draft and then calls [`CreationSession::complete`], so a
//! failed write leaves the session in `Confirm` and the player can retry.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::draft::{CharacterDraft, DraftSeed};
use super::event::{Adjustment, WizardEvent};
use crate::error::DomainError;
use crate::ids::ActorId;
use crate::types::{Background, CharacterClass, SkillProficiency};
use crate::value_objects::{Attribute, Attributes, CharacterName};

/// Wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationStep {
    ClassSelect,
    AttributeAllocate,
    BackgroundSelect,
    SkillSelect,
    Confirm,
    Complete,
}

impl CreationStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreationStep::ClassSelect => "class_select",
            CreationStep::AttributeAllocate => "attribute_allocate",
            CreationStep::BackgroundSelect => "background_select",
            CreationStep::SkillSelect => "skill_select",
            CreationStep::Confirm => "confirm",
            CreationStep::Complete => "complete",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CreationStep::Complete)
    }
}

impl fmt::Display for CreationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a session for the transport to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub step: CreationStep,
    pub name: CharacterName,
    pub class: Option<CharacterClass>,
    pub attributes: Attributes,
    pub remaining_points: i32,
    pub background: Option<Background>,
    pub skills: Vec<SkillProficiency>,
    /// Class minimums the current scores miss. Advisory only.
    pub unmet_requirements: Vec<(Attribute, i32)>,
}

impl SessionView {
    fn of(step: CreationStep, draft: &CharacterDraft) -> Self {
        let attributes = draft.budget().attributes();
        Self {
            step,
            name: draft.name().clone(),
            class: draft.class(),
            attributes,
            remaining_points: draft.budget().remaining(),
            background: draft.background(),
            skills: draft.skills().to_vec(),
            unmet_requirements: draft
                .class()
                .map(|class| class.unmet_requirements(&attributes))
                .unwrap_or_default(),
        }
    }
}

/// What the caller must do after an accepted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show the updated session
    Render(SessionView),
    /// Store this draft, then call [`CreationSession::complete`]
    Persist(CharacterDraft),
}

/// Result of the pure transition function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: CreationStep,
    pub draft: CharacterDraft,
    pub effect: Effect,
}

/// One actor's run through the creation wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationSession {
    step: CreationStep,
    draft: CharacterDraft,
}

impl CreationSession {
    pub fn new(owner: ActorId, seed: DraftSeed) -> Self {
        Self {
            step: CreationStep::ClassSelect,
            draft: CharacterDraft::new(owner, seed),
        }
    }

    pub fn step(&self) -> CreationStep {
        self.step
    }

    pub fn draft(&self) -> &CharacterDraft {
        &self.draft
    }

    pub fn owner(&self) -> &ActorId {
        self.draft.owner()
    }

    pub fn is_complete(&self) -> bool {
        self.step.is_terminal()
    }

    pub fn view(&self) -> SessionView {
        SessionView::of(self.step, &self.draft)
    }

    /// Compute the outcome of `event` without changing the session.
    pub fn transition(&self, event: &WizardEvent) -> Result<Transition, DomainError> {
        use CreationStep::*;

        let mut draft = self.draft.clone();
        let next = match (self.step, *event) {
            (ClassSelect, WizardEvent::ClassChosen(class)) => {
                draft.choose_class(class)?;
                AttributeAllocate
            }
            (
                AttributeAllocate,
                WizardEvent::AdjustAttribute {
                    attribute,
                    adjustment,
                },
            ) => {
                match adjustment {
                    Adjustment::Increase => draft.budget_mut().increase(attribute)?,
                    Adjustment::Decrease => draft.budget_mut().decrease(attribute)?,
                }
                AttributeAllocate
            }
            (AttributeAllocate, WizardEvent::ConfirmAttributes) => {
                draft.budget().ensure_fully_spent()?;
                BackgroundSelect
            }
            (BackgroundSelect, WizardEvent::BackgroundChosen(background)) => {
                draft.choose_background(background)?;
                SkillSelect
            }
            (SkillSelect, WizardEvent::ToggleSkill(skill)) => {
                draft.toggle_skill(skill)?;
                SkillSelect
            }
            (SkillSelect, WizardEvent::ConfirmSkills) => Confirm,
            (Confirm, WizardEvent::Finalize) => {
                return Ok(Transition {
                    next: Confirm,
                    effect: Effect::Persist(draft.clone()),
                    draft,
                });
            }
            (Complete, _) => {
                return Err(DomainError::invalid_state_transition(
                    "Character creation is already complete",
                ))
            }
            (step, event) => {
                return Err(DomainError::invalid_state_transition(format!(
                    "{} is not accepted during {}",
                    event.name(),
                    step
                )))
            }
        };

        let view = SessionView::of(next, &draft);
        Ok(Transition {
            next,
            draft,
            effect: Effect::Render(view),
        })
    }

    /// Apply `event`, committing the transition on success.
    pub fn apply(&mut self, event: &WizardEvent) -> Result<Effect, DomainError> {
        let Transition {
            next,
            draft,
            effect,
        } = self.transition(event)?;
        self.step = next;
        self.draft = draft;
        Ok(effect)
    }

    /// Mark the session complete once the draft has been stored.
    pub fn complete(&mut self) -> Result<(), DomainError> {
        if self.step != CreationStep::Confirm {
            return Err(DomainError::invalid_state_transition(format!(
                "Cannot complete from {}",
                self.step
            )));
        }
        self.step = CreationStep::Complete;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ScopeId;
    use crate::types::Skill;

    fn session() -> CreationSession {
        CreationSession::new(
            ActorId::new("actor-1"),
            DraftSeed::new(ScopeId::new("guild-1"), CharacterName::new("Ysolde").unwrap()),
        )
    }

    fn adjust(attribute: Attribute, adjustment: Adjustment) -> WizardEvent {
        WizardEvent::AdjustAttribute {
            attribute,
            adjustment,
        }
    }

    /// Drive a warrior session to the Confirm step.
    fn warrior_at_confirm() -> CreationSession {
        let mut s = session();
        s.apply(&WizardEvent::ClassChosen(CharacterClass::Warrior)).unwrap();
        s.apply(&adjust(Attribute::Wisdom, Adjustment::Increase)).unwrap();
        s.apply(&adjust(Attribute::Charisma, Adjustment::Increase)).unwrap();
        s.apply(&WizardEvent::ConfirmAttributes).unwrap();
        s.apply(&WizardEvent::BackgroundChosen(Background::Noble)).unwrap();
        s.apply(&WizardEvent::ToggleSkill(Skill::Athletics)).unwrap();
        s.apply(&WizardEvent::ConfirmSkills).unwrap();
        s
    }

    mod happy_path {
        use super::*;

        #[test]
        fn walks_every_step() {
            let mut s = warrior_at_confirm();
            assert_eq!(s.step(), CreationStep::Confirm);

            let effect = s.apply(&WizardEvent::Finalize).unwrap();
            let Effect::Persist(draft) = effect else {
                panic!("finalize should ask for persistence");
            };
            assert_eq!(s.step(), CreationStep::Confirm);
            assert_eq!(draft.class(), Some(CharacterClass::Warrior));

            s.complete().unwrap();
            assert!(s.is_complete());
        }

        #[test]
        fn class_choice_seeds_baseline_and_renders() {
            let mut s = session();
            let effect = s
                .apply(&WizardEvent::ClassChosen(CharacterClass::Warrior))
                .unwrap();
            let Effect::Render(view) = effect else {
                panic!("expected a render");
            };
            assert_eq!(view.step, CreationStep::AttributeAllocate);
            assert_eq!(view.attributes, CharacterClass::Warrior.baseline_attributes());
            assert_eq!(view.remaining_points, 2);
        }

        #[test]
        fn skill_toggle_flips_seeded_record() {
            let mut s = warrior_at_confirm();
            let record = s
                .draft()
                .skills()
                .iter()
                .find(|p| p.skill == Skill::Athletics)
                .copied()
                .unwrap();
            assert!(record.is_proficient);
            assert_eq!(s.draft().skills().len(), 4);
            assert!(s.apply(&WizardEvent::ToggleSkill(Skill::Athletics)).is_err());
        }
    }

    mod guards {
        use super::*;

        #[test]
        fn confirm_attributes_requires_spent_budget() {
            let mut s = session();
            s.apply(&WizardEvent::ClassChosen(CharacterClass::Warrior)).unwrap();
            let before = s.clone();
            let err = s.apply(&WizardEvent::ConfirmAttributes).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
            assert_eq!(s, before);
        }

        #[test]
        fn rejected_adjustment_leaves_state() {
            let mut s = session();
            s.apply(&WizardEvent::ClassChosen(CharacterClass::Mage)).unwrap();
            // Mage baseline spends all 27 points
            let before = s.clone();
            assert!(s.apply(&adjust(Attribute::Strength, Adjustment::Increase)).is_err());
            assert_eq!(s, before);
            // str is at the floor
            assert!(s.apply(&adjust(Attribute::Strength, Adjustment::Decrease)).is_err());
            s.apply(&adjust(Attribute::Intelligence, Adjustment::Decrease)).unwrap();
            assert_eq!(s.view().remaining_points, 3);
        }

        #[test]
        fn foreign_skill_rejected() {
            let mut s = warrior_at_confirm();
            let mut s2 = session();
            s2.apply(&WizardEvent::ClassChosen(CharacterClass::Warrior)).unwrap();
            s2.apply(&adjust(Attribute::Wisdom, Adjustment::Increase)).unwrap();
            s2.apply(&adjust(Attribute::Wisdom, Adjustment::Increase)).unwrap();
            s2.apply(&WizardEvent::ConfirmAttributes).unwrap();
            s2.apply(&WizardEvent::BackgroundChosen(Background::Wild)).unwrap();
            let err = s2.apply(&WizardEvent::ToggleSkill(Skill::Arcana)).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
            assert_eq!(s2.step(), CreationStep::SkillSelect);
            // Confirm step ignores skill toggles
            assert!(s
                .apply(&WizardEvent::ToggleSkill(Skill::Athletics))
                .unwrap_err()
                .is_protocol());
        }
    }

    mod protocol {
        use super::*;

        #[test]
        fn out_of_order_events_are_protocol_errors() {
            let mut s = session();
            for event in [
                WizardEvent::Finalize,
                WizardEvent::ConfirmAttributes,
                WizardEvent::BackgroundChosen(Background::Noble),
                WizardEvent::ConfirmSkills,
            ] {
                let err = s.apply(&event).unwrap_err();
                assert!(err.is_protocol(), "{event:?}");
            }
            assert_eq!(s.step(), CreationStep::ClassSelect);
        }

        #[test]
        fn class_cannot_be_rechosen() {
            let mut s = session();
            s.apply(&WizardEvent::ClassChosen(CharacterClass::Bard)).unwrap();
            assert!(s
                .apply(&WizardEvent::ClassChosen(CharacterClass::Monk))
                .unwrap_err()
                .is_protocol());
        }

        #[test]
        fn complete_only_from_confirm() {
            let mut s = session();
            assert!(s.complete().is_err());
            let mut s = warrior_at_confirm();
            s.complete().unwrap();
            assert!(s.complete().is_err());
            assert!(s.apply(&WizardEvent::Finalize).unwrap_err().is_protocol());
        }

        #[test]
        fn transition_does_not_mutate() {
            let s = warrior_at_confirm();
            let t = s.transition(&WizardEvent::Finalize).unwrap();
            assert_eq!(t.next, CreationStep::Confirm);
            assert_eq!(s.step(), CreationStep::Confirm);
        }
    }

    mod view {
        use super::*;

        #[test]
        fn reports_unmet_requirements() {
            let mut s = session();
            s.apply(&WizardEvent::ClassChosen(CharacterClass::Druid)).unwrap();
            assert_eq!(
                s.view().unmet_requirements,
                vec![(Attribute::Intelligence, 12)]
            );
            s.apply(&adjust(Attribute::Intelligence, Adjustment::Increase)).unwrap();
            assert_eq!(s.view().remaining_points, 0);
        }

        #[test]
        fn serializes_for_transport() {
            let json = serde_json::to_value(session().view()).unwrap();
            assert_eq!(json["step"], "class_select");
            assert_eq!(json["remainingPoints"], 27);
            assert!(json["class"].is_null());
        }
    }
}

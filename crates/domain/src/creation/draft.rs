//! The in-progress character assembled by a creation session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregates::{Character, NewCharacter};
use crate::error::DomainError;
use crate::ids::{ActorId, CharacterId, ScopeId};
use crate::rules::AttributeBudget;
use crate::types::{Background, CharacterClass, Skill, SkillProficiency};
use crate::value_objects::CharacterName;

/// What a transport knows when a player starts the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSeed {
    pub scope: ScopeId,
    pub name: CharacterName,
}

impl DraftSeed {
    pub fn new(scope: ScopeId, name: CharacterName) -> Self {
        Self { scope, name }
    }
}

/// Not-yet-persisted character state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDraft {
    owner: ActorId,
    seed: DraftSeed,
    class: Option<CharacterClass>,
    budget: AttributeBudget,
    background: Option<Background>,
    skills: Vec<SkillProficiency>,
}

impl CharacterDraft {
    pub fn new(owner: ActorId, seed: DraftSeed) -> Self {
        Self {
            owner,
            seed,
            class: None,
            budget: AttributeBudget::new(),
            background: None,
            skills: Vec::new(),
        }
    }

    pub fn owner(&self) -> &ActorId {
        &self.owner
    }

    pub fn scope(&self) -> &ScopeId {
        &self.seed.scope
    }

    pub fn name(&self) -> &CharacterName {
        &self.seed.name
    }

    pub fn class(&self) -> Option<CharacterClass> {
        self.class
    }

    pub fn budget(&self) -> &AttributeBudget {
        &self.budget
    }

    pub fn background(&self) -> Option<Background> {
        self.background
    }

    pub fn skills(&self) -> &[SkillProficiency] {
        &self.skills
    }

    // =========================================================================
    // Step mutations (driven by CreationSession)
    // =========================================================================

    /// Set the class and reseed attributes from its baseline.
    pub(crate) fn choose_class(&mut self, class: CharacterClass) -> Result<(), DomainError> {
        self.budget = AttributeBudget::from_attributes(class.baseline_attributes())?;
        self.class = Some(class);
        self.skills.clear();
        Ok(())
    }

    pub(crate) fn budget_mut(&mut self) -> &mut AttributeBudget {
        &mut self.budget
    }

    /// Set the background and seed one (non-proficient) record per class skill.
    pub(crate) fn choose_background(
        &mut self,
        background: Background,
    ) -> Result<(), DomainError> {
        let class = self.require_class()?;
        self.background = Some(background);
        self.skills = class
            .skills()
            .iter()
            .copied()
            .map(SkillProficiency::new)
            .collect();
        Ok(())
    }

    /// Flip proficiency in a class skill, adding its record if absent.
    /// Returns the new proficiency flag.
    pub(crate) fn toggle_skill(&mut self, skill: Skill) -> Result<bool, DomainError> {
        let class = self.require_class()?;
        if !class.allows_skill(skill) {
            return Err(DomainError::validation(format!(
                "{} is not available to a {}",
                skill, class
            )));
        }
        match self.skills.iter_mut().find(|p| p.skill == skill) {
            Some(record) => {
                record.is_proficient = !record.is_proficient;
                Ok(record.is_proficient)
            }
            None => {
                self.skills.push(SkillProficiency::proficient(skill));
                Ok(true)
            }
        }
    }

    fn require_class(&self) -> Result<CharacterClass, DomainError> {
        self.class
            .ok_or_else(|| DomainError::invalid_state_transition("No class chosen yet"))
    }

    // =========================================================================
    // Completion
    // =========================================================================

    /// Turn the draft into a level-1 character.
    ///
    /// # Errors
    ///
    /// Fails if class or background are missing, or if attribute points are
    /// left unspent.
    pub fn build(&self, id: CharacterId, now: DateTime<Utc>) -> Result<Character, DomainError> {
        let class = self.require_class()?;
        let background = self
            .background
            .ok_or_else(|| DomainError::invalid_state_transition("No background chosen yet"))?;
        self.budget.ensure_fully_spent()?;

        Character::create(
            NewCharacter {
                id,
                owner: self.owner.clone(),
                scope: self.seed.scope.clone(),
                name: self.seed.name.clone(),
                class,
                background,
                attributes: self.budget.attributes(),
                skills: self.skills.clone(),
            },
            now,
        )
    }
}

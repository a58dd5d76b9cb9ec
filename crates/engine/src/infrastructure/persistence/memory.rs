//! In-memory character storage for development and testing.
//!
//! Characters are kept as JSON documents so every load goes through the same
//! wire format (and validation) a real database adapter would use. Nothing is
//! persisted across restarts.

use std::collections::HashMap;

use async_trait::async_trait;
use sagaforge_domain::{ActorId, Character, CharacterId, ScopeId};
use tokio::sync::RwLock;

use crate::infrastructure::ports::{CharacterRepo, RepoError};

struct StoredCharacter {
    owner: ActorId,
    scope: ScopeId,
    active: bool,
    document: String,
}

impl StoredCharacter {
    fn encode(character: &Character) -> Result<Self, RepoError> {
        let document = serde_json::to_string(character).map_err(RepoError::serialization)?;
        Ok(Self {
            owner: character.owner().clone(),
            scope: character.scope().clone(),
            active: character.is_active(),
            document,
        })
    }

    fn decode(&self) -> Result<Character, RepoError> {
        serde_json::from_str(&self.document).map_err(RepoError::serialization)
    }

    fn is_active_for(&self, owner: &ActorId, scope: &ScopeId) -> bool {
        self.active && &self.owner == owner && &self.scope == scope
    }
}

/// Character storage backed by a map behind an async lock.
#[derive(Default)]
pub struct InMemoryCharacterRepo {
    characters: RwLock<HashMap<CharacterId, StoredCharacter>>,
}

impl InMemoryCharacterRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.characters.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.characters.read().await.is_empty()
    }
}

#[async_trait]
impl CharacterRepo for InMemoryCharacterRepo {
    async fn create(&self, character: &Character) -> Result<CharacterId, RepoError> {
        let stored = StoredCharacter::encode(character)?;
        let mut characters = self.characters.write().await;

        if characters.contains_key(&character.id()) {
            return Err(RepoError::constraint(format!(
                "character {} already exists",
                character.id()
            )));
        }
        if stored.active
            && characters
                .values()
                .any(|c| c.is_active_for(&stored.owner, &stored.scope))
        {
            return Err(RepoError::constraint(format!(
                "{} already has an active character in {}",
                stored.owner, stored.scope
            )));
        }

        characters.insert(character.id(), stored);
        tracing::debug!(character_id = %character.id(), "Character created");
        Ok(character.id())
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        let stored = StoredCharacter::encode(character)?;
        let mut characters = self.characters.write().await;

        if !characters.contains_key(&character.id()) {
            return Err(RepoError::not_found("Character", character.id()));
        }
        if stored.active
            && characters.iter().any(|(id, c)| {
                *id != character.id() && c.is_active_for(&stored.owner, &stored.scope)
            })
        {
            return Err(RepoError::constraint(format!(
                "{} already has an active character in {}",
                stored.owner, stored.scope
            )));
        }

        characters.insert(character.id(), stored);
        Ok(())
    }

    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        let characters = self.characters.read().await;
        characters.get(&id).map(StoredCharacter::decode).transpose()
    }

    async fn find_active(
        &self,
        owner: &ActorId,
        scope: &ScopeId,
    ) -> Result<Option<Character>, RepoError> {
        let characters = self.characters.read().await;
        characters
            .values()
            .find(|c| c.is_active_for(owner, scope))
            .map(StoredCharacter::decode)
            .transpose()
    }

    async fn list_in_scope(&self, scope: &ScopeId) -> Result<Vec<Character>, RepoError> {
        let characters = self.characters.read().await;
        let mut found = characters
            .values()
            .filter(|c| &c.scope == scope)
            .map(StoredCharacter::decode)
            .collect::<Result<Vec<_>, _>>()?;
        found.sort_by_key(|c| c.created_at());
        Ok(found)
    }
}

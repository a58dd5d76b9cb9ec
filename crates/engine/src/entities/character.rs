//! Character entity operations.

use std::sync::Arc;

use sagaforge_domain::{self as domain, ActorId, CharacterId, ScopeId};

use crate::infrastructure::ports::{CharacterRepo, RepoError};

/// Character storage operations used by the wizard and gameplay use cases.
pub struct Character {
    repo: Arc<dyn CharacterRepo>,
}

impl Character {
    pub fn new(repo: Arc<dyn CharacterRepo>) -> Self {
        Self { repo }
    }

    // =========================================================================
    // CRUD
    // =========================================================================

    pub async fn create(&self, character: &domain::Character) -> Result<CharacterId, RepoError> {
        self.repo.create(character).await
    }

    pub async fn get(&self, id: CharacterId) -> Result<Option<domain::Character>, RepoError> {
        self.repo.get(id).await
    }

    pub async fn save(&self, character: &domain::Character) -> Result<(), RepoError> {
        self.repo.save(character).await
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn find_active(
        &self,
        owner: &ActorId,
        scope: &ScopeId,
    ) -> Result<Option<domain::Character>, RepoError> {
        self.repo.find_active(owner, scope).await
    }

    pub async fn has_active(&self, owner: &ActorId, scope: &ScopeId) -> Result<bool, RepoError> {
        Ok(self.repo.find_active(owner, scope).await?.is_some())
    }

    pub async fn list_in_scope(&self, scope: &ScopeId) -> Result<Vec<domain::Character>, RepoError> {
        self.repo.list_in_scope(scope).await
    }
}

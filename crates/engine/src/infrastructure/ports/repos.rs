//! Repository port traits for character storage.

use async_trait::async_trait;
use sagaforge_domain::{ActorId, Character, CharacterId, ScopeId};

use super::error::RepoError;

// =============================================================================
// Character Storage
// =============================================================================

/// Persistence gateway for characters.
///
/// At most one active character may exist per (owner, scope); `create`
/// reports a second one as `RepoError::ConstraintViolation`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn create(&self, character: &Character) -> Result<CharacterId, RepoError>;
    async fn save(&self, character: &Character) -> Result<(), RepoError>;
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;

    // Queries
    async fn find_active(
        &self,
        owner: &ActorId,
        scope: &ScopeId,
    ) -> Result<Option<Character>, RepoError>;
    async fn list_in_scope(&self, scope: &ScopeId) -> Result<Vec<Character>, RepoError>;
}

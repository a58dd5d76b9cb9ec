//! Character operation errors.

use sagaforge_domain::{ActorId, DomainError, ScopeId};

use crate::infrastructure::ports::RepoError;

/// Errors that can occur during gameplay operations on a character.
#[derive(Debug, thiserror::Error)]
pub enum CharacterOpError {
    #[error("{actor} has no active character in {scope}")]
    NotFound { actor: ActorId, scope: ScopeId },
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

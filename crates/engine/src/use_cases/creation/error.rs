//! Character creation errors.

use sagaforge_domain::DomainError;

use crate::infrastructure::ports::RepoError;

/// How a transport should treat a failed wizard request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The player broke a rule; show the message and let them retry.
    Validation,
    /// The request does not fit the current session state.
    Protocol,
    /// Storage failed; log it, show a generic message.
    Collaborator,
    /// The interaction payload itself is broken.
    Malformed,
}

/// Errors that can occur while driving the creation wizard.
#[derive(Debug, thiserror::Error)]
pub enum CreationError {
    #[error(transparent)]
    Rejected(DomainError),
    #[error("You have no character creation in progress")]
    NoActiveSession,
    #[error("You already have a character creation in progress")]
    SessionAlreadyActive,
    #[error("You already have a character here")]
    CharacterExists,
    #[error("Your character creation was started somewhere else")]
    ScopeMismatch,
    #[error("Malformed interaction: {0}")]
    Malformed(String),
    #[error("Repository error: {0}")]
    Persistence(#[from] RepoError),
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Protocol => "protocol",
            Self::Collaborator => "collaborator",
            Self::Malformed => "malformed",
        }
    }
}

impl CreationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Rejected(e) if e.is_protocol() => ErrorKind::Protocol,
            Self::Rejected(_) => ErrorKind::Validation,
            Self::NoActiveSession
            | Self::SessionAlreadyActive
            | Self::CharacterExists
            | Self::ScopeMismatch => ErrorKind::Protocol,
            Self::Malformed(_) => ErrorKind::Malformed,
            Self::Persistence(_) => ErrorKind::Collaborator,
        }
    }

    /// Text safe to show the player.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Collaborator => {
                "Something went wrong saving your character. Please try again.".to_string()
            }
            ErrorKind::Malformed => "That action could not be understood.".to_string(),
            ErrorKind::Validation | ErrorKind::Protocol => self.to_string(),
        }
    }
}

impl From<DomainError> for CreationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Parse(msg) => Self::Malformed(msg),
            other => Self::Rejected(other),
        }
    }
}

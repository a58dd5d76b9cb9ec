//! Interaction requests as delivered by a chat transport.

use sagaforge_domain::{ActorId, ScopeId, WizardEvent};
use serde::{Deserialize, Serialize};

use super::error::CreationError;

/// One button press or menu pick.
///
/// Unknown body fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub actor_id: ActorId,
    pub scope_id: ScopeId,
    pub event_id: String,
}

impl Interaction {
    pub fn new(actor_id: ActorId, scope_id: ScopeId, event_id: impl Into<String>) -> Self {
        Self {
            actor_id,
            scope_id,
            event_id: event_id.into(),
        }
    }

    /// Decode a JSON interaction body.
    pub fn from_json(body: &str) -> Result<Self, CreationError> {
        serde_json::from_str(body).map_err(|e| CreationError::Malformed(e.to_string()))
    }

    pub fn event(&self) -> Result<WizardEvent, CreationError> {
        parse_event(&self.event_id)
    }
}

/// Parse an interaction id into a wizard event.
///
/// Ids of an unknown shape are `Malformed`; well-shaped ids naming an unknown
/// class, background, skill or attribute are `Rejected`.
pub fn parse_event(event_id: &str) -> Result<WizardEvent, CreationError> {
    WizardEvent::parse(event_id).map_err(CreationError::from)
}

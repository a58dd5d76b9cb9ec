//! Character creation use cases.
//!
//! [`SessionRegistry`] is the only way into the creation wizard. It owns the
//! actor → session table, serializes events per session, and hands finished
//! drafts to character storage.

mod error;
mod interaction;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sagaforge_domain::{
    ActorId, Character, CharacterDraft, CharacterId, CreationSession, DraftSeed, Effect, ScopeId,
    SessionView, WizardEvent,
};

use crate::entities;
use crate::infrastructure::ports::{ClockPort, RepoError};
use crate::stores::{CreationSessionStore, SessionSlot, SharedSlot};

pub use error::{CreationError, ErrorKind};
pub use interaction::{parse_event, Interaction};

/// What a successfully dispatched event produced.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The session moved (or stayed) and should be re-rendered.
    Updated(SessionView),
    /// The character was stored and the session is gone.
    Completed(Box<Character>),
}

/// Owns every in-progress creation session.
pub struct SessionRegistry {
    sessions: CreationSessionStore,
    characters: Arc<entities::Character>,
    clock: Arc<dyn ClockPort>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new(
        characters: Arc<entities::Character>,
        clock: Arc<dyn ClockPort>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            sessions: CreationSessionStore::new(),
            characters,
            clock,
            idle_timeout,
        }
    }

    /// Open a session for `actor`.
    ///
    /// Fails when the actor already has a session, or already owns an active
    /// character in the seed's scope.
    pub async fn start(&self, actor: ActorId, seed: DraftSeed) -> Result<SessionView, CreationError> {
        if self.sessions.contains(&actor) {
            return Err(CreationError::SessionAlreadyActive);
        }
        if self.characters.has_active(&actor, &seed.scope).await? {
            tracing::debug!(actor = %actor, scope = %seed.scope, "Start refused: character exists");
            return Err(CreationError::CharacterExists);
        }

        let scope = seed.scope.clone();
        let session = CreationSession::new(actor.clone(), seed);
        let view = session.view();
        if self
            .sessions
            .insert_new(actor.clone(), session, self.clock.now())
            .is_none()
        {
            return Err(CreationError::SessionAlreadyActive);
        }

        tracing::info!(actor = %actor, scope = %scope, "Character creation started");
        Ok(view)
    }

    /// Feed one event to the actor's session.
    ///
    /// A rejected event leaves the session untouched. `Finalize` stores the
    /// character and removes the session in the same critical section; if
    /// storage fails the session stays at the confirm step and `Finalize` may
    /// be retried.
    pub async fn dispatch(
        &self,
        actor: &ActorId,
        event: WizardEvent,
    ) -> Result<DispatchOutcome, CreationError> {
        self.dispatch_in(actor, None, event).await
    }

    async fn dispatch_in(
        &self,
        actor: &ActorId,
        scope: Option<&ScopeId>,
        event: WizardEvent,
    ) -> Result<DispatchOutcome, CreationError> {
        let slot = self
            .sessions
            .get(actor)
            .ok_or(CreationError::NoActiveSession)?;
        let mut guard = slot.lock().await;
        if guard.closed {
            return Err(CreationError::NoActiveSession);
        }
        if let Some(scope) = scope {
            let session_scope = guard.session.draft().scope();
            if scope != session_scope {
                tracing::debug!(
                    actor = %actor,
                    scope = %scope,
                    session_scope = %session_scope,
                    "Wizard event from another scope"
                );
                return Err(CreationError::ScopeMismatch);
            }
        }

        let now = self.clock.now();
        let effect = guard.session.apply(&event).map_err(|e| {
            tracing::debug!(
                actor = %actor,
                step = ?guard.session.step(),
                event = event.name(),
                error = %e,
                "Wizard event rejected"
            );
            CreationError::from(e)
        });
        guard.touch(now);

        match effect? {
            Effect::Render(view) => Ok(DispatchOutcome::Updated(view)),
            Effect::Persist(draft) => {
                let character = self.persist(&draft, now).await.map_err(|e| {
                    tracing::error!(actor = %actor, error = %e, "Failed to store new character");
                    e
                })?;
                guard.session.complete()?;
                self.close(actor, &slot, &mut guard);
                tracing::info!(
                    actor = %actor,
                    character_id = %character.id(),
                    class = %character.class(),
                    "Character creation completed"
                );
                Ok(DispatchOutcome::Completed(Box::new(character)))
            }
        }
    }

    /// Parse a raw interaction id, then dispatch it.
    ///
    /// Malformed ids are rejected before the session is looked at.
    pub async fn dispatch_raw(
        &self,
        actor: &ActorId,
        event_id: &str,
    ) -> Result<DispatchOutcome, CreationError> {
        let event = parse_event(event_id)?;
        self.dispatch(actor, event).await
    }

    /// Dispatch a transport interaction. The interaction must come from the
    /// scope the session was started in.
    pub async fn handle(&self, interaction: &Interaction) -> Result<DispatchOutcome, CreationError> {
        let event = interaction.event()?;
        self.dispatch_in(&interaction.actor_id, Some(&interaction.scope_id), event)
            .await
    }

    /// Throw away the actor's session without storing anything.
    pub async fn abandon(&self, actor: &ActorId) -> Result<(), CreationError> {
        let slot = self
            .sessions
            .get(actor)
            .ok_or(CreationError::NoActiveSession)?;
        let mut guard = slot.lock().await;
        if guard.closed {
            return Err(CreationError::NoActiveSession);
        }
        let step = guard.session.step();
        self.close(actor, &slot, &mut guard);
        tracing::info!(actor = %actor, step = ?step, "Character creation abandoned");
        Ok(())
    }

    /// Current snapshot of the actor's session.
    pub async fn view(&self, actor: &ActorId) -> Result<SessionView, CreationError> {
        let slot = self
            .sessions
            .get(actor)
            .ok_or(CreationError::NoActiveSession)?;
        let guard = slot.lock().await;
        if guard.closed {
            return Err(CreationError::NoActiveSession);
        }
        Ok(guard.session.view())
    }

    /// Drop sessions that have seen no event for longer than the idle timeout.
    pub fn evict_idle(&self) -> usize {
        let timeout = chrono::Duration::from_std(self.idle_timeout).unwrap_or(chrono::Duration::MAX);
        let cutoff = self
            .clock
            .now()
            .checked_sub_signed(timeout)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let evicted = self.sessions.evict_idle(cutoff);
        for actor in &evicted {
            tracing::info!(actor = %actor, "Idle character creation evicted");
        }
        tracing::debug!(evicted = evicted.len(), remaining = self.sessions.len(), "Session sweep");
        evicted.len()
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    pub fn has_session(&self, actor: &ActorId) -> bool {
        self.sessions.contains(actor)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Store the draft unless an earlier attempt already did.
    async fn persist(
        &self,
        draft: &CharacterDraft,
        now: DateTime<Utc>,
    ) -> Result<Character, CreationError> {
        if let Some(existing) = self
            .characters
            .find_active(draft.owner(), draft.scope())
            .await?
        {
            // A previous finalize stored it but did not get to close the session.
            if existing.name() == draft.name() && Some(existing.class()) == draft.class() {
                return Ok(existing);
            }
            return Err(CreationError::CharacterExists);
        }

        let character = draft.build(CharacterId::new(), now)?;
        match self.characters.create(&character).await {
            Ok(_) => Ok(character),
            Err(RepoError::ConstraintViolation(_)) => Err(CreationError::CharacterExists),
            Err(e) => Err(e.into()),
        }
    }

    fn close(&self, actor: &ActorId, slot: &SharedSlot, guard: &mut SessionSlot) {
        guard.closed = true;
        self.sessions.remove_if_same(actor, slot);
    }
}

#[cfg(test)]
mod tests;

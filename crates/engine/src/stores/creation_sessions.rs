//! Per-actor creation session storage.
//!
//! The table maps each actor to a shared slot. Table operations
//! (insert-if-absent, remove-if-same) are atomic through the `DashMap` entry
//! API; everything that reads or changes a session happens while holding the
//! slot's own mutex, so check-and-transition is one critical section per
//! session. Guards on the table are never held across an `.await`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use sagaforge_domain::{ActorId, CreationSession};
use tokio::sync::Mutex;

/// A live session plus bookkeeping.
#[derive(Debug)]
pub struct SessionSlot {
    pub session: CreationSession,
    pub last_activity: DateTime<Utc>,
    /// Set once the slot has been completed, abandoned or evicted. A closed
    /// slot may still be referenced by a task that fetched it earlier; it
    /// must treat the session as gone.
    pub closed: bool,
}

impl SessionSlot {
    fn new(session: CreationSession, now: DateTime<Utc>) -> Self {
        Self {
            session,
            last_activity: now,
            closed: false,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }

    pub fn is_idle_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_activity < cutoff
    }
}

pub type SharedSlot = Arc<Mutex<SessionSlot>>;

/// Actor → session table.
#[derive(Default)]
pub struct CreationSessionStore {
    slots: DashMap<ActorId, SharedSlot>,
}

impl CreationSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `session` unless the actor already has one.
    pub fn insert_new(
        &self,
        actor: ActorId,
        session: CreationSession,
        now: DateTime<Utc>,
    ) -> Option<SharedSlot> {
        match self.slots.entry(actor) {
            Entry::Occupied(_) => None,
            Entry::Vacant(vacant) => {
                let slot = Arc::new(Mutex::new(SessionSlot::new(session, now)));
                vacant.insert(Arc::clone(&slot));
                Some(slot)
            }
        }
    }

    pub fn get(&self, actor: &ActorId) -> Option<SharedSlot> {
        self.slots.get(actor).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, actor: &ActorId) -> bool {
        self.slots.contains_key(actor)
    }

    /// Remove the actor's entry only if it is still `slot`.
    pub fn remove_if_same(&self, actor: &ActorId, slot: &SharedSlot) -> bool {
        self.slots
            .remove_if(actor, |_, current| Arc::ptr_eq(current, slot))
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Close and drop every slot whose last activity is before `cutoff`.
    ///
    /// Slots busy with an in-flight event are skipped; they are active by
    /// definition.
    pub fn evict_idle(&self, cutoff: DateTime<Utc>) -> Vec<ActorId> {
        let candidates: Vec<(ActorId, SharedSlot)> = self
            .slots
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();

        let mut evicted = Vec::new();
        for (actor, slot) in candidates {
            let Ok(mut guard) = slot.try_lock() else {
                continue;
            };
            if guard.closed || !guard.is_idle_since(cutoff) {
                continue;
            }
            guard.closed = true;
            drop(guard);
            if self.remove_if_same(&actor, &slot) {
                evicted.push(actor);
            }
        }
        evicted
    }
}

//! In-memory stores for transient engine state.

mod creation_sessions;

pub use creation_sessions::{CreationSessionStore, SessionSlot, SharedSlot};

//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.
//! Use cases orchestrate across entity modules to fulfill user stories.

pub mod character;
pub mod creation;

pub use character::{CharacterOpError, CharacterOps, CharacterSheet};
pub use creation::{CreationError, DispatchOutcome, ErrorKind, Interaction, SessionRegistry};

//! Character creation wizard: events, the draft under construction, and the
//! session state machine.

mod draft;
mod event;
mod session;

pub use draft::{CharacterDraft, DraftSeed};
pub use event::{Adjustment, EventKey, WizardEvent};
pub use session::{CreationSession, CreationStep, Effect, SessionView, Transition};

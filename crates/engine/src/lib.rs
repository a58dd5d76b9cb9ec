//! Sagaforge Engine library.
//!
//! Async orchestration around the pure `sagaforge-domain` rules.
//!
//! ## Structure
//!
//! - `entities/` - Entity modules wrapping repository ports
//! - `stores/` - In-memory transient state (creation sessions)
//! - `use_cases/` - The creation wizard registry and gameplay operations
//! - `infrastructure/` - Ports, adapters, clock and configuration
//! - `api/` - Transport entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

#[cfg(test)]
mod test_support;

pub use app::App;

//! Persistence adapters.

mod memory;

pub use memory::InMemoryCharacterRepo;

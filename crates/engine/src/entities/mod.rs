//! Entity modules wrapping repository ports.

pub mod character;

pub use character::Character;

//! Transport entry points.

pub mod console;

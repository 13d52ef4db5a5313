//! Infrastructure adapters for external systems.

pub mod filesystem;
pub mod gemini;
pub mod mock;
pub mod sqlite;

//! Domain layer for factlens
//!
//! Core models, error types and the port traits that adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};

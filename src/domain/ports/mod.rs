//! Port trait definitions (Hexagonal Architecture)
//!
//! - `GroundedModel`: search-grounded generative model
//! - `ReportRepository`: report metadata rows
//! - `BlobStore`: report HTML artifacts
//!
//! Adapters in `crate::adapters` implement these; services depend only on
//! the traits.

pub mod blob_store;
pub mod grounded_model;
pub mod report_repository;

pub use blob_store::BlobStore;
pub use grounded_model::{GroundedModel, ModelResponse};
pub use report_repository::ReportRepository;

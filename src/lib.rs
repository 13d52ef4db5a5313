//! factlens - grounded fact-checking of web pages
//!
//! factlens sends page content to a search-grounded generative model,
//! normalizes the model's free-form reply into a guaranteed-shape verdict,
//! and persists rendered HTML reports for later retrieval.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors and port traits
//! - **Service Layer** (`services`): verdict extraction, analysis and report storage
//! - **Adapters** (`adapters`): SQLite, filesystem, Gemini and mock implementations of the ports
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging and wiring
//! - **CLI Layer** (`cli`): Command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    AnalysisResult, Config, NewReport, Pagination, Report, SavedReport, ScoreBand, SourceObject,
};
pub use domain::ports::{BlobStore, GroundedModel, ModelResponse, ReportRepository};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::AppContext;
pub use services::{Analyzer, ReportStore};

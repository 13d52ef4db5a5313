//! Infrastructure layer module
//!
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)
//! - Project setup and the application context

pub mod config;
pub mod logging;
pub mod setup;

pub use setup::AppContext;

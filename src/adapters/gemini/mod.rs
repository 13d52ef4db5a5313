//! Gemini grounded-search model adapter.

pub mod client;
pub mod types;

pub use client::{GeminiClient, GeminiConfig};

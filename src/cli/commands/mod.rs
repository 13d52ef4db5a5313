//! CLI command implementations.

pub mod analyze;
pub mod init;
pub mod report;
pub mod status;

use anyhow::{Context, Result};
use std::path::Path;
use uuid::Uuid;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

/// Resolve configuration: an explicit file replaces the project files.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

pub fn parse_report_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).with_context(|| format!("Invalid report ID: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_report_id(&format!(" {id} ")).unwrap(), id);
        assert!(parse_report_id("abc").is_err());
    }
}

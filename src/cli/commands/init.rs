//! Implementation of the `factlens init` command.

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::setup::{init_project, SetupPaths};

#[derive(Debug, Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub config_file: PathBuf,
    pub config_created: bool,
    pub database_path: String,
    pub reports_dir: String,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let config_line = if self.config_created {
            format!("Wrote default config to {}", self.config_file.display())
        } else {
            format!("Kept existing config at {}", self.config_file.display())
        };
        [
            self.message.clone(),
            format!("  {config_line}"),
            format!("  Database: {}", self.database_path),
            format!("  Reports:  {}", self.reports_dir),
        ]
        .join("\n")
    }
}

pub async fn execute(force: bool, config: &Config, json_mode: bool) -> Result<()> {
    let paths = SetupPaths::new()?;
    let outcome = init_project(&paths, config, force).await?;

    let output_data = InitOutput {
        success: true,
        message: "Project initialized successfully.".to_string(),
        config_file: outcome.config_file,
        config_created: outcome.config_created,
        database_path: outcome.database_path,
        reports_dir: outcome.reports_dir,
    };
    output(&output_data, json_mode);
    Ok(())
}

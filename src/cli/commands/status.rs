//! Implementation of the `factlens status` command.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::infrastructure::AppContext;

#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub database_path: String,
    pub reports_dir: String,
    pub report_count: i64,
    pub model: String,
    pub search_grounding: bool,
    pub api_key_configured: bool,
}

impl CommandOutput for StatusOutput {
    fn to_human(&self) -> String {
        [
            format!("Database:         {}", self.database_path),
            format!("Reports dir:      {}", self.reports_dir),
            format!("Saved reports:    {}", self.report_count),
            format!("Model:            {}", self.model),
            format!("Search grounding: {}", if self.search_grounding { "on" } else { "off" }),
            format!(
                "API key:          {}",
                if self.api_key_configured { "configured" } else { "missing" }
            ),
        ]
        .join("\n")
    }
}

pub async fn execute(ctx: &AppContext, json_mode: bool) -> Result<()> {
    let report_count = ctx.reports.count().await.context("Failed to count reports")?;
    let model = &ctx.config.model;

    let status = StatusOutput {
        database_path: ctx.config.database.path.clone(),
        reports_dir: ctx.config.reports.dir.clone(),
        report_count,
        model: model.model.clone(),
        search_grounding: model.enable_search_grounding,
        api_key_configured: crate::adapters::gemini::GeminiConfig::from(model)
            .get_api_key()
            .is_some(),
    };
    output(&status, json_mode);
    Ok(())
}

//! Implementation of the `factlens report` subcommands.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::io::Write;

use super::parse_report_id;
use crate::cli::output::table::TableFormatter;
use crate::cli::output::{output, CommandOutput};
use crate::cli::types::ReportCommands;
use crate::domain::models::{NewReport, Pagination, Report, SavedReport, ScoreBand};
use crate::infrastructure::AppContext;
use crate::services::report_renderer::format_score;

#[derive(Debug, Serialize)]
pub struct ReportOutput {
    pub id: String,
    pub timestamp: String,
    pub url: String,
    pub title: String,
    pub score: f64,
    pub band: ScoreBand,
    pub file_path: String,
}

impl From<&Report> for ReportOutput {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id.to_string(),
            timestamp: report.timestamp_string(),
            url: report.url.clone(),
            title: report.title.clone(),
            score: report.score,
            band: ScoreBand::from_score(report.score),
            file_path: report.file_path.clone(),
        }
    }
}

impl CommandOutput for ReportOutput {
    fn to_human(&self) -> String {
        [
            format!("Report: {}", self.id),
            format!("Title: {}", self.title),
            format!("URL: {}", self.url),
            format!(
                "Score: {}/10 ({})",
                format_score(self.score),
                self.band.label()
            ),
            format!("Saved: {}", self.timestamp),
            format!("File: {}", self.file_path),
        ]
        .join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct ReportListOutput {
    #[serde(skip)]
    reports: Vec<Report>,
    pub items: Vec<ReportOutput>,
    pub limit: i64,
    pub offset: i64,
    pub total: i64,
}

impl CommandOutput for ReportListOutput {
    fn to_human(&self) -> String {
        if self.reports.is_empty() {
            return "No reports found.".to_string();
        }
        format!(
            "Showing {} of {} report(s):\n{}",
            self.reports.len(),
            self.total,
            TableFormatter::new().format_reports(&self.reports)
        )
    }
}

#[derive(Debug, Serialize)]
pub struct ReportSavedOutput {
    pub success: bool,
    #[serde(flatten)]
    pub saved: SavedReport,
}

impl CommandOutput for ReportSavedOutput {
    fn to_human(&self) -> String {
        format!("Saved report {} to {}", self.saved.id, self.saved.file_path)
    }
}

#[derive(Debug, Serialize)]
pub struct ReportDeletedOutput {
    pub success: bool,
    pub id: String,
}

impl CommandOutput for ReportDeletedOutput {
    fn to_human(&self) -> String {
        format!("Deleted report {}", self.id)
    }
}

pub async fn execute(command: ReportCommands, ctx: &AppContext, json_mode: bool) -> Result<()> {
    match command {
        ReportCommands::Save {
            url,
            title,
            score,
            html_file,
        } => {
            let html = tokio::fs::read_to_string(&html_file)
                .await
                .with_context(|| format!("Failed to read {}", html_file.display()))?;
            let saved = ctx
                .reports
                .save(NewReport::new(url, title, score, html))
                .await
                .context("Failed to save report")?;
            output(&ReportSavedOutput { success: true, saved }, json_mode);
        }
        ReportCommands::List { limit, offset } => {
            let page = Pagination::new(limit, offset)?;
            let reports = ctx.reports.list(page).await.context("Failed to list reports")?;
            let total = ctx.reports.count().await.context("Failed to count reports")?;
            let out = ReportListOutput {
                items: reports.iter().map(ReportOutput::from).collect(),
                reports,
                limit,
                offset,
                total,
            };
            output(&out, json_mode);
        }
        ReportCommands::Show { id } => {
            let id = parse_report_id(&id)?;
            let Some(report) = ctx.reports.get(id).await.context("Failed to load report")? else {
                bail!("Report not found: {id}");
            };
            output(&ReportOutput::from(&report), json_mode);
        }
        ReportCommands::Html { id } => {
            let id = parse_report_id(&id)?;
            let Some(html) = ctx.reports.get_html(id).await.context("Failed to load report")? else {
                bail!("Report not found: {id}");
            };
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
        }
        ReportCommands::Delete { id } => {
            let id = parse_report_id(&id)?;
            if !ctx.reports.delete(id).await.context("Failed to delete report")? {
                bail!("Report not found: {id}");
            }
            output(
                &ReportDeletedOutput {
                    success: true,
                    id: id.to_string(),
                },
                json_mode,
            );
        }
    }
    Ok(())
}

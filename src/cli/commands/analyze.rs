//! Implementation of the `factlens analyze` command.

use anyhow::{Context, Result};
use chrono::Utc;
use console::style;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

use crate::cli::output::progress::{create_spinner, ProgressBarExt};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{AnalysisResult, NewReport, SavedReport, ScoreBand};
use crate::infrastructure::AppContext;
use crate::services::report_renderer::format_score;
use crate::services::{render_report, ReportContext};

#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    pub url: String,
    pub file: Option<PathBuf>,
    pub save: bool,
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeOutput {
    pub url: String,
    #[serde(flatten)]
    pub result: AnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<SavedReport>,
}

impl CommandOutput for AnalyzeOutput {
    fn to_human(&self) -> String {
        let r = &self.result;
        let band = r.score_band();
        let headline = format!(
            "{} {}/10  {}",
            band.icon(),
            format_score(r.misinformation_score),
            band.label()
        );
        let headline = match band {
            ScoreBand::Reliable => style(headline).green().bold(),
            ScoreBand::Misleading => style(headline).yellow().bold(),
            ScoreBand::Unreliable => style(headline).red().bold(),
        };

        let mut lines = vec![format!("URL: {}", self.url), headline.to_string()];

        if let Some(ref error) = r.error {
            lines.push(format!("{} {error}", style("Error:").red()));
        }
        let detected = match r.misinformation_detected {
            Some(true) => "yes",
            Some(false) => "no",
            None => "undetermined",
        };
        lines.push(format!("Misinformation detected: {detected}"));

        for (heading, body) in [
            ("Summary", &r.summary),
            ("Report", &r.report),
            ("Context", &r.additional_context),
        ] {
            if !body.is_empty() {
                lines.push(format!("\n{}\n{body}", style(heading).bold()));
            }
        }

        if !r.source_objects.is_empty() {
            lines.push(format!("\n{}", style("Sources").bold()));
            for source in &r.source_objects {
                lines.push(format!("  - {} <{}>", source.title, source.url));
            }
        } else if !r.sources.is_empty() {
            lines.push(format!("\n{}", style("Sources").bold()));
            for url in &r.sources {
                lines.push(format!("  - {url}"));
            }
        }

        if let Some(ref saved) = self.saved {
            lines.push(format!("\nSaved report {} to {}", saved.id, saved.file_path));
        }

        lines.join("\n")
    }
}

pub async fn execute(args: AnalyzeArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let content = read_content(args.file.as_deref()).await?;

    let spinner = create_spinner(format!("Analyzing {}", args.url), json_mode);
    let result = ctx.analyzer.analyze(&args.url, &content).await;
    if result.is_error() {
        spinner.finish_error("Analysis failed");
    } else {
        spinner.finish_success("Analysis complete");
    }

    let saved = if args.save {
        let title = args.title.clone().unwrap_or_else(|| args.url.clone());
        let html = render_report(
            &result,
            &ReportContext {
                url: &args.url,
                title: &title,
                generated_at: Utc::now(),
            },
        );
        let saved = ctx
            .reports
            .save(NewReport::new(&args.url, title, result.misinformation_score, html))
            .await
            .context("Failed to save report")?;
        Some(saved)
    } else {
        None
    };

    output(
        &AnalyzeOutput {
            url: args.url,
            result,
            saved,
        },
        json_mode,
    );
    Ok(())
}

async fn read_content(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read content from {}", path.display())),
        None => {
            let mut content = String::new();
            tokio::io::stdin()
                .read_to_string(&mut content)
                .await
                .context("Failed to read content from stdin")?;
            Ok(content)
        }
    }
}

//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::models::DEFAULT_LIST_LIMIT;

#[derive(Parser, Debug)]
#[command(name = "factlens")]
#[command(about = "factlens - grounded fact-checking with saved HTML reports", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .factlens/
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize factlens configuration, database and reports directory
    Init {
        /// Overwrite an existing config.yaml with the default template
        #[arg(short, long)]
        force: bool,
    },

    /// Fact-check page content read from a file or stdin
    Analyze {
        /// URL the content was taken from
        #[arg(short, long)]
        url: String,

        /// Read content from this file (stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Render and save an HTML report
        #[arg(short, long)]
        save: bool,

        /// Report title (defaults to the URL)
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Saved report management
    #[command(subcommand)]
    Report(ReportCommands),

    /// Show database location, reports directory and report count
    Status,
}

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Save an existing HTML file as a report
    Save {
        #[arg(short, long)]
        url: String,

        #[arg(short, long)]
        title: String,

        /// Misinformation score (0-10)
        #[arg(short, long, allow_negative_numbers = true, value_parser = parse_score)]
        score: f64,

        /// HTML file to store
        #[arg(long, value_name = "PATH")]
        html_file: PathBuf,
    },

    /// List saved reports, newest first
    List {
        #[arg(short, long, default_value_t = DEFAULT_LIST_LIMIT, allow_negative_numbers = true)]
        limit: i64,

        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,
    },

    /// Show report metadata
    Show {
        /// Report ID
        id: String,
    },

    /// Write the report HTML to stdout
    Html {
        /// Report ID
        id: String,
    },

    /// Delete a report and its HTML file
    Delete {
        /// Report ID
        id: String,
    },
}

fn parse_score(raw: &str) -> Result<f64, String> {
    let score: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if score.is_finite() {
        Ok(score)
    } else {
        Err(format!("score must be a finite number, got {raw}"))
    }
}

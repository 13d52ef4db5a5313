//! Table output for report listings using comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::{Report, ScoreBand};
use crate::services::report_renderer::format_score;

use super::truncate;

/// Table formatter for CLI output
pub struct TableFormatter {
    use_colors: bool,
    max_width: Option<u16>,
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    pub fn format_reports(&self, reports: &[Report]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Saved").add_attribute(Attribute::Bold),
            Cell::new("Score").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("URL").add_attribute(Attribute::Bold),
        ]);

        for report in reports {
            let band = ScoreBand::from_score(report.score);
            let score = format!("{} {}", band.icon(), format_score(report.score));
            let score_cell = if self.use_colors {
                Cell::new(score).fg(band_color(band))
            } else {
                Cell::new(score)
            };

            table.add_row(vec![
                Cell::new(&report.id.to_string()[..8]),
                Cell::new(report.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
                score_cell,
                Cell::new(truncate(&report.title, 40)),
                Cell::new(truncate(&report.url, 50)),
            ]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

const fn band_color(band: ScoreBand) -> Color {
    match band {
        ScoreBand::Reliable => Color::Green,
        ScoreBand::Misleading => Color::Yellow,
        ScoreBand::Unreliable => Color::Red,
    }
}

/// Respect NO_COLOR and dumb terminals.
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}

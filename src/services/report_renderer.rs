//! Renders an [`AnalysisResult`] as a self-contained HTML report.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::domain::models::{AnalysisResult, ScoreBand, SourceObject};

/// Inputs for a rendered report that are not part of the verdict itself.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub url: &'a str,
    pub title: &'a str,
    pub generated_at: DateTime<Utc>,
}

pub fn render_report(result: &AnalysisResult, ctx: &ReportContext<'_>) -> String {
    let band = result.score_band();
    let color = band.color();

    let mut html = String::with_capacity(4096);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <title>Fact-Check Report - {title}</title>\n<style>\n{STYLE}\
         .score-container {{ border: 1px solid {color}; background-color: {background}; }}\n\
         .score-value, .score-description {{ color: {color}; }}\n\
         .score-badge {{ background-color: {color}; }}\n</style>\n</head>\n<body>\n\
         <div class=\"container\">\n<h1>Fact-Check Report</h1>\n\
         <p class=\"url\">URL: {url}</p>\n",
        title = escape_html(ctx.title),
        url = escape_html(ctx.url),
        background = band_background(band),
    );

    let _ = write!(
        html,
        "<div class=\"score-container\">\n<h2>Misinformation Score</h2>\n\
         <div class=\"score-badge\">{icon}</div>\n\
         <div class=\"score-value\">{score}/10</div>\n\
         <div class=\"score-description\">{label}</div>\n</div>\n",
        icon = band.icon(),
        score = format_score(result.misinformation_score),
        label = band.label(),
    );

    if let Some(error) = &result.error {
        push_section(&mut html, "Error", error);
    }
    push_section(&mut html, "Summary", &result.summary);
    push_section(&mut html, "Truth Report", &result.report);
    push_section(&mut html, "More Context", &result.additional_context);

    html.push_str("<div class=\"section\">\n<h2>Sources Checked</h2>\n<ul class=\"sources\">\n");
    html.push_str(&render_sources(result));
    html.push_str("</ul>\n</div>\n");

    let _ = write!(
        html,
        "<p class=\"date\">Generated: {}</p>\n</div>\n</body>\n</html>\n",
        ctx.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    html
}

const STYLE: &str = "body { font-family: Arial, sans-serif; color: #5b4b33; margin: 0; padding: 20px; background-color: #f9f4e8; }\n\
.container { max-width: 800px; margin: 0 auto; background: #f7f0e1; padding: 30px; border-radius: 10px; }\n\
h1 { color: #854a11; font-size: 28px; text-align: center; }\n\
h2 { color: #714012; font-size: 18px; border-bottom: 1px solid #c4a77d; padding-bottom: 5px; }\n\
.score-container { text-align: center; margin: 20px 0; padding: 20px; border-radius: 10px; }\n\
.score-value { font-size: 28px; font-weight: bold; margin: 10px 0; }\n\
.score-badge { display: inline-block; width: 30px; height: 30px; line-height: 30px; border-radius: 50%; color: white; }\n\
.section { background-color: #faf6eb; padding: 15px; margin: 15px 0; border-radius: 8px; }\n\
.url, .date { text-align: center; font-size: 12px; color: #7d6843; word-break: break-all; }\n\
.sources li { margin-bottom: 8px; }\n\
a { color: #854a11; text-decoration: none; }\n";

fn band_background(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Reliable => "rgba(76, 175, 80, 0.1)",
        ScoreBand::Misleading => "rgba(255, 193, 7, 0.1)",
        ScoreBand::Unreliable => "rgba(244, 67, 54, 0.1)",
    }
}

fn push_section(html: &mut String, heading: &str, body: &str) {
    let _ = write!(
        html,
        "<div class=\"section\">\n<h2>{heading}</h2>\n<p>{}</p>\n</div>\n",
        escape_html(body)
    );
}

/// Citation objects when present, otherwise the plain source URLs.
fn render_sources(result: &AnalysisResult) -> String {
    if result.source_objects.is_empty() && result.sources.is_empty() {
        return "<li>No sources available</li>\n".to_string();
    }

    let fallback: Vec<SourceObject>;
    let sources = if result.source_objects.is_empty() {
        fallback = result
            .sources
            .iter()
            .map(|url| SourceObject::new(url.as_str(), url.as_str()))
            .collect();
        &fallback
    } else {
        &result.source_objects
    };

    sources
        .iter()
        .map(|s| {
            format!(
                "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></li>\n",
                escape_html(&s.url),
                escape_html(&s.title)
            )
        })
        .collect()
}

/// Whole scores print without a fractional part.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 && score.is_finite() {
        format!("{score:.0}")
    } else {
        format!("{score:.1}")
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

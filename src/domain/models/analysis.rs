//! Verdict models produced by the analysis pipeline.

use serde::{Deserialize, Serialize};

/// Score used whenever the verdict is undetermined (degraded or failed).
pub const NEUTRAL_SCORE: f64 = 5.0;

/// Title substituted for citations that carry a URL but no title.
pub const PLACEHOLDER_SOURCE_TITLE: &str = "Source";

/// A web citation attached to a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceObject {
    pub url: String,
    pub title: String,
}

impl SourceObject {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Canonical verdict record returned by `analyze`.
///
/// Every field except `error` always carries a value; `misinformation_detected`
/// uses `None` to mean "undetermined", which serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub misinformation_detected: Option<bool>,
    pub misinformation_score: f64,
    pub report: String,
    pub additional_context: String,
    pub sources: Vec<String>,
    pub source_objects: Vec<SourceObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    /// Verdict returned when the model could not be reached at all.
    pub fn upstream_failure(cause: impl std::fmt::Display) -> Self {
        Self {
            summary: "Could not analyze the content".to_string(),
            misinformation_detected: None,
            misinformation_score: NEUTRAL_SCORE,
            report: "The system encountered an error while analyzing this content. Please try again later."
                .to_string(),
            additional_context: "Error processing the content".to_string(),
            sources: Vec::new(),
            source_objects: Vec::new(),
            error: Some(format!("Analysis failed: {cause}")),
        }
    }

    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::from_score(self.misinformation_score)
    }
}

/// Coarse reliability bucket for a misinformation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Reliable,
    Misleading,
    Unreliable,
}

impl ScoreBand {
    /// Scores are bucketed as-is; values outside 0..=10 land in the outer bands.
    pub fn from_score(score: f64) -> Self {
        if score <= 3.0 {
            Self::Reliable
        } else if score <= 7.0 {
            Self::Misleading
        } else {
            Self::Unreliable
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Reliable => "Generally Reliable",
            Self::Misleading => "Potentially Misleading",
            Self::Unreliable => "Likely Unreliable",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Reliable => "\u{2713}",
            Self::Misleading => "\u{26a0}",
            Self::Unreliable => "\u{2717}",
        }
    }

    /// Accent color used by the HTML report.
    pub const fn color(self) -> &'static str {
        match self {
            Self::Reliable => "#4CAF50",
            Self::Misleading => "#FFC107",
            Self::Unreliable => "#F44336",
        }
    }
}

/// Partially-populated verdict read from the model's reply.
///
/// `None` means the model did not supply the field (or supplied it with an
/// unusable type); the assembler fills the canonical default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedVerdict {
    pub summary: Option<String>,
    pub misinformation_detected: Option<bool>,
    pub misinformation_score: Option<f64>,
    pub report: Option<String>,
    pub additional_context: Option<String>,
    pub sources: Option<Vec<String>>,
    /// Set when the reply could not be parsed and the fallback verdict was used.
    pub degraded: bool,
}

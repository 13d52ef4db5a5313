//! Merges an extracted verdict with collected citations into the canonical
//! [`AnalysisResult`].

use crate::domain::models::{AnalysisResult, ExtractedVerdict, SourceObject, NEUTRAL_SCORE};

/// Build the canonical record. Absent fields get their defaults: empty
/// strings, `None` for the detected flag, and the neutral score.
pub fn assemble(verdict: ExtractedVerdict, citations: Vec<SourceObject>) -> AnalysisResult {
    let sources = match verdict.sources {
        Some(sources) if !sources.is_empty() => sources,
        _ => citations.iter().map(|c| c.url.clone()).collect(),
    };

    AnalysisResult {
        summary: verdict.summary.unwrap_or_default(),
        misinformation_detected: verdict.misinformation_detected,
        misinformation_score: verdict.misinformation_score.unwrap_or(NEUTRAL_SCORE),
        report: verdict.report.unwrap_or_default(),
        additional_context: verdict.additional_context.unwrap_or_default(),
        sources,
        source_objects: citations,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn citations() -> Vec<SourceObject> {
        vec![
            SourceObject::new("https://a.example", "A"),
            SourceObject::new("https://b.example", "Source"),
        ]
    }

    #[test]
    fn test_defaults_fill_every_field() {
        let result = assemble(ExtractedVerdict::default(), Vec::new());
        assert_eq!(result.summary, "");
        assert_eq!(result.misinformation_detected, None);
        assert_eq!(result.misinformation_score, NEUTRAL_SCORE);
        assert_eq!(result.report, "");
        assert_eq!(result.additional_context, "");
        assert!(result.sources.is_empty());
        assert!(result.source_objects.is_empty());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_missing_sources_come_from_citations() {
        let result = assemble(ExtractedVerdict::default(), citations());
        assert_eq!(result.sources, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_empty_sources_come_from_citations() {
        let verdict = ExtractedVerdict {
            sources: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(assemble(verdict, citations()).sources.len(), 2);
    }

    #[test]
    fn test_model_sources_are_kept_and_objects_always_set() {
        let verdict = ExtractedVerdict {
            sources: Some(vec!["https://model.example".to_string()]),
            ..Default::default()
        };
        let result = assemble(verdict, citations());
        assert_eq!(result.sources, vec!["https://model.example"]);
        assert_eq!(result.source_objects, citations());
    }

    #[test]
    fn test_no_citations_leaves_extracted_sources() {
        let verdict = ExtractedVerdict {
            sources: Some(vec!["https://x.example".to_string()]),
            ..Default::default()
        };
        let result = assemble(verdict, Vec::new());
        assert_eq!(result.sources, vec!["https://x.example"]);
        assert!(result.source_objects.is_empty());
    }

    #[test]
    fn test_out_of_range_score_passes_through() {
        let verdict = ExtractedVerdict {
            misinformation_score: Some(-3.0),
            ..Default::default()
        };
        assert_eq!(assemble(verdict, Vec::new()).misinformation_score, -3.0);
    }
}

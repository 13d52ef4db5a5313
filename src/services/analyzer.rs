//! Analyzer service.
//!
//! Builds the fact-checking prompt, invokes the grounded model, and runs the
//! reply through extraction, citation collection and assembly. `analyze`
//! always returns a well-formed [`AnalysisResult`]; an unreachable model
//! produces a record carrying `error` instead of a raw failure.

use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::domain::models::{AnalysisConfig, AnalysisResult};
use crate::domain::ports::{GroundedModel, ModelResponse};
use crate::services::analysis_assembler::assemble;
use crate::services::citation_collector::collect_citations;
use crate::services::verdict_extractor::extract_verdict;

/// Configuration for the analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Content is cut to this many characters before prompting (prefix kept).
    pub max_content_chars: usize,
    /// Ask the model to ground its answer in web search.
    pub enable_search_grounding: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_content_chars: AnalysisConfig::default().max_content_chars,
            enable_search_grounding: true,
        }
    }
}

/// Fact-checks page content through a grounded model.
pub struct Analyzer {
    model: Arc<dyn GroundedModel>,
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(model: Arc<dyn GroundedModel>, config: AnalyzerConfig) -> Self {
        Self { model, config }
    }

    pub fn with_defaults(model: Arc<dyn GroundedModel>) -> Self {
        Self::new(model, AnalyzerConfig::default())
    }

    /// Analyze a page. Never fails.
    #[instrument(skip(self, content), fields(model = self.model.name(), content_chars = content.chars().count()))]
    pub async fn analyze(&self, url: &str, content: &str) -> AnalysisResult {
        let prompt = self.build_prompt(url, content);

        match self
            .model
            .generate(&prompt, self.config.enable_search_grounding)
            .await
        {
            Ok(response) => {
                let result = normalize_response(&response);
                info!(
                    score = result.misinformation_score,
                    detected = ?result.misinformation_detected,
                    sources = result.sources.len(),
                    "analysis complete"
                );
                result
            }
            Err(e) => {
                error!(error = %e, "grounded model invocation failed");
                AnalysisResult::upstream_failure(e)
            }
        }
    }

    /// Build the fact-checking prompt for a page.
    pub fn build_prompt(&self, url: &str, content: &str) -> String {
        let excerpt = truncate_content(content, self.config.max_content_chars);

        format!(
            "I need to analyze the following website content for potential misinformation.\n\n\
            URL: {url}\n\n\
            CONTENT EXCERPT:\n{excerpt}\n\n\
            Please analyze this content and:\n\
            1. Compare it with other authoritative sources using Google Search\n\
            2. Identify any potential misinformation or inaccuracies\n\
            3. Provide additional context about the topic\n\
            4. Assign a misinformation score from 0 to 10, where 0 means completely accurate and 10 means highly misleading\n\
            5. List the specific sources (URLs) you used for verification\n\n\
            Format your response as JSON with the following structure:\n\
            {{\n\
            \x20   \"summary\": \"Brief summary of the content (max 50 words)\",\n\
            \x20   \"misinformationDetected\": true or false,\n\
            \x20   \"misinformationScore\": a number from 0 to 10,\n\
            \x20   \"report\": \"Detailed report comparing this content with other sources (max 250 words)\",\n\
            \x20   \"additionalContext\": \"Additional context about the topic (max 50 words)\",\n\
            \x20   \"sources\": [\"source1_url\", \"source2_url\", \"source3_url\"]\n\
            }}\n\n\
            Ensure your total response is under 300 words."
        )
    }
}

/// Turn a model reply into the canonical record.
pub fn normalize_response(response: &ModelResponse) -> AnalysisResult {
    let verdict = extract_verdict(&response.text);
    let citations = collect_citations(response.grounding_metadata.as_ref());
    assemble(verdict, citations)
}

/// Prefix of `content` holding at most `max_chars` characters.
pub fn truncate_content(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &content[..byte_idx],
        None => content,
    }
}

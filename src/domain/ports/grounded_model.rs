//! Grounded model port - interface for search-grounded LLM backends.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::GroundingMetadata;

/// Reply from a grounded model call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelResponse {
    /// Concatenated text of the reply. May be empty.
    pub text: String,
    /// Citations the model attached, when the provider returned any.
    pub grounding_metadata: Option<GroundingMetadata>,
}

impl ModelResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            grounding_metadata: None,
        }
    }

    pub fn with_grounding(mut self, metadata: GroundingMetadata) -> Self {
        self.grounding_metadata = Some(metadata);
        self
    }
}

/// A generative model that can optionally ground its answer in web search.
///
/// Implementations return `DomainError::UpstreamFailed` for network, auth,
/// quota and decoding failures. They do not retry.
#[async_trait]
pub trait GroundedModel: Send + Sync {
    /// Backend name, used in logs.
    fn name(&self) -> &'static str;

    async fn generate(
        &self,
        prompt: &str,
        enable_search_grounding: bool,
    ) -> DomainResult<ModelResponse>;
}

//! HTTP client for Gemini `generateContent` with Google Search grounding.

use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;
use tracing::{debug, instrument};

use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{GroundingMetadata, ModelConfig};
use crate::domain::ports::{GroundedModel, ModelResponse};
use crate::infrastructure::logging::SecretScrubber;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key (read from GEMINI_API_KEY when not set).
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self::from(&ModelConfig::default())
    }
}

impl From<&ModelConfig> for GeminiConfig {
    fn from(config: &ModelConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

impl GeminiConfig {
    /// Get API key from config or environment.
    pub fn get_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()))
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
    scrubber: SecretScrubber,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> DomainResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::ValidationFailed(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config,
            client,
            scrubber: SecretScrubber::new(),
        })
    }

    fn upstream_error(&self, message: String) -> DomainError {
        DomainError::UpstreamFailed(self.scrubber.scrub(&message))
    }
}

#[async_trait]
impl GroundedModel for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip(self, prompt), fields(model = %self.config.model, prompt_chars = prompt.len()))]
    async fn generate(&self, prompt: &str, enable_search_grounding: bool) -> DomainResult<ModelResponse> {
        let api_key = self
            .config
            .get_api_key()
            .ok_or_else(|| DomainError::ValidationFailed(format!("{API_KEY_ENV} not set")))?;

        let body = GenerateContentRequest::user_prompt(prompt, enable_search_grounding);

        let response = self
            .client
            .post(self.config.endpoint())
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-goog-api-key", &api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.upstream_error(format!("API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.upstream_error(format!("API error {status}: {body}")));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| self.upstream_error(format!("Failed to parse response: {e}")))?;

        let text = result.first_candidate_text().unwrap_or_default();
        let grounding = result.first_candidate_grounding().map(GroundingMetadata::from_value);

        debug!(
            candidates = result.candidates.len(),
            finish_reason = result.first_candidate_finish_reason().unwrap_or("none"),
            text_chars = text.len(),
            grounded = grounding.is_some(),
            "received model reply"
        );

        Ok(ModelResponse {
            text,
            grounding_metadata: grounding,
        })
    }
}

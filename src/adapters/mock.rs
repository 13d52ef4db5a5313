//! Mock grounded model for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::GroundingMetadata;
use crate::domain::ports::{GroundedModel, ModelResponse};

/// Mock reply configuration.
#[derive(Debug, Clone)]
pub struct MockReply {
    /// Reply text
    pub text: String,
    /// Grounding metadata to attach
    pub grounding: Option<GroundingMetadata>,
    /// Whether to simulate failure
    pub fail: bool,
    /// Error message if failing
    pub error_message: Option<String>,
}

impl Default for MockReply {
    fn default() -> Self {
        Self {
            text: r#"{"summary": "Mock verdict", "misinformationDetected": false, "misinformationScore": 0}"#
                .to_string(),
            grounding: None,
            fail: false,
            error_message: None,
        }
    }
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            fail: true,
            error_message: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn with_grounding(mut self, grounding: GroundingMetadata) -> Self {
        self.grounding = Some(grounding);
        self
    }
}

/// A recorded `generate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub prompt: String,
    pub enable_search_grounding: bool,
}

/// Mock grounded model for testing.
///
/// Replies queued with [`push_reply`](Self::push_reply) are served first, in
/// order; afterwards every call gets the default reply.
pub struct MockGroundedModel {
    default_reply: MockReply,
    queued: Arc<RwLock<VecDeque<MockReply>>>,
    calls: Arc<RwLock<Vec<MockCall>>>,
}

impl MockGroundedModel {
    pub fn new() -> Self {
        Self::with_reply(MockReply::default())
    }

    pub fn with_reply(reply: MockReply) -> Self {
        Self {
            default_reply: reply,
            queued: Arc::new(RwLock::new(VecDeque::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn push_reply(&self, reply: MockReply) {
        self.queued.write().await.push_back(reply);
    }

    /// All calls received so far.
    pub async fn calls(&self) -> Vec<MockCall> {
        self.calls.read().await.clone()
    }
}

impl Default for MockGroundedModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GroundedModel for MockGroundedModel {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(
        &self,
        prompt: &str,
        enable_search_grounding: bool,
    ) -> DomainResult<ModelResponse> {
        self.calls.write().await.push(MockCall {
            prompt: prompt.to_string(),
            enable_search_grounding,
        });

        let reply = self
            .queued
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone());

        if reply.fail {
            return Err(DomainError::UpstreamFailed(
                reply
                    .error_message
                    .unwrap_or_else(|| "Mock failure".to_string()),
            ));
        }

        Ok(ModelResponse {
            text: reply.text,
            grounding_metadata: reply.grounding,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queued_replies_then_default() {
        let model = MockGroundedModel::with_reply(MockReply::text("default"));
        model.push_reply(MockReply::text("first")).await;

        assert_eq!(model.generate("p1", true).await.unwrap().text, "first");
        assert_eq!(model.generate("p2", false).await.unwrap().text, "default");

        let calls = model.calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].prompt, "p2");
    }

    #[tokio::test]
    async fn test_failure_reply() {
        let model = MockGroundedModel::with_reply(MockReply::failure("boom"));
        let err = model.generate("p", true).await.unwrap_err();
        assert!(matches!(err, DomainError::UpstreamFailed(msg) if msg == "boom"));
    }
}

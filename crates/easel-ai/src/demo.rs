//! Demo Provider and Fallback
//!
//! This module provides a deterministic local generator used when no remote
//! provider is configured, and a fallback wrapper that degrades to it when a
//! remote call fails instead of leaving the caller stuck.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::error::{Error, Result};
use crate::provider::{GenerationRequest, GenerationResponse, TextKind, TextProvider};

/// Local placeholder generator.
///
/// Output is deterministic for a given request, so previews and tests are
/// stable without network access.
#[derive(Debug, Clone, Default)]
pub struct DemoProvider;

impl DemoProvider {
    /// Create a demo provider
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextProvider for DemoProvider {
    fn name(&self) -> &str {
        "demo"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        let topic = summarize_prompt(&request.prompt);
        let content = match request.kind {
            TextKind::Script => format!(
                "Welcome! Today we're looking at {topic}.\n\n\
                 Let's start with the essentials: what it is, why it matters, \
                 and what you can do with it.\n\n\
                 First, the big picture. {topic} comes up everywhere once you \
                 start looking for it, and understanding the basics pays off \
                 quickly.\n\n\
                 Then we'll walk through a concrete example step by step, so \
                 you can follow along and try it yourself.\n\n\
                 That's it for today. If this was useful, you know what to do. \
                 See you in the next one!"
            ),
            TextKind::Narration => format!(
                "Here we see {topic}. Notice how each part connects to the \
                 next, building toward the full picture. Take a moment to let \
                 the details settle before we move on."
            ),
        };

        Ok(GenerationResponse {
            content,
            model: "demo-template".to_string(),
            provider: self.name().to_string(),
        })
    }
}

/// First line of the prompt, clipped for embedding in template text
fn summarize_prompt(prompt: &str) -> String {
    let line = prompt.lines().next().unwrap_or("").trim();
    let line = if line.is_empty() { "your topic" } else { line };
    let mut chars = line.chars();
    let clipped: String = chars.by_ref().take(80).collect();
    if chars.next().is_some() {
        format!("{clipped}…")
    } else {
        clipped
    }
}

/// Wrapper that falls back to a local generator when the primary fails.
///
/// Cancellation is not an outage and propagates unchanged.
pub struct FallbackProvider {
    primary: Arc<dyn TextProvider>,
    fallback: Arc<dyn TextProvider>,
}

impl FallbackProvider {
    /// Wrap a primary provider with the demo fallback
    #[must_use]
    pub fn new(primary: Arc<dyn TextProvider>) -> Self {
        Self {
            primary,
            fallback: Arc::new(DemoProvider::new()),
        }
    }

    /// Wrap a primary provider with a custom fallback
    #[must_use]
    pub fn with_fallback(primary: Arc<dyn TextProvider>, fallback: Arc<dyn TextProvider>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl TextProvider for FallbackProvider {
    fn name(&self) -> &str {
        self.primary.name()
    }

    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        match self.primary.generate(request.clone()).await {
            Ok(response) => Ok(response),
            Err(Error::Cancelled) => Err(Error::Cancelled),
            Err(err) => {
                warn!(
                    provider = self.primary.name(),
                    code = err.code(),
                    %err,
                    "provider failed, using fallback"
                );
                self.fallback.generate(request).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockTextProvider;

    #[tokio::test]
    async fn test_demo_is_deterministic() {
        let provider = DemoProvider::new();
        let request = GenerationRequest::new("the history of kites", TextKind::Script);
        let a = provider.generate(request.clone()).await.unwrap();
        let b = provider.generate(request).await.unwrap();
        assert_eq!(a.content, b.content);
        assert!(a.content.contains("the history of kites"));
        assert_eq!(a.provider, "demo");
    }

    #[tokio::test]
    async fn test_demo_narration_differs_from_script() {
        let provider = DemoProvider::new();
        let script = provider
            .generate(GenerationRequest::new("volcanoes", TextKind::Script))
            .await
            .unwrap();
        let narration = provider
            .generate(GenerationRequest::new("volcanoes", TextKind::Narration))
            .await
            .unwrap();
        assert_ne!(script.content, narration.content);
    }

    #[tokio::test]
    async fn test_fallback_on_provider_error() {
        let mut primary = MockTextProvider::new();
        primary.expect_name().return_const("openai".to_string());
        primary
            .expect_generate()
            .returning(|_| Err(Error::api("boom")));

        let provider = FallbackProvider::new(Arc::new(primary));
        let response = provider
            .generate(GenerationRequest::new("volcanoes", TextKind::Script))
            .await
            .unwrap();
        assert_eq!(response.provider, "demo");
    }

    #[tokio::test]
    async fn test_fallback_does_not_mask_cancellation() {
        let mut primary = MockTextProvider::new();
        primary.expect_name().return_const("openai".to_string());
        primary
            .expect_generate()
            .returning(|_| Err(Error::Cancelled));

        let provider = FallbackProvider::new(Arc::new(primary));
        let err = provider
            .generate(GenerationRequest::new("volcanoes", TextKind::Script))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "cancelled");
    }

    #[test]
    fn test_summarize_clips_long_prompts() {
        let long = "a".repeat(120);
        let summary = summarize_prompt(&long);
        assert!(summary.chars().count() <= 81);
        assert!(summary.ends_with('…'));
    }
}

//! Text Provider Interface
//!
//! This module defines the provider trait remote and local generators
//! implement, the request/response types, and shared helpers for masking
//! credentials and sanitizing API error messages.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What kind of text is being generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextKind {
    /// A spoken video script
    Script,
    /// Narration matching existing content
    Narration,
}

impl TextKind {
    /// Get the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Narration => "narration",
        }
    }
}

impl std::fmt::Display for TextKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A text generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The full prompt
    pub prompt: String,
    /// What is being generated
    pub kind: TextKind,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl GenerationRequest {
    /// Create a request with default generation parameters
    #[must_use]
    pub fn new(prompt: impl Into<String>, kind: TextKind) -> Self {
        Self {
            prompt: prompt.into(),
            kind,
            max_tokens: 1024,
            temperature: 0.7,
        }
    }

    /// Set the token ceiling
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A completed generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Generated text
    pub content: String,
    /// Model that produced it
    pub model: String,
    /// Provider name
    pub provider: String,
}

/// A text generation backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Provider name for logging and attribution
    fn name(&self) -> &str;

    /// Generate text for a request
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse>;
}

/// Mask an API key for logging, keeping only a short prefix
pub(crate) fn mask_api_key(key: &str) -> String {
    // Clip by characters, not bytes; keys are not guaranteed ASCII.
    if key.chars().count() <= 8 {
        "***".to_string()
    } else {
        let prefix: String = key.chars().take(6).collect();
        format!("{prefix}...")
    }
}

/// Sanitize API error messages so credentials and internals never reach the UI
pub(crate) fn sanitize_api_error(error: &str) -> String {
    let lower = error.to_lowercase();

    if lower.contains("api key")
        || lower.contains("unauthorized")
        || lower.contains("authentication")
    {
        return "API authentication error. Please check your API key configuration.".to_string();
    }

    if lower.contains("rate limit") || lower.contains("quota") {
        return "API rate limit exceeded. Please try again later.".to_string();
    }

    if lower.contains("internal") || lower.contains("server error") {
        return "API server error. Please try again later.".to_string();
    }

    if error.len() > 300 {
        let mut end = 300;
        while !error.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...(truncated)", &error[..end])
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_as_str() {
        assert_eq!(TextKind::Script.as_str(), "script");
        assert_eq!(TextKind::Narration.to_string(), "narration");
    }

    #[test]
    fn test_request_builders() {
        let request = GenerationRequest::new("write a script", TextKind::Script)
            .with_max_tokens(256)
            .with_temperature(0.2);
        assert_eq!(request.max_tokens, 256);
        assert!((request.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("short"), "***");
        assert_eq!(mask_api_key("sk-abcdefghijklmnop"), "sk-abc...");
    }

    #[test]
    fn test_mask_api_key_multibyte() {
        // Must not panic on a clip point inside a multi-byte character.
        assert_eq!(mask_api_key("ключ-секрет-長い"), "ключ-с...");
        assert_eq!(mask_api_key("клк"), "***");
    }

    #[test]
    fn test_sanitize_hides_auth_details() {
        let sanitized = sanitize_api_error("Invalid API key: sk-123456");
        assert!(!sanitized.contains("sk-123456"));
        assert!(sanitized.contains("authentication"));
    }

    #[test]
    fn test_sanitize_truncates_long_messages() {
        let long = "x".repeat(500);
        let sanitized = sanitize_api_error(&long);
        assert!(sanitized.ends_with("...(truncated)"));
    }

    #[tokio::test]
    async fn test_mock_provider() {
        let mut provider = MockTextProvider::new();
        provider.expect_name().return_const("mock".to_string());
        provider.expect_generate().returning(|request| {
            Ok(GenerationResponse {
                content: format!("echo: {}", request.prompt),
                model: "mock-1".to_string(),
                provider: "mock".to_string(),
            })
        });

        let response = provider
            .generate(GenerationRequest::new("hi", TextKind::Script))
            .await
            .unwrap();
        assert_eq!(response.content, "echo: hi");
    }
}

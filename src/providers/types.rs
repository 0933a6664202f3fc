// Unified request/response types for OpenAI-compatible providers
//
// These types abstract over the provider wire format so the invoker and the
// fallback orchestrator never touch provider-specific JSON.

use serde::{Deserialize, Serialize};

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Unified request format for all providers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderRequest {
    /// Conversation messages (system prompt excluded)
    pub messages: Vec<Message>,

    /// Model name (provider-specific). Empty means the provider default.
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// System prompt, prepended as a `{"role":"system"}` message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ProviderRequest {
    /// Create a new request from messages
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            model: String::new(),
            max_tokens: 1024,
            system: None,
            temperature: None,
        }
    }

    /// Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set system prompt
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Unified response format from all providers
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    /// Provider-assigned response id
    pub id: String,

    /// Model that actually produced the response, as reported by the provider
    pub model: String,

    /// Generated text. `None` when the provider returned no message content.
    pub text: Option<String>,

    /// Why generation stopped, if reported
    pub stop_reason: Option<String>,

    /// Provider name (e.g. "openai", "groq")
    pub provider: String,

    /// Token usage
    pub usage: TokenUsage,
}

impl ProviderResponse {
    /// Generated text with surrounding whitespace removed, or `None` if blank.
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(text: Option<&str>) -> ProviderResponse {
        ProviderResponse {
            id: "resp-1".to_string(),
            model: "test-model".to_string(),
            text: text.map(str::to_string),
            stop_reason: None,
            provider: "test".to_string(),
            usage: TokenUsage::default(),
        }
    }

    #[test]
    fn test_request_builder() {
        let request = ProviderRequest::new(vec![Message::user("hi")])
            .with_model("gpt-4o")
            .with_max_tokens(256)
            .with_system("be brief")
            .with_temperature(0.3);

        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.max_tokens, 256);
        assert_eq!(request.system.as_deref(), Some("be brief"));
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.messages[0].role, "user");
    }

    #[test]
    fn test_non_empty_text() {
        assert_eq!(response(Some("  copy ")).non_empty_text(), Some("copy"));
        assert_eq!(response(Some(" \n")).non_empty_text(), None);
        assert_eq!(response(None).non_empty_text(), None);
    }

    #[test]
    fn test_usage_serializes_camel_case() {
        let usage = TokenUsage {
            prompt_tokens: 1,
            completion_tokens: 2,
            total_tokens: 3,
        };
        let json = serde_json::to_value(usage).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"promptTokens": 1, "completionTokens": 2, "totalTokens": 3})
        );
    }
}

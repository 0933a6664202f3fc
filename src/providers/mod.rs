// Model provider support
//
// This module provides an abstraction layer over OpenAI-compatible LLM
// providers and the single-call invoker the fallback chain is built on.

use anyhow::Result;
use async_trait::async_trait;

pub mod invoker;
pub mod openai;
pub mod types;

// Provider factory
pub mod factory;

pub use factory::create_provider_from_tier;
pub use invoker::{invoke, ModelCallParameters, ModelCallResult, ModelSuccess};
pub use openai::OpenAIProvider;
pub use types::{Message, ProviderRequest, ProviderResponse, TokenUsage};

/// Trait for LLM providers
///
/// Implementations perform exactly one provider call per `send_message`.
/// Retrying by switching tiers belongs to the fallback orchestrator.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a message and get a complete response
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse>;

    /// Get the provider name (e.g., "openai", "groq")
    fn name(&self) -> &str;

    /// Get the default model for this provider
    fn default_model(&self) -> &str;
}

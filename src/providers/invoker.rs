// Model invoker
//
// One provider call, bounded by a timeout, converted into a tagged result.
// Nothing raised by the provider escapes this function.

use std::time::Duration;

use super::types::{Message, ProviderRequest, TokenUsage};
use super::LlmProvider;
use crate::prompt::PromptPair;

/// Per-tier call parameters. Fixed at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelCallParameters {
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A successful model call.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSuccess {
    pub text: String,
    /// Model id as reported by the provider
    pub model_id_used: String,
    pub usage: TokenUsage,
}

/// Outcome of exactly one model call.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelCallResult {
    Success(ModelSuccess),
    Failure { message: String },
}

impl ModelCallResult {
    fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Attempt one call to `provider`. Errors, timeouts and blank content all
/// come back as [`ModelCallResult::Failure`].
pub async fn invoke(
    provider: &dyn LlmProvider,
    params: &ModelCallParameters,
    prompt: &PromptPair,
    timeout: Duration,
) -> ModelCallResult {
    let request = ProviderRequest::new(vec![Message::user(prompt.user_prompt.clone())])
        .with_system(prompt.system_prompt.clone())
        .with_model(params.model_id.clone())
        .with_max_tokens(params.max_tokens)
        .with_temperature(params.temperature);

    let response = match tokio::time::timeout(timeout, provider.send_message(&request)).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            tracing::warn!(provider = provider.name(), model = %params.model_id, "Model call failed: {:#}", e);
            return ModelCallResult::failure(format!("{:#}", e));
        }
        Err(_) => {
            tracing::warn!(
                provider = provider.name(),
                model = %params.model_id,
                "Model call timed out after {:?}",
                timeout
            );
            return ModelCallResult::failure(format!("timed out after {:?}", timeout));
        }
    };

    let Some(text) = response.non_empty_text() else {
        tracing::warn!(provider = provider.name(), model = %response.model, "Model returned empty content");
        return ModelCallResult::failure("provider returned empty content");
    };

    // Some gateways omit the model field; report what we asked for instead.
    let model_id_used = if response.model.is_empty() {
        params.model_id.clone()
    } else {
        response.model.clone()
    };

    ModelCallResult::Success(ModelSuccess {
        text: text.to_string(),
        model_id_used,
        usage: response.usage,
    })
}

// Fallback orchestrator
//
// Primary model, then secondary model, then templated copy. Stages run in
// strict order and each one is attempted at most once per request.

mod template;

pub use template::templated_copy;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::constants::{CompanyProfile, COMPANY, TEMPLATED_MODEL_ID};
use crate::config::{Config, TierKind};
use crate::prompt::{PromptPair, Topic};
use crate::providers::{
    create_provider_from_tier, invoke, LlmProvider, ModelCallParameters, ModelCallResult,
    ModelSuccess, TokenUsage,
};

/// Why a response did not come from the primary tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    NoApiKeys,
    PrimaryFailed,
    AllModelsFailed,
    ServerError,
}

impl FallbackReason {
    pub fn as_str(self) -> &'static str {
        match self {
            FallbackReason::NoApiKeys => "No API keys configured",
            FallbackReason::PrimaryFailed => "Primary model failed",
            FallbackReason::AllModelsFailed => "All models failed",
            FallbackReason::ServerError => "Server error",
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result shape returned to callers, whichever tier produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub result: String,
    pub model_used: String,
    pub is_fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_stats: Option<TokenUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseEnvelope {
    fn from_model(success: ModelSuccess, reason: Option<FallbackReason>) -> Self {
        Self {
            result: success.text,
            model_used: success.model_id_used,
            is_fallback: reason.is_some(),
            fallback_reason: reason.map(|r| r.as_str().to_string()),
            token_stats: Some(success.usage),
            error: None,
        }
    }

    /// Templated copy for `topic`, tagged with `reason`.
    pub fn templated(company: &CompanyProfile, topic: &Topic, reason: FallbackReason) -> Self {
        Self {
            result: templated_copy(company, topic),
            model_used: TEMPLATED_MODEL_ID.to_string(),
            is_fallback: true,
            fallback_reason: Some(reason.as_str().to_string()),
            token_stats: None,
            error: None,
        }
    }
}

/// A configured model tier.
#[derive(Clone)]
pub struct Tier {
    pub provider: Arc<dyn LlmProvider>,
    pub params: ModelCallParameters,
    pub timeout: Duration,
}

impl Tier {
    pub fn new(provider: Arc<dyn LlmProvider>, params: ModelCallParameters, timeout: Duration) -> Self {
        Self {
            provider,
            params,
            timeout,
        }
    }

    async fn call(&self, prompt: &PromptPair) -> ModelCallResult {
        invoke(self.provider.as_ref(), &self.params, prompt, self.timeout).await
    }
}

/// Position in the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Availability,
    Primary,
    Secondary,
    Templated(FallbackReason),
}

/// Runs the fallback chain. Built once at startup and shared read-only.
#[derive(Clone)]
pub struct FallbackOrchestrator {
    primary: Option<Tier>,
    secondary: Option<Tier>,
    company: CompanyProfile,
}

impl FallbackOrchestrator {
    pub fn new(primary: Option<Tier>, secondary: Option<Tier>) -> Self {
        Self {
            primary,
            secondary,
            company: COMPANY,
        }
    }

    /// Build tiers from configuration. Tiers without a key are left out.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let tier = |kind: TierKind| -> anyhow::Result<Option<Tier>> {
            let tier_config = config.tier(kind);
            Ok(create_provider_from_tier(kind, tier_config)?.map(|provider| {
                Tier::new(provider, tier_config.call_parameters(), tier_config.timeout())
            }))
        };
        Ok(Self::new(tier(TierKind::Primary)?, tier(TierKind::Secondary)?))
    }

    pub fn with_company(mut self, company: CompanyProfile) -> Self {
        self.company = company;
        self
    }

    pub fn company(&self) -> &CompanyProfile {
        &self.company
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    pub fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }

    /// Produce copy for `topic`. Never fails: provider problems only move
    /// the request further down the chain.
    pub async fn generate(&self, topic: &Topic) -> ResponseEnvelope {
        let prompt = PromptPair::build(&self.company, topic);
        let mut stage = Stage::Availability;

        loop {
            tracing::debug!(?stage, topic = %topic, "Fallback stage");
            stage = match stage {
                Stage::Availability => {
                    if self.primary.is_none() && self.secondary.is_none() {
                        Stage::Templated(FallbackReason::NoApiKeys)
                    } else {
                        Stage::Primary
                    }
                }
                Stage::Primary => match &self.primary {
                    None => Stage::Secondary,
                    Some(tier) => match tier.call(&prompt).await {
                        ModelCallResult::Success(success) => {
                            return ResponseEnvelope::from_model(success, None);
                        }
                        ModelCallResult::Failure { message } => {
                            tracing::debug!(model = %tier.params.model_id, "Primary tier failed, trying secondary: {}", message);
                            Stage::Secondary
                        }
                    },
                },
                Stage::Secondary => match &self.secondary {
                    None => Stage::Templated(FallbackReason::AllModelsFailed),
                    Some(tier) => match tier.call(&prompt).await {
                        ModelCallResult::Success(success) => {
                            return ResponseEnvelope::from_model(
                                success,
                                Some(FallbackReason::PrimaryFailed),
                            );
                        }
                        ModelCallResult::Failure { message } => {
                            tracing::debug!(model = %tier.params.model_id, "Secondary tier failed: {}", message);
                            Stage::Templated(FallbackReason::AllModelsFailed)
                        }
                    },
                },
                Stage::Templated(reason) => {
                    tracing::info!(%reason, "Serving templated copy");
                    return ResponseEnvelope::templated(&self.company, topic, reason);
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ProviderRequest, ProviderResponse};
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubProvider {
        reply: Option<&'static str>,
        model: &'static str,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn replying(text: &'static str, model: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(text),
                model,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                model: "broken",
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmProvider for StubProvider {
        async fn send_message(&self, _request: &ProviderRequest) -> Result<ProviderResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let Some(text) = self.reply else {
                anyhow::bail!("simulated provider outage");
            };
            Ok(ProviderResponse {
                id: "stub".to_string(),
                model: self.model.to_string(),
                text: Some(text.to_string()),
                stop_reason: None,
                provider: "stub".to_string(),
                usage: TokenUsage {
                    prompt_tokens: 12,
                    completion_tokens: 34,
                    total_tokens: 46,
                },
            })
        }

        fn name(&self) -> &str {
            "stub"
        }

        fn default_model(&self) -> &str {
            self.model
        }
    }

    fn tier(provider: Arc<StubProvider>, model: &str) -> Tier {
        Tier::new(
            provider,
            ModelCallParameters {
                model_id: model.to_string(),
                max_tokens: 100,
                temperature: 0.5,
            },
            Duration::from_secs(5),
        )
    }

    fn topic(s: &str) -> Topic {
        Topic::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_no_tiers_serves_template() {
        let orchestrator = FallbackOrchestrator::new(None, None);
        let envelope = orchestrator.generate(&topic("web apps")).await;

        assert_eq!(envelope.model_used, "none");
        assert!(envelope.is_fallback);
        assert_eq!(envelope.fallback_reason.as_deref(), Some("No API keys configured"));
        assert!(envelope.token_stats.is_none());
        assert!(envelope.result.contains("web apps"));
    }

    #[tokio::test]
    async fn test_primary_success_skips_secondary() {
        let primary = StubProvider::replying("Primary copy", "gpt-4o-2024-08-06");
        let secondary = StubProvider::replying("Secondary copy", "llama");
        let orchestrator = FallbackOrchestrator::new(
            Some(tier(primary.clone(), "gpt-4o")),
            Some(tier(secondary.clone(), "llama")),
        );

        let envelope = orchestrator.generate(&topic("cloud")).await;

        assert_eq!(envelope.result, "Primary copy");
        assert_eq!(envelope.model_used, "gpt-4o-2024-08-06");
        assert!(!envelope.is_fallback);
        assert!(envelope.fallback_reason.is_none());
        assert_eq!(envelope.token_stats.map(|u| u.total_tokens), Some(46));
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn test_primary_failure_uses_secondary() {
        let primary = StubProvider::failing();
        let secondary = StubProvider::replying("Secondary copy", "llama-3.1-8b-instant");
        let orchestrator = FallbackOrchestrator::new(
            Some(tier(primary.clone(), "gpt-4o")),
            Some(tier(secondary.clone(), "llama-3.1-8b-instant")),
        );

        let envelope = orchestrator.generate(&topic("cloud")).await;

        assert_eq!(envelope.result, "Secondary copy");
        assert_eq!(envelope.model_used, "llama-3.1-8b-instant");
        assert!(envelope.is_fallback);
        assert_eq!(envelope.fallback_reason.as_deref(), Some("Primary model failed"));
        assert!(envelope.token_stats.is_some());
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn test_both_fail_serves_template() {
        let primary = StubProvider::failing();
        let secondary = StubProvider::failing();
        let orchestrator = FallbackOrchestrator::new(
            Some(tier(primary.clone(), "gpt-4o")),
            Some(tier(secondary.clone(), "llama")),
        );

        let t = topic("warehouse robotics");
        let envelope = orchestrator.generate(&t).await;

        assert_eq!(envelope.result, templated_copy(&COMPANY, &t));
        assert!(envelope.result.contains("warehouse robotics"));
        assert_eq!(envelope.model_used, "none");
        assert_eq!(envelope.fallback_reason.as_deref(), Some("All models failed"));
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn test_only_secondary_configured() {
        let secondary = StubProvider::replying("Secondary copy", "llama");
        let orchestrator = FallbackOrchestrator::new(None, Some(tier(secondary.clone(), "llama")));

        let envelope = orchestrator.generate(&topic("cloud")).await;

        assert_eq!(envelope.model_used, "llama");
        assert!(envelope.is_fallback);
        assert_eq!(envelope.fallback_reason.as_deref(), Some("Primary model failed"));
    }

    #[tokio::test]
    async fn test_only_primary_configured_and_failing() {
        let primary = StubProvider::failing();
        let orchestrator = FallbackOrchestrator::new(Some(tier(primary.clone(), "gpt-4o")), None);

        let envelope = orchestrator.generate(&topic("cloud")).await;

        assert_eq!(envelope.model_used, "none");
        assert_eq!(envelope.fallback_reason.as_deref(), Some("All models failed"));
        assert_eq!(primary.calls(), 1);
    }

    #[tokio::test]
    async fn test_generate_is_idempotent_with_stubs() {
        let orchestrator = FallbackOrchestrator::new(
            Some(tier(StubProvider::failing(), "gpt-4o")),
            Some(tier(StubProvider::replying("Same copy", "llama"), "llama")),
        );
        let t = topic("analytics");

        assert_eq!(orchestrator.generate(&t).await, orchestrator.generate(&t).await);
    }

    #[tokio::test]
    async fn test_result_non_empty_across_topics() {
        let orchestrator = FallbackOrchestrator::new(
            Some(tier(StubProvider::failing(), "gpt-4o")),
            None,
        );
        let long = "x".repeat(500);
        for raw in ["a", "cloud migration", "  spaced  ", "émoji ✨", long.as_str()] {
            let envelope = orchestrator.generate(&topic(raw)).await;
            assert!(!envelope.result.is_empty(), "empty result for {raw:?}");
        }
    }

    #[test]
    fn test_envelope_json_shape() {
        let t = topic("apps");
        let envelope = ResponseEnvelope::templated(&COMPANY, &t, FallbackReason::AllModelsFailed);
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["modelUsed"], "none");
        assert_eq!(json["isFallback"], true);
        assert_eq!(json["fallbackReason"], "All models failed");
        assert!(json.get("tokenStats").is_none());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_from_config_skips_unconfigured_tiers() {
        let mut config = Config::default();
        let orchestrator = FallbackOrchestrator::from_config(&config).unwrap();
        assert!(!orchestrator.has_primary());
        assert!(!orchestrator.has_secondary());

        config.primary.api_key = Some("sk-test".to_string());
        let orchestrator = FallbackOrchestrator::from_config(&config).unwrap();
        assert!(orchestrator.has_primary());
        assert!(!orchestrator.has_secondary());
    }
}

// Provider factory
//
// Creates LLM providers from tier configuration

use anyhow::{Context, Result};
use std::sync::Arc;

use super::openai::OpenAIProvider;
use super::LlmProvider;
use crate::config::{TierConfig, TierKind};

/// Create the provider for one tier.
///
/// Returns `Ok(None)` when the tier has no credential, which leaves it
/// unreachable in the fallback chain.
pub fn create_provider_from_tier(
    kind: TierKind,
    tier: &TierConfig,
) -> Result<Option<Arc<dyn LlmProvider>>> {
    let Some(api_key) = tier.credential() else {
        tracing::info!("No API key for {} tier; it will be skipped", kind.label());
        return Ok(None);
    };

    let provider = OpenAIProvider::new(
        api_key.to_string(),
        tier.base_url.clone(),
        tier.model.clone(),
        kind.label().to_string(),
    )?
    .with_timeout(tier.timeout())
    .with_context(|| format!("Failed to create {} provider", kind.label()))?;

    Ok(Some(Arc::new(provider)))
}

// HTTP client for a running copyforge server

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::constants::GENERATE_PATH;
use crate::providers::TokenUsage;

// Slightly above two tier timeouts so the server, not the client, decides.
const REQUEST_TIMEOUT_SECS: u64 = 75;

/// Generated copy with every field filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCopy {
    pub result: String,
    pub model_used: String,
    pub is_fallback: bool,
    pub fallback_reason: Option<String>,
    pub token_stats: Option<TokenUsage>,
}

// Server response as received; any field may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnvelope {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    model_used: Option<String>,
    #[serde(default)]
    is_fallback: Option<bool>,
    #[serde(default)]
    fallback_reason: Option<String>,
    #[serde(default)]
    token_stats: Option<TokenUsage>,
}

impl From<RawEnvelope> for GeneratedCopy {
    fn from(raw: RawEnvelope) -> Self {
        Self {
            result: raw.result.unwrap_or_default(),
            model_used: raw.model_used.unwrap_or_else(|| "unknown".to_string()),
            is_fallback: raw.is_fallback.unwrap_or(false),
            fallback_reason: raw.fallback_reason,
            token_stats: raw.token_stats,
        }
    }
}

pub struct CopyClient {
    client: Client,
    base_url: String,
}

impl CopyClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Request copy for `topic`. Any non-success status is an error that
    /// carries the response body.
    pub async fn generate(&self, topic: &str) -> Result<GeneratedCopy> {
        let url = format!("{}{}", self.base_url, GENERATE_PATH);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "topic": topic }))
            .send()
            .await
            .with_context(|| format!("Failed to reach copyforge server at {}", self.base_url))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Request failed\n\nStatus: {}\nBody: {}", status, error_body);
        }

        let raw: RawEnvelope = response
            .json()
            .await
            .context("Failed to parse copyforge response")?;

        Ok(raw.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generate_returns_full_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GENERATE_PATH)
            .match_body(mockito::Matcher::Json(serde_json::json!({"topic": "cloud"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "result": "Copy",
                    "modelUsed": "gpt-4o",
                    "isFallback": false,
                    "tokenStats": {"promptTokens": 1, "completionTokens": 2, "totalTokens": 3}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let copy = CopyClient::new(server.url())
            .unwrap()
            .generate("cloud")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(copy.result, "Copy");
        assert_eq!(copy.model_used, "gpt-4o");
        assert!(!copy.is_fallback);
        assert_eq!(copy.token_stats.map(|u| u.total_tokens), Some(3));
    }

    #[tokio::test]
    async fn test_missing_fields_get_defaults() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let copy = CopyClient::new(server.url())
            .unwrap()
            .generate("cloud")
            .await
            .unwrap();

        assert_eq!(
            copy,
            GeneratedCopy {
                result: String::new(),
                model_used: "unknown".to_string(),
                is_fallback: false,
                fallback_reason: None,
                token_stats: None,
            }
        );
    }

    #[tokio::test]
    async fn test_error_status_includes_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .with_status(400)
            .with_body(r#"{"error":"No topic provided"}"#)
            .create_async()
            .await;

        let err = CopyClient::new(server.url())
            .unwrap()
            .generate("")
            .await
            .unwrap_err()
            .to_string();

        assert!(err.contains("400"), "got: {err}");
        assert!(err.contains("No topic provided"), "got: {err}");
    }
}

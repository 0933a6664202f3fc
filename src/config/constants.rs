// Project-wide constants
//
// Centralised here so company facts, model ids and call limits have one
// source of truth. Import via `use crate::config::constants::*;`.

/// Default bind address for the HTTP server (localhost only).
pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8000";

/// Path of the generation endpoint.
pub const GENERATE_PATH: &str = "/api/generate";

/// Maximum accepted request body. A topic is a short phrase.
pub const MAX_BODY_BYTES: usize = 16 * 1024;

/// Reported as `modelUsed` when the templated tier answers.
pub const TEMPLATED_MODEL_ID: &str = "none";

/// Primary tier: OpenAI.
pub const PRIMARY_BASE_URL: &str = "https://api.openai.com";
pub const PRIMARY_MODEL: &str = "gpt-4o";
pub const PRIMARY_MAX_TOKENS: u32 = 800;
pub const PRIMARY_TEMPERATURE: f32 = 0.7;

/// Secondary tier: Groq (OpenAI-compatible API).
pub const SECONDARY_BASE_URL: &str = "https://api.groq.com/openai";
pub const SECONDARY_MODEL: &str = "llama-3.1-8b-instant";
pub const SECONDARY_MAX_TOKENS: u32 = 600;
pub const SECONDARY_TEMPERATURE: f32 = 0.6;

/// Upper bound on a single model call, per tier.
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 30;

/// Static facts about the fictional company the copy is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyProfile {
    pub name: &'static str,
    pub founder: &'static str,
    pub tagline: &'static str,
    pub services: &'static [&'static str],
    pub email: &'static str,
    pub phone: &'static str,
    pub website: &'static str,
}

pub const COMPANY: CompanyProfile = CompanyProfile {
    name: "Brightwater Digital",
    founder: "Elena Marsh",
    tagline: "Thoughtful software for growing businesses",
    services: &[
        "Custom web application development",
        "Mobile app design and development",
        "Cloud migration and infrastructure",
        "Data analytics and reporting dashboards",
        "Technical consulting and code audits",
    ],
    email: "hello@brightwater.example",
    phone: "+1 (555) 014-2290",
    website: "https://brightwater.example",
};

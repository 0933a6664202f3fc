// Prompt builder
//
// Turns a validated topic into the system/user message pair sent to every
// model tier. Pure: the same topic always yields the same pair.

use std::fmt;

use crate::config::constants::CompanyProfile;
use crate::error::TopicError;

/// A user-supplied subject, trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic(String);

impl Topic {
    /// Validate raw input. Whitespace-only input is rejected.
    pub fn parse(raw: &str) -> Result<Self, TopicError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TopicError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// System and user prompts for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system_prompt: String,
    pub user_prompt: String,
}

impl PromptPair {
    /// Build the prompt pair for `topic` about `company`.
    pub fn build(company: &CompanyProfile, topic: &Topic) -> Self {
        Self {
            system_prompt: system_prompt(company, topic),
            user_prompt: user_prompt(company, topic),
        }
    }
}

fn system_prompt(company: &CompanyProfile, topic: &Topic) -> String {
    let services = company
        .services
        .iter()
        .map(|s| format!("- {s}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are the marketing copywriter for {name}, founded by {founder}. \
         {name}'s tagline is \"{tagline}\".\n\n\
         Services offered:\n{services}\n\n\
         Contact details:\n\
         - Email: {email}\n\
         - Phone: {phone}\n\
         - Website: {website}\n\n\
         Focus the copy specifically on how {name} helps with \"{topic}\".\n\n\
         Formatting instructions:\n\
         - Write two to four short paragraphs in a warm, professional tone.\n\
         - Mention only services from the list above.\n\
         - End with a call to action that includes the contact email.\n\
         - Plain text only, no markdown headings.",
        name = company.name,
        founder = company.founder,
        tagline = company.tagline,
        email = company.email,
        phone = company.phone,
        website = company.website,
    )
}

fn user_prompt(company: &CompanyProfile, topic: &Topic) -> String {
    format!(
        "Write marketing copy explaining how {} can help a business with {}.",
        company.name, topic
    )
}

use anyhow::{Context, Result};

use crate::providers::{ModelRoster, Provider};
use crate::report::prompts::REPORT_SYSTEM_PROMPT;

/// The `.env.example` placeholder; a key left at this value counts as unset.
const KEY_PLACEHOLDER: &str = "your_api_key_here";

/// Application configuration loaded from environment variables.
/// Resolved once at startup and immutable afterwards; handlers receive it
/// through `AppState` instead of reading the environment ad hoc.
#[derive(Debug, Clone)]
pub struct Config {
    /// Process-wide fallback key for Anthropic requests, if configured.
    pub anthropic_api_key: Option<String>,
    /// Process-wide fallback key for Gemini requests, if configured.
    pub gemini_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Directory the browser client is served from.
    pub static_dir: String,
    /// System prompt for report generation. The built-in text is a business
    /// artifact; `SYSTEM_PROMPT_FILE` swaps it without a code change.
    pub system_prompt: String,
    pub roster: ModelRoster,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let system_prompt = match std::env::var("SYSTEM_PROMPT_FILE") {
            Ok(path) => std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read SYSTEM_PROMPT_FILE '{path}'"))?,
            Err(_) => REPORT_SYSTEM_PROMPT.to_string(),
        };

        Ok(Config {
            anthropic_api_key: optional_key("ANTHROPIC_API_KEY"),
            gemini_api_key: optional_key("GEMINI_API_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string()),
            system_prompt,
            roster: roster_from_env(),
        })
    }

    /// Process-wide fallback credential for the given provider.
    pub fn credential_for(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Anthropic => self.anthropic_api_key.as_deref(),
            Provider::Gemini => self.gemini_api_key.as_deref(),
        }
    }
}

#[cfg(test)]
impl Config {
    pub(crate) fn for_tests() -> Self {
        Config {
            anthropic_api_key: Some("test-anthropic-key".to_string()),
            gemini_api_key: None,
            port: 0,
            rust_log: "info".to_string(),
            static_dir: "public".to_string(),
            system_prompt: "You are an interview consultant.".to_string(),
            roster: ModelRoster::default(),
        }
    }
}

fn optional_key(name: &str) -> Option<String> {
    normalize_key(std::env::var(name).ok())
}

/// Trims a supplied key and treats empty values and the example placeholder
/// as absent. Applied to request-supplied and configured keys alike.
pub(crate) fn normalize_key(raw: Option<String>) -> Option<String> {
    let value = raw?.trim().to_string();
    if value.is_empty() || value == KEY_PLACEHOLDER {
        None
    } else {
        Some(value)
    }
}

/// Model roster defaults with environment overrides, so the supported model
/// lists can change per deployment without a code edit.
fn roster_from_env() -> ModelRoster {
    let mut roster = ModelRoster::default();
    if let Ok(model) = std::env::var("ANTHROPIC_MODEL") {
        if !model.trim().is_empty() {
            roster.anthropic_default = model.trim().to_string();
        }
    }
    if let Ok(model) = std::env::var("GEMINI_MODEL") {
        if !model.trim().is_empty() {
            roster.gemini_default = model.trim().to_string();
        }
    }
    if let Ok(models) = std::env::var("GEMINI_MODELS") {
        let known: Vec<String> = models
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();
        if !known.is_empty() {
            roster.gemini_known = known;
        }
    }
    roster
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key_trims() {
        assert_eq!(
            normalize_key(Some("  sk-ant-123  ".to_string())),
            Some("sk-ant-123".to_string())
        );
    }

    #[test]
    fn test_normalize_key_rejects_placeholder() {
        assert_eq!(normalize_key(Some("your_api_key_here".to_string())), None);
    }

    #[test]
    fn test_normalize_key_rejects_empty_and_absent() {
        assert_eq!(normalize_key(Some("   ".to_string())), None);
        assert_eq!(normalize_key(None), None);
    }
}

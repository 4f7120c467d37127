//! Provider adapters for the two supported text-generation APIs.
//!
//! The provider set is a closed union: adding one means adding a variant
//! here plus its own request/parse module, never deeper string branching at
//! call sites.

pub mod anthropic;
pub mod gemini;
pub mod sse;

use serde::Deserialize;
use thiserror::Error;

/// Upstream call failures. Once the client stream is open, the relay folds
/// these into a terminal `error` event instead of an HTTP status.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Api(String),
}

/// Everything a provider needs to build one streaming generation call.
#[derive(Debug, Clone)]
pub struct ProviderCall {
    pub model: String,
    pub credential: String,
    pub system_prompt: String,
    pub user_prompt: String,
}

/// The two supported chat-completion providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    Gemini,
}

impl Provider {
    /// Model-name dispatch: `gemini*` selects Gemini, everything else
    /// (including no model at all) selects Anthropic.
    pub fn for_model(model: Option<&str>) -> Self {
        match model {
            Some(m) if m.starts_with("gemini") => Provider::Gemini,
            _ => Provider::Anthropic,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Provider::Anthropic => "Anthropic",
            Provider::Gemini => "Gemini",
        }
    }

    /// Maps the requested model identifier onto the roster; unrecognized or
    /// absent names fall back to the provider default.
    pub fn resolve_model(&self, requested: Option<&str>, roster: &ModelRoster) -> String {
        let (known, default) = match self {
            Provider::Anthropic => (&roster.anthropic_known, &roster.anthropic_default),
            Provider::Gemini => (&roster.gemini_known, &roster.gemini_default),
        };
        match requested {
            Some(m) if known.iter().any(|k| k == m) => m.to_string(),
            _ => default.clone(),
        }
    }

    /// Builds the provider-specific streaming POST. The credential rides in
    /// the provider's expected location (header vs. query parameter).
    pub fn build_request(
        &self,
        http: &reqwest::Client,
        call: &ProviderCall,
    ) -> reqwest::RequestBuilder {
        match self {
            Provider::Anthropic => anthropic::build_request(http, call),
            Provider::Gemini => gemini::build_request(http, call),
        }
    }

    /// Extracts the generated text delta from one SSE `data:` payload.
    ///
    /// `None` means nothing to forward. Sentinel lines and payloads that do
    /// not match the provider's delta schema fold to a silent skip by policy.
    pub fn parse_data(&self, payload: &str) -> Option<String> {
        match self {
            Provider::Anthropic => anthropic::parse_data(payload),
            Provider::Gemini => gemini::parse_data(payload),
        }
    }

    /// Turns a non-success upstream response into a human-readable message,
    /// best effort: the provider's own error envelope when the body parses,
    /// a generic status line otherwise.
    pub fn error_message(&self, status: u16, body: &str) -> String {
        serde_json::from_str::<ErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| format!("{} API error: {status}", self.label()))
    }
}

/// Both providers report failures as `{"error": {"message": ...}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Known model names per provider plus the fallback used for unrecognized
/// requests. Carried as configuration so the roster can change per
/// deployment without a code edit.
#[derive(Debug, Clone)]
pub struct ModelRoster {
    pub anthropic_known: Vec<String>,
    pub anthropic_default: String,
    pub gemini_known: Vec<String>,
    pub gemini_default: String,
}

impl Default for ModelRoster {
    fn default() -> Self {
        Self {
            anthropic_known: vec!["claude-3-5-sonnet-20240620".to_string()],
            anthropic_default: "claude-3-5-sonnet-20240620".to_string(),
            gemini_known: vec![
                "gemini-2.5-flash".to_string(),
                "gemini-2.5-pro".to_string(),
                "gemini-2.5-flash-lite".to_string(),
            ],
            gemini_default: "gemini-2.5-flash".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_prefix_selects_gemini() {
        assert_eq!(Provider::for_model(Some("gemini-2.5-pro")), Provider::Gemini);
        assert_eq!(Provider::for_model(Some("gemini")), Provider::Gemini);
    }

    #[test]
    fn test_everything_else_selects_anthropic() {
        assert_eq!(Provider::for_model(Some("claude")), Provider::Anthropic);
        assert_eq!(
            Provider::for_model(Some("claude-3-5-sonnet-20240620")),
            Provider::Anthropic
        );
        assert_eq!(Provider::for_model(None), Provider::Anthropic);
    }

    #[test]
    fn test_known_model_passes_through() {
        let roster = ModelRoster::default();
        assert_eq!(
            Provider::Gemini.resolve_model(Some("gemini-2.5-pro"), &roster),
            "gemini-2.5-pro"
        );
    }

    #[test]
    fn test_unknown_model_falls_back_to_default() {
        let roster = ModelRoster::default();
        assert_eq!(
            Provider::Gemini.resolve_model(Some("gemini-99-ultra"), &roster),
            "gemini-2.5-flash"
        );
        assert_eq!(
            Provider::Anthropic.resolve_model(Some("claude"), &roster),
            "claude-3-5-sonnet-20240620"
        );
        assert_eq!(
            Provider::Anthropic.resolve_model(None, &roster),
            "claude-3-5-sonnet-20240620"
        );
    }

    #[test]
    fn test_error_message_prefers_envelope() {
        let body = r#"{"error": {"type": "authentication_error", "message": "invalid x-api-key"}}"#;
        assert_eq!(
            Provider::Anthropic.error_message(401, body),
            "invalid x-api-key"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        assert_eq!(
            Provider::Gemini.error_message(500, "<html>oops</html>"),
            "Gemini API error: 500"
        );
    }
}

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /api/health
/// Reports whether process-wide provider keys are configured. Booleans
/// only, never the key material itself.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let has_anthropic = state.config.anthropic_api_key.is_some();
    let has_gemini = state.config.gemini_api_key.is_some();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "hasAnthropicKey": has_anthropic,
        "hasGeminiKey": has_gemini,
        "serverApiKey": has_anthropic || has_gemini,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn test_health_reports_key_presence_only() {
        let state = AppState::new(Config::for_tests());
        let Json(body) = health_handler(axum::extract::State(state)).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["hasAnthropicKey"], true);
        assert_eq!(body["hasGeminiKey"], false);
        assert_eq!(body["serverApiKey"], true);
        assert!(body.to_string().find("test-anthropic-key").is_none());
    }
}

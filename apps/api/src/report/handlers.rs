//! Axum route handlers for the Report API.

use axum::{
    extract::State,
    http::header,
    response::{
        sse::{Event, Sse},
        IntoResponse,
    },
    Json,
};
use futures::StreamExt;
use tracing::info;
use uuid::Uuid;

use crate::config::normalize_key;
use crate::errors::AppError;
use crate::providers::{Provider, ProviderCall};
use crate::relay;
use crate::report::{prompt::build_user_prompt, validate, ReportRequest};
use crate::state::AppState;

/// POST /api/generate
///
/// Validates the request, resolves provider and credential, and answers with
/// the normalized `text/event-stream` relay. Failures detected here are
/// plain 4xx JSON; once the stream is open, faults arrive as terminal
/// `error` events instead, since the status line is already on the wire.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate(&request)?;

    let provider = Provider::for_model(request.model.as_deref());

    // Request-supplied key wins; the process-wide key is the fallback.
    let credential = normalize_key(request.api_key.clone())
        .or_else(|| state.config.credential_for(provider).map(str::to_string))
        .ok_or_else(|| {
            AppError::Credential(format!("No {} API key configured", provider.label()))
        })?;

    let model = provider.resolve_model(request.model.as_deref(), &state.config.roster);
    let request_id = Uuid::new_v4();
    info!(
        "report {request_id}: provider={} model={model} companies={}",
        provider.label(),
        request.companies.len()
    );

    let call = ProviderCall {
        model,
        credential,
        system_prompt: state.config.system_prompt.clone(),
        user_prompt: build_user_prompt(&request),
    };

    let events = relay::open_stream(state.http.clone(), provider, call)
        .map(|event| Event::default().json_data(&event));

    Ok(([(header::CACHE_CONTROL, "no-cache")], Sse::new(events)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::report::CompanyTarget;

    fn state() -> AppState {
        // for_tests configures an Anthropic key and no Gemini key
        AppState::new(Config::for_tests())
    }

    fn valid_request() -> ReportRequest {
        ReportRequest {
            resume_text: "Ten years of GMP quality control.".to_string(),
            companies: vec![CompanyTarget {
                name: "Acme".to_string(),
                position: "QC Engineer".to_string(),
                extra: String::new(),
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_empty_resume_is_rejected_before_streaming() {
        let mut request = valid_request();
        request.resume_text = String::new();
        let result = handle_generate(State(state()), Json(request)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_missing_companies_are_rejected_before_streaming() {
        let mut request = valid_request();
        request.companies.clear();
        let result = handle_generate(State(state()), Json(request)).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unconfigured_provider_key_is_a_credential_error() {
        let mut request = valid_request();
        request.model = Some("gemini-2.5-flash".to_string());
        let result = handle_generate(State(state()), Json(request)).await;
        assert!(matches!(result, Err(AppError::Credential(_))));
    }

    #[tokio::test]
    async fn test_placeholder_request_key_does_not_count() {
        let mut request = valid_request();
        request.model = Some("gemini-2.5-flash".to_string());
        request.api_key = Some("your_api_key_here".to_string());
        let result = handle_generate(State(state()), Json(request)).await;
        assert!(matches!(result, Err(AppError::Credential(_))));
    }
}

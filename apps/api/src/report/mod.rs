//! Report generation: request types, prompt assembly, and the streaming
//! generate endpoint.

pub mod handlers;
pub mod prompt;
pub mod prompts;

use serde::Deserialize;

use crate::errors::AppError;

/// One report request as received from the browser form.
///
/// Field presence is deliberately lenient at the serde layer; `validate` is
/// the authoritative check, so a missing field surfaces as a 400 with a
/// readable message rather than a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub companies: Vec<CompanyTarget>,
}

/// A target company / role pair from the form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyTarget {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: String,
    /// Optional free-form note (internships, specifics of the role).
    #[serde(default)]
    pub extra: String,
}

/// Server-side preconditions for opening a report stream. The browser form
/// checks the same things, but this is the authoritative gate.
pub fn validate(request: &ReportRequest) -> Result<(), AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resumeText must not be empty".to_string(),
        ));
    }
    if request.companies.is_empty() {
        return Err(AppError::Validation(
            "at least one target company is required".to_string(),
        ));
    }
    for company in &request.companies {
        if company.name.trim().is_empty() || company.position.trim().is_empty() {
            return Err(AppError::Validation(
                "every company entry needs a name and a position".to_string(),
            ));
        }
    }
    Ok(())
}

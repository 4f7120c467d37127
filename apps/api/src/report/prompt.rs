//! Prompt assembly: a pure function over the validated request.

use super::ReportRequest;

/// Identity used when the form left the candidate name blank.
const DEFAULT_CANDIDATE_NAME: &str = "Applicant";

/// Builds the single user prompt forwarded to the provider.
///
/// Fixed section order: candidate identity line, numbered company targets,
/// raw résumé text. The text is opaque payload; nothing is escaped or
/// sanitized on the way through.
pub fn build_user_prompt(request: &ReportRequest) -> String {
    let name = match request.candidate_name.trim() {
        "" => DEFAULT_CANDIDATE_NAME,
        name => name,
    };

    let mut identity = format!("Candidate: {name}");
    if !request.education.trim().is_empty() {
        identity.push_str(&format!(", Education: {}", request.education.trim()));
    }
    if !request.major.trim().is_empty() {
        identity.push_str(&format!(", Major: {}", request.major.trim()));
    }

    let companies = request
        .companies
        .iter()
        .enumerate()
        .map(|(i, company)| {
            let mut line = format!(
                "{}. Company: {} / Position: {}",
                i + 1,
                company.name,
                company.position
            );
            if !company.extra.trim().is_empty() {
                line.push_str(&format!(" ({})", company.extra.trim()));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{identity}\nTarget companies:\n{companies}\n\nResume:\n{resume}",
        resume = request.resume_text
    )
}

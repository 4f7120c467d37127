//! Gemini streamGenerateContent adapter.
//!
//! Gemini keys do not all accept a separate system instruction, so the
//! system prompt rides at the head of the single user turn. There is no
//! end-of-stream sentinel; the body simply ends.

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use super::ProviderCall;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MAX_OUTPUT_TOKENS: u32 = 32000;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    temperature: f32,
}

/// Streaming POST with the credential as a `key` query parameter.
pub fn build_request(http: &Client, call: &ProviderCall) -> RequestBuilder {
    let combined = format!(
        "{}\n\n### Consulting request ###\n{}",
        call.system_prompt, call.user_prompt
    );
    let body = GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part { text: &combined }],
        }],
        generation_config: GenerationConfig {
            max_output_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        },
    };

    http.post(format!("{API_BASE}/{}:streamGenerateContent", call.model))
        .query(&[("alt", "sse"), ("key", call.credential.as_str())])
        .header("content-type", "application/json")
        .json(&body)
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Pulls the text delta out of one `data:` payload. Anything that does not
/// match the `candidates[0].content.parts[0].text` shape yields `None`.
pub fn parse_data(payload: &str) -> Option<String> {
    let chunk: StreamChunk = serde_json::from_str(payload.trim()).ok()?;
    chunk
        .candidates?
        .into_iter()
        .next()?
        .content?
        .parts?
        .into_iter()
        .next()?
        .text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_extracts_part_text() {
        let payload = r#"{"candidates":[{"content":{"parts":[{"text":"Section 1"}],"role":"model"},"index":0}]}"#;
        assert_eq!(parse_data(payload), Some("Section 1".to_string()));
    }

    #[test]
    fn test_parse_data_skips_chunks_without_text() {
        // Finish chunks carry metadata but no parts
        let payload = r#"{"candidates":[{"finishReason":"STOP","index":0}]}"#;
        assert_eq!(parse_data(payload), None);
        assert_eq!(parse_data(r#"{"usageMetadata":{"totalTokenCount":12}}"#), None);
    }

    #[test]
    fn test_parse_data_skips_malformed_json() {
        assert_eq!(parse_data(r#"{"candidates":["#), None);
        assert_eq!(parse_data(""), None);
    }

    #[test]
    fn test_parse_data_takes_first_candidate_and_part() {
        let payload = r#"{"candidates":[{"content":{"parts":[{"text":"first"},{"text":"second"}]}},{"content":{"parts":[{"text":"other"}]}}]}"#;
        assert_eq!(parse_data(payload), Some("first".to_string()));
    }
}

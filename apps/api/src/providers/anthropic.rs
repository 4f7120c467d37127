//! Anthropic Messages API adapter (streaming).

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use super::ProviderCall;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 8000;

/// End-of-stream sentinel line; carries no payload.
const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    stream: bool,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Streaming POST with the credential in the `x-api-key` header.
pub fn build_request(http: &Client, call: &ProviderCall) -> RequestBuilder {
    let body = MessagesRequest {
        model: &call.model,
        max_tokens: MAX_TOKENS,
        stream: true,
        system: &call.system_prompt,
        messages: vec![Message {
            role: "user",
            content: &call.user_prompt,
        }],
    };

    http.post(API_URL)
        .header("x-api-key", &call.credential)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .header("content-type", "application/json")
        .json(&body)
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(rename = "type")]
    chunk_type: String,
    delta: Option<Delta>,
}

#[derive(Debug, Deserialize)]
struct Delta {
    text: Option<String>,
}

/// Pulls the text delta out of one `data:` payload. Non-delta events and
/// the `[DONE]` sentinel yield `None`, as does anything unparsable.
pub fn parse_data(payload: &str) -> Option<String> {
    let payload = payload.trim();
    if payload == DONE_SENTINEL {
        return None;
    }
    let chunk: StreamChunk = serde_json::from_str(payload).ok()?;
    if chunk.chunk_type != "content_block_delta" {
        return None;
    }
    chunk.delta?.text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_extracts_delta_text() {
        let payload = r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Hello"}}"#;
        assert_eq!(parse_data(payload), Some("Hello".to_string()));
    }

    #[test]
    fn test_parse_data_skips_lifecycle_events() {
        let payload = r#"{"type":"message_start","message":{"id":"msg_1"}}"#;
        assert_eq!(parse_data(payload), None);
        assert_eq!(parse_data(r#"{"type":"ping"}"#), None);
    }

    #[test]
    fn test_parse_data_skips_done_sentinel() {
        assert_eq!(parse_data("[DONE]"), None);
        assert_eq!(parse_data(" [DONE] "), None);
    }

    #[test]
    fn test_parse_data_skips_malformed_json() {
        assert_eq!(parse_data(r#"{"type":"content_block_delta","#), None);
        assert_eq!(parse_data("not json at all"), None);
    }

    #[test]
    fn test_parse_data_skips_delta_without_text() {
        let payload = r#"{"type":"content_block_delta","delta":{"type":"input_json_delta"}}"#;
        assert_eq!(parse_data(payload), None);
    }
}

//! Relay between one upstream provider call and one client event stream.
//!
//! Owns the full lifecycle: open the provider connection, re-frame its
//! proprietary chunk stream into normalized events, and terminate with
//! exactly one `done` or `error` on every path. Nothing is retried; a
//! single provider failure ends the whole client request.

use futures::channel::mpsc;
use futures::{SinkExt, Stream, StreamExt};
use serde::Serialize;
use tracing::{debug, warn};

use crate::providers::{sse::LineBuffer, Provider, ProviderCall, ProviderError};

/// Normalized event re-emitted to the client. Serializes as the outward
/// wire payload carried in each `data:` line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    Text { content: String },
    Done,
    Error { message: String },
}

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Opens the provider call and returns the normalized event stream:
/// zero or more `Text` events followed by exactly one terminal event.
///
/// Dropping the returned stream stops the pump at its next send, which
/// drops the upstream connection with it; no other cleanup exists or is
/// needed.
pub fn open_stream(
    http: reqwest::Client,
    provider: Provider,
    call: ProviderCall,
) -> impl Stream<Item = StreamEvent> {
    let (mut tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let terminal = match pump(&http, provider, &call, &mut tx).await {
            Ok(()) => StreamEvent::Done,
            Err(e) => {
                warn!("{} stream failed: {e}", provider.label());
                StreamEvent::Error {
                    message: e.to_string(),
                }
            }
        };
        // A failed send here means the client already went away.
        let _ = tx.send(terminal).await;
    });

    rx
}

/// The Streaming state body: forwards `Text` events until the upstream body
/// ends cleanly (`Ok`) or the first fatal fault (`Err`). Returns early with
/// `Ok` when the client disconnects, since there is nobody left to tell.
async fn pump(
    http: &reqwest::Client,
    provider: Provider,
    call: &ProviderCall,
    tx: &mut mpsc::Sender<StreamEvent>,
) -> Result<(), ProviderError> {
    let response = provider.build_request(http, call).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api(
            provider.error_message(status.as_u16(), &body),
        ));
    }

    let mut body = response.bytes_stream();
    let mut buffer = LineBuffer::new();

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        for delta in deltas_from_chunk(provider, &mut buffer, &chunk) {
            if tx.send(StreamEvent::Text { content: delta }).await.is_err() {
                debug!("client disconnected, dropping {} stream", provider.label());
                return Ok(());
            }
        }
    }

    Ok(())
}

/// Feeds one raw body chunk through line reassembly and the provider's
/// event parser. Lines without the `data: ` marker and payloads the parser
/// rejects are skipped silently; corrupt individual events never abort the
/// stream.
fn deltas_from_chunk(provider: Provider, buffer: &mut LineBuffer, chunk: &[u8]) -> Vec<String> {
    let mut deltas = Vec::new();
    for line in buffer.push(chunk) {
        if let Some(payload) = line.strip_prefix("data: ") {
            if let Some(text) = provider.parse_data(payload) {
                deltas.push(text);
            }
        }
    }
    deltas
}

//! Line reassembly for provider event-stream bodies.
//!
//! Network reads split the upstream byte stream at arbitrary offsets: one
//! read may close zero, one, or many lines and leave at most one incomplete
//! trailing fragment, which must be retained for the next read.

/// Buffers raw body bytes and yields complete lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `chunk` and returns every line it completes, in order.
    /// Everything after the last newline stays buffered. A trailing `\r`
    /// is stripped so CRLF framing parses the same as bare LF.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let rest = self.pending.split_off(pos + 1);
            let mut line = std::mem::replace(&mut self.pending, rest);
            line.pop(); // the newline itself
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }
}

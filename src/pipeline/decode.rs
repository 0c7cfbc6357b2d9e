//! Streamed chat-completion decoder (lines -> text fragments)
//!
//! Each line of the body is one event. Lines may carry the SSE `data: `
//! envelope, the `[DONE]` sentinel ends the stream, and a malformed line
//! only costs that line.

use super::accumulate::{Accumulator, DecodedStream, Termination};
use super::framing;
use super::sink::DeltaSink;
use crate::{BoxStream, Result};
use bytes::Bytes;
use futures::StreamExt;
use serde_json::Value;

pub const DEFAULT_PREFIX: &str = "data: ";
pub const DEFAULT_DONE_SIGNAL: &str = "[DONE]";

/// Why a single line contributed nothing. Never fatal for the stream.
#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    #[error("Error parsing chunk: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Result of interpreting one line.
#[derive(Debug)]
pub enum LineOutcome {
    /// Blank line, SSE comment or empty `data:` field.
    Ignored,
    /// The end-of-stream sentinel.
    Done,
    /// `choices[0].delta.content` of a chunk; may be empty.
    Delta(String),
    /// A well-formed chunk without content (role announcement, finish reason...).
    Heartbeat,
    Skipped(ChunkError),
}

/// Interprets single lines of an OpenAI-compatible streamed body.
#[derive(Debug, Clone)]
pub struct ChunkDecoder {
    prefix: String,
    done_signal: String,
}

impl Default for ChunkDecoder {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl ChunkDecoder {
    pub fn new(prefix: Option<String>, done_signal: Option<String>) -> Self {
        Self {
            prefix: prefix.unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            done_signal: done_signal.unwrap_or_else(|| DEFAULT_DONE_SIGNAL.to_string()),
        }
    }

    pub fn decode_line(&self, raw: &str) -> LineOutcome {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(':') {
            return LineOutcome::Ignored;
        }
        if line == self.done_signal {
            return LineOutcome::Done;
        }

        let payload = self.strip_prefix(line);
        if payload.is_empty() {
            return LineOutcome::Ignored;
        }
        if payload == self.done_signal {
            return LineOutcome::Done;
        }

        let value: Value = match serde_json::from_str(payload) {
            Ok(v) => v,
            Err(e) => return LineOutcome::Skipped(ChunkError::Parse(e)),
        };
        match extract_content(&value) {
            Ok(Some(content)) => LineOutcome::Delta(content.to_string()),
            Ok(None) => LineOutcome::Heartbeat,
            Err(e) => LineOutcome::Skipped(e),
        }
    }

    fn strip_prefix<'a>(&self, line: &'a str) -> &'a str {
        if let Some(rest) = line.strip_prefix(self.prefix.as_str()) {
            rest
        } else if let Some(rest) = line.strip_prefix(self.prefix.trim_end()) {
            // `data:{..}` and a bare `data:` after trimming
            rest.trim_start()
        } else {
            line
        }
    }
}

fn extract_content(chunk: &Value) -> std::result::Result<Option<&str>, ChunkError> {
    let choices = chunk
        .get("choices")
        .ok_or_else(|| ChunkError::UnexpectedFormat("missing 'choices'".into()))?
        .as_array()
        .ok_or_else(|| ChunkError::UnexpectedFormat("'choices' is not a list".into()))?;
    let first = choices
        .first()
        .ok_or_else(|| ChunkError::UnexpectedFormat("'choices' is empty".into()))?;
    let delta = first
        .get("delta")
        .filter(|d| d.is_object())
        .ok_or_else(|| ChunkError::UnexpectedFormat("missing 'choices[0].delta'".into()))?;

    match delta.get("content") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(ChunkError::UnexpectedFormat(format!(
            "'choices[0].delta.content' is not a string: {}",
            other
        ))),
    }
}

/// Drives a [`ChunkDecoder`] over a whole body, echoing fragments to a sink.
#[derive(Debug, Clone, Default)]
pub struct SseDecoder {
    chunk: ChunkDecoder,
}

impl SseDecoder {
    pub fn new(prefix: Option<String>, done_signal: Option<String>) -> Self {
        Self {
            chunk: ChunkDecoder::new(prefix, done_signal),
        }
    }

    /// Decode already-split lines. Iteration stops at the sentinel.
    pub fn decode_lines<I, S, K>(&self, lines: I, sink: &mut K) -> DecodedStream
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        K: DeltaSink + ?Sized,
    {
        let mut acc = Accumulator::new();
        for line in lines {
            if !acc.apply(self.chunk.decode_line(line.as_ref()), sink) {
                return acc.finish(Termination::Sentinel);
            }
        }
        acc.finish(Termination::EndOfInput)
    }

    /// Decode a response body as it arrives.
    ///
    /// Nothing past the sentinel is polled. A transport error mid-body is
    /// returned as is; fragments already handed to `sink` stay delivered.
    pub async fn decode_stream<K>(
        &self,
        input: BoxStream<'static, Bytes>,
        sink: &mut K,
    ) -> Result<DecodedStream>
    where
        K: DeltaSink + ?Sized,
    {
        let mut lines = framing::lines(input);
        let mut acc = Accumulator::new();
        while let Some(line) = lines.next().await {
            let line = line?;
            if !acc.apply(self.chunk.decode_line(&line), sink) {
                return Ok(acc.finish(Termination::Sentinel));
            }
        }
        Ok(acc.finish(Termination::EndOfInput))
    }
}

use super::decode::LineOutcome;
use super::sink::DeltaSink;

/// How a decoded stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The `[DONE]` sentinel was seen.
    Sentinel,
    /// The body closed without a sentinel.
    EndOfInput,
}

/// Final product of a streamed completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedStream {
    pub content: String,
    /// Chunks that decoded successfully, with or without content.
    pub chunks: usize,
    /// Lines dropped because they were malformed.
    pub skipped: usize,
    pub termination: Termination,
}

/// Reassembles content deltas while forwarding them to a sink.
#[derive(Debug, Default)]
pub struct Accumulator {
    content: String,
    chunks: usize,
    skipped: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one line outcome in. Returns `false` once the stream is done.
    pub fn apply<K>(&mut self, outcome: LineOutcome, sink: &mut K) -> bool
    where
        K: DeltaSink + ?Sized,
    {
        match outcome {
            LineOutcome::Ignored => {}
            LineOutcome::Done => {
                tracing::debug!(chunks = self.chunks, skipped = self.skipped, "stream sentinel received");
                sink.on_done();
                return false;
            }
            LineOutcome::Heartbeat => self.chunks += 1,
            LineOutcome::Delta(delta) => {
                self.chunks += 1;
                if !delta.is_empty() {
                    sink.on_delta(&delta);
                    self.content.push_str(&delta);
                }
            }
            LineOutcome::Skipped(err) => {
                self.skipped += 1;
                tracing::warn!(error = %err, "skipping malformed stream chunk");
                sink.on_skip(&err);
            }
        }
        true
    }

    pub fn finish(self, termination: Termination) -> DecodedStream {
        DecodedStream {
            content: self.content,
            chunks: self.chunks,
            skipped: self.skipped,
            termination,
        }
    }
}

use super::decode::ChunkError;
use std::io::{self, Stdout, Write};

/// Receives decoded output as it arrives.
pub trait DeltaSink {
    /// A non-empty content fragment, in arrival order.
    fn on_delta(&mut self, delta: &str);

    /// A line that was dropped.
    fn on_skip(&mut self, _err: &ChunkError) {}

    /// The end-of-stream sentinel was received.
    fn on_done(&mut self) {}
}

impl<F> DeltaSink for F
where
    F: FnMut(&str),
{
    fn on_delta(&mut self, delta: &str) {
        self(delta)
    }
}

/// Echoes fragments to a terminal as they stream in.
pub struct ConsoleSink<W: Write = Stdout> {
    out: W,
}

impl ConsoleSink<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, args: std::fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(args).and_then(|_| self.out.flush()) {
            tracing::debug!(error = %e, "console write failed");
        }
    }
}

impl<W: Write> DeltaSink for ConsoleSink<W> {
    fn on_delta(&mut self, delta: &str) {
        self.emit(format_args!("{}", delta));
    }

    fn on_skip(&mut self, err: &ChunkError) {
        self.emit(format_args!("\n{}\n", err));
    }

    fn on_done(&mut self) {
        self.emit(format_args!("\n[DONE]\n"));
    }
}

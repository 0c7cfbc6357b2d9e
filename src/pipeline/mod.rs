//! # Streaming Pipeline
//!
//! Turns the streamed body of a chat completion into text.
//!
//! ```text
//! HTTP bytes → framing → decode → accumulate → DecodedStream
//!                 │         │          │
//!               lines    per-line    content +
//!                        outcome     DeltaSink echo
//! ```
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`framing`] | Byte chunks to lines |
//! | [`decode`] | Per-line decoding and whole-body drivers |
//! | [`accumulate`] | Reassembly of content deltas |
//! | [`sink`] | Incremental output consumers |
//!
//! ## Example
//!
//! ```rust
//! use lumimate_client::pipeline::SseDecoder;
//!
//! let lines = [
//!     r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#,
//!     r#"data: {"choices":[{"delta":{"content":", world"}}]}"#,
//!     "data: [DONE]",
//! ];
//! let mut echoed = Vec::new();
//! let out = SseDecoder::default().decode_lines(lines, &mut |d: &str| echoed.push(d.to_string()));
//! assert_eq!(echoed, ["Hello", ", world"]);
//! assert_eq!(out.content, "Hello, world");
//! ```

pub mod accumulate;
pub mod decode;
pub mod framing;
pub mod sink;

pub use accumulate::{Accumulator, DecodedStream, Termination};
pub use decode::{ChunkDecoder, ChunkError, LineOutcome, SseDecoder};
pub use sink::{ConsoleSink, DeltaSink};

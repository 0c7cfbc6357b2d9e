//! # lumimate-client
//!
//! Accessibility clients that send a photo to an OpenAI-compatible
//! multimodal model and stream back a short spoken-style description.
//!
//! ## Overview
//!
//! Two binaries ship with the crate:
//!
//! - `scene-description`: describes the user's surroundings from a
//!   point-of-view photo.
//! - `product-details`: identifies a product, optionally with findings
//!   (text, labels, web entities) from a vision backend.
//!
//! Both build one streamed chat-completion request, echo the answer as it
//! arrives and print the reassembled text at the end.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lumimate_client::{workflow, ChatClient, ClientConfig};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> lumimate_client::Result<()> {
//!     let config = ClientConfig::load(None)?;
//!     let chat = ChatClient::new(&config)?;
//!     let mut out = std::io::stdout();
//!     let decoded = workflow::describe_scene(&chat, Path::new("street.jpg"), &mut out).await?;
//!     println!("{} chunks", decoded.chunks);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`pipeline`] | Streamed response decoding |
//! | [`client`] | Chat-completion and vision backend clients |
//! | [`workflow`] | Scene, product and two-step flows |
//! | [`types`] | Request and findings types |
//! | [`config`] | Endpoint and sampling configuration |
//! | [`cli`] | Shared command-line plumbing |

pub mod cli;
pub mod client;
pub mod config;
pub mod image;
pub mod pipeline;
pub mod prompts;
pub mod transport;
pub mod types;
pub mod workflow;

pub use client::{ChatClient, VisionClient};
pub use config::ClientConfig;
pub use image::ImageInput;
pub use pipeline::{DecodedStream, SseDecoder};
pub use types::{ChatCompletionRequest, Findings};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A pinned, boxed stream of fallible items
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};

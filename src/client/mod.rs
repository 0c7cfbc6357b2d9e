//! Clients for the two remote services.
//!
//! | Type | Endpoint |
//! |------|----------|
//! | [`ChatClient`] | `POST /v1/chat/completions` (streamed) |
//! | [`VisionClient`] | `POST /analyze-product/` (multipart) |

mod chat;
mod vision;

pub use chat::ChatClient;
pub use vision::{VisionClient, IMAGE_FIELD};

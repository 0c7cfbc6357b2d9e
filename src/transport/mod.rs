//! HTTP transport for the chat-completion and vision endpoints.

mod http;

pub use http::{HttpTransport, TransportError};

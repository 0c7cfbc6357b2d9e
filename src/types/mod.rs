//! # Types Module
//!
//! Wire types for the chat-completion request and the vision backend reply.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`message`] | Chat turns with text and image parts |
//! | [`request`] | Streaming chat-completion request body |
//! | [`findings`] | Text, labels and web entities extracted from an image |
//!
//! ## Example
//!
//! ```rust
//! use lumimate_client::types::{ChatMessage, ContentPart, ImageDetail};
//!
//! let system = ChatMessage::system("You describe scenes for blind users.");
//! let user = ChatMessage::user_parts(vec![ContentPart::image_url(
//!     "data:image/jpeg;base64,/9j/4AAQ",
//!     ImageDetail::High,
//! )]);
//! assert!(user.contains_image());
//! # let _ = system;
//! ```

pub mod findings;
pub mod message;
pub mod request;

pub use findings::Findings;
pub use message::{ChatMessage, ContentPart, ImageDetail, ImageUrl, MessageContent, MessageRole};
pub use request::ChatCompletionRequest;

//! Streaming chat-completion client.

use crate::config::ClientConfig;
use crate::image::ImageInput;
use crate::pipeline::{DecodedStream, DeltaSink, SseDecoder};
use crate::prompts;
use crate::transport::HttpTransport;
use crate::types::{ChatCompletionRequest, ChatMessage, ContentPart, ImageDetail};
use crate::Result;
use tracing::{debug, info};
use url::Url;

/// Sends one image (plus optional findings) to a multimodal model and
/// decodes the streamed answer.
#[derive(Debug, Clone)]
pub struct ChatClient {
    transport: HttpTransport,
    url: Url,
    model: String,
    temperature: f64,
    max_tokens: i64,
    detail: ImageDetail,
    decoder: SseDecoder,
}

impl ChatClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Self::with_transport(config, HttpTransport::new(config)?)
    }

    pub fn with_transport(config: &ClientConfig, transport: HttpTransport) -> Result<Self> {
        Ok(Self {
            transport,
            url: config.chat_completions_url()?,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            detail: config.detail,
            decoder: SseDecoder::default(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The product instruction is used whenever findings are present.
    pub fn build_request(&self, image: &ImageInput, findings: Option<&str>) -> ChatCompletionRequest {
        let mut parts = Vec::with_capacity(2);
        if let Some(text) = findings {
            parts.push(ContentPart::text(text));
        }
        parts.push(ContentPart::image_url(image.data_uri(), self.detail));

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(prompts::system_prompt(findings.is_some())),
                ChatMessage::user_parts(parts),
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: true,
        }
    }

    /// Stream a description of `image`, echoing fragments to `sink`.
    pub async fn stream_description<K>(
        &self,
        image: &ImageInput,
        findings: Option<&str>,
        sink: &mut K,
    ) -> Result<DecodedStream>
    where
        K: DeltaSink + ?Sized,
    {
        let request = self.build_request(image, findings);
        let request_id = uuid::Uuid::new_v4().to_string();
        debug!(
            request_id = %request_id,
            url = %self.url,
            model = %self.model,
            image_bytes = image.bytes().len(),
            with_findings = findings.is_some(),
            "sending chat completion request"
        );

        let body = self
            .transport
            .post_json_stream(&self.url, &request, &request_id)
            .await?;
        let decoded = self.decoder.decode_stream(body, sink).await?;

        info!(
            request_id = %request_id,
            chunks = decoded.chunks,
            skipped = decoded.skipped,
            chars = decoded.content.chars().count(),
            termination = ?decoded.termination,
            "chat completion finished"
        );
        Ok(decoded)
    }
}

use crate::config::ClientConfig;
use crate::{BoxStream, Error, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Thin wrapper over a reqwest client with the settings both endpoints share.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        // No timeout unless configured: streamed answers can take a while.
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
        })
    }

    /// POST a JSON body and hand back the response body as a byte stream.
    pub async fn post_json_stream<B: Serialize + ?Sized>(
        &self,
        url: &Url,
        body: &B,
        request_id: &str,
    ) -> Result<BoxStream<'static, Bytes>> {
        let mut req = self
            .client
            .post(url.clone())
            .json(body)
            .header("accept", "text/event-stream")
            .header("x-request-id", request_id);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await.map_err(TransportError::Http)?;
        let resp = check_status(resp).await?;

        let byte_stream = resp
            .bytes_stream()
            .map_err(|e| Error::Transport(TransportError::Http(e)));
        Ok(Box::pin(byte_stream))
    }

    /// POST one file as a multipart form and parse the JSON reply.
    pub async fn post_file(
        &self,
        url: &Url,
        field: &str,
        file_name: String,
        media_type: &str,
        bytes: Vec<u8>,
    ) -> Result<serde_json::Value> {
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(media_type)
            .map_err(|e| Error::configuration(format!("Invalid mime {:?}: {}", media_type, e)))?;
        let form = Form::new().part(field.to_string(), part);

        let mut req = self.client.post(url.clone()).multipart(form);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await.map_err(TransportError::Http)?;
        let resp = check_status(resp).await?;
        let body = resp.text().await.map_err(TransportError::Http)?;
        let json = serde_json::from_str(&body).map_err(TransportError::InvalidBody)?;
        Ok(json)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = match resp.text().await {
        Ok(body) if !body.trim().is_empty() => body,
        _ => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    Err(Error::Remote {
        status: status.as_u16(),
        message,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A successful reply whose body is not the expected JSON.
    #[error("Invalid response body: {0}")]
    InvalidBody(#[source] serde_json::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

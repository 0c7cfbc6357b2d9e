//! Vision backend client (findings extraction).

use crate::config::ClientConfig;
use crate::image::ImageInput;
use crate::transport::HttpTransport;
use crate::types::findings::entry_count;
use crate::types::Findings;
use crate::Result;
use tracing::debug;
use url::Url;

/// Multipart form field the backend reads the upload from.
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Clone)]
pub struct VisionClient {
    transport: HttpTransport,
    url: Url,
}

impl VisionClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Self::with_transport(config, HttpTransport::new(config)?)
    }

    pub fn with_transport(config: &ClientConfig, transport: HttpTransport) -> Result<Self> {
        Ok(Self {
            transport,
            url: config.analyze_product_url()?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Upload `image` and read back text, labels and web entities.
    pub async fn analyze(&self, image: &ImageInput) -> Result<Findings> {
        debug!(url = %self.url, image = %image.path().display(), "calling vision backend");
        let json = self
            .transport
            .post_file(
                &self.url,
                IMAGE_FIELD,
                image.file_name(),
                image.media_type(),
                image.bytes().to_vec(),
            )
            .await?;
        let findings: Findings = serde_json::from_value(json)?;
        debug!(
            text = entry_count(&findings.text),
            labels = entry_count(&findings.labels),
            web_entities = entry_count(&findings.web_entities),
            "vision backend returned findings"
        );
        Ok(findings)
    }
}

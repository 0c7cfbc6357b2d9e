//! Scene description, product summary and the two-step product flow.
//!
//! The `describe_*`/`summarize_*` functions return errors; the `run_*`
//! entry points used by the binaries print them instead, so one failed
//! request never turns into a non-zero exit.

use crate::client::{ChatClient, VisionClient};
use crate::image::ImageInput;
use crate::pipeline::{ConsoleSink, DecodedStream, Termination};
use crate::prompts::PLACEHOLDER_FINDINGS;
use crate::{Error, Result};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Produces the findings text sent alongside a product image.
#[async_trait::async_trait]
pub trait FindingsSource: Send + Sync {
    async fn findings(&self, image: &ImageInput) -> Result<String>;
}

#[async_trait::async_trait]
impl FindingsSource for VisionClient {
    async fn findings(&self, image: &ImageInput) -> Result<String> {
        Ok(self.analyze(image).await?.to_prompt())
    }
}

/// Where `product-details` gets its findings from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductFindings {
    /// Given on the command line.
    Provided(String),
    /// Fixed placeholder, no vision backend call.
    Placeholder,
    /// Ask the vision backend first.
    Backend,
}

impl ProductFindings {
    /// Explicit non-empty findings win over `skip_vision`.
    pub fn from_flags(findings: Option<String>, skip_vision: bool) -> Self {
        match findings {
            Some(f) if !f.is_empty() => ProductFindings::Provided(f),
            _ if skip_vision => ProductFindings::Placeholder,
            _ => ProductFindings::Backend,
        }
    }
}

/// What a failed step was doing, for the console report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SceneDescription,
    ProductSummary,
    VisionBackend,
}

impl Stage {
    fn action(&self) -> &'static str {
        match self {
            Stage::SceneDescription => "sending scene description to API",
            Stage::ProductSummary => "sending product information to API",
            Stage::VisionBackend => "calling vision backend",
        }
    }
}

/// Console line for a failed stage.
pub fn failure_message(stage: Stage, err: &Error) -> String {
    match err {
        Error::ImageNotFound { path } => {
            format!("Error: Image file '{}' not found.", path.display())
        }
        e if e.is_network() => format!("Error {}: {}", stage.action(), e),
        e => format!("Unexpected error: {}", e),
    }
}

pub async fn describe_scene<W: Write>(
    chat: &ChatClient,
    image_path: &Path,
    out: &mut W,
) -> Result<DecodedStream> {
    let image = ImageInput::load(image_path)?;
    writeln!(out, "Sending image to API for scene description...")?;
    stream_and_print(chat, &image, None, "Complete response:", out).await
}

pub async fn summarize_product<W: Write>(
    chat: &ChatClient,
    image_path: &Path,
    findings: &str,
    out: &mut W,
) -> Result<DecodedStream> {
    let image = ImageInput::load(image_path)?;
    summarize_loaded_product(chat, &image, findings, out).await
}

async fn summarize_loaded_product<W: Write>(
    chat: &ChatClient,
    image: &ImageInput,
    findings: &str,
    out: &mut W,
) -> Result<DecodedStream> {
    writeln!(out, "Sending image and findings to API for product identification...")?;
    writeln!(out, "\nFindings: {}\n", findings)?;
    stream_and_print(chat, image, Some(findings), "Complete product description:", out).await
}

async fn stream_and_print<W: Write>(
    chat: &ChatClient,
    image: &ImageInput,
    findings: Option<&str>,
    heading: &str,
    out: &mut W,
) -> Result<DecodedStream> {
    let decoded = {
        let mut sink = ConsoleSink::new(&mut *out);
        chat.stream_description(image, findings, &mut sink).await?
    };
    if decoded.termination == Termination::EndOfInput {
        debug!("stream closed without sentinel");
    }
    writeln!(out, "\n\n{}", heading)?;
    writeln!(out, "{}", decoded.content)?;
    out.flush()?;
    Ok(decoded)
}

/// Print-and-continue wrapper around [`describe_scene`].
pub async fn run_scene_description<W: Write>(
    chat: &ChatClient,
    image_path: &Path,
    out: &mut W,
) -> Option<DecodedStream> {
    let result = describe_scene(chat, image_path, out).await;
    report(Stage::SceneDescription, result, out)
}

/// Print-and-continue wrapper around [`summarize_product`].
pub async fn run_product_summary<W: Write>(
    chat: &ChatClient,
    image_path: &Path,
    findings: &str,
    out: &mut W,
) -> Option<DecodedStream> {
    let result = summarize_product(chat, image_path, findings, out).await;
    report(Stage::ProductSummary, result, out)
}

/// Vision backend first, then the product summary with its findings.
pub async fn run_two_step<W: Write>(
    source: &dyn FindingsSource,
    chat: &ChatClient,
    image_path: &Path,
    out: &mut W,
) -> Option<DecodedStream> {
    let findings = collect_findings(source, image_path, out).await;
    let (image, findings) = report(Stage::VisionBackend, findings, out)?;

    if let Err(e) = writeln!(out, "\nStep 2: Generating product summary with findings...") {
        return report(Stage::ProductSummary, Err(e.into()), out);
    }
    let result = summarize_loaded_product(chat, &image, &findings, out).await;
    report(Stage::ProductSummary, result, out)
}

async fn collect_findings<W: Write>(
    source: &dyn FindingsSource,
    image_path: &Path,
    out: &mut W,
) -> Result<(ImageInput, String)> {
    writeln!(out, "Step 1: Analyzing image to extract text, labels, and web info...")?;
    let image = ImageInput::load(image_path)?;
    let findings = source.findings(&image).await?;
    info!(chars = findings.len(), "findings collected");
    Ok((image, findings))
}

/// Dispatch `product-details` on its findings mode.
pub async fn run_product<W: Write>(
    mode: ProductFindings,
    vision: &dyn FindingsSource,
    chat: &ChatClient,
    image_path: &Path,
    out: &mut W,
) -> Option<DecodedStream> {
    match mode {
        ProductFindings::Provided(findings) => {
            run_product_summary(chat, image_path, &findings, out).await
        }
        ProductFindings::Placeholder => {
            run_product_summary(chat, image_path, PLACEHOLDER_FINDINGS, out).await
        }
        ProductFindings::Backend => run_two_step(vision, chat, image_path, out).await,
    }
}

fn report<T, W: Write>(stage: Stage, result: Result<T>, out: &mut W) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            debug!(stage = ?stage, error = %e, "step failed");
            // Best effort: the console may be what failed.
            let _ = writeln!(out, "{}", failure_message(stage, &e));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use std::path::PathBuf;

    #[test]
    fn findings_flags_precedence() {
        assert_eq!(
            ProductFindings::from_flags(Some("Labels: []".into()), true),
            ProductFindings::Provided("Labels: []".into())
        );
        assert_eq!(
            ProductFindings::from_flags(Some(String::new()), true),
            ProductFindings::Placeholder
        );
        assert_eq!(ProductFindings::from_flags(None, false), ProductFindings::Backend);
    }

    #[test]
    fn failure_messages_follow_error_kind() {
        let missing = Error::ImageNotFound {
            path: PathBuf::from("a.jpg"),
        };
        assert_eq!(
            failure_message(Stage::ProductSummary, &missing),
            "Error: Image file 'a.jpg' not found."
        );

        let net = Error::Transport(TransportError::Other("refused".into()));
        assert_eq!(
            failure_message(Stage::VisionBackend, &net),
            "Error calling vision backend: Network transport error: Transport error: refused"
        );

        let other = Error::configuration("bad");
        assert!(failure_message(Stage::SceneDescription, &other).starts_with("Unexpected error: "));
    }
}

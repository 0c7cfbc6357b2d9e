//! Client configuration
//!
//! Resolution order: built-in defaults, then an optional YAML file, then
//! `LUMIMATE_*` environment variables.

use crate::types::ImageDetail;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use url::Url;

pub const DEFAULT_CHAT_BASE_URL: &str = "http://192.168.1.125:1234";
pub const DEFAULT_VISION_BASE_URL: &str = "http://192.168.1.125:8001";
pub const DEFAULT_MODEL: &str = "openbmb/minicpm-o-2_6";
pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const ANALYZE_PRODUCT_PATH: &str = "/analyze-product/";

/// Endpoint and sampling settings shared by both clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub chat_base_url: String,
    pub vision_base_url: String,
    pub model: String,
    pub temperature: f64,
    /// `-1` asks the server for no limit.
    pub max_tokens: i64,
    pub detail: ImageDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            chat_base_url: DEFAULT_CHAT_BASE_URL.to_string(),
            vision_base_url: DEFAULT_VISION_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            max_tokens: -1,
            detail: ImageDetail::High,
            timeout_secs: None,
            api_key: None,
        }
    }
}

impl ClientConfig {
    /// Load a YAML file; keys it omits keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("failed to read config: {}", e),
                ErrorContext::new().with_source(path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            Error::Configuration { message, context } => Error::Configuration {
                message,
                context: context.with_source(path.display().to_string()),
            },
            other => other,
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            Error::configuration_with_context(
                format!("failed to parse config: {}", e),
                ErrorContext::new().with_details("expected a YAML mapping of client settings"),
            )
        })
    }

    /// Defaults, overlaid by `path` when given, then by the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::from_yaml_file(p)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `LUMIMATE_*` overrides read through `lookup`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("LUMIMATE_CHAT_BASE_URL") {
            self.chat_base_url = v;
        }
        if let Some(v) = lookup("LUMIMATE_VISION_BASE_URL") {
            self.vision_base_url = v;
        }
        if let Some(v) = lookup("LUMIMATE_MODEL") {
            self.model = v;
        }
        if let Some(v) = lookup("LUMIMATE_TEMPERATURE") {
            self.temperature = parse_env("LUMIMATE_TEMPERATURE", &v)?;
        }
        if let Some(v) = lookup("LUMIMATE_MAX_TOKENS") {
            self.max_tokens = parse_env("LUMIMATE_MAX_TOKENS", &v)?;
        }
        if let Some(v) = lookup("LUMIMATE_TIMEOUT_SECS") {
            self.timeout_secs = Some(parse_env("LUMIMATE_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = lookup("LUMIMATE_API_KEY") {
            if !v.is_empty() {
                self.api_key = Some(v);
            }
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        parse_base_url("chat_base_url", &self.chat_base_url)?;
        parse_base_url("vision_base_url", &self.vision_base_url)?;
        if self.model.trim().is_empty() {
            return Err(Error::validation_with_context(
                "model must not be empty",
                ErrorContext::new().with_field_path("model"),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::validation_with_context(
                "temperature out of range",
                ErrorContext::new()
                    .with_field_path("temperature")
                    .with_details(format!("expected 0.0..=2.0, got {}", self.temperature)),
            ));
        }
        Ok(())
    }

    pub fn chat_completions_url(&self) -> Result<Url> {
        endpoint_url("chat_base_url", &self.chat_base_url, CHAT_COMPLETIONS_PATH)
    }

    pub fn analyze_product_url(&self) -> Result<Url> {
        endpoint_url("vision_base_url", &self.vision_base_url, ANALYZE_PRODUCT_PATH)
    }
}

fn parse_env<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| {
        Error::configuration_with_context(
            format!("invalid value {:?}", raw),
            ErrorContext::new()
                .with_field_path(key)
                .with_details(e.to_string())
                .with_source("env"),
        )
    })
}

fn parse_base_url(field: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| {
        Error::validation_with_context(
            format!("invalid URL {:?}", raw),
            ErrorContext::new()
                .with_field_path(field)
                .with_details(e.to_string()),
        )
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::validation_with_context(
            format!("unsupported scheme {:?}", url.scheme()),
            ErrorContext::new().with_field_path(field),
        ));
    }
    Ok(url)
}

fn endpoint_url(field: &str, base: &str, path: &str) -> Result<Url> {
    // Keep any path prefix on the base (e.g. a reverse proxy mount point).
    let joined = format!("{}{}", base.trim_end_matches('/'), path);
    parse_base_url(field, &joined)
}

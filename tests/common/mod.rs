//! Shared fixtures for integration tests

#![allow(dead_code)]

use lumimate_client::ClientConfig;
use std::path::{Path, PathBuf};

/// A throwaway image file removed on drop.
pub struct TempImage {
    path: PathBuf,
}

impl TempImage {
    pub fn new(ext: &str, bytes: &[u8]) -> Self {
        let path = std::env::temp_dir().join(format!("lumimate-test-{}.{}", uuid::Uuid::new_v4(), ext));
        std::fs::write(&path, bytes).expect("write temp image");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempImage {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

pub fn missing_path() -> PathBuf {
    std::env::temp_dir().join(format!("lumimate-missing-{}.jpg", uuid::Uuid::new_v4()))
}

/// Both endpoints pointed at one mock server.
pub fn config_for(base_url: &str) -> ClientConfig {
    ClientConfig {
        chat_base_url: base_url.to_string(),
        vision_base_url: base_url.to_string(),
        ..ClientConfig::default()
    }
}

/// Base URL of a local port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

pub fn delta(content: &str) -> String {
    format!(
        "data: {}",
        serde_json::json!({"choices": [{"delta": {"content": content}, "index": 0}]})
    )
}

/// Build an SSE body, one event per line followed by a blank line.
pub fn sse_body(lines: &[String]) -> String {
    lines.iter().map(|l| format!("{}\n\n", l)).collect()
}

//! Image loading and data-URI encoding

use crate::{Error, Result};
use base64::Engine as _;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const FALLBACK_MEDIA_TYPE: &str = "image/jpeg";

/// An image read from disk, ready to be embedded or uploaded.
#[derive(Debug, Clone)]
pub struct ImageInput {
    path: PathBuf,
    media_type: &'static str,
    bytes: Vec<u8>,
}

impl ImageInput {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::ImageNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::Io(e),
        })?;
        Ok(Self::from_bytes(path, bytes))
    }

    pub fn from_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        let path = path.into();
        let media_type = guess_media_type(&path).unwrap_or(FALLBACK_MEDIA_TYPE);
        Self {
            path,
            media_type,
            bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn media_type(&self) -> &'static str {
        self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string())
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.to_base64())
    }
}

fn guess_media_type(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();
    let mt = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => return None,
    };
    Some(mt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_uses_extension_media_type() {
        let img = ImageInput::from_bytes("shelf.PNG", b"hello".to_vec());
        assert_eq!(img.media_type(), "image/png");
        assert_eq!(img.data_uri(), "data:image/png;base64,aGVsbG8=");
        assert_eq!(img.file_name(), "shelf.PNG");
    }

    #[test]
    fn unknown_extension_falls_back_to_jpeg() {
        let img = ImageInput::from_bytes("capture", vec![0xff, 0xd8, 0xff]);
        assert_eq!(img.media_type(), "image/jpeg");
        assert_eq!(img.to_base64(), "/9j/");
    }

    #[test]
    fn missing_file_is_image_not_found() {
        let path = std::env::temp_dir().join(format!("lumimate-missing-{}.jpg", uuid::Uuid::new_v4()));
        match ImageInput::load(&path) {
            Err(Error::ImageNotFound { path: p }) => assert_eq!(p, path),
            other => panic!("expected ImageNotFound, got {:?}", other),
        }
    }

    #[test]
    fn load_reads_file_contents() {
        let path = std::env::temp_dir().join(format!("lumimate-{}.jpg", uuid::Uuid::new_v4()));
        std::fs::write(&path, b"jpegdata").unwrap();
        let img = ImageInput::load(&path).unwrap();
        assert_eq!(img.bytes(), b"jpegdata");
        assert_eq!(img.media_type(), "image/jpeg");
        std::fs::remove_file(&path).ok();
    }
}

//! Image types shared by extraction, node building, and the query engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Encoding of an image payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
    /// JPEG 2000, as embedded by `JPXDecode` PDF streams.
    Jp2,
}

impl ImageFormat {
    /// Detect the format from magic bytes.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 8 {
            return None;
        }

        if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if bytes.starts_with(b"RIFF") && bytes.len() > 12 && &bytes[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else if bytes.starts_with(&[0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20])
            || bytes.starts_with(&[0xFF, 0x4F, 0xFF, 0x51])
        {
            Some(Self::Jp2)
        } else {
            None
        }
    }

    /// File extension used when the image is persisted.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Jp2 => "jp2",
        }
    }

    /// MIME type for data URLs and HTTP uploads.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Jp2 => "image/jp2",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            "jp2" | "jpx" => Some(Self::Jp2),
            _ => None,
        }
    }
}

/// An image object extracted from a document, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Encoding of `bytes`.
    pub format: ImageFormat,
    /// 1-based page the image was found on, when known.
    pub page: Option<u32>,
}

impl SourceImage {
    /// Create a new source image.
    pub fn new(bytes: Vec<u8>, format: ImageFormat) -> Self {
        Self {
            bytes,
            format,
            page: None,
        }
    }

    /// Set the page the image came from.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

/// Key under which an image is materialized in the image side-channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey {
    pub document_id: String,
    pub index: usize,
}

impl ImageKey {
    /// Create a new image key.
    pub fn new(document_id: impl Into<String>, index: usize) -> Self {
        Self {
            document_id: document_id.into(),
            index,
        }
    }
}

/// Reference to a persisted image, as stored on a retrieval node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageReference(PathBuf);

impl ImageReference {
    /// Create a reference from a path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Path of the persisted image.
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Format guessed from the file extension.
    pub fn format(&self) -> Option<ImageFormat> {
        self.0
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageFormat::from_extension)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&str> for ImageReference {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

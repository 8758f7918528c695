//! Image byte fetching for embedding into the SVG intermediate.
//!
//! The exporter embeds each image as a base64 data URI, so it needs the
//! raw encoded bytes at export time. Fetching is a boundary concern: the
//! engine ships a local-file implementation, network fetchers live with
//! the host application.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::fs;
use std::path::Path;

/// Encoded image format, detected from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    /// MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        None
    }
}

/// Supplies encoded image bytes for a source URL at export time.
pub trait ImageFetcher: Send + Sync {
    /// Fetch the encoded bytes behind a URL. The error string is reported
    /// and the cell falls back to a placeholder; it never aborts export.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, String>;
}

/// Fetcher for local file paths (plain paths or `file://` URLs).
#[derive(Debug, Default)]
pub struct FileFetcher;

impl ImageFetcher for FileFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, String> {
        let path = url.strip_prefix("file://").unwrap_or(url);
        fs::read(Path::new(path)).map_err(|e| format!("read {path}: {e}"))
    }
}

/// Fetcher that refuses everything, for text-only exports.
#[derive(Debug, Default)]
pub struct NoFetcher;

impl ImageFetcher for NoFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, String> {
        Err(format!("image fetching disabled: {url}"))
    }
}

/// Build a data URI from encoded image bytes, sniffing the MIME type.
pub fn data_uri(bytes: &[u8]) -> Option<String> {
    let format = ImageFormat::from_magic_bytes(bytes)?;
    Some(format!(
        "data:{};base64,{}",
        format.mime_type(),
        BASE64.encode(bytes)
    ))
}

//! Image resolution for export.
//!
//! Image elements reference their pixels by `data:` URI or file path. Export
//! decodes each source once and embeds it in the SVG as a data URI, so the
//! rasterizer never touches the filesystem. Remote URLs are not fetched.

use std::io::Cursor;
use std::path::Path;

use base64::Engine;

use crate::error::{RenderError, RenderResult};

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// JPEG (no alpha).
    Jpeg,
    /// WebP (alpha support).
    WebP,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "webp" => Self::WebP,
            _ => Self::Unknown,
        }
    }

    /// Detect format from MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        match mime.to_lowercase().as_str() {
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/webp" => Self::WebP,
            _ => Self::Unknown,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Self::WebP;
        }

        Self::Unknown
    }

    /// MIME type the rasterizer accepts for this format without re-encoding.
    #[must_use]
    pub const fn embeddable_mime(self) -> Option<&'static str> {
        match self {
            Self::Png => Some("image/png"),
            Self::Jpeg => Some("image/jpeg"),
            Self::WebP | Self::Unknown => None,
        }
    }
}

/// A decoded image ready to embed in SVG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Format of the source bytes.
    pub format: ImageFormat,
    /// `data:` URI holding PNG or JPEG bytes.
    pub href: String,
}

/// Read the raw bytes behind an image source.
///
/// Accepts `data:` URIs (base64 or percent-encoded), `file://` URLs and
/// plain filesystem paths.
///
/// # Errors
///
/// Returns [`RenderError::Resource`] for remote URLs, malformed data URIs
/// and unreadable files.
pub fn load_image_bytes(src: &str) -> RenderResult<Vec<u8>> {
    let src = src.trim();
    if src.is_empty() {
        return Err(RenderError::Resource("empty image source".to_string()));
    }
    if src.starts_with("data:") {
        return decode_data_uri(src);
    }
    if src.starts_with("http://") || src.starts_with("https://") {
        return Err(RenderError::Resource(format!(
            "remote image sources are not fetched: {src}"
        )));
    }
    let path = Path::new(src.strip_prefix("file://").unwrap_or(src));
    std::fs::read(path)
        .map_err(|e| RenderError::Resource(format!("Failed to read {}: {e}", path.display())))
}

/// Decode an image source and encode it as an embeddable data URI.
///
/// PNG and JPEG bytes are embedded as-is; other decodable formats are
/// re-encoded as PNG.
///
/// # Errors
///
/// Returns [`RenderError::Resource`] if the source cannot be read or decoded.
pub fn embed_image(src: &str) -> RenderResult<EmbeddedImage> {
    let bytes = load_image_bytes(src)?;
    let format = ImageFormat::from_magic_bytes(&bytes);

    let img = image::load_from_memory(&bytes)
        .map_err(|e| RenderError::Resource(format!("Failed to decode image: {e}")))?;
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(RenderError::Resource("image has no pixels".to_string()));
    }

    let engine = base64::engine::general_purpose::STANDARD;
    let href = if let Some(mime) = format.embeddable_mime() {
        format!("data:{mime};base64,{}", engine.encode(&bytes))
    } else {
        let mut png = Cursor::new(Vec::new());
        img.write_to(&mut png, image::ImageFormat::Png)
            .map_err(|e| RenderError::Resource(format!("Failed to re-encode image: {e}")))?;
        format!("data:image/png;base64,{}", engine.encode(png.into_inner()))
    };

    tracing::trace!("Embedded {width}x{height} {format:?} image");
    Ok(EmbeddedImage {
        width,
        height,
        format,
        href,
    })
}

/// Decode the payload of a `data:` URI.
fn decode_data_uri(uri: &str) -> RenderResult<Vec<u8>> {
    let uri_data = uri
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::Resource("Not a data URI".to_string()))?;

    let (metadata, encoded_data) = uri_data
        .split_once(',')
        .ok_or_else(|| RenderError::Resource("Invalid data URI: missing comma".to_string()))?;

    if metadata.contains(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(encoded_data.trim())
            .map_err(|e| RenderError::Resource(format!("Failed to decode base64: {e}")))
    } else {
        percent_decode(encoded_data)
    }
}

fn percent_decode(input: &str) -> RenderResult<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let byte = input
                .get(i + 1..i + 3)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| RenderError::Resource("Invalid URL encoding".to_string()))?;
            result.push(byte);
            i += 3;
        } else {
            result.push(bytes[i]);
            i += 1;
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 red pixel
    const PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

    #[test]
    fn test_format_detection() {
        assert_eq!(ImageFormat::from_extension("PNG"), ImageFormat::Png);
        assert_eq!(ImageFormat::from_extension("jpeg"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_mime("image/webp"), ImageFormat::WebP);
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            ImageFormat::Jpeg
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(b"RIFF\x00\x00\x00\x00WEBP"),
            ImageFormat::WebP
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF"), ImageFormat::Unknown);
    }

    #[test]
    fn test_embed_base64_png_keeps_bytes() {
        let uri = format!("data:image/png;base64,{PNG_BASE64}");
        let embedded = embed_image(&uri).expect("embed");
        assert_eq!((embedded.width, embedded.height), (1, 1));
        assert_eq!(embedded.format, ImageFormat::Png);
        assert_eq!(embedded.href, uri);
    }

    #[test]
    fn test_percent_encoded_payload() {
        let bytes = decode_data_uri("data:text/plain,a%20b%2Cc").expect("decode");
        assert_eq!(bytes, b"a b,c");
        assert!(decode_data_uri("data:text/plain,%zz").is_err());
        assert!(decode_data_uri("data:image/png").is_err());
    }

    #[test]
    fn test_unreadable_sources() {
        assert!(matches!(
            load_image_bytes("https://example.com/a.png"),
            Err(RenderError::Resource(_))
        ));
        assert!(load_image_bytes("").is_err());
        assert!(load_image_bytes("/definitely/not/here.png").is_err());
        assert!(embed_image("data:image/png;base64,AAAA").is_err());
    }

    #[test]
    fn test_embed_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("pixel.png");
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(PNG_BASE64)
            .expect("base64");
        std::fs::write(&path, bytes).expect("write");

        let plain = embed_image(path.to_str().expect("utf8 path")).expect("plain path");
        let url = embed_image(&format!("file://{}", path.display())).expect("file url");
        assert_eq!(plain, url);
        assert!(plain.href.starts_with("data:image/png;base64,"));
    }
}

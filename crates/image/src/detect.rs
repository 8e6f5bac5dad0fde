//! File type detection from magic bytes and filenames.

use serde::{Deserialize, Serialize};

/// Maximum number of leading bytes inspected when sniffing.
pub const SNIFF_LEN: usize = 512;

/// MIME reported when no signature matches.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Image formats recognized by signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG image
    Png,
    /// JPEG image
    Jpeg,
    /// GIF image
    Gif,
    /// WebP image
    WebP,
    /// BMP image
    Bmp,
    /// Windows icon or cursor
    Ico,
}

impl ImageFormat {
    /// Get the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Ico => "image/x-icon",
        }
    }
}

/// Result of [`detect_file_type`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    /// Sniffed MIME type, or `application/octet-stream`
    pub mime: String,
    /// Lower-cased extension with leading dot, or empty
    pub extension: String,
}

/// Detect an image format from the leading bytes of a file.
///
/// Only the first [`SNIFF_LEN`] bytes are looked at.
///
/// # Example
/// ```
/// use fileshift_image::{ImageFormat, detect_format};
///
/// let jpeg_data = [0xFF, 0xD8, 0xFF, 0xE0];
/// assert_eq!(detect_format(&jpeg_data), Some(ImageFormat::Jpeg));
///
/// let png_data = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
/// assert_eq!(detect_format(&png_data), Some(ImageFormat::Png));
/// ```
pub fn detect_format(data: &[u8]) -> Option<ImageFormat> {
    let data = &data[..data.len().min(SNIFF_LEN)];

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some(ImageFormat::Png);
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(ImageFormat::Jpeg);
    }

    // GIF: GIF87a or GIF89a
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some(ImageFormat::Gif);
    }

    // WebP: RIFF....WEBPVP
    if data.len() >= 14 && data.starts_with(b"RIFF") && &data[8..14] == b"WEBPVP" {
        return Some(ImageFormat::WebP);
    }

    // BMP: BM
    if data.starts_with(b"BM") {
        return Some(ImageFormat::Bmp);
    }

    // ICO / CUR
    if data.starts_with(&[0x00, 0x00, 0x01, 0x00]) || data.starts_with(&[0x00, 0x00, 0x02, 0x00]) {
        return Some(ImageFormat::Ico);
    }

    None
}

/// Sniff the MIME type of a buffer, falling back to `application/octet-stream`.
pub fn sniff_mime(data: &[u8]) -> &'static str {
    detect_format(data).map_or(OCTET_STREAM, |format| format.mime_type())
}

/// Detect the MIME type of `data` and resolve an extension for `filename`.
///
/// The filename's own extension wins when it has one; otherwise the
/// extension is derived from the sniffed MIME type (png, jpg, gif only).
pub fn detect_file_type(data: &[u8], filename: &str) -> Detection {
    let mime = sniff_mime(data);

    let extension = match filename_extension(filename) {
        Some(ext) => ext,
        None => extension_for_mime(mime).to_string(),
    };

    Detection {
        mime: mime.to_string(),
        extension,
    }
}

/// Extension of the last path element, from its last dot, lower-cased.
///
/// A name ending in a bare dot has the extension `"."`.
fn filename_extension(filename: &str) -> Option<String> {
    let name = filename.rsplit('/').next().unwrap_or(filename);
    let dot = name.rfind('.')?;
    Some(name[dot..].to_lowercase())
}

fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/png" => ".png",
        "image/jpeg" => ".jpg",
        "image/gif" => ".gif",
        _ => "",
    }
}

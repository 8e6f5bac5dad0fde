//! PNG/JPEG conversion with the image crate.

use crate::{ConvertError, ImageFormat, Result};
use image::{ColorType, DynamicImage, ImageOutputFormat};
use std::io::{Cursor, Read};

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Output formats the converter can encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    /// Lossless PNG
    Png,
    /// Lossy JPEG
    Jpeg,
}

impl TargetFormat {
    /// Parse a target token such as `png`, `.JPG` or `jpeg`.
    pub fn parse(token: &str) -> Result<Self> {
        let normalized = normalize_token(token);
        match normalized.as_str() {
            "png" => Ok(TargetFormat::Png),
            "jpg" | "jpeg" => Ok(TargetFormat::Jpeg),
            _ => Err(ConvertError::UnsupportedFormat(normalized)),
        }
    }

    /// Canonical MIME type of the encoded output.
    pub fn mime_type(&self) -> &'static str {
        match self {
            TargetFormat::Png => "image/png",
            TargetFormat::Jpeg => "image/jpeg",
        }
    }

    fn name(&self) -> &'static str {
        match self {
            TargetFormat::Png => "png",
            TargetFormat::Jpeg => "jpeg",
        }
    }
}

/// Strip one leading dot and lower-case.
fn normalize_token(token: &str) -> String {
    token.strip_prefix('.').unwrap_or(token).to_lowercase()
}

/// Options for conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// A successfully encoded image.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Encoded output bytes
    pub bytes: Vec<u8>,
    /// MIME type matching the encoder used
    pub mime: &'static str,
    /// Container the input was decoded from
    pub source_format: Option<ImageFormat>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Convert an image stream to `to` with default options.
pub fn convert_image<R: Read>(reader: R, to: &str) -> Result<Conversion> {
    convert_image_with(reader, to, &ConvertOptions::default())
}

/// Convert an image stream to `to`.
pub fn convert_image_with<R: Read>(
    mut reader: R,
    to: &str,
    options: &ConvertOptions,
) -> Result<Conversion> {
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .map_err(|e| ConvertError::Decode(format!("read input: {e}")))?;
    convert_bytes(&data, to, options)
}

/// Convert an in-memory image to `to`.
///
/// The input is always decoded first, so undecodable data fails with
/// [`ConvertError::Decode`] whatever the target.
pub fn convert_bytes(data: &[u8], to: &str, options: &ConvertOptions) -> Result<Conversion> {
    let (img, source) = decode(data)?;
    let target = TargetFormat::parse(to)?;

    let bytes = encode(&img, target, options.jpeg_quality)?;

    tracing::debug!(
        source = ?source,
        width = img.width(),
        height = img.height(),
        target = target.name(),
        output_bytes = bytes.len(),
        "Converted image"
    );

    Ok(Conversion {
        bytes,
        mime: target.mime_type(),
        source_format: source,
        width: img.width(),
        height: img.height(),
    })
}

/// Decode by content, keeping the guessed container.
fn decode(data: &[u8]) -> Result<(DynamicImage, Option<ImageFormat>)> {
    let codec = image::guess_format(data).map_err(|e| ConvertError::Decode(e.to_string()))?;
    let img = image::load_from_memory_with_format(data, codec)
        .map_err(|e| ConvertError::Decode(e.to_string()))?;
    Ok((img, source_format(codec)))
}

fn source_format(codec: image::ImageFormat) -> Option<ImageFormat> {
    match codec {
        image::ImageFormat::Png => Some(ImageFormat::Png),
        image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
        image::ImageFormat::Gif => Some(ImageFormat::Gif),
        image::ImageFormat::WebP => Some(ImageFormat::WebP),
        image::ImageFormat::Bmp => Some(ImageFormat::Bmp),
        image::ImageFormat::Ico => Some(ImageFormat::Ico),
        _ => None,
    }
}

/// Encode a DynamicImage to bytes.
fn encode(img: &DynamicImage, target: TargetFormat, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());

    let result = match target {
        TargetFormat::Png => img.write_to(&mut buffer, ImageOutputFormat::Png),
        TargetFormat::Jpeg => {
            // JPEG has no alpha and only 8-bit samples
            let quality = quality.clamp(1, 100);
            match img.color() {
                ColorType::L8 | ColorType::Rgb8 => {
                    img.write_to(&mut buffer, ImageOutputFormat::Jpeg(quality))
                }
                _ => DynamicImage::ImageRgb8(img.to_rgb8())
                    .write_to(&mut buffer, ImageOutputFormat::Jpeg(quality)),
            }
        }
    };

    result.map_err(|e| ConvertError::Encode {
        format: target.name(),
        message: e.to_string(),
    })?;
    Ok(buffer.into_inner())
}

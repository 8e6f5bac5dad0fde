//! File type detection and raster format conversion for fileshift.
//!
//! This crate provides:
//! - MIME sniffing from magic bytes, with extension resolution
//! - PNG/JPEG re-encoding of any decodable PNG or JPEG input

#![warn(missing_docs)]

mod convert;
mod detect;
mod error;

pub use convert::{
    Conversion, ConvertOptions, DEFAULT_JPEG_QUALITY, TargetFormat, convert_bytes, convert_image,
    convert_image_with,
};
pub use detect::{
    Detection, ImageFormat, OCTET_STREAM, SNIFF_LEN, detect_file_type, detect_format, sniff_mime,
};
pub use error::{ConvertError, Result};

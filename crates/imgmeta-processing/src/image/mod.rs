//! Image decoding module
//!
//! This module provides:
//! - The `DecodedImage` capability trait (decoded)
//! - Decoding through the `image` crate (processor)
//! - EXIF tag reading and rendering through `kamadak-exif` (exif_reader)

pub mod decoded;
pub mod exif_reader;
pub mod processor;

pub use decoded::{DecodedImage, ExifTag, TagRenderError};
pub use processor::{ImageDecodeError, ImageProcessor, RasterImage};

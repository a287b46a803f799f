//! imgmeta Processing Library
//!
//! Decodes fetched objects as images and turns them into the metadata
//! document written as a JSON sidecar.

pub mod image;
pub mod metadata;

pub use crate::image::{
    DecodedImage, ExifTag, ImageDecodeError, ImageProcessor, RasterImage, TagRenderError,
};
pub use metadata::ImageMetadata;

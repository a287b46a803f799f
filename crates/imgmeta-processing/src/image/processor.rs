//! Image processor - decoding and metadata extraction

use crate::metadata::ImageMetadata;
use image::{ColorType, GenericImageView, ImageFormat, ImageReader};
use std::io::Cursor;
use thiserror::Error;

use super::decoded::{DecodedImage, ExifTag};
use super::exif_reader::read_exif_tags;

/// Failure to decode fetched bytes as an image
#[derive(Debug, Error)]
pub enum ImageDecodeError {
    #[error("unrecognized image format")]
    UnknownFormat,

    #[error("failed to read image data: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// An image decoded by [`ImageProcessor`]
#[derive(Debug, Clone)]
pub struct RasterImage {
    width: u32,
    height: u32,
    format: String,
    mode: &'static str,
    exif: Option<Vec<ExifTag>>,
}

impl DecodedImage for RasterImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn format(&self) -> &str {
        &self.format
    }

    fn mode(&self) -> &str {
        self.mode
    }

    fn exif(&self) -> Option<Vec<ExifTag>> {
        self.exif.clone()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ImageProcessor;

impl ImageProcessor {
    /// Decode `data` as an image.
    ///
    /// The pixel data is fully decoded so that truncated or corrupt files are
    /// rejected here. EXIF is read only for formats that can carry it.
    pub fn decode(&self, data: &[u8]) -> Result<RasterImage, ImageDecodeError> {
        let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
        let format = reader.format().ok_or(ImageDecodeError::UnknownFormat)?;
        let img = reader.decode()?;

        let (width, height) = img.dimensions();
        let exif = if supports_exif(format) {
            read_exif_tags(data)
        } else {
            None
        };

        Ok(RasterImage {
            width,
            height,
            format: format_name(format),
            mode: mode_name(img.color()),
            exif,
        })
    }

    /// Decode `data` and build the sidecar document for it.
    pub fn extract_metadata(&self, data: &[u8]) -> Result<ImageMetadata, ImageDecodeError> {
        let image = self.decode(data)?;
        Ok(ImageMetadata::from_image(&image))
    }
}

/// Whether the container format can embed an EXIF block.
pub fn supports_exif(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP | ImageFormat::Tiff
    )
}

/// Upper-case format name as used in the sidecar (`JPEG`, `PNG`, ...).
pub fn format_name(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "JPEG".to_string(),
        ImageFormat::Png => "PNG".to_string(),
        ImageFormat::Gif => "GIF".to_string(),
        ImageFormat::WebP => "WEBP".to_string(),
        ImageFormat::Tiff => "TIFF".to_string(),
        ImageFormat::Bmp => "BMP".to_string(),
        ImageFormat::Ico => "ICO".to_string(),
        other => format!("{:?}", other).to_uppercase(),
    }
}

/// Color mode name (`L`, `LA`, `RGB`, `RGBA`, with bit-depth suffixes for wide formats).
pub fn mode_name(color: ColorType) -> &'static str {
    match color {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "I;16",
        ColorType::La16 => "LA;16",
        ColorType::Rgb16 => "RGB;16",
        ColorType::Rgba16 => "RGBA;16",
        ColorType::Rgb32F => "RGB;32F",
        ColorType::Rgba32F => "RGBA;32F",
        _ => "unknown",
    }
}

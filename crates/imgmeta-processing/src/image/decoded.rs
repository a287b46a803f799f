//! Decoded image capability

use thiserror::Error;

/// Failure to render a single EXIF tag value as text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagRenderError {
    #[error("tag {tag} has unsupported value type {type_id}")]
    UnsupportedType { tag: u16, type_id: u16 },

    #[error("tag {tag} holds text that is not valid UTF-8")]
    InvalidText { tag: u16 },

    #[error("tag {tag} could not be formatted")]
    Format { tag: u16 },
}

/// One EXIF tag as read from the image.
///
/// The value is rendered at read time; a tag whose value cannot be rendered
/// carries the error instead so callers can skip it individually.
#[derive(Debug, Clone, PartialEq)]
pub struct ExifTag {
    pub id: u16,
    pub value: Result<String, TagRenderError>,
}

impl ExifTag {
    pub fn new(id: u16, value: Result<String, TagRenderError>) -> Self {
        Self { id, value }
    }
}

/// An image whose basic properties are known.
///
/// `width`, `height`, `format` and `mode` are always available. EXIF is an
/// optional capability: `exif` returns `None` when the format cannot carry
/// EXIF or the image has no EXIF block.
pub trait DecodedImage {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Container format name, e.g. `JPEG` or `PNG`.
    fn format(&self) -> &str;

    /// Color mode name, e.g. `RGB`, `RGBA` or `L`.
    fn mode(&self) -> &str;

    fn exif(&self) -> Option<Vec<ExifTag>>;
}

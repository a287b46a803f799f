//! Sidecar metadata document

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::image::DecodedImage;

/// Image metadata written as the JSON sidecar.
///
/// The four base properties come first; EXIF tags follow, keyed by the decimal
/// tag number (`"271"` for `Make`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub mode: String,
    #[serde(flatten)]
    pub exif: BTreeMap<String, String>,
}

impl ImageMetadata {
    /// Build the document from a decoded image.
    ///
    /// A tag whose value could not be rendered is logged and left out; the
    /// remaining tags are kept. A repeated tag number takes the later value.
    pub fn from_image(image: &dyn DecodedImage) -> Self {
        let mut exif = BTreeMap::new();

        if let Some(tags) = image.exif() {
            for tag in tags {
                match tag.value {
                    Ok(value) => {
                        exif.insert(tag.id.to_string(), value);
                    }
                    Err(e) => {
                        tracing::warn!(tag_id = tag.id, error = %e, "Skipping EXIF tag");
                    }
                }
            }
        }

        Self {
            width: image.width(),
            height: image.height(),
            format: image.format().to_string(),
            mode: image.mode().to_string(),
            exif,
        }
    }

    /// Indented JSON text of the document.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

//! EXIF extraction via `kamadak-exif`

use std::fmt::Write as _;
use std::io::Cursor;

use exif::{Context, Field, In, Reader, Value};

use super::decoded::{ExifTag, TagRenderError};

/// Read the tags of the primary image directory (IFD0) from an encoded container.
///
/// Fields of the Exif, GPS and Interoperability sub-directories are reported
/// under the primary image too, but their tag numbers overlap, so only fields
/// in the TIFF context are kept. Tags of the embedded thumbnail are skipped.
/// Returns `None` when the data has no EXIF block or the block cannot be parsed.
pub fn read_exif_tags(data: &[u8]) -> Option<Vec<ExifTag>> {
    let exif = match Reader::new().read_from_container(&mut Cursor::new(data)) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return None,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unreadable EXIF block");
            return None;
        }
    };

    let tags: Vec<ExifTag> = exif
        .fields()
        .filter(|field| field.ifd_num == In::PRIMARY && field.tag.context() == Context::Tiff)
        .map(|field| ExifTag::new(field.tag.number(), render_field(field)))
        .collect();

    if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}

/// Render a field value as text.
///
/// ASCII values are emitted as plain text (NUL padding removed, multiple
/// strings joined by newlines); every other type uses the crate's display form.
pub fn render_field(field: &Field) -> Result<String, TagRenderError> {
    let tag = field.tag.number();

    match field.value {
        Value::Unknown(type_id, _, _) => Err(TagRenderError::UnsupportedType { tag, type_id }),
        Value::Ascii(ref strings) => {
            let mut parts = Vec::with_capacity(strings.len());
            for raw in strings {
                let text = std::str::from_utf8(raw)
                    .map_err(|_| TagRenderError::InvalidText { tag })?;
                parts.push(text.trim_end_matches('\0'));
            }
            Ok(parts.join("\n"))
        }
        _ => {
            let mut rendered = String::new();
            write!(rendered, "{}", field.display_value())
                .map_err(|_| TagRenderError::Format { tag })?;
            Ok(rendered)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use exif::Tag;

    /// Little-endian TIFF block with `Make`, `Orientation` and, when
    /// requested, a `Software` entry of an undefined value type.
    pub(crate) fn tiff_block(make: &str, with_unknown_type: bool) -> Vec<u8> {
        let mut make_bytes = make.as_bytes().to_vec();
        make_bytes.push(0);
        assert!(make_bytes.len() > 4, "make must not fit inline");

        let entries: u16 = if with_unknown_type { 3 } else { 2 };
        let data_offset = 8 + 2 + 12 * entries as u32 + 4;

        let mut tiff = Vec::new();
        tiff.extend_from_slice(b"II");
        tiff.extend_from_slice(&42u16.to_le_bytes());
        tiff.extend_from_slice(&8u32.to_le_bytes());
        tiff.extend_from_slice(&entries.to_le_bytes());

        // Make: ASCII stored at data_offset
        tiff.extend_from_slice(&0x010fu16.to_le_bytes());
        tiff.extend_from_slice(&2u16.to_le_bytes());
        tiff.extend_from_slice(&(make_bytes.len() as u32).to_le_bytes());
        tiff.extend_from_slice(&data_offset.to_le_bytes());

        // Orientation: SHORT 1, inline
        tiff.extend_from_slice(&0x0112u16.to_le_bytes());
        tiff.extend_from_slice(&3u16.to_le_bytes());
        tiff.extend_from_slice(&1u32.to_le_bytes());
        tiff.extend_from_slice(&1u16.to_le_bytes());
        tiff.extend_from_slice(&0u16.to_le_bytes());

        if with_unknown_type {
            // Software with type 99, which no EXIF version defines
            tiff.extend_from_slice(&0x0131u16.to_le_bytes());
            tiff.extend_from_slice(&99u16.to_le_bytes());
            tiff.extend_from_slice(&1u32.to_le_bytes());
            tiff.extend_from_slice(&0u32.to_le_bytes());
        }

        // no next IFD
        tiff.extend_from_slice(&0u32.to_le_bytes());
        tiff.extend_from_slice(&make_bytes);
        tiff
    }

    fn push_entry(tiff: &mut Vec<u8>, tag: u16, value_type: u16, count: u32, value: [u8; 4]) {
        tiff.extend_from_slice(&tag.to_le_bytes());
        tiff.extend_from_slice(&value_type.to_le_bytes());
        tiff.extend_from_slice(&count.to_le_bytes());
        tiff.extend_from_slice(&value);
    }

    /// TIFF whose IFD0 holds `Make` plus Exif and GPS pointers. The Exif IFD
    /// points at an Interoperability IFD; it and the GPS IFD both use tag 1.
    fn tiff_with_sub_ifds() -> Vec<u8> {
        const ASCII: u16 = 2;
        const LONG: u16 = 4;
        // IFD0 at 8 (3 entries, 42 bytes), Make text at 50, Exif IFD at 60,
        // Interop IFD at 78, GPS IFD at 96.
        let make = b"Acme Cam\0";

        let mut tiff = Vec::new();
        tiff.extend_from_slice(b"II");
        tiff.extend_from_slice(&42u16.to_le_bytes());
        tiff.extend_from_slice(&8u32.to_le_bytes());

        tiff.extend_from_slice(&3u16.to_le_bytes());
        push_entry(&mut tiff, 0x010f, ASCII, make.len() as u32, 50u32.to_le_bytes());
        push_entry(&mut tiff, 0x8769, LONG, 1, 60u32.to_le_bytes());
        push_entry(&mut tiff, 0x8825, LONG, 1, 96u32.to_le_bytes());
        tiff.extend_from_slice(&0u32.to_le_bytes());
        tiff.extend_from_slice(make);
        tiff.push(0);
        assert_eq!(tiff.len(), 60);

        // Exif IFD: Interoperability pointer only
        tiff.extend_from_slice(&1u16.to_le_bytes());
        push_entry(&mut tiff, 0xa005, LONG, 1, 78u32.to_le_bytes());
        tiff.extend_from_slice(&0u32.to_le_bytes());

        // Interop IFD: InteroperabilityIndex "R98"
        tiff.extend_from_slice(&1u16.to_le_bytes());
        push_entry(&mut tiff, 0x0001, ASCII, 4, *b"R98\0");
        tiff.extend_from_slice(&0u32.to_le_bytes());

        // GPS IFD: GPSLatitudeRef "N"
        tiff.extend_from_slice(&1u16.to_le_bytes());
        push_entry(&mut tiff, 0x0001, ASCII, 2, *b"N\0\0\0");
        tiff.extend_from_slice(&0u32.to_le_bytes());

        tiff
    }

    fn field(tag: Tag, value: Value) -> Field {
        Field {
            tag,
            ifd_num: In::PRIMARY,
            value,
        }
    }

    #[test]
    fn test_render_ascii_without_quotes_or_padding() {
        let f = field(Tag::Make, Value::Ascii(vec![b"Acme Cam\0\0".to_vec()]));
        assert_eq!(render_field(&f).unwrap(), "Acme Cam");
    }

    #[test]
    fn test_render_ascii_invalid_utf8() {
        let f = field(Tag::Model, Value::Ascii(vec![vec![0xff, 0xfe]]));
        assert_eq!(
            render_field(&f),
            Err(TagRenderError::InvalidText { tag: 0x0110 })
        );
    }

    #[test]
    fn test_render_unknown_type_fails() {
        let f = field(Tag::Software, Value::Unknown(99, 1, 0));
        assert_eq!(
            render_field(&f),
            Err(TagRenderError::UnsupportedType {
                tag: 0x0131,
                type_id: 99
            })
        );
    }

    #[test]
    fn test_render_numeric_value() {
        let f = field(Tag::ImageWidth, Value::Long(vec![640]));
        assert_eq!(render_field(&f).unwrap(), "640");
    }

    #[test]
    fn test_read_exif_tags_from_raw_tiff() {
        let tags = read_exif_tags(&tiff_block("Acme Cam", false)).unwrap();

        let make = tags.iter().find(|t| t.id == 0x010f).unwrap();
        assert_eq!(make.value.as_deref(), Ok("Acme Cam"));
        assert!(tags.iter().any(|t| t.id == 0x0112 && t.value.is_ok()));
    }

    #[test]
    fn test_read_exif_tags_keeps_unrenderable_tag_as_error() {
        let tags = read_exif_tags(&tiff_block("Acme Cam", true)).unwrap();

        let software = tags.iter().find(|t| t.id == 0x0131).unwrap();
        assert!(software.value.is_err());
        assert!(tags.iter().any(|t| t.id == 0x010f && t.value.is_ok()));
    }

    #[test]
    fn test_read_exif_tags_only_reports_primary_directory() {
        let data = tiff_with_sub_ifds();

        // the sub-directories are parsed; they just are not reported
        let exif = Reader::new()
            .read_from_container(&mut Cursor::new(&data))
            .unwrap();
        assert!(exif.get_field(Tag::GPSLatitudeRef, In::PRIMARY).is_some());
        assert!(exif.get_field(Tag::InteroperabilityIndex, In::PRIMARY).is_some());

        let tags = read_exif_tags(&data).unwrap();
        let make = tags.iter().find(|t| t.id == 0x010f).unwrap();
        assert_eq!(make.value.as_deref(), Ok("Acme Cam"));
        assert!(!tags.iter().any(|t| t.id == 1));
    }

    #[test]
    fn test_read_exif_tags_none_without_exif() {
        assert!(read_exif_tags(b"not an image").is_none());
        assert!(read_exif_tags(&[]).is_none());
    }
}

use std::collections::BTreeMap;
use std::io::Cursor;

use ::exif::{Exif, Field, In, Reader, Tag, Value};
use tracing::debug;

use crate::error::{ImageError, ImageResult};

/// How a tag's value is turned into a string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagAccessor {
    /// First ASCII string, trailing NULs removed.
    Text,
    /// First value as an unsigned integer.
    Integer,
    /// Human-readable rendering, with a unit where EXIF defines one.
    Display,
    /// Three rationals (degrees, minutes, seconds) as decimal degrees.
    Degrees,
    /// Rationals as `num/denom` joined by commas.
    Rational,
}

/// One entry of the tag table.
#[derive(Clone, Copy, Debug)]
pub struct ExifTag {
    /// Key in the extracted map.
    pub name: &'static str,
    pub tag: Tag,
    pub accessor: TagAccessor,
}

const fn entry(name: &'static str, tag: Tag, accessor: TagAccessor) -> ExifTag {
    ExifTag { name, tag, accessor }
}

/// Tags extracted by [`extract_exif`], version 1.
///
/// Adding or removing an entry changes the output contract; introduce a new
/// table version rather than editing this one.
pub const EXIF_TAGS_V1: &[ExifTag] = &[
    entry("Make", Tag::Make, TagAccessor::Text),
    entry("Model", Tag::Model, TagAccessor::Text),
    entry("Software", Tag::Software, TagAccessor::Text),
    entry("Artist", Tag::Artist, TagAccessor::Text),
    entry("Copyright", Tag::Copyright, TagAccessor::Text),
    entry("ImageDescription", Tag::ImageDescription, TagAccessor::Text),
    entry("DateTime", Tag::DateTime, TagAccessor::Text),
    entry("DateTimeOriginal", Tag::DateTimeOriginal, TagAccessor::Text),
    entry("DateTimeDigitized", Tag::DateTimeDigitized, TagAccessor::Text),
    entry("Orientation", Tag::Orientation, TagAccessor::Integer),
    entry("ImageWidth", Tag::ImageWidth, TagAccessor::Integer),
    entry("ImageLength", Tag::ImageLength, TagAccessor::Integer),
    entry("PixelXDimension", Tag::PixelXDimension, TagAccessor::Integer),
    entry("PixelYDimension", Tag::PixelYDimension, TagAccessor::Integer),
    entry("PhotographicSensitivity", Tag::PhotographicSensitivity, TagAccessor::Integer),
    entry("ExposureTime", Tag::ExposureTime, TagAccessor::Display),
    entry("FNumber", Tag::FNumber, TagAccessor::Display),
    entry("FocalLength", Tag::FocalLength, TagAccessor::Display),
    entry("Flash", Tag::Flash, TagAccessor::Display),
    entry("WhiteBalance", Tag::WhiteBalance, TagAccessor::Display),
    entry("LensModel", Tag::LensModel, TagAccessor::Text),
    entry("GPSLatitudeRef", Tag::GPSLatitudeRef, TagAccessor::Text),
    entry("GPSLatitude", Tag::GPSLatitude, TagAccessor::Degrees),
    entry("GPSLongitudeRef", Tag::GPSLongitudeRef, TagAccessor::Text),
    entry("GPSLongitude", Tag::GPSLongitude, TagAccessor::Degrees),
    entry("GPSAltitude", Tag::GPSAltitude, TagAccessor::Display),
    entry("GPSTimeStamp", Tag::GPSTimeStamp, TagAccessor::Rational),
    entry("GPSDateStamp", Tag::GPSDateStamp, TagAccessor::Text),
];

/// Extract the tags of [`EXIF_TAGS_V1`] from an image.
///
/// Absent tags are omitted. A tag whose value has an unexpected shape is
/// skipped. An image without an EXIF block yields an empty map; bytes that
/// are not an image at all fail with [`ImageError::NotAnImage`].
pub fn extract_exif(bytes: &[u8]) -> ImageResult<BTreeMap<String, String>> {
    image::guess_format(bytes).map_err(|e| ImageError::NotAnImage(e.to_string()))?;

    let exif = match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => exif,
        Err(e) => {
            debug!(error = %e, "no readable EXIF block");
            return Ok(BTreeMap::new());
        }
    };

    let mut out = BTreeMap::new();
    for spec in EXIF_TAGS_V1 {
        let Some(field) = exif.get_field(spec.tag, In::PRIMARY) else {
            continue;
        };
        match render(&exif, field, spec.accessor) {
            Some(value) => {
                out.insert(spec.name.to_string(), value);
            }
            None => debug!(tag = spec.name, "skipping EXIF tag with unexpected value"),
        }
    }
    Ok(out)
}

fn render(exif: &Exif, field: &Field, accessor: TagAccessor) -> Option<String> {
    match accessor {
        TagAccessor::Text => match &field.value {
            Value::Ascii(strings) => {
                let raw = strings.first()?;
                let text = String::from_utf8_lossy(raw);
                Some(text.trim_end_matches('\0').to_string())
            }
            _ => None,
        },
        TagAccessor::Integer => field.value.get_uint(0).map(|v| v.to_string()),
        TagAccessor::Display => Some(field.display_value().with_unit(exif).to_string()),
        TagAccessor::Degrees => match &field.value {
            Value::Rational(parts) if parts.len() == 3 => {
                if parts.iter().any(|r| r.denom == 0) {
                    return None;
                }
                let deg = parts[0].to_f64() + parts[1].to_f64() / 60.0 + parts[2].to_f64() / 3600.0;
                Some(format!("{deg:.6}"))
            }
            _ => None,
        },
        TagAccessor::Rational => match &field.value {
            Value::Rational(parts) if !parts.is_empty() => Some(
                parts
                    .iter()
                    .map(|r| format!("{}/{}", r.num, r.denom))
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::exif::experimental::Writer;
    use ::exif::Rational;
    use image::{ImageEncoder, Rgb, RgbImage};

    fn plain_jpeg() -> Vec<u8> {
        let img = RgbImage::from_pixel(4, 4, Rgb([200, 10, 10]));
        let mut out = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, 90)
            .write_image(img.as_raw(), 4, 4, image::ExtendedColorType::Rgb8)
            .unwrap();
        out
    }

    fn field(tag: Tag, value: Value) -> Field {
        Field {
            tag,
            ifd_num: In::PRIMARY,
            value,
        }
    }

    /// A JPEG with an APP1 EXIF segment holding `fields`.
    fn jpeg_with_exif(fields: &[Field]) -> Vec<u8> {
        let mut writer = Writer::new();
        for f in fields {
            writer.push_field(f);
        }
        let mut tiff = Cursor::new(Vec::new());
        writer.write(&mut tiff, false).unwrap();
        let tiff = tiff.into_inner();

        let jpeg = plain_jpeg();
        let seg_len = (2 + 6 + tiff.len()) as u16;
        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&seg_len.to_be_bytes());
        out.extend_from_slice(b"Exif\0\0");
        out.extend_from_slice(&tiff);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn table_names_are_unique() {
        let mut names: Vec<_> = EXIF_TAGS_V1.iter().map(|t| t.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), EXIF_TAGS_V1.len());
    }

    #[test]
    fn image_without_exif_yields_empty_map() {
        assert!(extract_exif(&plain_jpeg()).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_not_an_image() {
        let err = extract_exif(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ImageError::NotAnImage(_)));
    }

    #[test]
    fn extracts_present_tags_only() {
        let bytes = jpeg_with_exif(&[
            field(Tag::Make, Value::Ascii(vec![b"Acme".to_vec()])),
            field(Tag::Model, Value::Ascii(vec![b"Snap 3000".to_vec()])),
            field(Tag::Orientation, Value::Short(vec![6])),
        ]);
        let tags = extract_exif(&bytes).unwrap();
        assert_eq!(tags.get("Make").map(String::as_str), Some("Acme"));
        assert_eq!(tags.get("Model").map(String::as_str), Some("Snap 3000"));
        assert_eq!(tags.get("Orientation").map(String::as_str), Some("6"));
        assert!(!tags.contains_key("Artist"));
        assert!(tags.values().all(|v| !v.is_empty()));
    }

    #[test]
    fn gps_coordinates_as_decimal_degrees() {
        let bytes = jpeg_with_exif(&[
            field(Tag::GPSLatitudeRef, Value::Ascii(vec![b"N".to_vec()])),
            field(
                Tag::GPSLatitude,
                Value::Rational(vec![
                    Rational { num: 51, denom: 1 },
                    Rational { num: 30, denom: 1 },
                    Rational { num: 36, denom: 1 },
                ]),
            ),
        ]);
        let tags = extract_exif(&bytes).unwrap();
        assert_eq!(tags.get("GPSLatitudeRef").map(String::as_str), Some("N"));
        assert_eq!(tags.get("GPSLatitude").map(String::as_str), Some("51.510000"));
    }

    #[test]
    fn malformed_tag_is_skipped_not_fatal() {
        // Orientation stored as ASCII cannot be rendered as an integer.
        let bytes = jpeg_with_exif(&[
            field(Tag::Make, Value::Ascii(vec![b"Acme".to_vec()])),
            field(Tag::Orientation, Value::Ascii(vec![b"sideways".to_vec()])),
        ]);
        let tags = extract_exif(&bytes).unwrap();
        assert_eq!(tags.get("Make").map(String::as_str), Some("Acme"));
        assert!(!tags.contains_key("Orientation"));
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::affine::Affine;
use crate::error::{ImageError, ImageResult};

/// Output encoding of a transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageEncoding {
    #[default]
    Jpeg,
    Png,
    Webp,
}

impl ImageEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }
}

impl FromStr for ImageEncoding {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::Webp),
            other => Err(ImageError::InvalidTransform(format!(
                "unknown encoding {other:?}"
            ))),
        }
    }
}

impl fmt::Display for ImageEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pixel dimensions of an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Parameters of [`transform`](crate::transform()).
///
/// Missing `width`/`height` default to the source dimensions, a missing
/// matrix is the identity, and `quality` (0.0 to 1.0) defaults to 1.0.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Row-major 3×3 matrix mapping source to canvas coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<[f32; 9]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f32>,
    #[serde(default)]
    pub encoding: ImageEncoding,
}

impl TransformSpec {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_matrix(mut self, matrix: [f32; 9]) -> Self {
        self.matrix = Some(matrix);
        self
    }

    pub fn with_encoding(mut self, encoding: ImageEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Encoder quality as an integer percentage.
    ///
    /// Fails with [`ImageError::InvalidTransform`] unless the quality lies in
    /// `0.0..=1.0`; NaN and infinities are rejected.
    pub fn quality_percent(&self) -> ImageResult<u8> {
        let q = self.quality.unwrap_or(1.0);
        if !(0.0..=1.0).contains(&q) {
            return Err(ImageError::InvalidTransform(format!(
                "quality {q} outside 0.0..=1.0"
            )));
        }
        Ok((q * 100.0).round() as u8)
    }
}

/// Parameters of [`resize`](crate::resize()).
///
/// `fill == false` scales the image to fit inside `max_width × max_height`
/// keeping its aspect ratio. `fill == true` scales it to cover the box and
/// crops the overflow evenly on both sides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResizeSpec {
    pub max_width: u32,
    pub max_height: u32,
    #[serde(default)]
    pub fill: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f32>,
    #[serde(default)]
    pub encoding: ImageEncoding,
}

impl ResizeSpec {
    pub fn fit(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
            fill: false,
            quality: None,
            encoding: ImageEncoding::default(),
        }
    }

    pub fn fill(max_width: u32, max_height: u32) -> Self {
        Self {
            fill: true,
            ..Self::fit(max_width, max_height)
        }
    }

    /// Lower onto a [`TransformSpec`] for a source of `source` dimensions.
    pub fn to_transform(&self, source: ImageSize) -> TransformSpec {
        let sx = self.max_width as f64 / source.width.max(1) as f64;
        let sy = self.max_height as f64 / source.height.max(1) as f64;
        let scale = if self.fill { sx.max(sy) } else { sx.min(sy) };

        let mut width = source.width as f64 * scale;
        let mut height = source.height as f64 * scale;
        let (mut tx, mut ty) = (0.0, 0.0);
        if self.fill {
            if width > self.max_width as f64 {
                tx = -(width - self.max_width as f64) / 2.0;
                width = self.max_width as f64;
            }
            if height > self.max_height as f64 {
                ty = -(height - self.max_height as f64) / 2.0;
                height = self.max_height as f64;
            }
        }

        let matrix = Affine::scale(scale, scale).then(&Affine::translate(tx, ty));
        TransformSpec {
            width: Some((width as u32).max(1)),
            height: Some((height as u32).max(1)),
            matrix: Some(matrix.to_row_major()),
            quality: self.quality,
            encoding: self.encoding,
        }
    }
}

/// Bytes of an encoded image and their MIME type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_defaults_to_100() {
        assert_eq!(TransformSpec::default().quality_percent().unwrap(), 100);
        assert_eq!(TransformSpec::default().with_quality(0.85).quality_percent().unwrap(), 85);
        assert_eq!(TransformSpec::default().with_quality(0.0).quality_percent().unwrap(), 0);
    }

    #[test]
    fn quality_outside_unit_range_is_rejected() {
        for q in [-0.1, 1.5, f32::NAN, f32::INFINITY] {
            let err = TransformSpec::default().with_quality(q).quality_percent().unwrap_err();
            assert!(matches!(err, ImageError::InvalidTransform(_)), "quality {q}");
        }
    }

    #[test]
    fn encoding_defaults_to_jpeg() {
        let spec: TransformSpec = serde_json::from_str("{}").unwrap();
        assert_eq!(spec.encoding, ImageEncoding::Jpeg);
        assert_eq!(spec.encoding.mime_type(), "image/jpeg");
        assert!("gif".parse::<ImageEncoding>().is_err());
    }

    #[test]
    fn fit_keeps_aspect_inside_box() {
        let t = ResizeSpec::fit(100, 100).to_transform(ImageSize { width: 400, height: 200 });
        assert_eq!((t.width, t.height), (Some(100), Some(50)));
        let m = t.matrix.unwrap();
        assert_eq!(m[0], 0.25);
        assert_eq!((m[2], m[5]), (0.0, 0.0));
    }

    #[test]
    fn fill_covers_box_and_centers_crop() {
        let t = ResizeSpec::fill(100, 100).to_transform(ImageSize { width: 400, height: 200 });
        assert_eq!((t.width, t.height), (Some(100), Some(100)));
        let m = t.matrix.unwrap();
        // scale 0.5 gives 200×100, so 50 px are cut on each side horizontally.
        assert_eq!(m[0], 0.5);
        assert_eq!(m[2], -50.0);
        assert_eq!(m[5], 0.0);
    }

    #[test]
    fn resize_spec_from_json() {
        let spec: ResizeSpec =
            serde_json::from_str(r#"{"max_width":64,"max_height":32,"fill":true,"encoding":"png"}"#)
                .unwrap();
        assert!(spec.fill);
        assert_eq!(spec.encoding, ImageEncoding::Png);
    }
}

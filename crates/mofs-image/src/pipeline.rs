use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader, Rgba, RgbaImage};
use mofs_types::{NoopObserver, Observer, OpTimer};
use tracing::debug;

use crate::affine::Affine;
use crate::error::{ImageError, ImageResult};
use crate::exif_tags::extract_exif;
use crate::options::{EncodedImage, ImageEncoding, ImageSize, ResizeSpec, TransformSpec};

const COMPONENT: &str = "image";

/// Largest canvas a transform may allocate, in pixels (1 GiB of RGBA).
pub const MAX_CANVAS_PIXELS: u64 = 1 << 28;

/// Dimensions of an encoded image, read from its header.
pub fn image_size(bytes: &[u8]) -> ImageResult<ImageSize> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImageError::NotAnImage(e.to_string()))?
        .into_dimensions()
        .map_err(|e| ImageError::NotAnImage(e.to_string()))?;
    Ok(ImageSize { width, height })
}

fn decode(bytes: &[u8]) -> ImageResult<RgbaImage> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| ImageError::NotAnImage(e.to_string()))
}

/// Paint `bytes` onto a new canvas through `spec.matrix` and encode it.
///
/// Every canvas pixel center is mapped back through the inverse matrix and
/// takes the nearest source pixel. Canvas pixels whose preimage falls
/// outside the source stay transparent.
pub fn transform(bytes: &[u8], spec: &TransformSpec) -> ImageResult<EncodedImage> {
    let quality = spec.quality_percent()?;
    let source = decode(bytes)?;
    let width = spec.width.unwrap_or(source.width());
    let height = spec.height.unwrap_or(source.height());
    if width == 0 || height == 0 {
        return Err(ImageError::InvalidTransform(format!(
            "empty canvas {width}x{height}"
        )));
    }
    if u64::from(width) * u64::from(height) > MAX_CANVAS_PIXELS {
        return Err(ImageError::InvalidTransform(format!(
            "canvas {width}x{height} exceeds {MAX_CANVAS_PIXELS} pixels"
        )));
    }

    let matrix = spec.matrix.map(Affine::from_row_major).unwrap_or_default();
    let inverse = matrix
        .inverse()
        .ok_or_else(|| ImageError::InvalidTransform("matrix is not invertible".into()))?;

    let canvas = render(&source, &inverse, width, height);
    debug!(
        src_w = source.width(),
        src_h = source.height(),
        width,
        height,
        encoding = %spec.encoding,
        "image rendered"
    );
    encode(&canvas, spec.encoding, quality)
}

fn render(source: &RgbaImage, inverse: &Affine, width: u32, height: u32) -> RgbaImage {
    let (sw, sh) = (source.width() as f64, source.height() as f64);
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let Some((sx, sy)) = inverse.apply(x as f64 + 0.5, y as f64 + 0.5) else {
            continue;
        };
        if sx < 0.0 || sy < 0.0 || sx >= sw || sy >= sh {
            continue;
        }
        *pixel = *source.get_pixel(sx as u32, sy as u32);
    }
    canvas
}

/// Encode an RGBA canvas.
///
/// JPEG has no alpha channel, so the canvas is flattened to RGB and
/// transparent areas turn black. PNG ignores `quality`; WebP is written
/// lossless and ignores it as well.
pub fn encode(canvas: &RgbaImage, encoding: ImageEncoding, quality: u8) -> ImageResult<EncodedImage> {
    let (w, h) = canvas.dimensions();
    let mut out = Vec::new();
    let result = match encoding {
        ImageEncoding::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(canvas.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut out, quality.max(1)).write_image(
                rgb.as_raw(),
                w,
                h,
                ExtendedColorType::Rgb8,
            )
        }
        ImageEncoding::Png => {
            PngEncoder::new(&mut out).write_image(canvas.as_raw(), w, h, ExtendedColorType::Rgba8)
        }
        ImageEncoding::Webp => WebPEncoder::new_lossless(&mut out).write_image(
            canvas.as_raw(),
            w,
            h,
            ExtendedColorType::Rgba8,
        ),
    };
    result.map_err(|e| ImageError::Encode {
        encoding: encoding.as_str(),
        reason: e.to_string(),
    })?;
    Ok(EncodedImage {
        bytes: out,
        mime_type: encoding.mime_type(),
    })
}

/// Scale to fit or fill a bounding box; see [`ResizeSpec`].
pub fn resize(bytes: &[u8], spec: &ResizeSpec) -> ImageResult<EncodedImage> {
    let size = image_size(bytes)?;
    transform(bytes, &spec.to_transform(size))
}

/// Observed entry point for the image operations.
pub struct ImagePipeline {
    observer: Arc<dyn Observer>,
}

impl ImagePipeline {
    pub fn new(observer: Arc<dyn Observer>) -> Self {
        Self { observer }
    }

    pub fn size(&self, bytes: &[u8]) -> ImageResult<ImageSize> {
        let timer = OpTimer::start(COMPONENT, "size", format!("{} bytes", bytes.len()));
        let result = image_size(bytes);
        timer.finish(&*self.observer, &result, |_| Some(bytes.len() as u64));
        result
    }

    pub fn exif(&self, bytes: &[u8]) -> ImageResult<BTreeMap<String, String>> {
        let timer = OpTimer::start(COMPONENT, "exif", format!("{} bytes", bytes.len()));
        let result = extract_exif(bytes);
        timer.finish(&*self.observer, &result, |_| Some(bytes.len() as u64));
        result
    }

    pub fn transform(&self, bytes: &[u8], spec: &TransformSpec) -> ImageResult<EncodedImage> {
        let timer = OpTimer::start(COMPONENT, "transform", spec.encoding.as_str());
        let result = transform(bytes, spec);
        timer.finish(&*self.observer, &result, |img| Some(img.bytes.len() as u64));
        result
    }

    pub fn resize(&self, bytes: &[u8], spec: &ResizeSpec) -> ImageResult<EncodedImage> {
        let timer = OpTimer::start(COMPONENT, "resize", spec.encoding.as_str());
        let result = resize(bytes, spec);
        timer.finish(&*self.observer, &result, |img| Some(img.bytes.len() as u64));
        result
    }
}

impl Default for ImagePipeline {
    fn default() -> Self {
        Self::new(Arc::new(NoopObserver))
    }
}

impl std::fmt::Debug for ImagePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePipeline").finish_non_exhaustive()
    }
}

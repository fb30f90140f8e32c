//! Image transform pipeline for MoFs.
//!
//! Decodes image bytes, paints them onto a fresh canvas through a 3×3
//! transform, and re-encodes the canvas to JPEG, PNG, or WebP.
//!
//! # Key Types
//!
//! - [`TransformSpec`]: Canvas size, matrix, encoding, and quality
//! - [`ResizeSpec`]: Fit/fill resize, lowered onto a [`TransformSpec`]
//! - [`Affine`]: Row-major 3×3 matrix in homogeneous coordinates
//! - [`ImagePipeline`]: Observed entry point for every operation
//! - [`EXIF_TAGS_V1`]: The versioned table of extracted EXIF tags
//!
//! # Design Rules
//!
//! 1. Rendering always targets a newly allocated, fully transparent canvas.
//!    Canvas pixels the transformed source does not cover stay transparent
//!    (black once flattened for JPEG).
//! 2. The set of EXIF tags is fixed by [`EXIF_TAGS_V1`]; a tag that fails to
//!    render is skipped, never fatal.

pub mod affine;
pub mod error;
pub mod exif_tags;
pub mod options;
pub mod pipeline;

pub use affine::Affine;
pub use error::{ImageError, ImageResult};
pub use exif_tags::{extract_exif, ExifTag, TagAccessor, EXIF_TAGS_V1};
pub use options::{EncodedImage, ImageEncoding, ImageSize, ResizeSpec, TransformSpec};
pub use pipeline::{encode, image_size, resize, transform, ImagePipeline, MAX_CANVAS_PIXELS};

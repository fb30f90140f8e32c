//! Resource URI router for MoFs.
//!
//! Maps `scheme://authority/<area>/<rest>` identifiers onto exactly one
//! backing store and opens a read-only stream over it:
//!
//! | area    | backing store                          |
//! |---------|----------------------------------------|
//! | `files` | application file directory (confined)  |
//! | `cache` | application cache directory (confined) |
//! | `root`  | the whole filesystem                   |
//! | `blob`  | the blob store, streamed through a pipe |
//!
//! Blob streams are fed by a producer thread over a bounded channel. The
//! producer always drops its sender when it finishes or the reader goes
//! away, so a reader sees end-of-stream and never blocks forever.

pub mod error;
pub mod mime;
pub mod pipe;
pub mod router;
pub mod uri;

pub use error::{ProviderError, ProviderResult};
pub use mime::mime_type_for_path;
pub use pipe::{spawn_pipe, PipeReader};
pub use router::{OpenedResource, ResourceReader, Router, RouterConfig};
pub use uri::{Area, ResourceUri};

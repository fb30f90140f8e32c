use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mofs_crypto::{BlobInfo, CipherDirection, CryptoEngine};
use mofs_fs::{ByteRange, FileAccessor};
use mofs_image::{EncodedImage, ImagePipeline, ImageSize, ResizeSpec, TransformSpec};
use mofs_provider::{mime_type_for_path, OpenedResource, ResourceUri, Router};
use mofs_store::{BlobStore, InMemoryBlobStore};
use mofs_types::{
    BlobId, BlobRef, FileStat, Observer, PermissionMode, TracingObserver, TwoTierPermissions,
    OCTET_STREAM,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::MoFsConfig;
use crate::constants::Constants;
use crate::encoding::BlobEncoding;
use crate::error::{SdkError, SdkResult};

/// Where an operation takes its input bytes from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobSource {
    /// The whole content of a file.
    Path(PathBuf),
    /// A stored blob, or a slice of one.
    Blob(BlobRef),
}

impl BlobSource {
    /// Declared name of the input: the blob's name, or the path.
    fn name(&self) -> Option<String> {
        match self {
            Self::Path(p) => Some(p.display().to_string()),
            Self::Blob(b) => b.name.clone(),
        }
    }
}

impl From<BlobRef> for BlobSource {
    fn from(blob: BlobRef) -> Self {
        Self::Blob(blob)
    }
}

impl From<&Path> for BlobSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

/// High-level MoFs API.
///
/// All components share the observer handed to [`MoFs::new`]. Operations
/// are synchronous; use [`Bridge::dispatch_async`](crate::Bridge::dispatch_async)
/// to run them off an async executor.
pub struct MoFs {
    config: MoFsConfig,
    constants: Constants,
    store: Arc<dyn BlobStore>,
    files: FileAccessor,
    crypto: CryptoEngine,
    images: ImagePipeline,
    router: Router,
}

impl MoFs {
    /// Wire all components and create the files and cache directories.
    pub fn new(
        config: MoFsConfig,
        store: Arc<dyn BlobStore>,
        observer: Arc<dyn Observer>,
    ) -> SdkResult<Self> {
        for dir in [&config.files_dir, &config.cache_dir] {
            std::fs::create_dir_all(dir).map_err(|e| {
                SdkError::Config(format!("cannot create {}: {e}", dir.display()))
            })?;
        }
        let router = Router::new(config.router_config(), Arc::clone(&store), Arc::clone(&observer));
        info!(
            namespace = %config.namespace,
            files = %config.files_dir.display(),
            cache = %config.cache_dir.display(),
            "mofs ready"
        );
        Ok(Self {
            constants: Constants::from_config(&config),
            files: FileAccessor::new(Arc::clone(&observer)),
            crypto: CryptoEngine::new(Arc::clone(&observer)),
            images: ImagePipeline::new(observer),
            router,
            store,
            config,
        })
    }

    /// Instance with an in-memory blob store and a tracing observer whose
    /// verbosity follows `config.verbose`.
    pub fn in_memory(config: MoFsConfig) -> SdkResult<Self> {
        let observer = Arc::new(TracingObserver::new(config.verbose));
        Self::new(config, Arc::new(InMemoryBlobStore::new()), observer)
    }

    pub fn config(&self) -> &MoFsConfig {
        &self.config
    }

    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }

    // ---- Blobs ----

    /// Bytes behind a source.
    pub fn resolve(&self, source: &BlobSource) -> SdkResult<Vec<u8>> {
        match source {
            BlobSource::Path(path) => Ok(self.files.read(path, 0, None)?),
            BlobSource::Blob(blob) => Ok(self.store.require(blob)?),
        }
    }

    fn store_bytes(&self, data: Vec<u8>, name: Option<String>, mime_type: &str) -> SdkResult<BlobRef> {
        let mut blob = self.store.store_ref(data)?.with_mime_type(mime_type);
        blob.name = name;
        debug!(blob = %blob, mime = mime_type, "blob created");
        Ok(blob)
    }

    pub fn create_blob(&self, text: &str, encoding: BlobEncoding) -> SdkResult<BlobRef> {
        let data = encoding.decode(text)?;
        self.store_bytes(data, None, OCTET_STREAM)
    }

    pub fn read_blob(&self, blob: &BlobRef, encoding: BlobEncoding) -> SdkResult<String> {
        Ok(encoding.encode(&self.store.require(blob)?))
    }

    /// Drop one reference to a stored blob.
    pub fn release_blob(&self, id: &BlobId) -> SdkResult<bool> {
        Ok(self.store.release(id)?)
    }

    // ---- Files ----

    /// Read a byte range into a new blob named after the path and typed by
    /// its extension.
    pub fn read_file(&self, range: &ByteRange) -> SdkResult<BlobRef> {
        let data = self.files.read_range(range)?;
        let mime_type = mime_type_for_path(&range.path);
        self.store_bytes(data, Some(range.path.display().to_string()), mime_type)
    }

    pub fn write_file(&self, path: &Path, blob: &BlobRef, offset: i64, truncate: bool) -> SdkResult<()> {
        let data = self.store.require(blob)?;
        Ok(self.files.write(path, offset, &data, truncate)?)
    }

    pub fn append_file(&self, path: &Path, blob: &BlobRef) -> SdkResult<()> {
        let data = self.store.require(blob)?;
        Ok(self.files.append(path, &data)?)
    }

    pub fn read_text_file(&self, path: &Path) -> SdkResult<String> {
        let data = self.files.read(path, 0, None)?;
        String::from_utf8(data)
            .map_err(|_| SdkError::InvalidArgument(format!("{} is not UTF-8", path.display())))
    }

    /// Replace a file's content atomically.
    pub fn write_text_file(&self, path: &Path, text: &str) -> SdkResult<()> {
        Ok(self.files.write(path, 0, text.as_bytes(), true)?)
    }

    pub fn append_text_file(&self, path: &Path, text: &str) -> SdkResult<()> {
        Ok(self.files.append(path, text.as_bytes())?)
    }

    pub fn delete(&self, path: &Path, recursive: bool) -> SdkResult<()> {
        Ok(self.files.delete(path, recursive)?)
    }

    pub fn rename(&self, from: &Path, to: &Path) -> SdkResult<()> {
        Ok(self.files.rename(from, to)?)
    }

    pub fn mkdir_all(&self, path: &Path) -> SdkResult<()> {
        Ok(self.files.mkdir_all(path)?)
    }

    pub fn list_dir(&self, path: &Path) -> SdkResult<Vec<String>> {
        Ok(self.files.list(path)?)
    }

    pub fn stat(&self, path: &Path) -> SdkResult<Option<FileStat>> {
        Ok(self.files.stat(path)?)
    }

    /// Apply `mode` through the lossy two-tier owner/other model; returns
    /// what was applied.
    pub fn set_permissions(&self, path: &Path, mode: PermissionMode) -> SdkResult<TwoTierPermissions> {
        Ok(self.files.set_permissions(path, mode)?)
    }

    // ---- Crypto ----

    pub fn blob_hash(&self, source: &BlobSource, algorithm: &str) -> SdkResult<String> {
        let data = self.resolve(source)?;
        Ok(self.crypto.digest(&data, algorithm)?)
    }

    pub fn blob_hmac(&self, source: &BlobSource, algorithm: &str, key: &[u8]) -> SdkResult<String> {
        let data = self.resolve(source)?;
        Ok(self.crypto.hmac(&data, algorithm, key)?)
    }

    /// Encrypt or decrypt into a new blob.
    pub fn crypt_blob(
        &self,
        source: &BlobSource,
        algorithm: &str,
        direction: CipherDirection,
        key: &[u8],
        iv: &[u8],
    ) -> SdkResult<BlobRef> {
        let data = self.resolve(source)?;
        let out = self.crypto.cipher(&data, algorithm, direction, key, iv)?;
        self.store_bytes(out, None, OCTET_STREAM)
    }

    pub fn blob_info(&self, source: &BlobSource) -> SdkResult<BlobInfo> {
        let data = self.resolve(source)?;
        Ok(self.crypto.info(&data))
    }

    // ---- Images ----

    pub fn image_size(&self, source: &BlobSource) -> SdkResult<ImageSize> {
        let data = self.resolve(source)?;
        Ok(self.images.size(&data)?)
    }

    pub fn exif(&self, source: &BlobSource) -> SdkResult<BTreeMap<String, String>> {
        let data = self.resolve(source)?;
        Ok(self.images.exif(&data)?)
    }

    /// Transform an image into a new blob carrying the source's name.
    pub fn update_image(&self, source: &BlobSource, spec: &TransformSpec) -> SdkResult<BlobRef> {
        let data = self.resolve(source)?;
        let image = self.images.transform(&data, spec)?;
        self.store_image(image, source.name())
    }

    pub fn resize_image(&self, source: &BlobSource, spec: &ResizeSpec) -> SdkResult<BlobRef> {
        let data = self.resolve(source)?;
        let image = self.images.resize(&data, spec)?;
        self.store_image(image, source.name())
    }

    fn store_image(&self, image: EncodedImage, name: Option<String>) -> SdkResult<BlobRef> {
        self.store_bytes(image.bytes, name, image.mime_type)
    }

    // ---- Resource URIs ----

    pub fn open_uri(&self, uri: &str, mode: &str) -> SdkResult<OpenedResource> {
        Ok(self.router.open(uri, mode)?)
    }

    /// Read a whole resource into a new blob typed with its MIME type.
    pub fn read_uri(&self, uri: &str) -> SdkResult<BlobRef> {
        let resource = self.router.open(uri, "r")?;
        let mime_type = resource.mime_type.clone();
        let data = resource.read_to_vec()?;
        self.store_bytes(data, Some(uri.to_string()), &mime_type)
    }

    pub fn uri_for_path(&self, path: &Path) -> SdkResult<ResourceUri> {
        Ok(self.router.uri_for_path(path)?)
    }

    pub fn blob_uri(&self, blob: &BlobRef) -> ResourceUri {
        self.router.blob_uri(blob)
    }

    pub fn mime_type(&self, path: &Path) -> &'static str {
        mime_type_for_path(path)
    }
}

impl std::fmt::Debug for MoFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoFs")
            .field("namespace", &self.config.namespace)
            .field("files_dir", &self.config.files_dir)
            .field("cache_dir", &self.config.cache_dir)
            .finish_non_exhaustive()
    }
}

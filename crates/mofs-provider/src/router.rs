use std::fs::File;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use mofs_store::BlobStore;
use mofs_types::{BlobId, BlobRef, NoopObserver, Observer, OpTimer, OCTET_STREAM};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::mime::mime_type_for_path;
use crate::pipe::{spawn_pipe, PipeReader};
use crate::uri::{Area, ResourceUri};

const COMPONENT: &str = "provider";

/// Where each area of the URI space lives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    pub scheme: String,
    /// Authority every served URI must carry.
    pub namespace: String,
    pub files_dir: PathBuf,
    pub cache_dir: PathBuf,
    /// Base of the unconfined `root` area.
    pub root_dir: PathBuf,
    /// Bytes per chunk pushed through a blob pipe.
    pub chunk_size: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        let tmp = std::env::temp_dir().join("mofs");
        Self {
            scheme: "content".into(),
            namespace: "mofs".into(),
            files_dir: tmp.join("files"),
            cache_dir: tmp.join("cache"),
            root_dir: PathBuf::from("/"),
            chunk_size: 64 * 1024,
        }
    }
}

/// A readable stream over one resolved resource.
#[derive(Debug)]
pub enum ResourceReader {
    File(File),
    Pipe(PipeReader),
}

impl Read for ResourceReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::File(f) => f.read(buf),
            Self::Pipe(p) => p.read(buf),
        }
    }
}

/// Result of [`Router::open`].
#[derive(Debug)]
pub struct OpenedResource {
    pub reader: ResourceReader,
    pub mime_type: String,
    /// Total length, when known up front.
    pub length: Option<u64>,
}

impl OpenedResource {
    /// Drain the stream into memory.
    pub fn read_to_vec(mut self) -> io::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.length.unwrap_or(0) as usize);
        self.reader.read_to_end(&mut out)?;
        Ok(out)
    }
}

/// Maps resource URIs to backing stores and opens them read-only.
pub struct Router {
    config: RouterConfig,
    store: Arc<dyn BlobStore>,
    observer: Arc<dyn Observer>,
}

impl Router {
    pub fn new(config: RouterConfig, store: Arc<dyn BlobStore>, observer: Arc<dyn Observer>) -> Self {
        Self {
            config,
            store,
            observer,
        }
    }

    pub fn with_store(config: RouterConfig, store: Arc<dyn BlobStore>) -> Self {
        Self::new(config, store, Arc::new(NoopObserver))
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Open `uri` for reading. `mode` must be `"r"`.
    pub fn open(&self, uri: &str, mode: &str) -> ProviderResult<OpenedResource> {
        let timer = OpTimer::start(COMPONENT, "open", uri);
        let result = self.open_inner(uri, mode);
        timer.finish(&*self.observer, &result, |r| r.length);
        result
    }

    fn open_inner(&self, raw: &str, mode: &str) -> ProviderResult<OpenedResource> {
        if mode != "r" {
            return Err(ProviderError::UnsupportedMode {
                uri: raw.to_string(),
                mode: mode.to_string(),
            });
        }
        let uri = ResourceUri::parse(raw)?;
        if uri.authority != self.config.namespace {
            return Err(ProviderError::NotFound(format!(
                "authority {:?} is not served here",
                uri.authority
            )));
        }

        match uri.area {
            Area::Files => open_file(&confined(&self.config.files_dir, &uri.rest)?),
            Area::Cache => open_file(&confined(&self.config.cache_dir, &uri.rest)?),
            Area::Root => open_file(&self.config.root_dir.join(&uri.rest)),
            Area::Blob => self.open_blob(&uri),
        }
    }

    fn open_blob(&self, uri: &ResourceUri) -> ProviderResult<OpenedResource> {
        if uri.rest.is_empty() || uri.rest.contains('/') {
            return Err(ProviderError::NotFound(format!("bad blob id {:?}", uri.rest)));
        }
        let id = BlobId::new(uri.rest.clone());
        let data = self
            .store
            .resolve_id(&id)?
            .ok_or_else(|| ProviderError::NotFound(format!("blob {id}")))?;

        let data = Bytes::from(data);
        let offset = query_u64(uri, "offset")?.unwrap_or(0);
        let size = query_u64(uri, "size")?.unwrap_or((data.len() as u64).saturating_sub(offset));
        let end = offset
            .checked_add(size)
            .filter(|end| *end <= data.len() as u64)
            .ok_or_else(|| ProviderError::NotFound(format!("range outside blob {id}")))?;
        let data = data.slice(offset as usize..end as usize);

        let mime_type = uri.query_param("type").unwrap_or(OCTET_STREAM).to_string();
        debug!(id = %id.short(), len = data.len(), mime = %mime_type, "streaming blob");
        let length = Some(data.len() as u64);
        let reader = spawn_pipe(data, self.config.chunk_size)?;
        Ok(OpenedResource {
            reader: ResourceReader::Pipe(reader),
            mime_type,
            length,
        })
    }

    /// URI for a filesystem path, preferring the most specific area.
    ///
    /// Paths under the files or cache directory map to that area (the
    /// longer base wins if one contains the other); any other absolute path
    /// maps to `root`. Relative paths have no URI.
    pub fn uri_for_path(&self, path: &Path) -> ProviderResult<ResourceUri> {
        let areas = [
            (Area::Files, &self.config.files_dir),
            (Area::Cache, &self.config.cache_dir),
        ];
        let best = areas
            .iter()
            .filter_map(|(area, base)| {
                path.strip_prefix(base)
                    .ok()
                    .map(|rest| (*area, base.components().count(), rest))
            })
            .max_by_key(|(_, depth, _)| *depth);

        let (area, rest) = match best {
            Some((area, _, rest)) => (area, rest.to_path_buf()),
            None => {
                let rest = path
                    .strip_prefix(&self.config.root_dir)
                    .map_err(|_| ProviderError::InvalidUri(path.display().to_string()))?;
                (Area::Root, rest.to_path_buf())
            }
        };
        let rest = rest.to_string_lossy().replace('\\', "/");
        Ok(ResourceUri::new(
            &self.config.scheme,
            &self.config.namespace,
            area,
            &rest,
        ))
    }

    /// URI streaming the bytes a [`BlobRef`] covers.
    pub fn blob_uri(&self, blob: &BlobRef) -> ResourceUri {
        let mut uri = ResourceUri::new(
            &self.config.scheme,
            &self.config.namespace,
            Area::Blob,
            blob.id.as_str(),
        )
        .with_query("type", blob.mime_type.as_deref().unwrap_or(OCTET_STREAM))
        .with_query("size", &blob.size.to_string());
        if blob.offset != 0 {
            uri = uri.with_query("offset", &blob.offset.to_string());
        }
        uri
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Join `rest` onto `base`, refusing anything that could leave `base`.
fn confined(base: &Path, rest: &str) -> ProviderResult<PathBuf> {
    let rel = Path::new(rest);
    if rel
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(ProviderError::NotFound(format!("{rest} escapes its area")));
    }
    Ok(base.join(rel))
}

fn open_file(path: &Path) -> ProviderResult<OpenedResource> {
    let file = File::open(path).map_err(|e| ProviderError::io(path, e))?;
    let meta = file.metadata().map_err(|e| ProviderError::io(path, e))?;
    if !meta.is_file() {
        return Err(ProviderError::NotFound(format!(
            "{} is not a regular file",
            path.display()
        )));
    }
    Ok(OpenedResource {
        reader: ResourceReader::File(file),
        mime_type: mime_type_for_path(path).to_string(),
        length: Some(meta.len()),
    })
}

fn query_u64(uri: &ResourceUri, key: &str) -> ProviderResult<Option<u64>> {
    uri.query_param(key)
        .map(|v| {
            v.parse::<u64>()
                .map_err(|_| ProviderError::InvalidUri(format!("{key}={v}")))
        })
        .transpose()
}

//! JSON call bridge.
//!
//! A host on the far side of a language boundary sends one [`Request`] per
//! call and gets back exactly one [`Response`] or one [`BridgeError`]. On
//! the wire a reply is `{"ok": <response>}` or `{"error": {kind, message}}`.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use mofs_crypto::{BlobInfo, CipherDirection};
use mofs_fs::ByteRange;
use mofs_image::{ImageSize, ResizeSpec, TransformSpec};
use mofs_types::{BlobId, BlobRef, Classify, ErrorKind, FileStat, PermissionMode, TwoTierPermissions};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::constants::Constants;
use crate::encoding::{decode_base64, BlobEncoding};
use crate::error::SdkError;
use crate::mofs::{BlobSource, MoFs};
use crate::pending::{PendingResult, PendingResults};

/// One call, tagged by `method`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum Request {
    ReadFile {
        path: PathBuf,
        #[serde(default)]
        offset: i64,
        #[serde(default)]
        size: Option<u64>,
    },
    WriteFile {
        path: PathBuf,
        blob: BlobRef,
        #[serde(default)]
        offset: i64,
        #[serde(default)]
        truncate: bool,
    },
    AppendFile {
        path: PathBuf,
        blob: BlobRef,
    },
    DeleteFile {
        path: PathBuf,
        #[serde(default)]
        recursive: bool,
    },
    RenameFile {
        from: PathBuf,
        to: PathBuf,
    },
    CreateDir {
        path: PathBuf,
    },
    ListDir {
        path: PathBuf,
    },
    Stat {
        path: PathBuf,
    },
    SetPermissions {
        path: PathBuf,
        mode: PermissionMode,
    },
    GetBlobHash {
        source: BlobSource,
        algorithm: String,
    },
    /// `key` is base64.
    GetBlobHmac {
        source: BlobSource,
        algorithm: String,
        key: String,
    },
    /// `key` and `iv` are base64.
    CryptBlob {
        source: BlobSource,
        algorithm: String,
        encrypt: bool,
        key: String,
        iv: String,
    },
    GetBlobInfo {
        source: BlobSource,
    },
    GetImageSize {
        source: BlobSource,
    },
    GetExif {
        source: BlobSource,
    },
    UpdateImage {
        source: BlobSource,
        args: TransformSpec,
    },
    ResizeImage {
        source: BlobSource,
        args: ResizeSpec,
    },
    CreateBlob {
        data: String,
        #[serde(default)]
        encoding: BlobEncoding,
    },
    ReadBlob {
        blob: BlobRef,
        #[serde(default)]
        encoding: BlobEncoding,
    },
    ReleaseBlob {
        id: BlobId,
    },
    GetProviderUri {
        path: PathBuf,
    },
    GetBlobUri {
        blob: BlobRef,
    },
    GetMimeType {
        path: PathBuf,
    },
    GetConstants,
    /// Copy a resource URI into a new blob.
    ReadUri {
        uri: String,
    },
    /// Host delivers the URIs for a pending result.
    ResolvePending {
        token: Uuid,
        uris: Vec<String>,
    },
    CancelPending {
        token: Uuid,
    },
}

impl Request {
    pub fn method(&self) -> &'static str {
        match self {
            Self::ReadFile { .. } => "readFile",
            Self::WriteFile { .. } => "writeFile",
            Self::AppendFile { .. } => "appendFile",
            Self::DeleteFile { .. } => "deleteFile",
            Self::RenameFile { .. } => "renameFile",
            Self::CreateDir { .. } => "createDir",
            Self::ListDir { .. } => "listDir",
            Self::Stat { .. } => "stat",
            Self::SetPermissions { .. } => "setPermissions",
            Self::GetBlobHash { .. } => "getBlobHash",
            Self::GetBlobHmac { .. } => "getBlobHmac",
            Self::CryptBlob { .. } => "cryptBlob",
            Self::GetBlobInfo { .. } => "getBlobInfo",
            Self::GetImageSize { .. } => "getImageSize",
            Self::GetExif { .. } => "getExif",
            Self::UpdateImage { .. } => "updateImage",
            Self::ResizeImage { .. } => "resizeImage",
            Self::CreateBlob { .. } => "createBlob",
            Self::ReadBlob { .. } => "readBlob",
            Self::ReleaseBlob { .. } => "releaseBlob",
            Self::GetProviderUri { .. } => "getProviderUri",
            Self::GetBlobUri { .. } => "getBlobUri",
            Self::GetMimeType { .. } => "getMimeType",
            Self::GetConstants => "getConstants",
            Self::ReadUri { .. } => "readUri",
            Self::ResolvePending { .. } => "resolvePending",
            Self::CancelPending { .. } => "cancelPending",
        }
    }
}

/// Result of `stat`. A missing path is `{"exists": false}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatResponse {
    pub exists: bool,
    #[serde(flatten)]
    pub stat: Option<FileStat>,
}

impl From<Option<FileStat>> for StatResponse {
    fn from(stat: Option<FileStat>) -> Self {
        Self {
            exists: stat.is_some(),
            stat,
        }
    }
}

/// Successful reply to a [`Request`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Response {
    Unit,
    Blob(BlobRef),
    Text(String),
    Names(Vec<String>),
    Stat(StatResponse),
    Permissions(TwoTierPermissions),
    ImageSize(ImageSize),
    Exif(BTreeMap<String, String>),
    Info(BlobInfo),
    Constants(Constants),
    Flag(bool),
}

/// Failed reply to a [`Request`].
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct BridgeError {
    pub kind: ErrorKind,
    pub message: String,
}

impl BridgeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<SdkError> for BridgeError {
    fn from(err: SdkError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Reply<'a> {
    Ok(&'a Response),
    Error(&'a BridgeError),
}

/// Dispatches requests against one [`MoFs`] instance.
#[derive(Clone)]
pub struct Bridge {
    fs: Arc<MoFs>,
    pending: Arc<PendingResults<Vec<String>>>,
}

impl Bridge {
    pub fn new(fs: MoFs) -> Self {
        Self::from_shared(Arc::new(fs))
    }

    pub fn from_shared(fs: Arc<MoFs>) -> Self {
        Self {
            fs,
            pending: Arc::new(PendingResults::new()),
        }
    }

    pub fn fs(&self) -> &MoFs {
        &self.fs
    }

    /// Open a slot the host fills later with `resolvePending`.
    pub fn register_pending(&self) -> (Uuid, PendingResult<Vec<String>>) {
        self.pending.register()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Run one request on the calling thread.
    pub fn dispatch(&self, request: Request) -> Result<Response, BridgeError> {
        let method = request.method();
        let result = self.handle(request).map_err(BridgeError::from);
        match &result {
            Ok(_) => debug!(method, "bridge call complete"),
            Err(e) => debug!(method, kind = %e.kind, "bridge call failed"),
        }
        result
    }

    /// Decode a request from JSON and run it.
    pub fn dispatch_value(&self, value: serde_json::Value) -> Result<Response, BridgeError> {
        let request: Request = serde_json::from_value(value)
            .map_err(|e| BridgeError::new(ErrorKind::InvalidArgument, format!("bad request: {e}")))?;
        self.dispatch(request)
    }

    /// JSON in, JSON reply out.
    pub fn dispatch_json(&self, json: &str) -> String {
        let result = serde_json::from_str::<serde_json::Value>(json)
            .map_err(|e| BridgeError::new(ErrorKind::InvalidArgument, format!("bad request: {e}")))
            .and_then(|value| self.dispatch_value(value));
        let reply = match &result {
            Ok(response) => Reply::Ok(response),
            Err(err) => Reply::Error(err),
        };
        serde_json::to_string(&reply).unwrap_or_else(|e| {
            format!(
                r#"{{"error":{{"kind":"IOFailure","message":{}}}}}"#,
                serde_json::Value::String(e.to_string())
            )
        })
    }

    /// Run a request on the blocking thread pool.
    pub async fn dispatch_async(&self, request: Request) -> Result<Response, BridgeError> {
        let bridge = self.clone();
        tokio::task::spawn_blocking(move || bridge.dispatch(request))
            .await
            .map_err(|e| BridgeError::new(ErrorKind::IoFailure, format!("bridge task failed: {e}")))?
    }

    fn handle(&self, request: Request) -> Result<Response, SdkError> {
        let fs = &*self.fs;
        let response = match request {
            Request::ReadFile { path, offset, size } => {
                let mut range = ByteRange::whole(path).at(offset);
                range.size = size;
                Response::Blob(fs.read_file(&range)?)
            }
            Request::WriteFile {
                path,
                blob,
                offset,
                truncate,
            } => {
                fs.write_file(&path, &blob, offset, truncate)?;
                Response::Unit
            }
            Request::AppendFile { path, blob } => {
                fs.append_file(&path, &blob)?;
                Response::Unit
            }
            Request::DeleteFile { path, recursive } => {
                fs.delete(&path, recursive)?;
                Response::Unit
            }
            Request::RenameFile { from, to } => {
                fs.rename(&from, &to)?;
                Response::Unit
            }
            Request::CreateDir { path } => {
                fs.mkdir_all(&path)?;
                Response::Unit
            }
            Request::ListDir { path } => Response::Names(fs.list_dir(&path)?),
            Request::Stat { path } => Response::Stat(fs.stat(&path)?.into()),
            Request::SetPermissions { path, mode } => {
                Response::Permissions(fs.set_permissions(&path, mode)?)
            }
            Request::GetBlobHash { source, algorithm } => {
                Response::Text(fs.blob_hash(&source, &algorithm)?)
            }
            Request::GetBlobHmac {
                source,
                algorithm,
                key,
            } => {
                let key = decode_base64("key", &key)?;
                Response::Text(fs.blob_hmac(&source, &algorithm, &key)?)
            }
            Request::CryptBlob {
                source,
                algorithm,
                encrypt,
                key,
                iv,
            } => {
                let key = decode_base64("key", &key)?;
                let iv = decode_base64("iv", &iv)?;
                let direction = CipherDirection::from_encrypt_flag(encrypt);
                Response::Blob(fs.crypt_blob(&source, &algorithm, direction, &key, &iv)?)
            }
            Request::GetBlobInfo { source } => Response::Info(fs.blob_info(&source)?),
            Request::GetImageSize { source } => Response::ImageSize(fs.image_size(&source)?),
            Request::GetExif { source } => Response::Exif(fs.exif(&source)?),
            Request::UpdateImage { source, args } => {
                Response::Blob(fs.update_image(&source, &args)?)
            }
            Request::ResizeImage { source, args } => {
                Response::Blob(fs.resize_image(&source, &args)?)
            }
            Request::CreateBlob { data, encoding } => {
                Response::Blob(fs.create_blob(&data, encoding)?)
            }
            Request::ReadBlob { blob, encoding } => Response::Text(fs.read_blob(&blob, encoding)?),
            Request::ReleaseBlob { id } => Response::Flag(fs.release_blob(&id)?),
            Request::GetProviderUri { path } => Response::Text(fs.uri_for_path(&path)?.to_string()),
            Request::GetBlobUri { blob } => Response::Text(fs.blob_uri(&blob).to_string()),
            Request::GetMimeType { path } => Response::Text(fs.mime_type(&path).to_string()),
            Request::GetConstants => Response::Constants(fs.constants().clone()),
            Request::ReadUri { uri } => Response::Blob(fs.read_uri(&uri)?),
            Request::ResolvePending { token, uris } => {
                Response::Flag(self.pending.complete(&token, uris))
            }
            Request::CancelPending { token } => Response::Flag(self.pending.cancel(&token)),
        };
        Ok(response)
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("fs", &self.fs)
            .field("pending", &self.pending.len())
            .finish()
    }
}

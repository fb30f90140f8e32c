use std::path::{Path, PathBuf};

use mofs_provider::RouterConfig;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Settings for a [`MoFs`](crate::MoFs) instance.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoFsConfig {
    /// Authority of resource URIs served by this instance.
    pub namespace: String,
    pub scheme: String,
    pub files_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub package_resource: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    /// Log successful operations at `info` instead of `debug`.
    pub verbose: bool,
    pub pipe_chunk_size: usize,
}

impl Default for MoFsConfig {
    fn default() -> Self {
        let base = std::env::temp_dir().join("mofs");
        Self {
            namespace: "mofs".into(),
            scheme: "content".into(),
            files_dir: base.join("files"),
            cache_dir: base.join("cache"),
            package_resource: None,
            data_dir: None,
            verbose: false,
            pipe_chunk_size: 64 * 1024,
        }
    }
}

impl MoFsConfig {
    /// Read a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Config rooted at `base`, with `files/` and `cache/` below it.
    pub fn rooted_at(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            files_dir: base.join("files"),
            cache_dir: base.join("cache"),
            data_dir: Some(base.to_path_buf()),
            ..Self::default()
        }
    }

    pub fn router_config(&self) -> RouterConfig {
        RouterConfig {
            scheme: self.scheme.clone(),
            namespace: self.namespace.clone(),
            files_dir: self.files_dir.clone(),
            cache_dir: self.cache_dir.clone(),
            root_dir: PathBuf::from("/"),
            chunk_size: self.pipe_chunk_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = MoFsConfig::default();
        assert_eq!(c.namespace, "mofs");
        assert_eq!(c.scheme, "content");
        assert!(c.files_dir.ends_with("files"));
        assert!(!c.verbose);
        assert!(c.package_resource.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = MoFsConfig::from_toml_str(
            r#"
            namespace = "com.example.app.mofs"
            verbose = true
            files_dir = "/srv/app/files"
            "#,
        )
        .unwrap();
        assert_eq!(c.namespace, "com.example.app.mofs");
        assert!(c.verbose);
        assert_eq!(c.files_dir, PathBuf::from("/srv/app/files"));
        assert_eq!(c.pipe_chunk_size, 64 * 1024);
    }

    #[test]
    fn bad_toml_is_config_error() {
        let err = MoFsConfig::from_toml_str("verbose = \"yes\"").unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn toml_round_trip_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let c = MoFsConfig::rooted_at(dir.path());
        let path = dir.path().join("mofs.toml");
        std::fs::write(&path, c.to_toml_string().unwrap()).unwrap();
        assert_eq!(MoFsConfig::load(&path).unwrap(), c);
        assert!(MoFsConfig::load(dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn router_config_mirrors_fields() {
        let c = MoFsConfig::default();
        let r = c.router_config();
        assert_eq!(r.namespace, c.namespace);
        assert_eq!(r.chunk_size, c.pipe_chunk_size);
    }
}

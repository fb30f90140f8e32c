use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::MoFsConfig;

/// Well-known directories of an instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paths {
    pub files: PathBuf,
    pub cache: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_resource: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
}

/// Values an embedder reads once at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constants {
    /// Authority of the resource URIs this instance serves.
    pub namespace: String,
    pub paths: Paths,
}

impl Constants {
    pub fn from_config(config: &MoFsConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            paths: Paths {
                files: config.files_dir.clone(),
                cache: config.cache_dir.clone(),
                package_resource: config.package_resource.clone(),
                data: config.data_dir.clone(),
            },
        }
    }
}

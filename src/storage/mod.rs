//! Storage disks for generated images
//!
//! A [`StorageDisk`] accepts bytes at a relative path and reports the URL the
//! stored object is served from. [`ImageStore`] pairs the configured disk with
//! the path prefix generated images are written under.

pub mod local;
pub mod memory;
pub mod s3;

pub use local::LocalDisk;
pub use memory::MemoryDisk;
pub use s3::S3Disk;

use crate::config::{Config, DEFAULT_DISK_URL};
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

#[async_trait]
pub trait StorageDisk: Send + Sync {
    async fn put(&self, path: &str, data: &[u8]) -> Result<()>;
    fn url(&self, path: &str) -> String;
    async fn exists(&self, path: &str) -> Result<bool>;
}

/// Where (and whether) generated images are persisted.
#[derive(Clone)]
pub struct ImageStore {
    disk: Option<Arc<dyn StorageDisk>>,
    path_prefix: String,
}

impl ImageStore {
    /// Store images on `disk` under `path_prefix` (surrounding `/` are ignored).
    pub fn new(disk: Arc<dyn StorageDisk>, path_prefix: &str) -> Self {
        Self {
            disk: Some(disk),
            path_prefix: path_prefix.trim_matches('/').to_string(),
        }
    }

    /// Never store; results are handed back as base64.
    pub fn passthrough() -> Self {
        Self {
            disk: None,
            path_prefix: String::new(),
        }
    }

    /// Select the disk named by `config.disk`.
    ///
    /// `s3` uses the `s3` config section, `memory` keeps images in-process, and
    /// any other name is a local directory (`disk_root`, default
    /// `storage/app/<disk>`) served from `disk_url`.
    pub async fn from_config(config: &Config) -> Result<Self> {
        if !config.store {
            return Ok(Self::passthrough());
        }

        let disk: Arc<dyn StorageDisk> = match config.disk.as_str() {
            "s3" => {
                let s3 = config.s3.as_ref().ok_or_else(|| {
                    Error::Config("disk 's3' requires GEMINI_NANO_S3_BUCKET".to_string())
                })?;
                Arc::new(S3Disk::from_config(s3).await)
            }
            "memory" => Arc::new(MemoryDisk::new().with_base_url(disk_url(config))),
            name => {
                let root = config
                    .disk_root
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("storage/app").join(name));
                Arc::new(LocalDisk::new(root, disk_url(config)))
            }
        };

        tracing::info!("Storing generated images on disk '{}'", config.disk);

        Ok(Self::new(disk, &config.path))
    }

    pub fn is_enabled(&self) -> bool {
        self.disk.is_some()
    }

    pub fn disk(&self) -> Option<&Arc<dyn StorageDisk>> {
        self.disk.as_ref()
    }

    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    /// Full disk path for `filename` under the configured prefix.
    pub fn image_path(&self, filename: &str) -> String {
        if self.path_prefix.is_empty() {
            filename.to_string()
        } else {
            format!("{}/{}", self.path_prefix, filename)
        }
    }
}

impl std::fmt::Debug for ImageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageStore")
            .field("enabled", &self.is_enabled())
            .field("path_prefix", &self.path_prefix)
            .finish()
    }
}

fn disk_url(config: &Config) -> String {
    config
        .disk_url
        .clone()
        .unwrap_or_else(|| DEFAULT_DISK_URL.to_string())
}

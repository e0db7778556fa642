use super::StorageDisk;
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Filesystem disk rooted at a directory, served under a public URL prefix.
#[derive(Debug, Clone)]
pub struct LocalDisk {
    root: PathBuf,
    base_url: String,
}

impl LocalDisk {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let is_plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

        if path.is_empty() || !is_plain {
            return Err(Error::Storage(format!(
                "Refusing to use path outside the disk root: '{}'",
                path
            )));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl StorageDisk for LocalDisk {
    async fn put(&self, path: &str, data: &[u8]) -> Result<()> {
        let target = self.resolve(path)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        tokio::fs::write(&target, data)
            .await
            .map_err(|e| Error::Storage(format!("Failed to write {}: {}", target.display(), e)))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let target = self.resolve(path)?;
        Ok(tokio::fs::try_exists(&target).await?)
    }
}

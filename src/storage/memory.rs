use super::StorageDisk;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// In-process disk. Clones share the same files, which makes it handy for
/// dry runs and for asserting on writes in tests.
#[derive(Debug, Clone)]
pub struct MemoryDisk {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    base_url: String,
    put_count: Arc<Mutex<usize>>,
}

impl MemoryDisk {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            base_url: "https://memory.invalid".to_string(),
            put_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_file(self, path: String, content: Vec<u8>) -> Self {
        lock(&self.files).insert(path, content);
        self
    }

    pub fn get_put_count(&self) -> usize {
        *lock(&self.put_count)
    }

    pub fn get_files(&self) -> HashMap<String, Vec<u8>> {
        lock(&self.files).clone()
    }
}

impl Default for MemoryDisk {
    fn default() -> Self {
        Self::new()
    }
}

// A poisoned lock only means another writer panicked; the map is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl StorageDisk for MemoryDisk {
    async fn put(&self, path: &str, data: &[u8]) -> Result<()> {
        *lock(&self.put_count) += 1;
        lock(&self.files).insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(lock(&self.files).contains_key(path))
    }
}

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use super::{StorageAdapter, StorageError, StorageResult};

type ObjectKey = (String, String);

/// Process-local object store.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    objects: RwLock<HashMap<ObjectKey, Vec<u8>>>,
    denied_buckets: RwLock<HashSet<String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent access to `bucket` fail with [`StorageError::Auth`].
    pub fn deny_bucket(&self, bucket: &str) {
        self.denied_buckets.write().insert(bucket.to_string());
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .read()
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_access(&self, bucket: &str) -> StorageResult<()> {
        if self.denied_buckets.read().contains(bucket) {
            return Err(StorageError::Auth(format!("bucket {}", bucket)));
        }
        Ok(())
    }
}

impl StorageAdapter for InMemoryStorage {
    fn fetch(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        self.check_access(bucket)?;

        self.objects
            .read()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    fn store(&self, bucket: &str, key: &str, bytes: &[u8]) -> StorageResult<()> {
        self.check_access(bucket)?;

        self.objects
            .write()
            .insert((bucket.to_string(), key.to_string()), bytes.to_vec());

        Ok(())
    }
}

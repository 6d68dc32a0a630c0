use std::io;
use std::path::{Component, Path, PathBuf};

use super::{StorageAdapter, StorageError, StorageResult};

/// Stores each bucket as a directory under `root` and each key as a relative path in it.
#[derive(Clone, Debug)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        check_relative(bucket)?;
        check_relative(key)?;

        Ok(self.root.join(bucket).join(key))
    }
}

impl StorageAdapter for FsStorage {
    fn fetch(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.object_path(bucket, key)?;

        std::fs::read(&path).map_err(|e| map_io_error(e, bucket, key))
    }

    fn store(&self, bucket: &str, key: &str, bytes: &[u8]) -> StorageResult<()> {
        let path = self.object_path(bucket, key)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| map_io_error(e, bucket, key))?;
        }
        std::fs::write(&path, bytes).map_err(|e| map_io_error(e, bucket, key))
    }
}

/// Rejects empty, absolute and parent-escaping names.
fn check_relative(name: &str) -> StorageResult<()> {
    let path = Path::new(name);
    let valid = !name.is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));

    if !valid {
        return Err(StorageError::InvalidKey(name.to_string()));
    }
    Ok(())
}

fn map_io_error(e: io::Error, bucket: &str, key: &str) -> StorageError {
    match e.kind() {
        io::ErrorKind::NotFound => StorageError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        },
        io::ErrorKind::PermissionDenied => StorageError::Auth(e.to_string()),
        _ => StorageError::Io(e),
    }
}

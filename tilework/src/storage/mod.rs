//! Object storage addressed by bucket and key.
//!
//! The core never talks to a storage service directly: callers inject a
//! [`StorageAdapter`] wherever remote reads or writes are needed.

mod fs;
mod memory;


use std::io;

pub use fs::FsStorage;
pub use memory::InMemoryStorage;

use crate::prelude::*;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object {bucket}/{key} not found")]
    NotFound { bucket: String, key: String },
    #[error("access denied: {0}")]
    Auth(String),
    #[error("invalid object key: {0}")]
    InvalidKey(String),
    #[error("storage IO error: {0}")]
    Io(#[from] io::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Fetches and stores raw object bytes. Implementations do not retry.
pub trait StorageAdapter: Send + Sync {
    fn fetch(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>>;

    /// Writes `bytes` under `key`, replacing any existing object.
    fn store(&self, bucket: &str, key: &str, bytes: &[u8]) -> StorageResult<()>;
}

/// Fetches an object and decodes it as an image.
pub fn read_image(storage: &dyn StorageAdapter, bucket: &str, key: &str) -> Result<Image> {
    let bytes = storage.fetch(bucket, key)?;
    let image = Image::decode(&bytes)?;

    tracing::debug!("Read {} from {}/{}", image.desc(), bucket, key);

    Ok(image)
}

/// Encodes an image as PNG and stores it.
pub fn write_image(
    storage: &dyn StorageAdapter,
    image: &Image,
    bucket: &str,
    key: &str,
) -> Result<()> {
    let encoded = image.encode_png()?;
    storage.store(bucket, key, &encoded)?;

    tracing::debug!(
        "Wrote {} ({} bytes) to {}/{}",
        image.desc(),
        encoded.len(),
        bucket,
        key
    );

    Ok(())
}

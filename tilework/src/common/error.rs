use std::io;
use std::path::PathBuf;

use crate::grid::{GridShape, PatchCoord};
use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Encoding error: {0}")]
    Encoding(String),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid color format: {0}")]
    InvalidColorFormat(String),
    #[error("Invalid region: {0}")]
    InvalidRegion(String),
    #[error("Invalid patch size: {0}")]
    InvalidPatchSize(u32),
    #[error("Patch not found: {}", .0.display())]
    PatchNotFound(PathBuf),
    #[error(
        "Patch {} is {}x{}, expected {}x{}",
        .coord, .actual.0, .actual.1, .expected.0, .expected.1
    )]
    PatchSizeMismatch {
        coord: PatchCoord,
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error(
        "{grid} grid of {patch_width}x{patch_height} patches exceeds the maximum canvas size"
    )]
    CanvasTooLarge {
        grid: GridShape,
        patch_width: u32,
        patch_height: u32,
    },
    #[error("Grid inference failed: {0}")]
    GridInference(#[from] GridInferenceError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Manifest error: {0}")]
    Manifest(String),
    #[error("Config error: {0}")]
    Config(String),
}

/// Reasons a patch directory cannot be turned into a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridInferenceError {
    #[error("no patch files in {}", .0.display())]
    Empty(PathBuf),
    #[error("unrecognized patch file name: {0}")]
    UnrecognizedFileName(String),
    #[error("{first} and {second} both map to patch {coord}")]
    DuplicateCoordinate {
        coord: PatchCoord,
        first: String,
        second: String,
    },
    #[error("{0} does not follow the naming used by the other patches")]
    MixedNaming(String),
}

impl Error {
    /// True for a missing patch file or a missing storage object.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::PatchNotFound(_) | Error::Storage(StorageError::NotFound { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

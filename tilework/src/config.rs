use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::patcher::DEFAULT_PATCH_SIZE;
use crate::prelude::*;
use crate::reassembler::{DEFAULT_UPLOAD_BUCKET, DEFAULT_UPLOAD_KEY};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileworkConfig {
    pub patcher: PatcherConfig,
    pub reassembler: ReassemblerConfig,
    pub upload: UploadConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatcherConfig {
    pub patch_size: u32,
    /// Encode patches on the rayon pool.
    #[serde(skip_serializing_if = "::common::serde::is_false")]
    pub parallel: bool,
    /// Persist a manifest next to the patches.
    #[serde(skip_serializing_if = "::common::serde::is_false")]
    pub write_manifest: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReassemblerConfig {
    /// Directory the reassembled canvas is written to. Empty means the working directory.
    pub output_dir: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub bucket: String,
    pub key: String,
}

impl Default for PatcherConfig {
    fn default() -> Self {
        Self {
            patch_size: DEFAULT_PATCH_SIZE,
            parallel: false,
            write_manifest: false,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_UPLOAD_BUCKET.to_string(),
            key: DEFAULT_UPLOAD_KEY.to_string(),
        }
    }
}

impl TileworkConfig {
    /// Loads a YAML or JSON config, chosen by the file extension.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = ::common::FileFormat::from_path(path).map_err(config_error)?;
        let serialized = std::fs::read(path)?;

        Self::parse(&serialized, format)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default config, failed to load {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn parse(serialized: &[u8], format: ::common::FileFormat) -> Result<Self> {
        let config: TileworkConfig =
            ::common::serde::deserialize(serialized, format).map_err(config_error)?;

        if config.patcher.patch_size == 0 {
            return Err(Error::InvalidPatchSize(0));
        }

        Ok(config)
    }

    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let format = ::common::FileFormat::from_path(path).map_err(config_error)?;
        let serialized = ::common::serde::serialize(self, format).map_err(config_error)?;
        std::fs::write(path, serialized)?;

        Ok(())
    }
}

fn config_error<E: std::fmt::Display>(e: E) -> Error {
    Error::Config(e.to_string())
}

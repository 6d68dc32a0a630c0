//! Explicit mapping from grid coordinates to patch files.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// File name used when the patcher persists its manifest next to the patches.
pub const MANIFEST_FILE_NAME: &str = "manifest.yaml";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchEntry {
    pub row: u32,
    pub col: u32,
    pub file_name: String,
}

impl PatchEntry {
    pub fn coord(&self) -> PatchCoord {
        PatchCoord::new(self.row, self.col)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchManifest {
    pub patch_size: u32,
    pub source_width: u32,
    pub source_height: u32,
    pub grid: GridShape,
    #[serde(default)]
    pub naming: PatchNaming,
    pub patches: Vec<PatchEntry>,
}

impl PatchManifest {
    pub fn entry(&self, coord: PatchCoord) -> Option<&PatchEntry> {
        self.patches.iter().find(|entry| entry.coord() == coord)
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.patches.iter().map(|entry| entry.file_name.as_str())
    }

    /// Writes the manifest as YAML or JSON, chosen by the file extension.
    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let format = ::common::FileFormat::from_path(path).map_err(manifest_error)?;
        let serialized = ::common::serde::serialize(self, format).map_err(manifest_error)?;
        std::fs::write(path, serialized)?;

        Ok(())
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = ::common::FileFormat::from_path(path).map_err(manifest_error)?;
        let serialized = std::fs::read(path)?;
        let manifest: PatchManifest =
            ::common::serde::deserialize(&serialized, format).map_err(manifest_error)?;
        manifest.validate()?;

        Ok(manifest)
    }

    /// Checks that the entries cover every cell of the grid exactly once.
    pub fn validate(&self) -> Result<()> {
        if self.patches.len() != self.grid.len() {
            return Err(Error::Manifest(format!(
                "{} grid needs {} patches, manifest lists {}",
                self.grid,
                self.grid.len(),
                self.patches.len()
            )));
        }

        let mut seen = std::collections::HashSet::with_capacity(self.patches.len());

        for entry in &self.patches {
            let coord = entry.coord();
            if !self.grid.contains(coord) {
                return Err(Error::Manifest(format!(
                    "patch {} lies outside the {} grid",
                    coord, self.grid
                )));
            }
            if !seen.insert(coord) {
                return Err(Error::Manifest(format!("patch {} is listed twice", coord)));
            }
        }

        Ok(())
    }
}

fn manifest_error<E: std::fmt::Display>(e: E) -> Error {
    Error::Manifest(e.to_string())
}

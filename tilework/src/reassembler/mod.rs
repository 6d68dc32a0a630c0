//! Stitches a directory of patches back into a single canvas.

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{ReassemblerConfig, UploadConfig};
use crate::manifest::{PatchManifest, MANIFEST_FILE_NAME};
use crate::prelude::*;
use crate::storage::StorageAdapter;

pub const DEFAULT_UPLOAD_BUCKET: &str = "satupscale";
pub const DEFAULT_UPLOAD_KEY: &str = "final_image.png";

/// Where the encoded canvas is uploaded after it has been written locally.
pub struct UploadTarget<'a> {
    storage: &'a dyn StorageAdapter,
    bucket: String,
    key: String,
}

impl<'a> UploadTarget<'a> {
    /// Targets [`DEFAULT_UPLOAD_KEY`] in [`DEFAULT_UPLOAD_BUCKET`].
    pub fn new(storage: &'a dyn StorageAdapter) -> Self {
        Self {
            storage,
            bucket: DEFAULT_UPLOAD_BUCKET.to_string(),
            key: DEFAULT_UPLOAD_KEY.to_string(),
        }
    }

    pub fn from_config(storage: &'a dyn StorageAdapter, config: &UploadConfig) -> Self {
        Self::new(storage)
            .with_bucket(&config.bucket)
            .with_key(&config.key)
    }

    pub fn with_bucket(mut self, bucket: &str) -> Self {
        self.bucket = bucket.to_string();
        self
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Grid shape and the file backing every present cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchLayout {
    input_dir: PathBuf,
    grid: GridShape,
    naming: PatchNaming,
    files: BTreeMap<PatchCoord, PathBuf>,
}

impl PatchLayout {
    pub fn from_manifest<P: AsRef<Path>>(manifest: &PatchManifest, input_dir: P) -> Result<Self> {
        manifest.validate()?;

        let input_dir = input_dir.as_ref().to_path_buf();
        let files = manifest
            .patches
            .iter()
            .map(|entry| (entry.coord(), input_dir.join(&entry.file_name)))
            .collect();

        Ok(Self {
            input_dir,
            grid: manifest.grid,
            naming: manifest.naming,
            files,
        })
    }

    pub fn grid(&self) -> GridShape {
        self.grid
    }

    pub fn naming(&self) -> PatchNaming {
        self.naming
    }

    pub fn path(&self, coord: PatchCoord) -> Option<&Path> {
        self.files.get(&coord).map(PathBuf::as_path)
    }

    /// Path a patch would have under the layout's naming, present or not.
    fn expected_path(&self, coord: PatchCoord) -> PathBuf {
        self.input_dir.join(self.naming.file_name(coord))
    }
}

/// Infers the grid from the patch file names in `input_dir`.
///
/// Hidden files and the patch manifest are ignored. Every other regular file must
/// parse with [`parse_patch_file_name`], all files must share one naming convention
/// and no two files may claim the same cell.
pub fn infer_layout<P: AsRef<Path>>(input_dir: P) -> Result<PatchLayout> {
    let input_dir = input_dir.as_ref();

    let mut naming: Option<PatchNaming> = None;
    let mut files: BTreeMap<PatchCoord, PathBuf> = BTreeMap::new();

    for path in ::common::file_utils::list_files(input_dir)? {
        let Some(name) = ::common::file_utils::file_name_str(&path) else {
            return Err(GridInferenceError::UnrecognizedFileName(path.display().to_string()).into());
        };
        if name.starts_with('.') || name == MANIFEST_FILE_NAME {
            continue;
        }

        let (coord, file_naming) = parse_patch_file_name(name)
            .ok_or_else(|| GridInferenceError::UnrecognizedFileName(name.to_string()))?;

        match naming {
            None => naming = Some(file_naming),
            Some(existing) if existing != file_naming => {
                return Err(GridInferenceError::MixedNaming(name.to_string()).into());
            }
            Some(_) => {}
        }

        if let Some(previous) = files.get(&coord) {
            return Err(GridInferenceError::DuplicateCoordinate {
                coord,
                first: display_name(previous),
                second: name.to_string(),
            }
            .into());
        }
        files.insert(coord, path);
    }

    let Some(naming) = naming else {
        return Err(GridInferenceError::Empty(input_dir.to_path_buf()).into());
    };

    let rows = files.keys().map(|coord| coord.row).max().unwrap_or(0) + 1;
    let cols = files.keys().map(|coord| coord.col).max().unwrap_or(0) + 1;
    let grid = GridShape::new(rows, cols);

    tracing::debug!(
        "Inferred {} grid ({:?} naming, {} files) from {}",
        grid,
        naming,
        files.len(),
        input_dir.display()
    );

    Ok(PatchLayout {
        input_dir: input_dir.to_path_buf(),
        grid,
        naming,
        files,
    })
}

/// Pastes every patch of `layout` into an RGB canvas, row-major.
///
/// Patch (0, 0) decides the cell size. A missing patch or one whose size differs
/// from (0, 0) fails the whole operation.
pub fn stitch(layout: &PatchLayout) -> Result<Image> {
    let origin = load_patch(layout, PatchCoord::ORIGIN)?;
    let (patch_width, patch_height) = (origin.width(), origin.height());
    let grid = layout.grid();

    let (Some(width), Some(height)) = (
        grid.cols.checked_mul(patch_width),
        grid.rows.checked_mul(patch_height),
    ) else {
        return Err(Error::CanvasTooLarge {
            grid,
            patch_width,
            patch_height,
        });
    };

    let desc = ImageDesc::new(width, height, ColorFormat::RGB_U8);
    let mut canvas = Image::new_black(desc)?;

    tracing::info!(
        "Stitching {} grid of {}x{} patches into {}",
        grid,
        patch_width,
        patch_height,
        desc
    );

    for coord in grid.coords() {
        let patch = if coord == PatchCoord::ORIGIN {
            origin.clone()
        } else {
            load_patch(layout, coord)?
        };

        if (patch.width(), patch.height()) != (patch_width, patch_height) {
            return Err(Error::PatchSizeMismatch {
                coord,
                expected: (patch_width, patch_height),
                actual: (patch.width(), patch.height()),
            });
        }

        canvas.paste(&patch, coord.col * patch_width, coord.row * patch_height)?;
    }

    Ok(canvas)
}

/// Infers the grid from file names in `input_dir`, stitches the patches and writes
/// `{output_dir}/{output_file_name}.png`. An empty `output_dir` means the working
/// directory. With `upload`, the same PNG bytes are stored to the target as well.
///
/// Returns the path of the written canvas.
pub fn recombine<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_file_name: &str,
    output_dir: Q,
    upload: Option<&UploadTarget<'_>>,
) -> Result<PathBuf> {
    let layout = infer_layout(input_dir)?;
    let canvas = stitch(&layout)?;

    persist(&canvas, output_file_name, output_dir.as_ref(), upload)
}

/// Same as [`recombine`], with the grid and file names taken from `manifest`
/// instead of being parsed from the directory listing.
pub fn recombine_manifest<P: AsRef<Path>, Q: AsRef<Path>>(
    manifest: &PatchManifest,
    input_dir: P,
    output_file_name: &str,
    output_dir: Q,
    upload: Option<&UploadTarget<'_>>,
) -> Result<PathBuf> {
    let layout = PatchLayout::from_manifest(manifest, input_dir)?;
    let canvas = stitch(&layout)?;

    persist(&canvas, output_file_name, output_dir.as_ref(), upload)
}

/// Config-driven front end for [`recombine`].
#[derive(Clone, Debug, Default)]
pub struct Reassembler {
    output_dir: PathBuf,
    upload: UploadConfig,
}

impl Reassembler {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
            upload: UploadConfig::default(),
        }
    }

    pub fn from_config(reassembler: &ReassemblerConfig, upload: &UploadConfig) -> Self {
        Self {
            output_dir: reassembler.output_dir.clone(),
            upload: upload.clone(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Reassembles `input_dir`. A manifest in the directory takes precedence over
    /// file name parsing. `storage`, when given, receives the configured upload.
    pub fn recombine<P: AsRef<Path>>(
        &self,
        input_dir: P,
        output_file_name: &str,
        storage: Option<&dyn StorageAdapter>,
    ) -> Result<PathBuf> {
        let input_dir = input_dir.as_ref();
        let upload = storage.map(|storage| UploadTarget::from_config(storage, &self.upload));

        let manifest_path = input_dir.join(MANIFEST_FILE_NAME);
        if manifest_path.is_file() {
            let manifest = PatchManifest::load_file(&manifest_path)?;
            return recombine_manifest(
                &manifest,
                input_dir,
                output_file_name,
                &self.output_dir,
                upload.as_ref(),
            );
        }

        recombine(input_dir, output_file_name, &self.output_dir, upload.as_ref())
    }
}

fn load_patch(layout: &PatchLayout, coord: PatchCoord) -> Result<Image> {
    let path = match layout.path(coord) {
        Some(path) => path.to_path_buf(),
        None => return Err(Error::PatchNotFound(layout.expected_path(coord))),
    };

    let bytes = std::fs::read(&path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::PatchNotFound(path.clone()),
        _ => Error::Io(e),
    })?;

    Image::decode(&bytes)?.to_rgb_u8()
}

fn persist(
    canvas: &Image,
    output_file_name: &str,
    output_dir: &Path,
    upload: Option<&UploadTarget<'_>>,
) -> Result<PathBuf> {
    let output_path = output_dir.join(format!("{}.png", output_file_name));
    let encoded = canvas.encode_png()?;
    std::fs::write(&output_path, &encoded)?;

    tracing::info!("Wrote {} to {}", canvas.desc(), output_path.display());

    if let Some(target) = upload {
        target.storage.store(&target.bucket, &target.key, &encoded)?;
        tracing::info!("Uploaded canvas to {}/{}", target.bucket, target.key);
    }

    Ok(output_path)
}

fn display_name(path: &Path) -> String {
    ::common::file_utils::file_name_str(path)
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

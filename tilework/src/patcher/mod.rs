//! Splits an image into a grid of square patches written as PNG files.


use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

use crate::config::PatcherConfig;
use crate::encoding::{ChannelOrder, DefaultEncodingPolicy, EncodingPolicy, SourceFormat};
use crate::manifest::{PatchEntry, PatchManifest, MANIFEST_FILE_NAME};
use crate::prelude::*;

pub const DEFAULT_PATCH_SIZE: u32 = 512;

/// Cuts `image` into `patch_size` squares and writes them to `output_dir` as
/// `{row}_{col}.png`. `file_name` is the name of the source image and only
/// decides the channel order through [`DefaultEncodingPolicy`].
pub fn divide_and_save<P: AsRef<Path>>(
    image: &Image,
    output_dir: P,
    file_name: &str,
    patch_size: u32,
) -> Result<PatchManifest> {
    Patcher::new(patch_size).divide_and_save(image, output_dir, file_name)
}

#[derive(Clone)]
pub struct Patcher {
    patch_size: u32,
    parallel: bool,
    write_manifest: bool,
    policy: Arc<dyn EncodingPolicy>,
}

impl Patcher {
    pub fn new(patch_size: u32) -> Self {
        Self {
            patch_size,
            parallel: false,
            write_manifest: false,
            policy: Arc::new(DefaultEncodingPolicy),
        }
    }

    pub fn from_config(config: &PatcherConfig) -> Self {
        Self::new(config.patch_size)
            .with_parallel(config.parallel)
            .with_manifest(config.write_manifest)
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_manifest(mut self, write_manifest: bool) -> Self {
        self.write_manifest = write_manifest;
        self
    }

    pub fn with_policy<E: EncodingPolicy + 'static>(mut self, policy: E) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn patch_size(&self) -> u32 {
        self.patch_size
    }

    pub fn divide_and_save<P: AsRef<Path>>(
        &self,
        image: &Image,
        output_dir: P,
        file_name: &str,
    ) -> Result<PatchManifest> {
        if self.patch_size == 0 {
            return Err(Error::InvalidPatchSize(self.patch_size));
        }

        let output_dir = output_dir.as_ref();
        let (width, height) = (image.width(), image.height());
        let grid = GridShape::for_image(width, height, self.patch_size);
        let order = self.policy.channel_order(SourceFormat::from_file_name(file_name));

        tracing::info!(
            "Splitting {} ({}) into {} patches of {}px, channel order {:?}",
            file_name,
            image.desc(),
            grid,
            self.patch_size,
            order
        );

        let patches = if self.parallel {
            (0..grid.len())
                .into_par_iter()
                .map(|index| self.write_patch(image, grid.coord_at(index), order, output_dir))
                .collect::<Result<Vec<_>>>()?
        } else {
            grid.coords()
                .map(|coord| self.write_patch(image, coord, order, output_dir))
                .collect::<Result<Vec<_>>>()?
        };

        let manifest = PatchManifest {
            patch_size: self.patch_size,
            source_width: width,
            source_height: height,
            grid,
            naming: PatchNaming::Canonical,
            patches,
        };

        if self.write_manifest {
            manifest.save_file(output_dir.join(MANIFEST_FILE_NAME))?;
        }

        Ok(manifest)
    }

    fn write_patch(
        &self,
        image: &Image,
        coord: PatchCoord,
        order: ChannelOrder,
        output_dir: &Path,
    ) -> Result<PatchEntry> {
        let size = self.patch_size;
        let mut patch = image.crop(coord.col * size, coord.row * size, size, size)?;
        order.apply(&mut patch);

        let file_name = PatchNaming::Canonical.file_name(coord);
        patch.save_png(output_dir.join(&file_name))?;

        tracing::trace!("Wrote patch {} to {}", coord, file_name);

        Ok(PatchEntry {
            row: coord.row,
            col: coord.col,
            file_name,
        })
    }
}

impl Default for Patcher {
    fn default() -> Self {
        Self::new(DEFAULT_PATCH_SIZE)
    }
}

impl std::fmt::Debug for Patcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Patcher")
            .field("patch_size", &self.patch_size)
            .field("parallel", &self.parallel)
            .field("write_manifest", &self.write_manifest)
            .finish_non_exhaustive()
    }
}

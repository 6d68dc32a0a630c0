//! Splits an image into patches and stitches them back together.
//!
//! Usage: `cargo run --example roundtrip -- <image> [config.yaml]`

use std::path::PathBuf;

use tilework::prelude::*;

fn main() -> anyhow::Result<()> {
    common::log_setup::setup_logging("info", "logs")?;

    let mut args = std::env::args().skip(1);
    let input = PathBuf::from(
        args.next()
            .ok_or_else(|| anyhow::anyhow!("missing input image path"))?,
    );
    let config = match args.next() {
        Some(path) => TileworkConfig::load_file(path)?,
        None => TileworkConfig::default(),
    };

    let file_name = input
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow::anyhow!("input path has no file name"))?
        .to_string();

    let work_dir = std::env::temp_dir().join("tilework_roundtrip");
    let patch_dir = work_dir.join("patches");
    if patch_dir.exists() {
        std::fs::remove_dir_all(&patch_dir)?;
    }
    std::fs::create_dir_all(&patch_dir)?;

    let image = Image::read_file(&input)?;
    let manifest =
        Patcher::from_config(&config.patcher).divide_and_save(&image, &patch_dir, &file_name)?;
    tracing::info!("Wrote {} patches to {}", manifest.patches.len(), patch_dir.display());

    let mut reassembler_config = config.reassembler.clone();
    if reassembler_config.output_dir.as_os_str().is_empty() {
        reassembler_config.output_dir = work_dir.clone();
    }

    let storage = InMemoryStorage::new();
    let reassembler = Reassembler::from_config(&reassembler_config, &config.upload);
    let output =
        reassembler.recombine(&patch_dir, "restored", Some(&storage as &dyn StorageAdapter))?;

    tracing::info!(
        "Restored canvas at {}, uploaded to {}/{}: {}",
        output.display(),
        config.upload.bucket,
        config.upload.key,
        storage.contains(&config.upload.bucket, &config.upload.key)
    );

    Ok(())
}

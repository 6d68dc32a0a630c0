use std::collections::BTreeMap;
use std::path::Path;

use crate::common::test_utils::{gradient_image, gradient_rgb, test_dir};
use crate::prelude::*;

fn write_patch(dir: &Path, name: &str, image: &Image) {
    image.save_png(dir.join(name)).unwrap();
}

/// Writes `image` cut into `patch_size` squares using `naming`.
fn write_grid(dir: &Path, image: &Image, patch_size: u32, naming: PatchNaming) {
    let grid = GridShape::for_image(image.width(), image.height(), patch_size);
    for coord in grid.coords() {
        let patch = image
            .crop(coord.col * patch_size, coord.row * patch_size, patch_size, patch_size)
            .unwrap();
        write_patch(dir, &naming.file_name(coord), &patch);
    }
}

// =============================================================================
// Round trips through the patcher
// =============================================================================

#[test]
fn roundtrip_1024_is_pixel_identical() {
    let patches = test_dir("reassembler_roundtrip_patches");
    let output = test_dir("reassembler_roundtrip_output");
    let image = gradient_rgb(1024, 1024);

    divide_and_save(&image, &patches, "scene.png", 512).unwrap();
    let path = recombine(&patches, "restored", &output, None).unwrap();

    assert_eq!(path, output.join("restored.png"));
    assert_eq!(Image::read_file(&path).unwrap(), image);
}

#[test]
fn roundtrip_600_keeps_only_full_patches() {
    let patches = test_dir("reassembler_600_patches");
    let output = test_dir("reassembler_600_output");
    let image = gradient_rgb(600, 600);

    divide_and_save(&image, &patches, "scene.png", 512).unwrap();
    let path = recombine(&patches, "restored", &output, None).unwrap();

    let restored = Image::read_file(path).unwrap();
    assert_eq!((restored.width(), restored.height()), (512, 512));
    assert_eq!(restored, image.crop(0, 0, 512, 512).unwrap());
}

#[test]
fn canvas_covers_whole_patches_only() {
    let patches = test_dir("reassembler_remainder_patches");
    let output = test_dir("reassembler_remainder_output");
    let image = gradient_rgb(47, 33);

    divide_and_save(&image, &patches, "scene.png", 10).unwrap();
    let restored = Image::read_file(recombine(&patches, "r", &output, None).unwrap()).unwrap();

    assert_eq!((restored.width(), restored.height()), (40, 30));
    assert_eq!(restored, image.crop(0, 0, 40, 30).unwrap());
}

#[test]
fn gray_patches_become_rgb_canvas() {
    let patches = test_dir("reassembler_gray_patches");
    let output = test_dir("reassembler_gray_output");
    let image = gradient_image(8, 8, ColorFormat::L_U8);

    divide_and_save(&image, &patches, "scene.png", 4).unwrap();
    let restored = Image::read_file(recombine(&patches, "r", &output, None).unwrap()).unwrap();

    assert_eq!(restored.desc().color_format, ColorFormat::RGB_U8);
    assert_eq!(restored, image.to_rgb_u8().unwrap());
}

// =============================================================================
// Grid inference
// =============================================================================

#[test]
fn empty_directory_is_grid_inference_error() {
    let patches = test_dir("reassembler_empty");
    let output = test_dir("reassembler_empty_output");

    let result = recombine(&patches, "r", &output, None);
    assert!(matches!(
        result,
        Err(Error::GridInference(GridInferenceError::Empty(_)))
    ));
    assert!(!output.join("r.png").exists());
}

#[test]
fn grid_is_inferred_from_max_indices() {
    let patches = test_dir("reassembler_infer");
    write_grid(&patches, &gradient_rgb(12, 8), 4, PatchNaming::Canonical);

    let layout = infer_layout(&patches).unwrap();
    assert_eq!(layout.grid(), GridShape::new(2, 3));
    assert_eq!(layout.naming(), PatchNaming::Canonical);
    assert_eq!(
        layout.path(PatchCoord::new(1, 2)),
        Some(patches.join("1_2.png").as_path())
    );
}

#[test]
fn hidden_files_and_manifest_are_ignored() {
    let patches = test_dir("reassembler_ignored");
    write_grid(&patches, &gradient_rgb(4, 4), 4, PatchNaming::Canonical);
    std::fs::write(patches.join(".DS_Store"), b"x").unwrap();
    std::fs::write(patches.join(MANIFEST_FILE_NAME), b"x").unwrap();
    std::fs::create_dir(patches.join("nested")).unwrap();

    assert_eq!(infer_layout(&patches).unwrap().grid(), GridShape::new(1, 1));
}

#[test]
fn unrecognized_file_is_rejected() {
    let patches = test_dir("reassembler_unrecognized");
    write_grid(&patches, &gradient_rgb(4, 4), 4, PatchNaming::Canonical);
    std::fs::write(patches.join("notes.txt"), b"x").unwrap();

    assert!(matches!(
        infer_layout(&patches),
        Err(Error::GridInference(GridInferenceError::UnrecognizedFileName(name)))
            if name == "notes.txt"
    ));
}

#[test]
fn multi_digit_indices_are_flagged_as_duplicates() {
    let patches = test_dir("reassembler_multi_digit");
    let patch = gradient_rgb(2, 2);
    write_patch(&patches, "0_0.png", &patch);
    write_patch(&patches, "10_0.png", &patch);

    assert!(matches!(
        infer_layout(&patches),
        Err(Error::GridInference(GridInferenceError::DuplicateCoordinate { coord, .. }))
            if coord == PatchCoord::ORIGIN
    ));
}

#[test]
fn legacy_naming_is_accepted() {
    let patches = test_dir("reassembler_legacy");
    let output = test_dir("reassembler_legacy_output");
    let image = gradient_rgb(8, 8);
    write_grid(&patches, &image, 4, PatchNaming::Legacy);

    let layout = infer_layout(&patches).unwrap();
    assert_eq!(layout.naming(), PatchNaming::Legacy);

    let restored = Image::read_file(recombine(&patches, "r", &output, None).unwrap()).unwrap();
    assert_eq!(restored, image);
}

#[test]
fn mixed_naming_is_rejected() {
    let patches = test_dir("reassembler_mixed");
    let patch = gradient_rgb(2, 2);
    write_patch(&patches, "0_0.png", &patch);
    write_patch(&patches, "0_1-0000.png", &patch);

    assert!(matches!(
        infer_layout(&patches),
        Err(Error::GridInference(GridInferenceError::MixedNaming(_)))
    ));
}

// =============================================================================
// Stitching failures
// =============================================================================

#[test]
fn missing_origin_is_not_found() {
    let patches = test_dir("reassembler_no_origin");
    let output = test_dir("reassembler_no_origin_output");
    write_grid(&patches, &gradient_rgb(8, 8), 4, PatchNaming::Canonical);
    std::fs::remove_file(patches.join("0_0.png")).unwrap();

    let err = recombine(&patches, "r", &output, None).unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, Error::PatchNotFound(path) if path == patches.join("0_0.png")));
    assert!(!output.join("r.png").exists());
}

#[test]
fn missing_inner_patch_fails_whole_reassembly() {
    let patches = test_dir("reassembler_hole");
    let output = test_dir("reassembler_hole_output");
    write_grid(&patches, &gradient_rgb(12, 8), 4, PatchNaming::Canonical);
    std::fs::remove_file(patches.join("1_1.png")).unwrap();

    let err = recombine(&patches, "r", &output, None).unwrap_err();
    assert!(matches!(err, Error::PatchNotFound(path) if path == patches.join("1_1.png")));
    assert!(!output.join("r.png").exists());
}

#[test]
fn corrupt_patch_is_decode_error() {
    let patches = test_dir("reassembler_corrupt");
    let output = test_dir("reassembler_corrupt_output");
    write_grid(&patches, &gradient_rgb(8, 4), 4, PatchNaming::Canonical);
    std::fs::write(patches.join("0_1.png"), b"not a png").unwrap();

    let result = recombine(&patches, "r", &output, None);
    assert!(matches!(result, Err(Error::Decode(_))));
}

#[test]
fn patch_size_mismatch_is_rejected() {
    let patches = test_dir("reassembler_mismatch");
    write_patch(&patches, "0_0.png", &gradient_rgb(4, 4));
    write_patch(&patches, "0_1.png", &gradient_rgb(3, 4));

    let layout = infer_layout(&patches).unwrap();
    assert!(matches!(
        stitch(&layout),
        Err(Error::PatchSizeMismatch { coord, expected: (4, 4), actual: (3, 4) })
            if coord == PatchCoord::new(0, 1)
    ));
}

// =============================================================================
// Manifest-driven reassembly
// =============================================================================

#[test]
fn manifest_supports_large_grids() {
    let patches = test_dir("reassembler_manifest_large");
    let output = test_dir("reassembler_manifest_large_output");
    let image = gradient_rgb(24, 44);

    let manifest = divide_and_save(&image, &patches, "scene.png", 4).unwrap();
    assert_eq!(manifest.grid, GridShape::new(11, 6));

    // File names alone are ambiguous beyond nine rows.
    assert!(infer_layout(&patches).is_err());

    let path = recombine_manifest(&manifest, &patches, "r", &output, None).unwrap();
    assert_eq!(Image::read_file(path).unwrap(), image);
}

#[test]
fn reassembler_prefers_persisted_manifest() {
    let patches = test_dir("reassembler_manifest_file");
    let output = test_dir("reassembler_manifest_file_output");
    let image = gradient_rgb(8, 44);

    Patcher::new(4)
        .with_manifest(true)
        .divide_and_save(&image, &patches, "scene.png")
        .unwrap();

    let path = Reassembler::new(&output)
        .recombine(&patches, "r", None)
        .unwrap();
    assert_eq!(Image::read_file(path).unwrap(), image);
}

#[test]
fn manifest_patch_missing_on_disk_is_not_found() {
    let patches = test_dir("reassembler_manifest_missing");
    let output = test_dir("reassembler_manifest_missing_output");

    let manifest = divide_and_save(&gradient_rgb(8, 8), &patches, "scene.png", 4).unwrap();
    std::fs::remove_file(patches.join("1_0.png")).unwrap();

    let err = recombine_manifest(&manifest, &patches, "r", &output, None).unwrap_err();
    assert!(matches!(err, Error::PatchNotFound(path) if path == patches.join("1_0.png")));
}

#[test]
fn manifest_with_partial_coverage_is_rejected() {
    let patches = test_dir("reassembler_manifest_partial");
    let output = test_dir("reassembler_manifest_partial_output");

    let mut manifest = divide_and_save(&gradient_rgb(4, 4), &patches, "scene.png", 4).unwrap();
    manifest.grid = GridShape::new(1000, 1000);

    let result = recombine_manifest(&manifest, &patches, "r", &output, None);
    assert!(matches!(result, Err(Error::Manifest(_))));

    manifest.save_file(patches.join(MANIFEST_FILE_NAME)).unwrap();
    let result = Reassembler::new(&output).recombine(&patches, "r", None);
    assert!(matches!(result, Err(Error::Manifest(_))));
    assert!(!output.join("r.png").exists());
}

#[test]
fn oversized_canvas_is_error() {
    let patches = test_dir("reassembler_oversized");
    write_patch(&patches, "0_0.png", &gradient_rgb(4096, 1));

    let grid = GridShape::new(1, 1 << 20);
    let layout = PatchLayout {
        input_dir: patches.clone(),
        grid,
        naming: PatchNaming::Canonical,
        files: BTreeMap::from([(PatchCoord::ORIGIN, patches.join("0_0.png"))]),
    };

    assert!(matches!(
        stitch(&layout),
        Err(Error::CanvasTooLarge { grid: g, patch_width: 4096, patch_height: 1 }) if g == grid
    ));
}

// =============================================================================
// Upload
// =============================================================================

#[test]
fn upload_uses_default_bucket_and_key() {
    let patches = test_dir("reassembler_upload_default");
    let output = test_dir("reassembler_upload_default_output");
    let image = gradient_rgb(8, 8);
    divide_and_save(&image, &patches, "scene.png", 4).unwrap();

    let storage = InMemoryStorage::new();
    let target = UploadTarget::new(&storage);
    let path = recombine(&patches, "r", &output, Some(&target)).unwrap();

    assert!(storage.contains(DEFAULT_UPLOAD_BUCKET, DEFAULT_UPLOAD_KEY));
    assert_eq!(
        storage.fetch("satupscale", "final_image.png").unwrap(),
        std::fs::read(path).unwrap()
    );
    assert_eq!(read_image(&storage, "satupscale", "final_image.png").unwrap(), image);
}

#[test]
fn upload_target_can_be_overridden() {
    let patches = test_dir("reassembler_upload_custom");
    let output = test_dir("reassembler_upload_custom_output");
    divide_and_save(&gradient_rgb(4, 4), &patches, "scene.png", 4).unwrap();

    let storage = InMemoryStorage::new();
    let target = UploadTarget::new(&storage)
        .with_bucket("tiles")
        .with_key("runs/1/out.png");
    recombine(&patches, "r", &output, Some(&target)).unwrap();

    assert_eq!(storage.len(), 1);
    assert!(storage.contains("tiles", "runs/1/out.png"));
}

#[test]
fn upload_failure_propagates() {
    let patches = test_dir("reassembler_upload_denied");
    let output = test_dir("reassembler_upload_denied_output");
    divide_and_save(&gradient_rgb(4, 4), &patches, "scene.png", 4).unwrap();

    let storage = InMemoryStorage::new();
    storage.deny_bucket(DEFAULT_UPLOAD_BUCKET);
    let target = UploadTarget::new(&storage);

    let result = recombine(&patches, "r", &output, Some(&target));
    assert!(matches!(result, Err(Error::Storage(StorageError::Auth(_)))));
}

#[test]
fn reassembler_uses_configured_upload() {
    let patches = test_dir("reassembler_configured");
    let output = test_dir("reassembler_configured_output");
    divide_and_save(&gradient_rgb(4, 4), &patches, "scene.png", 4).unwrap();

    let mut config = TileworkConfig::default();
    config.reassembler.output_dir = output.clone();
    config.upload.key = "stitched.png".to_string();

    let storage = InMemoryStorage::new();
    let reassembler = Reassembler::from_config(&config.reassembler, &config.upload);
    let path = reassembler
        .recombine(&patches, "r", Some(&storage as &dyn StorageAdapter))
        .unwrap();

    assert_eq!(path, output.join("r.png"));
    assert!(storage.contains(DEFAULT_UPLOAD_BUCKET, "stitched.png"));
}

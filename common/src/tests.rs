use serde::{Deserialize, Serialize};

use crate::file_utils::{file_name_str, list_files};
use crate::log_setup::{setup_logging, LogSetupError};
use crate::test_utils::fresh_test_dir;
use crate::{FileExtensionError, FileFormat};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Sample {
    name: String,
    size: u32,
}

#[test]
fn file_format_from_extension() {
    assert_eq!(FileFormat::from_file_name("a.yaml").unwrap(), FileFormat::Yaml);
    assert_eq!(FileFormat::from_file_name("a.YML").unwrap(), FileFormat::Yaml);
    assert_eq!(FileFormat::from_file_name("a.json").unwrap(), FileFormat::Json);
    assert_eq!(
        FileFormat::from_path("dir.d/manifest.yaml").unwrap(),
        FileFormat::Yaml
    );
}

#[test]
fn file_format_rejects_unknown_extension() {
    assert!(matches!(
        FileFormat::from_file_name("a.toml"),
        Err(FileExtensionError::UnsupportedFileExtension(_))
    ));
    assert!(matches!(
        FileFormat::from_file_name("noext"),
        Err(FileExtensionError::MissingFileExtension)
    ));
}

#[test]
fn serde_yaml_and_json_roundtrip() {
    let sample = Sample {
        name: "patch".to_string(),
        size: 512,
    };

    for format in [FileFormat::Yaml, FileFormat::Json] {
        let bytes = crate::serde::serialize(&sample, format).unwrap();
        assert!(bytes.ends_with(b"\n"));
        let restored: Sample = crate::serde::deserialize(&bytes, format).unwrap();
        assert_eq!(restored, sample);
    }
}

#[test]
fn deserialize_reports_malformed_input() {
    let result: anyhow::Result<Sample> = crate::serde::deserialize(b"{ not json", FileFormat::Json);
    assert!(result.is_err());
}

#[test]
fn list_files_skips_directories_and_sorts() {
    let dir = fresh_test_dir("common_list_files");
    std::fs::write(dir.join("b.png"), b"b").unwrap();
    std::fs::write(dir.join("a.png"), b"a").unwrap();
    std::fs::create_dir(dir.join("nested")).unwrap();

    let files = list_files(&dir).unwrap();
    let names: Vec<&str> = files.iter().filter_map(|p| file_name_str(p)).collect();
    assert_eq!(names, vec!["a.png", "b.png"]);
}

#[test]
fn list_files_missing_directory_is_error() {
    let dir = fresh_test_dir("common_list_missing").join("absent");
    assert!(list_files(&dir).is_err());
}

#[test]
fn setup_logging_rejects_invalid_filter() {
    let dir = fresh_test_dir("common_log_setup");
    let result = setup_logging("tilework=not_a_level", &dir);
    assert!(matches!(result, Err(LogSetupError::InvalidFilter(_))));
}

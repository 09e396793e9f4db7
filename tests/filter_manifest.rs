// Tests for filtering the manifest produced by a real diff run
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use delta_image::image_diff::{DiffConfig, DiffHandler};
use delta_image::manifest::{self, FilterError};
use image::{ImageFormat, Rgb, RgbImage};
use serde_json::Value;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock error")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("delta-image-filter-it-{tag}-{nanos}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn produce_diff(dir: &Path) -> PathBuf {
    let black = dir.join("black.png");
    let white = dir.join("white.png");
    RgbImage::from_pixel(3, 3, Rgb([0, 0, 0]))
        .save_with_format(&black, ImageFormat::Png)
        .expect("write black");
    RgbImage::from_pixel(3, 3, Rgb([255, 255, 255]))
        .save_with_format(&white, ImageFormat::Png)
        .expect("write white");

    let output = dir.join("diff");
    DiffHandler::new(DiffConfig::default())
        .expect("handler")
        .differentiate(&output, &black, &white)
        .expect("diff should succeed");
    output
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).expect("read json")).expect("parse json")
}

#[test]
fn filters_diff_output_and_copies_images() {
    let dir = unique_temp_dir("e2e");
    let diff_dir = produce_diff(&dir);
    let filtered_dir = dir.join("filtered");

    let summary = manifest::filter(&diff_dir, &filtered_dir, &["matchPercent", "ColorDelta", "Missing"])
        .expect("filter should succeed");

    assert_eq!(summary.kept_keys, vec!["matchPercent", "ColorDelta"]);
    assert_eq!(summary.skipped_keys, vec!["Missing"]);
    assert_eq!(summary.copied_files, vec!["ColorDelta.png"]);

    let filtered = read_json(&filtered_dir.join("filtered.json"));
    let keys: Vec<&String> = filtered.as_object().expect("object").keys().collect();
    assert_eq!(keys, vec!["matchPercent", "ColorDelta"]);
    assert_eq!(filtered["matchPercent"], 0.0);

    assert_eq!(
        std::fs::read(filtered_dir.join("ColorDelta.png")).expect("copied png"),
        std::fs::read(diff_dir.join("ColorDelta.png")).expect("source png")
    );
    assert!(!filtered_dir.join("ColumnIndex.png").exists());
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn scalar_only_filter_writes_manifest_without_images() {
    let dir = unique_temp_dir("scalar");
    let diff_dir = produce_diff(&dir);
    let filtered_dir = dir.join("filtered");

    let summary = manifest::filter(&diff_dir, &filtered_dir, &["averageDelta"])
        .expect("filter should succeed");

    assert!(summary.copied_files.is_empty());
    let filtered = read_json(&filtered_dir.join("filtered.json"));
    assert_eq!(filtered["averageDelta"], 255.0);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn directory_without_manifest_is_rejected() {
    let dir = unique_temp_dir("empty");

    let err = manifest::filter(dir.join("nothing"), dir.join("out"), &["ColorDelta"])
        .expect_err("missing manifest must fail");

    assert!(matches!(err, FilterError::ManifestNotFound(_)));
    assert!(!dir.join("out").exists());
    let _ = std::fs::remove_dir_all(dir);
}

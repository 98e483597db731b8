mod common;

use std::path::Path;

use bsh_extractor::{BshError, BshExtractor, ExtractConfig};
use common::{
    colour, container, palette_bytes, record, small_record, temp_dir, write_file, END_OF_IMAGE,
};

fn setup(name: &str, container_bytes: &[u8]) -> (std::path::PathBuf, ExtractConfig) {
    let dir = temp_dir(name);
    write_file(&dir.join("TOOLGFX/STADTFLD.COL"), &palette_bytes());
    write_file(&dir.join("GFX/TEST.BSH"), container_bytes);

    let config = ExtractConfig {
        output_dir: dir.join("out"),
        ..ExtractConfig::default()
    };
    (dir, config)
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_extracts_images_with_dense_names() {
    let data = container(&[small_record(), record(-1, 3, &[]), small_record()]);
    let (dir, config) = setup("dense_names", &data);

    let extractor = BshExtractor::new(&dir, config).unwrap();
    let summary = extractor.extract("GFX/TEST.BSH").unwrap();

    assert_eq!(summary.saved.len(), 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.saved[0], dir.join("out/TEST.BSH_0.png"));
    assert_eq!(summary.saved[1], dir.join("out/TEST.BSH_1.png"));

    let image = image::open(&summary.saved[1]).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (2, 2));
    assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);
    assert_eq!(image.get_pixel(1, 0).0, colour(7));

    let manifest = read_json(summary.manifest.as_ref().unwrap());
    assert_eq!(manifest["container"], "TEST.BSH");
    assert_eq!(manifest["table_entries"], 3);
    assert_eq!(manifest["skipped"], 1);
    assert_eq!(manifest["images"][1]["entry"], 2);
    assert_eq!(manifest["images"][1]["file"], "TEST.BSH_1.png");
    assert!(manifest.get("error").is_none());
}

#[test]
fn test_missing_container_is_reported() {
    let (dir, config) = setup("missing_container", &container(&[small_record()]));

    let extractor = BshExtractor::new(&dir, config).unwrap();
    assert!(matches!(
        extractor.extract("GFX/NOPE.BSH"),
        Err(BshError::ContainerNotFound(_))
    ));
}

#[test]
fn test_palette_errors_fail_construction() {
    let dir = temp_dir("palette_errors");
    let config = ExtractConfig {
        output_dir: dir.join("out"),
        ..ExtractConfig::default()
    };

    assert!(matches!(
        BshExtractor::new(&dir, config.clone()),
        Err(BshError::Io(_))
    ));

    let mut short = palette_bytes();
    short.pop();
    write_file(&dir.join("TOOLGFX/STADTFLD.COL"), &short);
    assert!(matches!(
        BshExtractor::new(&dir, config),
        Err(BshError::MalformedPalette { len: 1043, .. })
    ));
}

#[test]
fn test_failure_keeps_earlier_images_and_records_error() {
    let data = container(&[small_record(), record(1, 1, &[0, 1, 3])]);
    let (dir, mut config) = setup("partial_failure", &data);
    config.progress_file = Some(dir.join("progress.json"));

    let extractor = BshExtractor::new(&dir, config).unwrap();
    let result = extractor.extract("GFX/TEST.BSH");

    assert!(matches!(result, Err(BshError::TruncatedImageStream { .. })));
    assert!(dir.join("out/TEST.BSH_0.png").is_file());
    assert!(!dir.join("out/TEST.BSH_1.png").exists());

    let manifest = read_json(&dir.join("out/TEST.BSH.json"));
    assert_eq!(manifest["images"].as_array().unwrap().len(), 1);
    assert!(manifest["error"].as_str().unwrap().contains("truncated"));

    let progress = read_json(&dir.join("progress.json"));
    assert_eq!(progress["status"], "failed");
    assert_eq!(progress["saved"], 1);
}

#[test]
fn test_manifest_and_progress_are_optional() {
    let data = container(&[record(1, 1, &[0, 1, 4, END_OF_IMAGE])]);
    let (dir, mut config) = setup("no_manifest", &data);
    config.write_manifest = false;

    let extractor = BshExtractor::new(&dir, config).unwrap();
    let summary = extractor.extract("GFX/TEST.BSH").unwrap();

    assert_eq!(summary.saved.len(), 1);
    assert!(summary.manifest.is_none());
    assert!(!dir.join("out/TEST.BSH.json").exists());
    assert!(!dir.join("progress.json").exists());
}

#[test]
fn test_progress_reports_completion() {
    let data = container(&[small_record(), record(0, 0, &[])]);
    let (dir, mut config) = setup("progress_done", &data);
    config.progress_file = Some(dir.join("progress.json"));

    let extractor = BshExtractor::new(&dir, config).unwrap();
    extractor.extract("GFX/TEST.BSH").unwrap();

    let progress = read_json(&dir.join("progress.json"));
    assert_eq!(progress["status"], "done");
    assert_eq!(progress["container"], "TEST.BSH");
    assert_eq!(progress["current"], 2);
    assert_eq!(progress["total"], 2);
    assert_eq!(progress["skipped"], 1);
}

#[test]
fn test_optimised_png_keeps_pixels() {
    let data = container(&[small_record()]);
    let (dir, mut config) = setup("optimised", &data);
    config.optimise_png = true;

    let extractor = BshExtractor::new(&dir, config).unwrap();
    let summary = extractor.extract("GFX/TEST.BSH").unwrap();

    let image = image::open(&summary.saved[0]).unwrap().to_rgba8();
    assert_eq!(image.get_pixel(0, 1).0, colour(1));
    assert_eq!(image.get_pixel(1, 1).0, colour(2));
    assert!(!dir.join("out/TEST.BSH_0.temp.png").exists());
}

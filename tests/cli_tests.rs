//! End-to-end tests of the `facet-view` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn facet_view() -> Command {
    Command::cargo_bin("facet-view").unwrap()
}

fn write_chrom_sizes(dir: &TempDir) -> String {
    let path = dir.path().join("hg19.chrom.sizes");
    fs::write(&path, "chr1\t1000\nchr2\t500\nchrX\t300\n").unwrap();
    path.to_str().unwrap().to_string()
}

fn write_catalog(dir: &TempDir) -> String {
    let path = dir.path().join("files.json");
    fs::write(
        &path,
        r#"[
            {"s3_url": "https://example.org/a.bw", "label": "Sample A"},
            {"s3_url": "https://example.org/b.bw", "label": "Sample B"},
            {"s3_url": "https://example.org/c.bw", "label": "Sample C"}
        ]"#,
    )
    .unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_region_valid() {
    facet_view()
        .args(["region", "chr2:1000-chr2:2000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Start: chr2:1000"))
        .stdout(predicate::str::contains("End:   chr2:2000"));
}

#[test]
fn test_region_json() {
    let output = facet_view()
        .args(["region", "chrX:5-chrMT:10", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["start_chrom"], "chrX");
    assert_eq!(json["end_chrom"], "chrMT");
    assert_eq!(json["end_pos"], 10);
}

#[test]
fn test_region_invalid() {
    for input in ["chr1:100", "chr23:1-chr23:2", "chr1:1 - chr1:2", "1:1-1:2"] {
        facet_view()
            .args(["region", input])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid region"));
    }
}

#[test]
fn test_navigate_with_local_chrom_sizes() {
    let dir = TempDir::new().unwrap();
    let sizes = write_chrom_sizes(&dir);

    let output = facet_view()
        .args([
            "navigate",
            "chr1:100-chr2:200",
            "--chrom-sizes",
            &sizes,
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["view_id"], "aa");
    assert_eq!(json["start"], 100);
    assert_eq!(json["end"], 1200);
    assert_eq!(json["reference_start"], 0);
    assert_eq!(json["reference_end"], 1000);
    assert_eq!(json["duration_ms"], 2500);
}

#[test]
fn test_navigate_unknown_chromosome() {
    let dir = TempDir::new().unwrap();
    let sizes = write_chrom_sizes(&dir);

    facet_view()
        .args(["navigate", "chr1:1-chrY:2", "--chrom-sizes", &sizes])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown chromosome: chrY"));
}

#[test]
fn test_navigate_respects_settings_file() {
    let dir = TempDir::new().unwrap();
    let sizes = write_chrom_sizes(&dir);
    let settings = dir.path().join("settings.json");
    fs::write(&settings, r#"{"animation_ms": 100, "view_id": "aa"}"#).unwrap();

    facet_view()
        .args(["navigate", "chr2:0-chr2:10", "--chrom-sizes", &sizes, "--format", "tsv"])
        .arg("--config")
        .arg(&settings)
        .assert()
        .success()
        .stdout(predicate::str::contains("aa\t1000\t1010\t0\t1000\t100"));
}

#[test]
fn test_datasets_tsv() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir);

    facet_view()
        .args(["datasets", "--catalog", &catalog, "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("label\tsource_url"))
        .stdout(predicate::str::contains("Sample B\thttps://example.org/b.bw"));
}

#[test]
fn test_compose_selection_and_export() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir);
    let output = dir.path().join("view.json");
    let export = dir.path().join("cohort.svg");

    facet_view()
        .args([
            "compose",
            "--catalog",
            &catalog,
            "--select",
            "Sample C",
            "--select",
            "Sample A",
        ])
        .arg("--output")
        .arg(&output)
        .arg("--export")
        .arg(&export)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let tracks = json["views"][0]["tracks"]["top"].as_array().unwrap();
    assert_eq!(tracks.len(), 6);
    assert_eq!(tracks[0]["uid"], "chromosome-labels");
    assert_eq!(tracks[2]["type"], "bar");
    assert_eq!(tracks[2]["data"]["url"], "https://example.org/c.bw");
    assert_eq!(tracks[3]["type"], "text");
    assert_eq!(tracks[4]["options"]["name"], "Sample A");

    let svg = fs::read_to_string(&export).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Sample C"));
}

#[test]
fn test_compose_unknown_dataset() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir);

    facet_view()
        .args(["compose", "--catalog", &catalog, "--select", "Sample Z"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dataset 'Sample Z' not found"));
}

#[test]
fn test_compose_rejects_bad_export_name() {
    let dir = TempDir::new().unwrap();
    let export = dir.path().join("cohort.exe");

    facet_view()
        .arg("compose")
        .arg("--export")
        .arg(&export)
        .assert()
        .failure();
    assert!(!export.exists());
}

#[test]
fn test_compose_without_selection_trims_to_prefix() {
    let dir = TempDir::new().unwrap();
    let viewconf = dir.path().join("base.json");
    fs::write(
        &viewconf,
        r#"{
            "views": [{
                "uid": "aa",
                "tracks": {"top": [
                    {"uid": "labels", "type": "horizontal-chromosome-labels", "height": 30},
                    {"uid": "combined", "type": "combined", "data": {"type": "divided", "children": []}, "height": 40},
                    {"uid": "old-data", "type": "bar", "data": {"type": "bbi", "url": "https://example.org/old.bw", "chromSizesUrl": "sizes"}, "height": 50},
                    {"uid": "old-spacer", "type": "text", "height": 10}
                ]}
            }]
        }"#,
    )
    .unwrap();
    let output = dir.path().join("view.json");

    facet_view()
        .arg("compose")
        .arg("--viewconf")
        .arg(&viewconf)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let tracks = json["views"][0]["tracks"]["top"].as_array().unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[1]["uid"], "combined");
    assert_eq!(tracks[1]["data"]["type"], "divided");
}

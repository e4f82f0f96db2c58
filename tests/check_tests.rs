//! Integration tests for the setup report behind `check`.

use metube_ops::config::env::{ENV_PORT, ENV_YTDL_OPTIONS_FILE};
use metube_ops::config::{EnvSnapshot, YtdlOptions, write_options};
use metube_ops::diagnostics::{FileStatus, SETUP_FILES, SetupPlan, build_setup_report};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Plan rooted at `root` that runs no external tools and only touches `root`.
fn offline_plan(root: &Path) -> SetupPlan {
    let mut plan = SetupPlan::new(root);
    plan.check_tools = false;
    plan.test_dirs = vec![root.join("scratch/downloads")];
    plan
}

#[test]
fn test_report_on_empty_root() {
    let dir = TempDir::new().unwrap();
    let env = EnvSnapshot::from_pairs([(ENV_PORT, "8081")]);

    let report = build_setup_report(&offline_plan(dir.path()), &env);

    assert_eq!(report.files.len(), SETUP_FILES.len());
    assert!(
        report
            .files
            .iter()
            .all(|f| matches!(f.status, FileStatus::Missing))
    );
    assert!(report.tools.is_empty());
    assert!(!report.options.is_ok());
    assert!(!report.options.is_parse_error());
    assert!(report.directories.iter().all(|d| d.is_ok()));
    assert!(dir.path().join("scratch/downloads").is_dir());
}

#[test]
fn test_report_reads_layout() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("app")).unwrap();
    fs::write(dir.path().join("app/main.py"), "print('hi')\n").unwrap();
    fs::write(dir.path().join("ytdl_config.json"), "{ broken").unwrap();
    write_options(
        &dir.path().join("ytdl_config_android.json"),
        &YtdlOptions::minimal(),
    )
    .unwrap();

    let report = build_setup_report(&offline_plan(dir.path()), &EnvSnapshot::new());

    let status_of = |name: &str| {
        &report
            .files
            .iter()
            .find(|f| f.path == dir.path().join(name))
            .unwrap()
            .status
    };
    assert!(matches!(status_of("app/main.py"), FileStatus::Ok { bytes: 12 }));
    assert!(matches!(status_of("ytdl_config.json"), FileStatus::Error { .. }));
    assert!(matches!(status_of("cookies.txt"), FileStatus::Missing));

    // Default options file is the android one, relative to the root.
    assert!(report.options.is_ok());
    assert_eq!(report.options.format.as_deref(), Some("18/worst"));

    assert!(report.working_dir.entries.contains(&"app".to_string()));
}

#[test]
fn test_report_flags_unparsable_options_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("custom.json"), "[1, 2").unwrap();
    let env = EnvSnapshot::from_pairs([(ENV_YTDL_OPTIONS_FILE, "custom.json")]);

    let report = build_setup_report(&offline_plan(dir.path()), &env);

    assert!(report.options.is_parse_error());
}

#[test]
fn test_report_serializes() {
    let dir = TempDir::new().unwrap();
    let report = build_setup_report(&offline_plan(dir.path()), &EnvSnapshot::new());

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["files"][0]["status"], "missing");
    assert_eq!(value["options"]["error"]["code"], "CONFIG_NOT_FOUND");
    assert!(value["environment"].is_array());
}

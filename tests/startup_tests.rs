//! Integration tests for the startup sequence.

use metube_ops::config::env::{
    ENV_BASE_DIR, ENV_DOWNLOAD_DIR, ENV_HOST, ENV_PORT, ENV_STATE_DIR, ENV_TEMP_DIR,
    ENV_YTDL_OPTIONS_FILE,
};
use metube_ops::config::resolver::SYNTHESIZED_FILE;
use metube_ops::config::{ConfigResolver, EnvSnapshot, FallbackChain, ResolutionOutcome};
use metube_ops::error::ErrorCode;
use metube_ops::startup::Startup;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Snapshot with every directory and the requested options file under `root`.
fn isolated_env(root: &Path) -> EnvSnapshot {
    EnvSnapshot::from_pairs([
        (ENV_DOWNLOAD_DIR, path_string(&root.join("downloads"))),
        (ENV_STATE_DIR, path_string(&root.join("state"))),
        (ENV_TEMP_DIR, path_string(&root.join("tmp"))),
        (ENV_YTDL_OPTIONS_FILE, path_string(&root.join("ytdl_config_android.json"))),
    ])
}

fn startup_in(root: &Path) -> Startup {
    Startup::new(
        ConfigResolver::new(FallbackChain::new(["ytdl_config.json"]).rooted_at(root))
            .with_synthesized_path(root.join(SYNTHESIZED_FILE)),
    )
}

#[test]
fn test_startup_seeds_resolves_and_creates_dirs() {
    let dir = TempDir::new().unwrap();
    let mut env = isolated_env(dir.path());

    let report = startup_in(dir.path()).run(&mut env).unwrap();

    assert_eq!(env.get(ENV_PORT), Some("8081"));
    assert_eq!(env.get(ENV_HOST), Some("0.0.0.0"));
    assert_eq!(env.get(ENV_BASE_DIR), Some("/app"));
    assert!(report.seeded.contains(&ENV_PORT));
    assert!(!report.seeded.contains(&ENV_DOWNLOAD_DIR));

    assert_eq!(report.resolution.outcome, ResolutionOutcome::Synthesized);
    assert_eq!(
        env.get_path(ENV_YTDL_OPTIONS_FILE),
        Some(dir.path().join(SYNTHESIZED_FILE))
    );
    assert!(report.options_error.is_none());

    assert_eq!(report.directories.len(), 3);
    assert_eq!(report.failed_directories().count(), 0);
    assert!(dir.path().join("downloads").is_dir());
    assert!(dir.path().join("state").is_dir());
    assert!(dir.path().join("tmp").is_dir());
}

#[test]
fn test_startup_keeps_operator_values() {
    let dir = TempDir::new().unwrap();
    let mut env = isolated_env(dir.path());
    env.set(ENV_PORT, "9000");
    fs::write(dir.path().join("ytdl_config_android.json"), "{}").unwrap();

    let report = startup_in(dir.path()).run(&mut env).unwrap();

    assert_eq!(env.get(ENV_PORT), Some("9000"));
    assert!(!report.seeded.contains(&ENV_PORT));
    assert_eq!(report.resolution.outcome, ResolutionOutcome::RequestedFound);
}

#[test]
fn test_startup_reports_unloadable_options_without_failing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ytdl_config.json"), "not json").unwrap();
    let mut env = isolated_env(dir.path());

    let report = startup_in(dir.path()).run(&mut env).unwrap();

    assert_eq!(report.resolution.outcome, ResolutionOutcome::FallbackFound);
    assert_eq!(
        report.options_error.as_ref().map(|e| e.code),
        Some(ErrorCode::ConfigParseError)
    );
}

#[test]
fn test_startup_continues_past_directory_failures() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let mut env = isolated_env(dir.path());
    env.set(ENV_DOWNLOAD_DIR, path_string(&blocker.join("downloads")));

    let report = startup_in(dir.path()).run(&mut env).unwrap();

    let failed: Vec<_> = report.failed_directories().map(|d| d.key).collect();
    assert_eq!(failed, vec![ENV_DOWNLOAD_DIR]);
    assert!(dir.path().join("state").is_dir());
}

#[test]
fn test_startup_fails_only_when_resolution_fails() {
    let dir = TempDir::new().unwrap();
    let mut env = isolated_env(dir.path());
    let startup = Startup::new(
        ConfigResolver::new(FallbackChain::empty())
            .with_synthesized_path(dir.path().join("missing/dir").join(SYNTHESIZED_FILE)),
    );

    let err = startup.run(&mut env).unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigWriteFailed);
    assert_eq!(err.exit_code(), 2);
}

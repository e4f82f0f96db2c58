//! Startup environment normalization.
//!
//! Runs once per process, in a fixed order:
//! 1. seed environment defaults
//! 2. change to `BASE_DIR` (optional)
//! 3. resolve the extractor options file
//! 4. create the download/state/temp directories
//!
//! Only step 3 can fail the startup. Directory failures are reported and
//! collected but never abort.

use crate::config::env::{
    DIRECTORY_KEYS, ENV_BASE_DIR, ENV_DOWNLOAD_DIR, ENV_HOST, ENV_PORT, ENV_YTDL_OPTIONS_FILE,
};
use crate::config::{ConfigResolver, EnvSnapshot, Resolution, load_options};
use crate::error::{OpsError, OpsResult};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of creating one directory named by the environment.
#[derive(Debug)]
pub struct DirectoryStatus {
    pub key: &'static str,
    pub path: PathBuf,
    pub error: Option<OpsError>,
}

impl DirectoryStatus {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything decided during startup.
#[derive(Debug)]
pub struct StartupReport {
    pub seeded: Vec<&'static str>,
    pub resolution: Resolution,
    /// Load error of the selected options file, if any.
    pub options_error: Option<OpsError>,
    pub directories: Vec<DirectoryStatus>,
    pub working_dir: PathBuf,
}

impl StartupReport {
    pub fn failed_directories(&self) -> impl Iterator<Item = &DirectoryStatus> {
        self.directories.iter().filter(|d| !d.is_ok())
    }
}

/// Startup sequence.
#[derive(Debug, Clone, Default)]
pub struct Startup {
    resolver: ConfigResolver,
    chdir_to_base: bool,
}

impl Startup {
    pub fn new(resolver: ConfigResolver) -> Self {
        Self {
            resolver,
            chdir_to_base: false,
        }
    }

    /// Change into `BASE_DIR` before resolving relative paths.
    pub fn chdir_to_base(mut self, enabled: bool) -> Self {
        self.chdir_to_base = enabled;
        self
    }

    /// Normalize `env` in place and resolve the options file.
    pub fn run(&self, env: &mut EnvSnapshot) -> OpsResult<StartupReport> {
        let seeded = env.seed_defaults();
        for key in &seeded {
            info!(key, value = env.get(key).unwrap_or_default(), "Seeded default");
        }

        if self.chdir_to_base
            && let Some(base) = env.get_path(ENV_BASE_DIR)
        {
            change_dir(&base);
        }

        let resolution = self.resolver.resolve(env)?;

        let options_error = load_options(&resolution.path).err();
        if let Some(ref e) = options_error {
            warn!(error = %e, "Selected options file does not load");
            println!("❌ {}", e);
        }

        let directories = prepare_directories(env);

        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        Ok(StartupReport {
            seeded,
            resolution,
            options_error,
            directories,
            working_dir,
        })
    }
}

fn change_dir(base: &Path) {
    if !base.is_dir() {
        warn!(path = %base.display(), "BASE_DIR does not exist; staying in current directory");
        println!(
            "⚠️  Base dir '{}' not found. Staying in current directory.",
            base.display()
        );
        return;
    }
    match std::env::set_current_dir(base) {
        Ok(()) => info!(path = %base.display(), "Changed working directory"),
        Err(e) => {
            warn!(path = %base.display(), error = %e, "Failed to change working directory");
            println!("⚠️  Could not enter '{}': {}", base.display(), e);
        }
    }
}

/// Create one directory, tolerating an existing one.
pub fn ensure_dir(path: &Path) -> OpsResult<()> {
    std::fs::create_dir_all(path).map_err(|e| OpsError::directory_create(path, e))
}

/// Create every directory named by [`DIRECTORY_KEYS`] that is set.
pub fn prepare_directories(env: &EnvSnapshot) -> Vec<DirectoryStatus> {
    let mut statuses = Vec::new();

    for &key in DIRECTORY_KEYS {
        let Some(path) = env.get_path(key) else {
            continue;
        };

        let error = match ensure_dir(&path) {
            Ok(()) => {
                println!("📁 Ensured directory exists: {}", path.display());
                None
            }
            Err(e) => {
                warn!(key, error = %e, "Directory creation failed");
                println!("❌ {}", e);
                Some(e)
            }
        };

        statuses.push(DirectoryStatus { key, path, error });
    }

    statuses
}

/// Print the environment summary.
pub fn print_summary(env: &EnvSnapshot, report: &StartupReport) {
    println!();
    println!("🔧 Environment Summary:");
    println!("  Port: {}", env.display(ENV_PORT));
    println!("  Host: {}", env.display(ENV_HOST));
    println!(
        "  Config: {} ({})",
        env.display(ENV_YTDL_OPTIONS_FILE),
        report.resolution.outcome
    );
    println!("  Download Dir: {}", env.display(ENV_DOWNLOAD_DIR));
    println!("  Working Dir: {}", report.working_dir.display());
}

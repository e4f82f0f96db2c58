//! Environment snapshot.
//!
//! The process environment is captured once at startup into an explicit map.
//! Defaults are seeded into it, the resolved options path is recorded in it,
//! and the launched application receives it as its environment. The global
//! process environment is never written.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Port the web application listens on.
pub const ENV_PORT: &str = "PORT";
/// Bind address of the web application.
pub const ENV_HOST: &str = "HOST";
/// Where finished downloads are stored.
pub const ENV_DOWNLOAD_DIR: &str = "DOWNLOAD_DIR";
/// Where the application keeps its queue state.
pub const ENV_STATE_DIR: &str = "STATE_DIR";
/// Scratch directory for partial downloads.
pub const ENV_TEMP_DIR: &str = "TEMP_DIR";
/// Application root; `start` runs from here.
pub const ENV_BASE_DIR: &str = "BASE_DIR";
/// Extractor options file handed to the application.
pub const ENV_YTDL_OPTIONS_FILE: &str = "YTDL_OPTIONS_FILE";

/// Options file requested when `YTDL_OPTIONS_FILE` is unset.
pub const DEFAULT_OPTIONS_FILE: &str = "ytdl_config_android.json";

/// Defaults seeded into the snapshot for keys absent at startup.
pub const DEFAULTS: &[(&str, &str)] = &[
    (ENV_PORT, "8081"),
    (ENV_HOST, "0.0.0.0"),
    (ENV_DOWNLOAD_DIR, "/tmp/downloads"),
    (ENV_STATE_DIR, "/tmp"),
    (ENV_TEMP_DIR, "/tmp"),
    (ENV_BASE_DIR, "/app"),
];

/// Directory keys created during startup, in order.
pub const DIRECTORY_KEYS: &[&str] = &[ENV_DOWNLOAD_DIR, ENV_STATE_DIR, ENV_TEMP_DIR];

/// Mutable copy of the environment, passed explicitly to whatever needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Empty snapshot (for tests and isolated runs).
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment.
    ///
    /// Variables that are not valid unicode are skipped.
    pub fn from_process() -> Self {
        Self::from_os_pairs(std::env::vars_os())
    }

    /// Build a snapshot from raw OS pairs, skipping any that are not unicode.
    pub fn from_os_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut vars = BTreeMap::new();
        for (key, value) in pairs {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => {
                    vars.insert(key, value);
                }
                (Ok(key), Err(_)) => debug!(key = %key, "Skipping variable with non-unicode value"),
                (Err(key), _) => {
                    debug!(key = %key.to_string_lossy(), "Skipping non-unicode variable name")
                }
            }
        }
        Self { vars }
    }

    /// Build a snapshot from explicit pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Get a value, treating empty strings as unset.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get_non_empty(key).map(PathBuf::from)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Insert `value` only if `key` is absent. Returns true if it was inserted.
    pub fn set_default(&mut self, key: &str, value: &str) -> bool {
        if self.vars.contains_key(key) {
            return false;
        }
        self.vars.insert(key.to_string(), value.to_string());
        true
    }

    /// Seed the standard defaults. Returns the keys that were filled in.
    pub fn seed_defaults(&mut self) -> Vec<&'static str> {
        DEFAULTS
            .iter()
            .filter(|(key, value)| self.set_default(key, value))
            .map(|(key, _)| *key)
            .collect()
    }

    /// The options file the operator asked for, or the android default.
    pub fn requested_options_file(&self) -> PathBuf {
        PathBuf::from(
            self.get_non_empty(ENV_YTDL_OPTIONS_FILE)
                .unwrap_or(DEFAULT_OPTIONS_FILE),
        )
    }

    /// Value for display, `NOT SET` when absent.
    pub fn display(&self, key: &str) -> &str {
        self.get(key).unwrap_or("NOT SET")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Replace the environment of `command` with this snapshot.
    pub fn apply_to(&self, command: &mut Command) {
        command.env_clear();
        command.envs(&self.vars);
    }
}

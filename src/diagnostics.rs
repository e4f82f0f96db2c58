//! Deployment diagnostics.
//!
//! Each check returns a serializable record and has a matching `print_*`
//! that writes one status line per item. The `check` and `debug` commands
//! compose these.

use crate::config::{EnvSnapshot, YtdlOptions, load_options};
use crate::error::{ErrorCode, OpsError};
use crate::startup::ensure_dir;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Files `check` looks for in the application root.
pub const SETUP_FILES: &[&str] = &[
    "app/main.py",
    "requirements.railway.txt",
    "railway_start.py",
    "ytdl_config_android.json",
    "ytdl_config.json",
    "ytdl_config_render.json",
    "cookies.txt",
];

/// Files `debug` requires before launching.
pub const REQUIRED_FILES: &[&str] = &[
    "app/main.py",
    "ytdl_config_android.json",
    "ui/dist/metube/browser/index.html",
];

/// Variables `check` expects to be set.
pub const REQUIRED_VARS: &[&str] = &["PORT", "HOST", "DOWNLOAD_DIR", "STATE_DIR", "TEMP_DIR"];

/// Variables `check` reports only when set.
pub const OPTIONAL_VARS: &[&str] = &["YTDL_OPTIONS_FILE", "BASE_DIR"];

/// Variables `debug` prints.
pub const DEBUG_VARS: &[&str] = &[
    "PORT",
    "HOST",
    "DOWNLOAD_DIR",
    "YTDL_OPTIONS_FILE",
    "RAILWAY_PROJECT_ID",
    "RAILWAY_SERVICE_NAME",
];

/// External programs the deployment relies on, with their version flag.
pub const TOOLS: &[(&str, &str)] = &[
    ("yt-dlp", "--version"),
    ("ffmpeg", "-version"),
    ("python3", "--version"),
];

/// Scratch directories `check` tries to create.
pub const TEST_DIRS: &[&str] = &["/tmp/downloads", "/tmp/test_metube"];

// ============================================================================
// Files
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Ok { bytes: usize },
    Missing,
    Error { error: OpsError },
}

#[derive(Debug, Serialize)]
pub struct FileCheck {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileCheck {
    pub fn is_ok(&self) -> bool {
        matches!(self.status, FileStatus::Ok { .. })
    }
}

/// Check that a file exists and is readable; `.json` files must also parse.
pub fn check_file(path: &Path) -> FileCheck {
    let status = if !path.exists() {
        FileStatus::Missing
    } else {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let is_json = path.extension().is_some_and(|ext| ext == "json");
                match is_json.then(|| serde_json::from_str::<Value>(&content)) {
                    Some(Err(e)) => FileStatus::Error {
                        error: OpsError::config_parse(path, e),
                    },
                    _ => FileStatus::Ok {
                        bytes: content.len(),
                    },
                }
            }
            Err(e) => FileStatus::Error {
                error: OpsError::io(path, e),
            },
        }
    };
    FileCheck {
        path: path.to_path_buf(),
        status,
    }
}

/// Check each of `files`, relative to `root`.
pub fn check_files(root: &Path, files: &[&str]) -> Vec<FileCheck> {
    files.iter().map(|f| check_file(&root.join(f))).collect()
}

pub fn print_file_checks(checks: &[FileCheck]) {
    for check in checks {
        match &check.status {
            FileStatus::Ok { bytes } => {
                println!("✅ {} - OK ({} bytes)", check.path.display(), bytes)
            }
            FileStatus::Missing => println!("⚠️  {} - Not found", check.path.display()),
            FileStatus::Error { error } => {
                println!("❌ {} - Error: {}", check.path.display(), error)
            }
        }
    }
}

// ============================================================================
// Tools
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ToolCheck {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolCheck {
    pub fn is_ok(&self) -> bool {
        self.version.is_some()
    }
}

/// Run `program version_arg` and keep the first line of its output.
pub fn check_tool(program: &str, version_arg: &str) -> ToolCheck {
    let result = Command::new(program)
        .arg(version_arg)
        .stdin(Stdio::null())
        .output();

    let (version, error) = match result {
        Ok(output) if output.status.success() => {
            let text = if output.stdout.is_empty() {
                output.stderr
            } else {
                output.stdout
            };
            let first = String::from_utf8_lossy(&text)
                .lines()
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            (Some(first), None)
        }
        Ok(output) => (None, Some(format!("exited with {}", output.status))),
        Err(e) => (None, Some(e.to_string())),
    };

    ToolCheck {
        name: program.to_string(),
        version,
        error,
    }
}

pub fn check_tools() -> Vec<ToolCheck> {
    TOOLS
        .iter()
        .map(|(program, arg)| check_tool(program, arg))
        .collect()
}

pub fn print_tool_checks(checks: &[ToolCheck]) {
    for check in checks {
        match (&check.version, &check.error) {
            (Some(version), _) => println!("✅ {} - {}", check.name, version),
            (None, Some(error)) => println!("❌ {} - Error: {}", check.name, error),
            (None, None) => println!("❌ {}", check.name),
        }
    }
}

// ============================================================================
// Environment
// ============================================================================

#[derive(Debug, Serialize)]
pub struct EnvEntry {
    pub name: String,
    pub value: Option<String>,
    pub required: bool,
}

pub fn check_env(env: &EnvSnapshot) -> Vec<EnvEntry> {
    let required = REQUIRED_VARS.iter().map(|name| (name, true));
    let optional = OPTIONAL_VARS.iter().map(|name| (name, false));
    required
        .chain(optional)
        .map(|(name, required)| EnvEntry {
            name: name.to_string(),
            value: env.get_non_empty(name).map(str::to_string),
            required,
        })
        .collect()
}

pub fn print_env_checks(entries: &[EnvEntry]) {
    for entry in entries {
        match (&entry.value, entry.required) {
            (Some(value), true) => println!("✅ {} = {}", entry.name, value),
            (None, true) => println!("⚠️  {} - Not set", entry.name),
            (Some(value), false) => println!("ℹ️  {} = {}", entry.name, value),
            (None, false) => {}
        }
    }
}

/// Print `keys` with `NOT SET` for missing ones.
pub fn print_env_values(env: &EnvSnapshot, keys: &[&str]) {
    for key in keys {
        println!("  {}: {}", key, env.display(key));
    }
}

// ============================================================================
// Options file
// ============================================================================

#[derive(Debug, Serialize)]
pub struct OptionsCheck {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extractor_args: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OpsError>,
}

impl OptionsCheck {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// True when the file exists but does not parse.
    pub fn is_parse_error(&self) -> bool {
        self.error
            .as_ref()
            .is_some_and(|e| e.code == ErrorCode::ConfigParseError)
    }
}

/// Load the options file and pull out the keys worth showing.
pub fn check_options(path: &Path) -> OptionsCheck {
    match load_options(path) {
        Ok(options) => describe_options(path, &options),
        Err(error) => OptionsCheck {
            path: path.to_path_buf(),
            keys: None,
            extractor_args: None,
            format: None,
            error: Some(error),
        },
    }
}

fn describe_options(path: &Path, options: &YtdlOptions) -> OptionsCheck {
    OptionsCheck {
        path: path.to_path_buf(),
        keys: Some(options.keys().into_iter().map(str::to_string).collect()),
        extractor_args: options.extractor_args().cloned(),
        format: options.format().map(str::to_string),
        error: None,
    }
}

pub fn print_options_check(check: &OptionsCheck) {
    println!();
    println!("🔧 Testing ytdl config: {}", check.path.display());
    if let Some(ref error) = check.error {
        if check.is_parse_error() {
            println!("  ❌ Config parse error: {}", error);
        } else {
            println!("  ⚠️  {}", error);
        }
        return;
    }
    if let Some(ref keys) = check.keys {
        println!("  📝 Config keys: {:?}", keys);
    }
    if let Some(ref args) = check.extractor_args {
        println!("  🎯 Extractor args: {}", args);
    }
    if let Some(ref format) = check.format {
        println!("  📹 Format: {}", format);
    }
}

// ============================================================================
// Directories
// ============================================================================

#[derive(Debug, Serialize)]
pub struct DirCheck {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OpsError>,
}

impl DirCheck {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

pub fn check_dirs<P: AsRef<Path>>(dirs: &[P]) -> Vec<DirCheck> {
    dirs.iter()
        .map(|d| {
            let path = d.as_ref();
            DirCheck {
                path: path.to_path_buf(),
                error: ensure_dir(path).err(),
            }
        })
        .collect()
}

pub fn print_dir_checks(checks: &[DirCheck]) {
    for check in checks {
        match &check.error {
            None => println!("✅ {} - OK", check.path.display()),
            Some(e) => println!("❌ {} - Error: {}", check.path.display(), e),
        }
    }
}

// ============================================================================
// Working directory
// ============================================================================

#[derive(Debug, Serialize)]
pub struct WorkingDir {
    pub path: PathBuf,
    pub entries: Vec<String>,
}

/// List `dir`, sorted by name.
pub fn list_dir(dir: &Path) -> WorkingDir {
    let mut entries: Vec<String> = std::fs::read_dir(dir)
        .map(|rd| {
            rd.flatten()
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    entries.sort();
    WorkingDir {
        path: dir.to_path_buf(),
        entries,
    }
}

pub fn print_working_dir(wd: &WorkingDir) {
    println!();
    println!("🎯 Working Directory:");
    println!("  📂 Current: {}", wd.path.display());
    println!("  📋 Contents: {:?}", wd.entries);
}

// ============================================================================
// Full setup report
// ============================================================================

/// Everything `check` reports.
#[derive(Debug, Serialize)]
pub struct SetupReport {
    pub files: Vec<FileCheck>,
    pub tools: Vec<ToolCheck>,
    pub environment: Vec<EnvEntry>,
    pub options: OptionsCheck,
    pub working_dir: WorkingDir,
    pub directories: Vec<DirCheck>,
}

/// What to inspect when building a [`SetupReport`].
#[derive(Debug, Clone)]
pub struct SetupPlan {
    pub root: PathBuf,
    pub files: Vec<String>,
    pub test_dirs: Vec<PathBuf>,
    pub check_tools: bool,
}

impl SetupPlan {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: SETUP_FILES.iter().map(|s| s.to_string()).collect(),
            test_dirs: TEST_DIRS.iter().map(PathBuf::from).collect(),
            check_tools: true,
        }
    }
}

pub fn build_setup_report(plan: &SetupPlan, env: &EnvSnapshot) -> SetupReport {
    let files: Vec<&str> = plan.files.iter().map(String::as_str).collect();
    let options_path = plan.root.join(env.requested_options_file());

    SetupReport {
        files: check_files(&plan.root, &files),
        tools: if plan.check_tools {
            check_tools()
        } else {
            Vec::new()
        },
        environment: check_env(env),
        options: check_options(&options_path),
        working_dir: list_dir(&plan.root),
        directories: check_dirs(plan.test_dirs.as_slice()),
    }
}

pub fn print_setup_report(report: &SetupReport) {
    println!("🧪 MeTube Configuration Test");
    println!("{}", "=".repeat(50));

    println!();
    println!("📁 File System Check:");
    print_file_checks(&report.files);

    if !report.tools.is_empty() {
        println!();
        println!("📦 External Tools:");
        print_tool_checks(&report.tools);
    }

    println!();
    println!("📋 Environment Variables:");
    print_env_checks(&report.environment);

    print_options_check(&report.options);
    print_working_dir(&report.working_dir);

    println!();
    println!("📁 Directory Creation Test:");
    print_dir_checks(&report.directories);

    println!();
    println!("🏁 Test completed!");
}

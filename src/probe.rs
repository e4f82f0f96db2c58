//! Extraction probe matrix.
//!
//! Runs a list of named option sets against one video and reports which of
//! them the platform currently lets through. Used to pick a working options
//! file for a hosting provider whose IP range is being throttled.

use crate::config::YtdlOptions;
use crate::error::{OpsError, OpsResult};
use crate::ytdlp::{Extractor, VideoInfo};
use serde_json::json;
use std::path::Path;
use tracing::{info, warn};

/// Anything that can extract video metadata under a set of options.
pub trait InfoSource {
    fn extract_info(&self, url: &str, options: &YtdlOptions) -> OpsResult<VideoInfo>;
}

impl InfoSource for Extractor {
    fn extract_info(&self, url: &str, options: &YtdlOptions) -> OpsResult<VideoInfo> {
        Extractor::extract_info(self, url, options)
    }
}

/// Ordered, named option sets.
#[derive(Debug, Clone, Default)]
pub struct ProbeMatrix {
    entries: Vec<(String, YtdlOptions)>,
}

impl ProbeMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, options: YtdlOptions) {
        self.entries.push((name.into(), options));
    }

    /// The built-in player client matrix.
    pub fn builtin() -> Self {
        let mut matrix = Self::new();
        let sets = [
            (
                "Basic Android",
                json!({
                    "extractor_args": {"youtube": {"player_client": ["android"]}},
                    "format": "worst",
                    "quiet": true
                }),
            ),
            (
                "Android + iOS",
                json!({
                    "extractor_args": {"youtube": {"player_client": ["android", "ios"]}},
                    "format": "18/worst",
                    "quiet": true
                }),
            ),
            (
                "Mobile Web",
                json!({
                    "extractor_args": {"youtube": {"player_client": ["mweb"]}},
                    "format": "worst",
                    "quiet": true
                }),
            ),
            ("Default (No Config)", json!({})),
        ];
        for (name, value) in sets {
            matrix.push(name, YtdlOptions::from_value(value).unwrap_or_default());
        }
        matrix
    }

    /// Parse a YAML (or JSON) mapping of name to options, keeping file order.
    pub fn parse(path: &Path, content: &str) -> OpsResult<Self> {
        let mapping: serde_yaml::Mapping =
            serde_yaml::from_str(content).map_err(|e| OpsError::config_parse(path, e))?;

        let mut matrix = Self::new();
        for (key, value) in mapping {
            let name = key
                .as_str()
                .ok_or_else(|| OpsError::config_parse(path, "probe names must be strings"))?
                .to_string();
            let value =
                serde_json::to_value(&value).map_err(|e| OpsError::config_parse(path, e))?;
            let options = match value {
                serde_json::Value::Null => YtdlOptions::new(),
                other => YtdlOptions::from_value(other).ok_or_else(|| {
                    OpsError::config_parse(path, format!("probe '{}' is not a mapping", name))
                })?,
            };
            matrix.push(name, options);
        }
        Ok(matrix)
    }

    pub fn load(path: &Path) -> OpsResult<Self> {
        if !path.exists() {
            return Err(OpsError::config_not_found(path));
        }
        let content = std::fs::read_to_string(path).map_err(|e| OpsError::io(path, e))?;
        Self::parse(path, &content)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &YtdlOptions)> {
        self.entries.iter().map(|(n, o)| (n.as_str(), o))
    }
}

/// Result of one probe.
#[derive(Debug)]
pub struct ProbeResult {
    pub name: String,
    pub outcome: OpsResult<VideoInfo>,
}

impl ProbeResult {
    pub fn works(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Number of formats listed per successful probe.
const FORMATS_SHOWN: usize = 3;

/// Run every entry of `matrix` against `url`, printing as it goes.
pub fn run_matrix(source: &dyn InfoSource, url: &str, matrix: &ProbeMatrix) -> Vec<ProbeResult> {
    let mut results = Vec::with_capacity(matrix.len());

    for (name, options) in matrix.iter() {
        println!();
        println!("🧪 Testing {}...", name);
        println!("{}", "-".repeat(40));

        let outcome = source.extract_info(url, options);
        match &outcome {
            Ok(info) => {
                info!(probe = name, title = info.title(), "Probe succeeded");
                println!("✅ SUCCESS: {}", info.title());
                println!("   Duration: {} seconds", info.duration_display());
                println!(
                    "   Uploader: {}",
                    info.uploader.as_deref().unwrap_or("Unknown")
                );
                println!("   Available formats: {}", info.formats.len());
                for format in info.formats.iter().take(FORMATS_SHOWN) {
                    println!("   - {}", format.describe());
                }
            }
            Err(e) => {
                warn!(probe = name, error = %e, "Probe failed");
                println!("❌ FAILED: {}", e);
            }
        }

        results.push(ProbeResult {
            name: name.to_string(),
            outcome,
        });
    }

    results
}

/// Names of the probes that worked, in matrix order.
pub fn working(results: &[ProbeResult]) -> Vec<&str> {
    results
        .iter()
        .filter(|r| r.works())
        .map(|r| r.name.as_str())
        .collect()
}

/// Print the summary and next steps.
pub fn print_summary(results: &[ProbeResult]) {
    println!();
    println!("📊 SUMMARY");
    println!("{}", "=".repeat(30));
    for result in results {
        let status = if result.works() { "✅ WORKS" } else { "❌ FAILED" };
        println!("{}: {}", result.name, status);
    }

    let working = working(results);
    if !working.is_empty() {
        println!();
        println!("🎉 Working configurations: {}", working.join(", "));
        println!();
        println!("Recommended action:");
        println!("1. Use the first working config in your ytdl_config.json");
        println!("2. Update YTDL_OPTIONS_FILE in your hosting dashboard");
        println!("3. Redeploy your service");
    } else {
        println!();
        println!("😞 No configurations worked.");
        println!("This suggests the host's IP is heavily blocked by YouTube.");
        println!();
        println!("Try:");
        println!("1. Different hosting provider");
        println!("2. Using real browser cookies (metube-ops cookies)");
        println!("3. Proxy/VPN solution");
    }
}

//! Extractor options files.
//!
//! An options file is a JSON object handed verbatim to the web application,
//! which passes it to yt-dlp. Only key names are inspected here: to print
//! diagnostics and to translate a subset into yt-dlp command-line flags for
//! probing.

use crate::error::{ErrorCode, OpsError, OpsResult};
use serde_json::{Map, Value, json};
use std::path::Path;
use tracing::debug;

/// Parsed extractor options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YtdlOptions(Map<String, Value>);

impl YtdlOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// The options written when no options file can be found.
    pub fn minimal() -> Self {
        let value = json!({
            "extractor_args": {
                "youtube": {
                    "player_client": ["android"]
                }
            },
            "format": "18/worst",
            "retries": 5
        });
        Self::from_value(value).unwrap_or_default()
    }

    /// Wrap a JSON value. Returns None unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Parse options from JSON text. The top level must be an object.
    pub fn parse(path: &Path, content: &str) -> OpsResult<Self> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| OpsError::config_parse(path, e))?;
        Self::from_value(value)
            .ok_or_else(|| OpsError::config_parse(path, "top-level value is not an object"))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn keys(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn format(&self) -> Option<&str> {
        self.0.get("format").and_then(Value::as_str)
    }

    pub fn retries(&self) -> Option<i64> {
        self.0.get("retries").and_then(Value::as_i64)
    }

    pub fn extractor_args(&self) -> Option<&Value> {
        self.0.get("extractor_args")
    }

    /// Serialize with two-space indentation.
    pub fn to_json_pretty(&self) -> OpsResult<String> {
        serde_json::to_string_pretty(&self.0)
            .map_err(|e| OpsError::new(ErrorCode::Io, e.to_string()))
    }

    /// Translate the options into yt-dlp command-line flags.
    ///
    /// Keys without a flag equivalent are skipped.
    pub fn to_cli_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        for (key, value) in &self.0 {
            match (key.as_str(), value) {
                ("format", Value::String(fmt)) => {
                    args.push("-f".to_string());
                    args.push(fmt.clone());
                }
                ("retries", Value::Number(n)) => {
                    args.push("--retries".to_string());
                    args.push(n.to_string());
                }
                ("retries", Value::String(s)) => {
                    args.push("--retries".to_string());
                    args.push(s.clone());
                }
                ("quiet", Value::Bool(true)) => args.push("--quiet".to_string()),
                ("quiet", Value::Bool(false)) => {}
                ("cookiefile", Value::String(path)) => {
                    args.push("--cookies".to_string());
                    args.push(path.clone());
                }
                ("proxy", Value::String(url)) => {
                    args.push("--proxy".to_string());
                    args.push(url.clone());
                }
                ("extractor_args", Value::Object(extractors)) => {
                    for (extractor, extractor_args) in extractors {
                        if let Some(spec) = format_extractor_args(extractor, extractor_args) {
                            args.push("--extractor-args".to_string());
                            args.push(spec);
                        }
                    }
                }
                (other, _) => debug!(key = other, "No yt-dlp flag for option; skipping"),
            }
        }

        args
    }
}

/// Render one extractor's arguments as `ie:key=v1,v2;key2=v3`.
fn format_extractor_args(extractor: &str, value: &Value) -> Option<String> {
    let Value::Object(entries) = value else {
        return None;
    };

    let parts: Vec<String> = entries
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::Array(items) => items
                    .iter()
                    .map(scalar_to_string)
                    .collect::<Vec<_>>()
                    .join(","),
                other => scalar_to_string(other),
            };
            format!("{}={}", key, rendered)
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(format!("{}:{}", extractor, parts.join(";")))
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read and parse an options file.
///
/// A missing file, an unreadable file and malformed JSON are reported with
/// distinct error codes.
pub fn load_options(path: &Path) -> OpsResult<YtdlOptions> {
    if !path.exists() {
        return Err(OpsError::config_not_found(path));
    }
    let content = std::fs::read_to_string(path).map_err(|e| OpsError::io(path, e))?;
    YtdlOptions::parse(path, &content)
}

/// Write options as indented JSON.
pub fn write_options(path: &Path, options: &YtdlOptions) -> OpsResult<()> {
    let content = options.to_json_pretty()?;
    std::fs::write(path, content).map_err(|e| OpsError::config_write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_options() {
        let options = YtdlOptions::minimal();
        assert_eq!(options.format(), Some("18/worst"));
        assert_eq!(options.retries(), Some(5));
        assert_eq!(
            options.extractor_args().unwrap()["youtube"]["player_client"],
            json!(["android"])
        );
    }

    #[test]
    fn test_minimal_serializes_with_two_space_indent() {
        let text = YtdlOptions::minimal().to_json_pretty().unwrap();
        assert!(text.starts_with("{\n  \""));
        assert!(text.contains("\"format\": \"18/worst\""));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let err = YtdlOptions::parse(Path::new("a.json"), "[1, 2]").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }

    #[test]
    fn test_parse_reports_malformed_json() {
        let err = YtdlOptions::parse(Path::new("a.json"), "{\"format\": ").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
        assert!(err.message.contains("a.json"));
    }

    #[test]
    fn test_to_cli_args_minimal() {
        let args = YtdlOptions::minimal().to_cli_args();
        // serde_json maps are sorted by key without preserve_order.
        assert_eq!(
            args,
            vec![
                "--extractor-args",
                "youtube:player_client=android",
                "-f",
                "18/worst",
                "--retries",
                "5",
            ]
        );
    }

    #[test]
    fn test_to_cli_args_multiple_clients_and_quiet() {
        let options = YtdlOptions::from_value(json!({
            "extractor_args": {"youtube": {"player_client": ["android", "ios"], "skip": "dash"}},
            "quiet": true,
            "cookiefile": "cookies.txt",
            "outtmpl": "%(title)s.%(ext)s"
        }))
        .unwrap();
        let args = options.to_cli_args();
        assert!(args.contains(&"--quiet".to_string()));
        assert!(args.contains(&"youtube:player_client=android,ios;skip=dash".to_string()));
        let cookies = args.iter().position(|a| a == "--cookies").unwrap();
        assert_eq!(args[cookies + 1], "cookies.txt");
        assert!(!args.iter().any(|a| a.contains("outtmpl")));
    }

    #[test]
    fn test_empty_options_have_no_args() {
        assert!(YtdlOptions::new().to_cli_args().is_empty());
    }
}

//! yt-dlp client.
//!
//! yt-dlp is an external program. This module only locates it, runs it in
//! metadata mode (`--dump-single-json`) and reads the handful of fields the
//! diagnostics print.

use crate::config::YtdlOptions;
use crate::error::{OpsError, OpsResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit yt-dlp binary.
pub const ENV_YTDLP_PATH: &str = "YTDLP_PATH";

/// Video used by the smoke test in `debug`.
pub const SMOKE_TEST_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

/// Video used by the probe matrix.
pub const PROBE_URL: &str = "https://www.youtube.com/watch?v=Zv2a6ixXEQc";

fn default_program() -> &'static str {
    if cfg!(target_os = "windows") {
        "yt-dlp.exe"
    } else {
        "yt-dlp"
    }
}

/// One entry of the `formats` list.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FormatEntry {
    #[serde(default)]
    pub format_id: Option<String>,
    #[serde(default)]
    pub format_note: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
}

impl FormatEntry {
    pub fn describe(&self) -> String {
        format!(
            "{}: {} ({})",
            self.format_id.as_deref().unwrap_or("?"),
            self.format_note.as_deref().unwrap_or("Unknown"),
            self.ext.as_deref().unwrap_or("?")
        )
    }
}

/// Metadata yt-dlp reports for a single video.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VideoInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub formats: Vec<FormatEntry>,
}

impl VideoInfo {
    pub fn parse(json: &[u8]) -> OpsResult<Self> {
        serde_json::from_slice(json)
            .map_err(|e| OpsError::extractor_failed(format!("yt-dlp returned invalid JSON: {}", e)))
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown")
    }

    pub fn duration_display(&self) -> String {
        match self.duration {
            Some(d) => format!("{}", d.round() as i64),
            None => "Unknown".to_string(),
        }
    }
}

/// A located yt-dlp binary.
#[derive(Debug, Clone)]
pub struct Extractor {
    program: PathBuf,
}

impl Extractor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Find a working yt-dlp: the explicit path if given, otherwise `PATH`.
    pub fn locate(explicit: Option<&Path>) -> OpsResult<Self> {
        let candidate = match explicit {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(default_program()),
        };
        let extractor = Self::new(&candidate);
        match extractor.version() {
            Ok(version) => {
                info!(program = %candidate.display(), version = %version, "Found yt-dlp");
                Ok(extractor)
            }
            Err(e) => {
                debug!(program = %candidate.display(), error = %e, "yt-dlp not usable");
                Err(OpsError::extractor_unavailable(&candidate.display().to_string()))
            }
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// `yt-dlp --version`, trimmed.
    pub fn version(&self) -> OpsResult<String> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|_| OpsError::extractor_unavailable(&self.program.display().to_string()))?;
        if !output.status.success() {
            return Err(OpsError::extractor_unavailable(
                &self.program.display().to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Arguments for a metadata-only extraction of `url` under `options`.
    pub fn info_args(url: &str, options: &YtdlOptions) -> Vec<String> {
        let mut args = vec![
            "--dump-single-json".to_string(),
            "--skip-download".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
        ];
        args.extend(options.to_cli_args());
        args.push(url.to_string());
        args
    }

    /// Extract metadata for `url` without downloading.
    pub fn extract_info(&self, url: &str, options: &YtdlOptions) -> OpsResult<VideoInfo> {
        let args = Self::info_args(url, options);
        debug!(program = %self.program.display(), ?args, "Running yt-dlp");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| OpsError::extractor_failed(format!("Failed to run yt-dlp: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = summarize_stderr(&stderr);
            warn!(url, reason = %reason, "yt-dlp extraction failed");
            return Err(OpsError::extractor_failed(reason).with_details(stderr.trim().to_string()));
        }

        VideoInfo::parse(&output.stdout)
    }
}

/// Last `ERROR:` line of yt-dlp's stderr, or its last non-empty line.
pub fn summarize_stderr(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| lines.last())
        .map(|l| l.to_string())
        .unwrap_or_else(|| "yt-dlp exited with an error".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_video_info() {
        let raw = json!({
            "title": "Sample",
            "duration": 212.0,
            "uploader": "Someone",
            "formats": [
                {"format_id": "18", "format_note": "360p", "ext": "mp4"},
                {"format_id": "140", "ext": "m4a"}
            ],
            "thumbnails": []
        });
        let info = VideoInfo::parse(raw.to_string().as_bytes()).unwrap();
        assert_eq!(info.title(), "Sample");
        assert_eq!(info.duration_display(), "212");
        assert_eq!(info.formats.len(), 2);
        assert_eq!(info.formats[0].describe(), "18: 360p (mp4)");
        assert_eq!(info.formats[1].describe(), "140: Unknown (m4a)");
    }

    #[test]
    fn test_parse_sparse_info() {
        let info = VideoInfo::parse(b"{}").unwrap();
        assert_eq!(info.title(), "Unknown");
        assert_eq!(info.duration_display(), "Unknown");
        assert!(info.formats.is_empty());
    }

    #[test]
    fn test_parse_garbage_is_extractor_failure() {
        let err = VideoInfo::parse(b"not json").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ExtractorFailed);
    }

    #[test]
    fn test_info_args_place_url_last() {
        let args = Extractor::info_args("https://example.com/v", &YtdlOptions::minimal());
        assert_eq!(args.first().map(String::as_str), Some("--dump-single-json"));
        assert_eq!(args.last().map(String::as_str), Some("https://example.com/v"));
        assert!(args.contains(&"18/worst".to_string()));
    }

    #[test]
    fn test_summarize_stderr_prefers_error_line() {
        let stderr = "WARNING: something\nERROR: [youtube] Sign in to confirm you're not a bot\n\n";
        assert_eq!(
            summarize_stderr(stderr),
            "ERROR: [youtube] Sign in to confirm you're not a bot"
        );
        assert_eq!(summarize_stderr("just noise\n"), "just noise");
        assert_eq!(summarize_stderr(""), "yt-dlp exited with an error");
    }

    #[test]
    fn test_locate_missing_binary() {
        let err = Extractor::locate(Some(Path::new("/nonexistent/yt-dlp"))).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ExtractorUnavailable);
    }
}

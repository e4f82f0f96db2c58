//! Extractor options file resolution.
//!
//! Resolution order (first existing file wins):
//! 1. The requested path (`YTDL_OPTIONS_FILE`, default `ytdl_config_android.json`)
//! 2. The fallback chain, in order
//! 3. A previously synthesized minimal file
//! 4. A freshly synthesized minimal file
//!
//! Selection only checks existence. A present file with malformed JSON is
//! still selected; the parse error surfaces when the options are loaded.

use super::env::{ENV_YTDL_OPTIONS_FILE, EnvSnapshot};
use super::options::{YtdlOptions, write_options};
use crate::error::OpsResult;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File the minimal options are written to when nothing else exists.
pub const SYNTHESIZED_FILE: &str = "ytdl_config_minimal.json";

/// Default fallback files, most preferred first.
pub const DEFAULT_FALLBACKS: &[&str] = &[
    "ytdl_config_android.json",
    "ytdl_config.json",
    "ytdl_config_cookies.json",
    "ytdl_config_enhanced.json",
];

/// How the options file was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The requested file exists.
    RequestedFound,
    /// A fallback file (or an earlier synthesized file) exists.
    FallbackFound,
    /// Nothing existed; the minimal file was written.
    Synthesized,
}

impl std::fmt::Display for ResolutionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionOutcome::RequestedFound => write!(f, "requested"),
            ResolutionOutcome::FallbackFound => write!(f, "fallback"),
            ResolutionOutcome::Synthesized => write!(f, "synthesized"),
        }
    }
}

/// Result of a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The selected file. Always exists after a successful resolution.
    pub path: PathBuf,
    pub outcome: ResolutionOutcome,
    /// The path that was asked for.
    pub requested: PathBuf,
}

impl Resolution {
    pub fn was_synthesized(&self) -> bool {
        self.outcome == ResolutionOutcome::Synthesized
    }
}

/// Ordered list of alternative options files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackChain(Vec<PathBuf>);

impl FallbackChain {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self(paths.into_iter().map(Into::into).collect())
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Same candidates, each joined onto `dir` when relative.
    pub fn rooted_at(&self, dir: &Path) -> Self {
        Self(self.0.iter().map(|p| dir.join(p)).collect())
    }

    /// First candidate that exists on disk.
    pub fn first_existing(&self) -> Option<&Path> {
        self.0.iter().map(PathBuf::as_path).find(|p| p.exists())
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }
}

impl Default for FallbackChain {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACKS.iter().copied())
    }
}

/// Picks exactly one usable options file and records it in the environment.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    fallbacks: FallbackChain,
    synthesized_path: PathBuf,
    defaults: YtdlOptions,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new(FallbackChain::default())
    }
}

impl ConfigResolver {
    pub fn new(fallbacks: FallbackChain) -> Self {
        Self {
            fallbacks,
            synthesized_path: PathBuf::from(SYNTHESIZED_FILE),
            defaults: YtdlOptions::minimal(),
        }
    }

    /// Write synthesized options somewhere other than the working directory.
    pub fn with_synthesized_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.synthesized_path = path.into();
        self
    }

    /// Override the options written when synthesizing.
    pub fn with_defaults(mut self, defaults: YtdlOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn fallbacks(&self) -> &FallbackChain {
        &self.fallbacks
    }

    pub fn synthesized_path(&self) -> &Path {
        &self.synthesized_path
    }

    /// Select an options file without touching the environment.
    ///
    /// Only the synthesize step writes; its failure is returned as an error.
    pub fn select(&self, requested: &Path) -> OpsResult<Resolution> {
        if requested.exists() {
            info!(path = %requested.display(), "Using requested options file");
            println!("✅ Using config: {}", requested.display());
            return Ok(Resolution {
                path: requested.to_path_buf(),
                outcome: ResolutionOutcome::RequestedFound,
                requested: requested.to_path_buf(),
            });
        }

        warn!(path = %requested.display(), "Requested options file not found");
        println!(
            "⚠️  Config file '{}' not found. Looking for alternatives...",
            requested.display()
        );

        for candidate in self.fallbacks.paths() {
            debug!(candidate = %candidate.display(), "Checking fallback");
        }

        let found = self
            .fallbacks
            .first_existing()
            .or_else(|| Some(self.synthesized_path.as_path()).filter(|p| p.exists()));

        if let Some(path) = found {
            info!(path = %path.display(), "Using fallback options file");
            println!("✅ Using alternative config: {}", path.display());
            return Ok(Resolution {
                path: path.to_path_buf(),
                outcome: ResolutionOutcome::FallbackFound,
                requested: requested.to_path_buf(),
            });
        }

        println!("🔧 Creating minimal config file...");
        write_options(&self.synthesized_path, &self.defaults)?;
        info!(path = %self.synthesized_path.display(), "Synthesized minimal options file");
        println!("✅ Created and using: {}", self.synthesized_path.display());

        Ok(Resolution {
            path: self.synthesized_path.clone(),
            outcome: ResolutionOutcome::Synthesized,
            requested: requested.to_path_buf(),
        })
    }

    /// Resolve the options file requested by `env` and record the result in it.
    pub fn resolve(&self, env: &mut EnvSnapshot) -> OpsResult<Resolution> {
        let requested = env.requested_options_file();
        let resolution = self.select(&requested)?;
        env.set(
            ENV_YTDL_OPTIONS_FILE,
            resolution.path.to_string_lossy().into_owned(),
        );
        Ok(resolution)
    }
}

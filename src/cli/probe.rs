//! Probe subcommand for metube-ops
//!
//! Runs a matrix of extraction option sets against one video and
//! summarizes which ones currently work from this host.

use crate::config::load_options;
use crate::error::OpsResult;
use crate::probe::ProbeMatrix;
use crate::ytdlp::PROBE_URL;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the probe subcommand
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Video to probe
    #[arg(long, value_name = "URL", default_value = PROBE_URL)]
    pub url: String,

    /// YAML or JSON mapping of probe name to options (default: built-in matrix)
    #[arg(long, value_name = "FILE", conflicts_with = "options")]
    pub matrix: Option<PathBuf>,

    /// Probe a single options file instead of a matrix
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Path to the yt-dlp binary
    #[arg(long, value_name = "PATH", env = "YTDLP_PATH")]
    pub ytdlp: Option<PathBuf>,
}

impl ProbeArgs {
    /// The probe matrix selected by the arguments.
    pub fn matrix(&self) -> OpsResult<ProbeMatrix> {
        if let Some(ref path) = self.options {
            let mut matrix = ProbeMatrix::new();
            matrix.push(path.display().to_string(), load_options(path)?);
            return Ok(matrix);
        }
        match self.matrix {
            Some(ref path) => ProbeMatrix::load(path),
            None => Ok(ProbeMatrix::builtin()),
        }
    }
}

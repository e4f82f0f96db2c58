//! Debug subcommand for metube-ops
//!
//! Prints environment diagnostics, smoke-tests yt-dlp and checks that the
//! application can start. With `--launch`, continues into the normal
//! startup when every pre-flight check passes.

use super::start::StartArgs;
use crate::ytdlp::SMOKE_TEST_URL;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the debug subcommand
#[derive(Args, Debug)]
pub struct DebugArgs {
    /// Start the application after successful pre-flight checks
    #[arg(long)]
    pub launch: bool,

    /// Video used for the extraction smoke test
    #[arg(long, value_name = "URL", default_value = SMOKE_TEST_URL)]
    pub url: String,

    /// Skip the extraction smoke test (no network access)
    #[arg(long)]
    pub skip_extract: bool,

    /// Path to the yt-dlp binary
    #[arg(long, value_name = "PATH", env = "YTDLP_PATH")]
    pub ytdlp: Option<PathBuf>,

    /// Directory created as a write test
    #[arg(long, value_name = "DIR", default_value = "/tmp/downloads")]
    pub test_dir: PathBuf,

    #[command(flatten)]
    pub start: StartArgs,
}

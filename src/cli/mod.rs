//! CLI command definitions for metube-ops
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod check;
pub mod cookies;
pub mod debug;
pub mod probe;
pub mod start;

use check::CheckArgs;
use clap::{Parser, Subcommand};
use cookies::CookiesArgs;
use debug::DebugArgs;
use probe::ProbeArgs;
use start::StartArgs;

/// Startup, diagnostics and cookie tooling for MeTube deployments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// Start flags, used when no subcommand is given
    #[command(flatten)]
    pub start: StartArgs,
}

impl Cli {
    /// The subcommand to run; `start` when none was given.
    pub fn into_command(self) -> Command {
        match self.command {
            Some(command) => command,
            None => Command::Start(self.start),
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Normalize the environment, resolve the options file and start the app (default)
    Start(StartArgs),

    /// Print environment diagnostics and run pre-flight checks
    Debug(DebugArgs),

    /// Verify files, tools, environment and the options file
    Check(CheckArgs),

    /// Export YouTube cookies from Chrome to a Netscape cookies.txt
    Cookies(CookiesArgs),

    /// Try extraction option sets against a video and report which work
    Probe(ProbeArgs),
}

//! Start subcommand for metube-ops
//!
//! Normalizes the environment, resolves the extractor options file and
//! launches the web application with the resulting environment.

use crate::config::env::ENV_BASE_DIR;
use crate::config::{ConfigResolver, EnvSnapshot, FallbackChain};
use crate::launch::{AppCommand, DEFAULT_APP_COMMAND};
use crate::startup::Startup;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the start subcommand
#[derive(Args, Debug, Clone)]
pub struct StartArgs {
    /// Application command line, split on whitespace
    #[arg(long, value_name = "CMD", env = "METUBE_APP_CMD", default_value = DEFAULT_APP_COMMAND)]
    pub app_cmd: String,

    /// Stay in the current directory instead of changing to BASE_DIR
    #[arg(long)]
    pub no_chdir: bool,

    /// Fallback options files, most preferred first
    ///
    /// Comma-separated. Defaults to the android, plain, cookies and
    /// enhanced config files.
    #[arg(long = "fallback", value_name = "LIST", value_delimiter = ',')]
    pub fallbacks: Option<Vec<PathBuf>>,

    /// Where to write the minimal options file when nothing is found
    #[arg(long, value_name = "FILE")]
    pub synthesized: Option<PathBuf>,

    /// Resolve and prepare, but do not launch the application
    #[arg(long)]
    pub dry_run: bool,
}

impl Default for StartArgs {
    fn default() -> Self {
        Self {
            app_cmd: DEFAULT_APP_COMMAND.to_string(),
            no_chdir: false,
            fallbacks: None,
            synthesized: None,
            dry_run: false,
        }
    }
}

impl StartArgs {
    /// The fallback chain, explicit or default.
    pub fn fallback_chain(&self) -> FallbackChain {
        match self.fallbacks {
            Some(ref paths) => FallbackChain::new(paths.iter().cloned()),
            None => FallbackChain::default(),
        }
    }

    pub fn resolver(&self) -> ConfigResolver {
        let resolver = ConfigResolver::new(self.fallback_chain());
        match self.synthesized {
            Some(ref path) => resolver.with_synthesized_path(path),
            None => resolver,
        }
    }

    pub fn startup(&self) -> Startup {
        Startup::new(self.resolver()).chdir_to_base(!self.no_chdir)
    }

    /// Directory `start` will run the application from under `env`.
    ///
    /// Defaults are seeded into a copy first, so an unset `BASE_DIR` means
    /// `/app` here exactly as it does during startup.
    pub fn app_root(&self, env: &EnvSnapshot) -> PathBuf {
        if self.no_chdir {
            return PathBuf::from(".");
        }
        let mut seeded = env.clone();
        seeded.seed_defaults();
        seeded
            .get_path(ENV_BASE_DIR)
            .filter(|p| p.is_dir())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Parsed application command; None when the command line is blank.
    pub fn app_command(&self) -> Option<AppCommand> {
        AppCommand::parse(&self.app_cmd)
    }
}

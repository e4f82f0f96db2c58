//! Check subcommand for metube-ops
//!
//! Verifies the deployment layout without starting anything: expected
//! files, external tools, environment variables, the options file and
//! write access to scratch directories.

use crate::diagnostics::SetupPlan;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the check subcommand
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Application root to inspect
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Emit the report as JSON instead of status lines
    #[arg(long)]
    pub json: bool,

    /// Do not run external tools to read their versions
    #[arg(long)]
    pub no_tools: bool,

    /// Extra directories to test for write access
    #[arg(long = "test-dir", value_name = "DIR")]
    pub test_dirs: Vec<PathBuf>,
}

impl CheckArgs {
    pub fn plan(&self) -> SetupPlan {
        let mut plan = SetupPlan::new(&self.root);
        plan.check_tools = !self.no_tools;
        if !self.test_dirs.is_empty() {
            plan.test_dirs = self.test_dirs.clone();
        }
        plan
    }
}

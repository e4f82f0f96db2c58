//! Launching the web application.
//!
//! The application is an opaque child process. It receives the environment
//! snapshot as its entire environment and inherits stdio.

use crate::config::EnvSnapshot;
use crate::error::{OpsError, OpsResult};
use std::path::Path;
use std::process::{Command, ExitStatus};
use tracing::{error, info};

/// Default application command, run from `BASE_DIR`.
pub const DEFAULT_APP_COMMAND: &str = "python3 app/main.py";

/// A command line split on whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCommand {
    program: String,
    args: Vec<String>,
}

impl AppCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a command line on whitespace. Returns None for an empty line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The first non-flag argument, taken as the script entry point.
    ///
    /// Used by pre-flight checks to verify the entry point is present.
    pub fn entry_point(&self) -> Option<&Path> {
        self.args
            .iter()
            .find(|a| !a.starts_with('-'))
            .map(Path::new)
    }

    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn to_command(&self, env: &EnvSnapshot) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        env.apply_to(&mut cmd);
        cmd
    }

    /// Run the application to completion.
    pub fn run(&self, env: &EnvSnapshot) -> OpsResult<ExitStatus> {
        println!();
        println!("🚀 Starting MeTube application...");
        info!(command = %self.display(), "Launching application");

        let status = self
            .to_command(env)
            .status()
            .map_err(|e| OpsError::launch_failed(&self.display(), e))?;

        if status.success() {
            info!("Application exited cleanly");
        } else {
            error!(status = %status, "Application exited with failure");
        }
        Ok(status)
    }
}

impl Default for AppCommand {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            args: vec!["app/main.py".to_string()],
        }
    }
}

/// Map a child exit status to this process's exit code.
pub fn exit_code_for(status: ExitStatus) -> i32 {
    if status.success() { 0 } else { 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_line() {
        let cmd = AppCommand::parse("  python3 -u app/main.py ").unwrap();
        assert_eq!(cmd.program(), "python3");
        assert_eq!(cmd.args(), ["-u", "app/main.py"]);
        assert_eq!(cmd.entry_point(), Some(Path::new("app/main.py")));
        assert_eq!(cmd.display(), "python3 -u app/main.py");
    }

    #[test]
    fn test_parse_empty_is_none() {
        assert!(AppCommand::parse("   ").is_none());
    }

    #[test]
    fn test_default_matches_constant() {
        assert_eq!(
            AppCommand::parse(DEFAULT_APP_COMMAND).unwrap(),
            AppCommand::default()
        );
    }

    #[test]
    fn test_missing_program_is_launch_failure() {
        let cmd = AppCommand::parse("definitely-not-a-real-binary-5b1c").unwrap();
        let err = cmd.run(&EnvSnapshot::new()).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::LaunchFailed);
        assert_eq!(err.exit_code(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_child_sees_snapshot_only() {
        let env = EnvSnapshot::from_pairs([("PATH", "/usr/bin:/bin"), ("MARKER", "resolved")]);
        let cmd = AppCommand::new(
            "sh",
            ["-c", "[ \"$MARKER\" = resolved ] && [ -z \"$HOME\" ]"],
        );
        let status = cmd.run(&env).unwrap();
        assert_eq!(exit_code_for(status), 0);
    }
}

//! Cookies subcommand for metube-ops
//!
//! Exports YouTube cookies from the local Chrome profile to a Netscape
//! cookie file. Run on a workstation with a signed-in browser, then upload
//! the file to the server.

use crate::cookies::{DEFAULT_DOMAINS, default_chrome_cookie_db};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the cookies subcommand
#[derive(Args, Debug)]
pub struct CookiesArgs {
    /// Chrome cookie database (default: the platform's Default profile)
    #[arg(long, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Host substring to export; repeatable (default: youtube.com, googlevideo.com)
    #[arg(long = "domain", value_name = "HOST")]
    pub domains: Vec<String>,

    /// Output file
    #[arg(short, long, value_name = "FILE", default_value = "cookies.txt")]
    pub output: PathBuf,
}

impl CookiesArgs {
    pub fn db_path(&self) -> Option<PathBuf> {
        self.db.clone().or_else(default_chrome_cookie_db)
    }

    pub fn domains(&self) -> Vec<String> {
        if self.domains.is_empty() {
            DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect()
        } else {
            self.domains.clone()
        }
    }
}

//! Chrome cookie export.
//!
//! Reads YouTube cookies from the local Chrome profile and writes them as a
//! Netscape `cookies.txt` that yt-dlp accepts via `--cookies`. Only the
//! plaintext `value` column is read; encrypted values come out empty.

use crate::error::{OpsError, OpsResult};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Header line of a Netscape cookie file.
pub const NETSCAPE_HEADER: &str = "# Netscape HTTP Cookie File";

/// Seconds between 1601-01-01 (Chrome epoch) and 1970-01-01.
const CHROME_EPOCH_OFFSET_SECS: i64 = 11_644_473_600;

/// Host patterns exported by default.
pub const DEFAULT_DOMAINS: &[&str] = &["youtube.com", "googlevideo.com"];

/// One row of Chrome's `cookies` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieRecord {
    pub host: String,
    pub name: String,
    pub value: String,
    pub path: String,
    /// Microseconds since 1601-01-01, 0 for session cookies.
    pub expires_utc: i64,
    pub secure: bool,
    pub http_only: bool,
}

impl CookieRecord {
    /// Expiry as Unix seconds; session cookies stay 0.
    pub fn expires_unix(&self) -> i64 {
        chrome_to_unix(self.expires_utc)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self.expires_unix() {
            0 => None,
            secs => DateTime::from_timestamp(secs, 0),
        }
    }

    /// One tab-separated Netscape line.
    pub fn to_netscape_line(&self) -> String {
        format!(
            "{}\tTRUE\t{}\t{}\t{}\t{}\t{}",
            self.host,
            self.path,
            if self.secure { "TRUE" } else { "FALSE" },
            self.expires_unix(),
            self.name,
            self.value
        )
    }
}

/// Convert a Chrome timestamp to Unix seconds.
pub fn chrome_to_unix(expires_utc: i64) -> i64 {
    if expires_utc == 0 {
        0
    } else {
        expires_utc / 1_000_000 - CHROME_EPOCH_OFFSET_SECS
    }
}

/// Render cookies as a Netscape cookie file (no trailing newline).
pub fn format_netscape(cookies: &[CookieRecord]) -> String {
    std::iter::once(NETSCAPE_HEADER.to_string())
        .chain(cookies.iter().map(CookieRecord::to_netscape_line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default Chrome cookie database for the current platform.
pub fn default_chrome_cookie_db() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    let relative = if cfg!(target_os = "windows") {
        "AppData/Local/Google/Chrome/User Data/Default/Cookies"
    } else if cfg!(target_os = "macos") {
        "Library/Application Support/Google/Chrome/Default/Cookies"
    } else {
        ".config/google-chrome/Default/Cookies"
    };
    Some(home.join(relative))
}

/// Read cookies whose host matches any of `domains`.
///
/// The database is copied to a temporary file first so a running browser's
/// lock does not interfere. The copy is removed on return.
pub fn read_chrome_cookies(db_path: &Path, domains: &[String]) -> OpsResult<Vec<CookieRecord>> {
    if !db_path.exists() {
        return Err(OpsError::cookie_store_unavailable(db_path));
    }

    let temp = tempfile::Builder::new()
        .prefix("cookies_temp")
        .suffix(".db")
        .tempfile()
        .map_err(|e| OpsError::io(db_path, e))?;
    std::fs::copy(db_path, temp.path()).map_err(|e| OpsError::io(db_path, e))?;
    debug!(copy = %temp.path().display(), "Copied cookie store");

    let conn = Connection::open_with_flags(temp.path(), OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    let cookies = query_cookies(&conn, domains)?;
    info!(count = cookies.len(), "Read cookies from store");
    Ok(cookies)
}

/// Query the `cookies` table of an open Chrome cookie database.
pub fn query_cookies(conn: &Connection, domains: &[String]) -> OpsResult<Vec<CookieRecord>> {
    if domains.is_empty() {
        return Ok(Vec::new());
    }

    let filter = vec!["host_key LIKE ?"; domains.len()].join(" OR ");
    let sql = format!(
        "SELECT host_key, name, value, path, expires_utc, is_secure, is_httponly
         FROM cookies
         WHERE {}",
        filter
    );
    let patterns: Vec<String> = domains.iter().map(|d| format!("%{}%", d)).collect();

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(patterns.iter()), |row| {
        Ok(CookieRecord {
            host: row.get(0)?,
            name: row.get(1)?,
            value: row.get(2)?,
            path: row.get(3)?,
            expires_utc: row.get(4)?,
            secure: row.get::<_, i64>(5)? != 0,
            http_only: row.get::<_, i64>(6)? != 0,
        })
    })?;

    let cookies = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(cookies)
}

/// Read cookies from `db_path` and write them to `output`.
///
/// Returns the number of cookies written. An empty result is an error so
/// callers can show the manual export instructions.
pub fn export_cookies(db_path: &Path, domains: &[String], output: &Path) -> OpsResult<usize> {
    let cookies = read_chrome_cookies(db_path, domains)?;
    if cookies.is_empty() {
        return Err(OpsError::cookie_query("No matching cookies found in store").with_path(db_path));
    }
    std::fs::write(output, format_netscape(&cookies)).map_err(|e| OpsError::io(output, e))?;
    Ok(cookies.len())
}

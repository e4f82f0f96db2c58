//! Integration tests for Chrome cookie export against an on-disk store.

use metube_ops::cookies::{NETSCAPE_HEADER, export_cookies, read_chrome_cookies};
use metube_ops::error::ErrorCode;
use rusqlite::{Connection, params};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 2024-01-01T00:00:00Z in Chrome's epoch.
const EXPIRES_2024: i64 = 13_348_540_800_000_000;

/// Create a cookie store with Chrome's column layout.
fn create_store(dir: &Path) -> PathBuf {
    let path = dir.join("Cookies");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE cookies (
            host_key TEXT NOT NULL,
            name TEXT NOT NULL,
            value TEXT NOT NULL,
            encrypted_value BLOB DEFAULT '',
            path TEXT NOT NULL,
            expires_utc INTEGER NOT NULL,
            is_secure INTEGER NOT NULL,
            is_httponly INTEGER NOT NULL
        );",
    )
    .unwrap();

    let rows: &[(&str, &str, &str, &str, i64, i64, i64)] = &[
        (".youtube.com", "PREF", "f6=40000000", "/", EXPIRES_2024, 1, 0),
        (".youtube.com", "VISITOR_INFO1_LIVE", "abc", "/", 0, 1, 1),
        ("rr1---sn.googlevideo.com", "GV", "gv", "/videoplayback", 0, 0, 0),
        (".example.org", "other", "nope", "/", 0, 0, 0),
    ];
    for row in rows {
        conn.execute(
            "INSERT INTO cookies (host_key, name, value, path, expires_utc, is_secure, is_httponly)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![row.0, row.1, row.2, row.3, row.4, row.5, row.6],
        )
        .unwrap();
    }
    path
}

fn default_domains() -> Vec<String> {
    vec!["youtube.com".to_string(), "googlevideo.com".to_string()]
}

#[test]
fn test_read_filters_by_domain() {
    let dir = TempDir::new().unwrap();
    let store = create_store(dir.path());

    let cookies = read_chrome_cookies(&store, &default_domains()).unwrap();

    assert_eq!(cookies.len(), 3);
    assert!(cookies.iter().all(|c| c.host != ".example.org"));
    let pref = cookies.iter().find(|c| c.name == "PREF").unwrap();
    assert!(pref.secure);
    assert!(!pref.http_only);
    assert_eq!(pref.expires_unix(), 1_704_067_200);
}

#[test]
fn test_read_leaves_store_untouched() {
    let dir = TempDir::new().unwrap();
    let store = create_store(dir.path());
    let before = fs::read(&store).unwrap();

    read_chrome_cookies(&store, &default_domains()).unwrap();

    assert_eq!(fs::read(&store).unwrap(), before);
}

#[test]
fn test_export_writes_netscape_file() {
    let dir = TempDir::new().unwrap();
    let store = create_store(dir.path());
    let output = dir.path().join("cookies.txt");

    let count = export_cookies(&store, &["youtube.com".to_string()], &output).unwrap();
    assert_eq!(count, 2);

    let text = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(lines[0], NETSCAPE_HEADER);
    assert_eq!(lines.len(), 3);
    assert!(lines.contains(&".youtube.com\tTRUE\t/\tTRUE\t1704067200\tPREF\tf6=40000000"));
    assert!(lines.contains(&".youtube.com\tTRUE\t/\tTRUE\t0\tVISITOR_INFO1_LIVE\tabc"));
}

#[test]
fn test_export_with_no_matches_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let store = create_store(dir.path());
    let output = dir.path().join("cookies.txt");

    let err = export_cookies(&store, &["vimeo.com".to_string()], &output).unwrap_err();

    assert_eq!(err.code, ErrorCode::CookieStoreQuery);
    assert!(!output.exists());
}

#[test]
fn test_store_without_cookies_table_is_query_error() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("Cookies");
    Connection::open(&store)
        .unwrap()
        .execute_batch("CREATE TABLE meta (key TEXT);")
        .unwrap();

    let err = read_chrome_cookies(&store, &default_domains()).unwrap_err();
    assert_eq!(err.code, ErrorCode::CookieStoreQuery);
}

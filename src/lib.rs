//! MeTube ops library
//!
//! This module exports the startup, diagnostics and cookie components for
//! the `metube-ops` binary and for testing.

pub mod cli;
pub mod config;
pub mod cookies;
pub mod diagnostics;
pub mod error;
pub mod launch;
pub mod logging;
pub mod probe;
pub mod startup;
pub mod ytdlp;

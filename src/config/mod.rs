//! Startup configuration.
//!
//! The tooling has no configuration file of its own. It works on the
//! extractor options file consumed by the web application and on an
//! explicit snapshot of the process environment.
//!
//! ## Environment Variables
//! - `PORT` - Web application port (default: `8081`)
//! - `HOST` - Bind address (default: `0.0.0.0`)
//! - `DOWNLOAD_DIR` - Download directory (default: `/tmp/downloads`)
//! - `STATE_DIR` - Queue state directory (default: `/tmp`)
//! - `TEMP_DIR` - Scratch directory (default: `/tmp`)
//! - `BASE_DIR` - Application root (default: `/app`)
//! - `YTDL_OPTIONS_FILE` - Requested options file; rewritten to the resolved path

pub mod env;
pub mod options;
pub mod resolver;

pub use env::EnvSnapshot;
pub use options::{YtdlOptions, load_options, write_options};
pub use resolver::{ConfigResolver, FallbackChain, Resolution, ResolutionOutcome};

//! metube-ops
//!
//! Startup, diagnostics and cookie tooling for MeTube deployments on
//! container hosts.

use anyhow::{Context, Result};
use clap::Parser;
use metube_ops::cli::check::CheckArgs;
use metube_ops::cli::cookies::CookiesArgs;
use metube_ops::cli::debug::DebugArgs;
use metube_ops::cli::probe::ProbeArgs;
use metube_ops::cli::start::StartArgs;
use metube_ops::cli::{Cli, Command};
use metube_ops::config::{EnvSnapshot, YtdlOptions};
use metube_ops::cookies::export_cookies;
use metube_ops::diagnostics::{
    DEBUG_VARS, REQUIRED_FILES, build_setup_report, check_dirs, check_files, check_options,
    check_tools, print_dir_checks, print_env_values, print_file_checks, print_options_check,
    print_setup_report, print_tool_checks,
};
use metube_ops::error::OpsError;
use metube_ops::launch::exit_code_for;
use metube_ops::logging::{self, LogTarget};
use metube_ops::probe::{print_summary as print_probe_summary, run_matrix, working};
use metube_ops::startup::print_summary;
use metube_ops::ytdlp::Extractor;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, warn};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)
        .context("Failed to initialize logging")?;

    match cli.into_command() {
        Command::Start(args) => run_start(&args),
        Command::Debug(args) => run_debug(&args),
        Command::Check(args) => run_check(&args),
        Command::Cookies(args) => run_cookies(&args),
        Command::Probe(args) => run_probe(&args),
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn fail(e: &OpsError) -> ExitCode {
    error!(code = ?e.code, error = %e, "Command failed");
    println!("❌ {}", e);
    exit_code(e.exit_code())
}

fn run_start(args: &StartArgs) -> Result<ExitCode> {
    println!("🚂 MeTube Startup");
    println!("{}", "=".repeat(30));

    let mut env = EnvSnapshot::from_process();
    let report = match args.startup().run(&mut env) {
        Ok(report) => report,
        Err(e) => return Ok(fail(&e)),
    };
    print_summary(&env, &report);

    if report.options_error.is_some() {
        println!("⚠️  Continuing with an options file that does not load");
    }

    if args.dry_run {
        println!();
        println!("Dry run: application not started.");
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = args.app_command() else {
        println!("❌ No application command configured");
        return Ok(ExitCode::from(1));
    };

    match command.run(&env) {
        Ok(status) => Ok(exit_code(exit_code_for(status))),
        Err(e) => Ok(fail(&e)),
    }
}

fn run_debug(args: &DebugArgs) -> Result<ExitCode> {
    println!("🐛 MeTube Debug Information");
    println!("{}", "=".repeat(50));
    println!("metube-ops {}", env!("CARGO_PKG_VERSION"));

    let env = EnvSnapshot::from_process();
    let root = args.start.app_root(&env);

    println!();
    println!("📋 Environment Variables:");
    print_env_values(&env, DEBUG_VARS);

    println!();
    println!("📁 Working Directory: {}", root.display());

    println!();
    println!("📄 Required Files:");
    print_file_checks(&check_files(&root, REQUIRED_FILES));

    println!();
    println!("📁 Directory Creation Test:");
    let dirs = check_dirs(std::slice::from_ref(&args.test_dir));
    print_dir_checks(&dirs);

    println!();
    println!("📦 External Tools:");
    print_tool_checks(&check_tools());

    print_options_check(&check_options(&root.join(env.requested_options_file())));

    if !args.skip_extract {
        println!();
        println!("🧪 Testing yt-dlp extraction...");
        smoke_test(args.ytdlp.as_deref(), &args.url);
    }

    println!();
    println!("🔍 Pre-flight Check:");
    let mut preflight_ok = dirs.iter().all(|d| d.is_ok());
    match args.start.app_command() {
        Some(command) => match command.entry_point() {
            Some(entry) if root.join(entry).exists() => {
                println!("✅ Entry point found: {}", entry.display());
            }
            Some(entry) => {
                println!("❌ Entry point missing: {}", root.join(entry).display());
                preflight_ok = false;
            }
            None => println!("ℹ️  No entry point to check in '{}'", command.display()),
        },
        None => {
            println!("❌ No application command configured");
            preflight_ok = false;
        }
    }

    if !preflight_ok {
        warn!("Pre-flight checks failed");
        println!();
        println!("❌ Pre-flight checks failed");
        return Ok(ExitCode::from(1));
    }

    if args.launch {
        println!();
        println!("✅ Pre-flight checks passed, starting application");
        return run_start(&args.start);
    }

    println!();
    println!("✅ Pre-flight checks passed (use --launch to start the application)");
    Ok(ExitCode::SUCCESS)
}

fn smoke_test(ytdlp: Option<&Path>, url: &str) {
    let extractor = match Extractor::locate(ytdlp) {
        Ok(extractor) => extractor,
        Err(e) => {
            println!("❌ {}", e);
            return;
        }
    };
    match extractor.extract_info(url, &YtdlOptions::new()) {
        Ok(info) => println!("✅ yt-dlp can extract: {}", info.title()),
        Err(e) => println!("⚠️  yt-dlp extraction failed: {}", e),
    }
}

fn run_check(args: &CheckArgs) -> Result<ExitCode> {
    let env = EnvSnapshot::from_process();
    let report = build_setup_report(&args.plan(), &env);

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize setup report")?;
        println!("{}", json);
    } else {
        print_setup_report(&report);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_manual_cookie_steps() {
    println!();
    println!("📋 Manual steps:");
    println!("1. Install the 'Export Cookies' extension in Chrome");
    println!("2. Visit youtube.com and make sure you are signed in");
    println!("3. Use the extension to export cookies for youtube.com");
    println!("4. Save the file as cookies.txt");
    println!("5. Upload cookies.txt next to your ytdl config");
    println!();
    println!("Alternatives:");
    println!("- yt-dlp --cookies-from-browser chrome --cookies cookies.txt <url>");
    println!("- metube-ops cookies --db <path to Chrome Cookies file>");
}

fn run_cookies(args: &CookiesArgs) -> Result<ExitCode> {
    println!("🍪 YouTube Cookies Extractor");
    println!("{}", "=".repeat(30));

    let Some(db) = args.db_path() else {
        println!("❌ Could not determine the Chrome profile location");
        print_manual_cookie_steps();
        return Ok(ExitCode::from(1));
    };

    println!("📂 Reading cookies from {}", db.display());
    match export_cookies(&db, &args.domains(), &args.output) {
        Ok(count) => {
            info!(count, output = %args.output.display(), "Exported cookies");
            println!("✅ Exported {} cookies to {}", count, args.output.display());
            println!();
            println!("Upload this file and set \"cookiefile\" in your ytdl config to use it.");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            warn!(error = %e, "Cookie export failed");
            println!("❌ {}", e);
            print_manual_cookie_steps();
            Ok(ExitCode::from(1))
        }
    }
}

fn run_probe(args: &ProbeArgs) -> Result<ExitCode> {
    println!("🎬 YouTube Extraction Test");
    println!("{}", "=".repeat(50));
    println!("URL: {}", args.url);

    let matrix = match args.matrix() {
        Ok(matrix) => matrix,
        Err(e) => return Ok(fail(&e)),
    };
    let extractor = match Extractor::locate(args.ytdlp.as_deref()) {
        Ok(extractor) => extractor,
        Err(e) => return Ok(fail(&e)),
    };

    let results = run_matrix(&extractor, &args.url, &matrix);
    print_probe_summary(&results);

    if working(&results).is_empty() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

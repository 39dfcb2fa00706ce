//! Activity monitor command handler.
//!
//! Builds the effective configuration from the config file and the
//! command-line flags, sets up logging and runs either the TUI or the
//! headless debug loop.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use colored::*;

use crate::core::config::MonitorConfig;
use crate::core::system_monitor::{run_debug_cycles, SamplingEngine};
use crate::ui::monitor_tui::run_monitor_app;
use crate::{init_logging, LogSink};

/// Log file used by the TUI when `--debug` is set
pub const DEBUG_LOG_FILE: &str = "actmon-debug.log";

/// Command-line definition
pub fn build_command() -> Command {
    Command::new("actmon")
        .about("Terminal activity monitor with CPU alerts and process control")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('V')
                .long("version")
                .help("Print version information")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("refresh-rate")
                .short('r')
                .long("refresh-rate")
                .value_name("MS")
                .help("Refresh interval in milliseconds (minimum 100)")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("threshold")
                .short('t')
                .long("threshold")
                .value_name("PERCENT")
                .help("CPU usage alert threshold, 0-100")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f32)),
        )
        .arg(
            Arg::new("no-alert")
                .short('a')
                .long("no-alert")
                .help("Hide the visual CPU alert panel")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-notify")
                .short('n')
                .long("no-notify")
                .help("Disable desktop notifications")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help(format!("Verbose logging (TUI logs to {})", DEBUG_LOG_FILE))
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug-only")
                .short('o')
                .long("debug-only")
                .help("Run headless for a fixed number of cycles and log metrics")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("cycles")
                .long("cycles")
                .value_name("N")
                .help("Cycles to run in debug-only mode")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("In debug-only mode, print one JSON object per cycle")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Config file (default: <config dir>/actmon/config.json)")
                .value_parser(value_parser!(PathBuf)),
        )
}

/// Layer command-line flags over a loaded config. Flags that were not given
/// leave the existing values alone.
pub fn apply_overrides(mut config: MonitorConfig, matches: &ArgMatches) -> MonitorConfig {
    if let Some(&ms) = matches.get_one::<u64>("refresh-rate") {
        config.refresh_interval_ms = ms;
    }
    if let Some(&threshold) = matches.get_one::<f32>("threshold") {
        config.cpu_threshold = threshold;
    }
    if matches.get_flag("no-alert") {
        config.alerts_enabled = false;
    }
    if matches.get_flag("no-notify") {
        config.notifications_enabled = false;
    }
    if matches.get_flag("debug") {
        config.debug_mode = true;
    }
    if matches.get_flag("debug-only") {
        config.debug_only_mode = true;
    }
    if let Some(&cycles) = matches.get_one::<u32>("cycles") {
        config.debug_cycles = cycles;
    }
    if matches.get_flag("json") {
        config.json_output = true;
    }
    config
}

fn load_config(path: Option<&PathBuf>) -> Result<MonitorConfig> {
    match path {
        Some(path) => MonitorConfig::load_from(path),
        None => MonitorConfig::load(),
    }
}

/// Execute the monitor command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches.get_one::<PathBuf>("config"))?;
    let (config, warnings) = apply_overrides(config, matches).validated();

    for warning in &warnings {
        eprintln!("{} {}", "Warning:".yellow().bold(), warning);
    }

    let sink = if config.debug_only_mode {
        LogSink::Stderr
    } else if config.debug_mode {
        LogSink::File(Path::new(DEBUG_LOG_FILE))
    } else {
        LogSink::Disabled
    };
    init_logging(config.debug_mode, sink);

    for warning in &warnings {
        log::warn!("{}", warning);
    }
    log::debug!("Effective configuration: {:?}", config);

    if config.debug_only_mode {
        return run_headless(config);
    }

    run_monitor_app(config).context("Failed to run activity monitor")
}

fn run_headless(config: MonitorConfig) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    ctrlc::set_handler(move || {
        eprintln!("{}", "Stopping after the current cycle...".yellow());
        running_clone.store(false, Ordering::SeqCst);
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    let mut engine = SamplingEngine::for_live_system(config);
    let stdout = io::stdout();
    let completed = run_debug_cycles(&mut engine, &running, &mut stdout.lock())?;

    log::info!("Debug-only run finished after {} cycles", completed);
    Ok(())
}

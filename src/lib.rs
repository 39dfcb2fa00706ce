// actmon library - public API

pub mod error;
pub use error::{MonitorError, Result};

pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

pub use core::config::MonitorConfig;

use std::fs::OpenOptions;
use std::path::Path;

/// Where log records go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink<'a> {
    Stderr,
    File(&'a Path),
    Disabled,
}

/// Initialize logging. `RUST_LOG` still overrides the default level.
pub fn init_logging(debug: bool, sink: LogSink<'_>) {
    let level = match sink {
        LogSink::Disabled => log::LevelFilter::Off,
        _ if debug => log::LevelFilter::Debug,
        _ => log::LevelFilter::Info,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    if let LogSink::File(path) = sink {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(_) => {
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }

    // A second init (tests, embedding) is harmless
    let _ = builder.try_init();
}

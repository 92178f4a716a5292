//! Logging setup
//!
//! Logs go to stderr unless `log_file` is configured. `RUST_LOG` takes
//! precedence over the `-v` flags.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use studip_core::Config;

/// Level for the number of `-v` flags given
fn level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level(verbosity);
        EnvFilter::new(format!("studip_core={},studip_cli={}", level, level))
    })
}

/// Initialize the global subscriber (ignore error if already initialized)
pub fn init(config: &Config, verbosity: u8) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(verbosity))
        .with_target(false);

    let Some(ref log_path) = config.log_file else {
        let _ = builder.with_writer(std::io::stderr).try_init();
        return;
    };

    match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(file) => {
            let _ = builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
}

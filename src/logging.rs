//! Tracing subscriber setup.
//!
//! Logs go to stderr by default, or to `--log-file` when given. `RUST_LOG`
//! overrides the level derived from `-v`.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Logging options resolved from the command line.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// Number of `-v` flags.
    pub verbosity: u8,
    /// Append to this file instead of stderr.
    pub file: Option<PathBuf>,
    /// The interactive menu owns the terminal.
    pub interactive: bool,
}

impl LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub fn default_directive(&self) -> &'static str {
        // Stderr output would tear the alternate screen.
        if self.interactive && self.file.is_none() {
            return "off";
        }
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Install the global subscriber.
pub fn init_logging(config: &LoggingConfig) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(io::stderr).try_init(),
    };
    result.map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}

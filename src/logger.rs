//! Logging for Stencil.
//!
//! The binary installs `env_logger` through [`init_logger`]. Library code does
//! not log through global state; orchestrators and the template engine are
//! handed a [`LogSink`] at construction time and report through it.
//! [`HostLog`] is the sink that forwards to the `log` facade.

use std::error::Error as StdError;
use std::fmt;

/// Installs the process-wide logger.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .init();
}

/// Severity of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        };
        f.write_str(name)
    }
}

/// Destination for diagnostics raised while configuring or evaluating templates.
pub trait LogSink: Send + Sync {
    /// Records one event, optionally with the error that caused it.
    fn log(&self, level: Level, message: &str, cause: Option<&(dyn StdError + 'static)>);

    /// Whether events at `level` are recorded at all.
    fn is_enabled(&self, level: Level) -> bool;

    fn debug(&self, message: &str) {
        if self.is_enabled(Level::Debug) {
            self.log(Level::Debug, message, None);
        }
    }

    fn info(&self, message: &str) {
        if self.is_enabled(Level::Info) {
            self.log(Level::Info, message, None);
        }
    }

    fn warn(&self, message: &str) {
        if self.is_enabled(Level::Warn) {
            self.log(Level::Warn, message, None);
        }
    }

    fn error(&self, message: &str, cause: Option<&(dyn StdError + 'static)>) {
        if self.is_enabled(Level::Error) {
            self.log(Level::Error, message, cause);
        }
    }
}

/// Forwards events to the `log` facade under a fixed target.
///
/// The host has no trace level: trace events are dropped and
/// `is_enabled(Level::Trace)` is always false.
#[derive(Debug, Clone)]
pub struct HostLog {
    target: &'static str,
}

impl HostLog {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }

    fn host_level(level: Level) -> Option<log::Level> {
        match level {
            Level::Trace => None,
            Level::Debug => Some(log::Level::Debug),
            Level::Info => Some(log::Level::Info),
            Level::Warn => Some(log::Level::Warn),
            Level::Error => Some(log::Level::Error),
        }
    }
}

impl Default for HostLog {
    fn default() -> Self {
        HostLog::new("stencil")
    }
}

impl LogSink for HostLog {
    fn log(&self, level: Level, message: &str, cause: Option<&(dyn StdError + 'static)>) {
        let Some(host_level) = Self::host_level(level) else {
            return;
        };
        match cause {
            Some(cause) => log::log!(target: self.target, host_level, "{message}: {cause}"),
            None => log::log!(target: self.target, host_level, "{message}"),
        }
    }

    fn is_enabled(&self, level: Level) -> bool {
        match Self::host_level(level) {
            Some(host_level) => log::log_enabled!(target: self.target, host_level),
            None => false,
        }
    }
}

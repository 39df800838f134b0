//! Logging configuration using tracing.
//!
//! Sync components do not log through the global subscriber directly. They
//! receive a [`SyncLogger`] so tests can swap in a capturing implementation.

use crate::config::LogConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging capability handed to every sync component.
pub trait SyncLogger: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards to the process-wide `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl SyncLogger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!("{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}

/// Keeps the non-blocking file writer alive. Drop it only after the run
/// summary has been logged, otherwise buffered lines are lost.
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Initialize logging from the configured options.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init(options: &LogConfig, level: &str) -> anyhow::Result<LogGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, file_guard) = if options.output.writes_file() {
        std::fs::create_dir_all(&options.directory)?;
        let appender = tracing_appender::rolling::Builder::new()
            .rotation(options.rotation.into())
            .filename_prefix(options.file_name.clone())
            .max_log_files(options.max_files)
            .build(&options.directory)?;
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let stdout_layer = options
        .output
        .writes_stdout()
        .then(|| tracing_subscriber::fmt::layer());

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(LogGuard { _file: file_guard })
}

#[cfg(test)]
pub(crate) mod capture {
    use super::SyncLogger;
    use std::sync::Mutex;
    use tracing::Level;

    /// Records every message so tests can assert on what was reported.
    #[derive(Default)]
    pub struct CapturingLogger {
        lines: Mutex<Vec<(Level, String)>>,
    }

    impl CapturingLogger {
        pub fn messages(&self, level: Level) -> Vec<String> {
            self.lines
                .lock()
                .unwrap()
                .iter()
                .filter(|(l, _)| *l == level)
                .map(|(_, m)| m.clone())
                .collect()
        }

        fn push(&self, level: Level, message: &str) {
            self.lines.lock().unwrap().push((level, message.to_string()));
        }
    }

    impl SyncLogger for CapturingLogger {
        fn debug(&self, message: &str) {
            self.push(Level::DEBUG, message);
        }

        fn info(&self, message: &str) {
            self.push(Level::INFO, message);
        }

        fn warn(&self, message: &str) {
            self.push(Level::WARN, message);
        }

        fn error(&self, message: &str) {
            self.push(Level::ERROR, message);
        }
    }
}

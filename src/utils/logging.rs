// file: src/utils/logging.rs
// description: Tracing subscriber initialization and the injectable diagnostic logger

use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub fn init_logger(colored_output: bool, verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_ansi(colored_output);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// Diagnostic sink handed to a [`RepositoryClient`](crate::RepositoryClient) at construction.
///
/// Only `warn` is required; it carries outcomes the caller should notice but
/// that are not errors (such as a change set that produced nothing to commit).
pub trait DiagnosticLogger: Send + Sync {
    fn warn(&self, message: &str);

    fn info(&self, _message: &str) {}
}

/// Forwards diagnostics to the process-wide `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl DiagnosticLogger for TracingLogger {
    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

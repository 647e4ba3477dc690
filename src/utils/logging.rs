//! Logging utilities for the application
//!
//! Logging is configured through `tracing_subscriber`. Output goes to stdout by default;
//! setting `LOG_MODE=file` writes daily-rolling files under `LOG_DATA_DIR` (default
//! `logs/`). The filter comes from `RUST_LOG`, then `LOG_LEVEL`, then defaults to `info`.
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

const DEFAULT_LOG_DIR: &str = "logs";
const LOG_FILE_PREFIX: &str = "dual-chain-notifier.log";

/// Setup logging for the application
///
/// Chooses stdout or a rolling log file depending on `LOG_MODE`.
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
	let log_mode = std::env::var("LOG_MODE").unwrap_or_default();
	if log_mode.eq_ignore_ascii_case("file") {
		let log_dir = std::env::var("LOG_DATA_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.into());
		std::fs::create_dir_all(&log_dir)?;
		let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
		setup_logging_with_writer(appender, false)
	} else {
		setup_logging_with_writer(std::io::stdout, true)
	}
}

/// Setup logging for the application with a custom writer
pub fn setup_logging_with_writer<W>(
	writer: W,
	ansi: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>
where
	W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	tracing_subscriber::registry()
		.with(default_filter())
		.with(
			fmt::layer()
				.with_writer(writer)
				.event_format(
					fmt::format()
						.with_level(true)
						.with_target(true)
						.with_thread_ids(false)
						.with_thread_names(false)
						.with_ansi(ansi)
						.compact(),
				)
				.fmt_fields(fmt::format::PrettyFields::new()),
		)
		.try_init()?;
	Ok(())
}

fn default_filter() -> EnvFilter {
	EnvFilter::try_from_default_env()
		.or_else(|_| {
			std::env::var("LOG_LEVEL")
				.map_err(|e| e.to_string())
				.and_then(|level| EnvFilter::try_new(level).map_err(|e| e.to_string()))
		})
		.unwrap_or_else(|_| EnvFilter::new("info"))
}

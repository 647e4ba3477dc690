//! Dual-chain transaction notifier entry point.
//!
//! This binary watches one Ethereum and one Bitcoin address for new transactions and
//! raises alerts when one arrives.
//!
//! # Commands
//! - `run` (default): arms the poll schedule and optionally serves the status API
//! - `check`: runs one poll cycle now, subject to the usual gates
//! - `status`: prints the persisted configuration status as JSON
//! - `configure`: validates and saves addresses, API key and enable flags
//! - `clear`: removes the configuration and both histories
//!
//! # Flow
//! 1. Loads `.env`, the application configuration and sets up logging
//! 2. Opens the state store and builds adapters, notifier and watcher
//! 3. Runs the selected command
//! 4. For `run`, waits for Ctrl+C and stops the scheduler

use dual_chain_notifier::{
	bootstrap::{create_adapters, initialize_services, open_store},
	models::{AppConfig, ChainKind, MonitorConfig},
	repositories::{JsonFileStore, MonitorStateRepository},
	services::{status::StatusService, txwatcher::CycleOutcome},
	utils::{
		constants::DEFAULT_CONFIG_PATH, logging::setup_logging,
		metrics::server::create_status_server,
	},
};

use anyhow::{anyhow, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use dotenvy::dotenv;
use std::{
	env::{set_var, var},
	path::PathBuf,
};
use tracing::{error, info, warn};

fn cli() -> Command {
	Command::new("dual-chain-notifier")
		.version(env!("CARGO_PKG_VERSION"))
		.about(
			"Watches an Ethereum and a Bitcoin address and raises an alert when a new \
			 transaction arrives.",
		)
		.arg(
			Arg::new("config")
				.long("config")
				.global(true)
				.help(format!(
					"Path to the application configuration (default: {})",
					DEFAULT_CONFIG_PATH
				))
				.value_name("PATH")
				.value_parser(value_parser!(PathBuf)),
		)
		.arg(
			Arg::new("log-file")
				.long("log-file")
				.global(true)
				.help("Write logs to file instead of stdout")
				.action(ArgAction::SetTrue),
		)
		.arg(
			Arg::new("log-level")
				.long("log-level")
				.global(true)
				.help("Set log level (trace, debug, info, warn, error)")
				.value_name("LEVEL"),
		)
		.arg(
			Arg::new("log-path")
				.long("log-path")
				.global(true)
				.help("Path to store log files (default: logs/)")
				.value_name("PATH"),
		)
		.subcommand(
			Command::new("run")
				.about("Start the scheduled watcher (default)")
				.arg(
					Arg::new("status-server")
						.long("status-server")
						.help("Serve /status, /transactions/{chain} and /metrics")
						.action(ArgAction::SetTrue),
				)
				.arg(
					Arg::new("status-address")
						.long("status-address")
						.help("Address for the status server (default: 127.0.0.1:8081)")
						.value_name("HOST:PORT"),
				),
		)
		.subcommand(Command::new("check").about("Run one poll cycle now"))
		.subcommand(Command::new("status").about("Print the configuration status as JSON"))
		.subcommand(
			Command::new("configure")
				.about("Validate and save the monitoring configuration")
				.arg(
					Arg::new("eth-address")
						.long("eth-address")
						.value_name("ADDRESS"),
				)
				.arg(
					Arg::new("btc-address")
						.long("btc-address")
						.value_name("ADDRESS"),
				)
				.arg(Arg::new("api-key").long("api-key").value_name("KEY"))
				.arg(
					Arg::new("eth-enabled")
						.long("eth-enabled")
						.value_name("BOOL")
						.value_parser(value_parser!(bool)),
				)
				.arg(
					Arg::new("btc-enabled")
						.long("btc-enabled")
						.value_name("BOOL")
						.value_parser(value_parser!(bool)),
				),
		)
		.subcommand(Command::new("clear").about("Remove configuration and history"))
}

/// Applies configure arguments on top of the stored configuration
fn merge_configure_args(mut config: MonitorConfig, args: &ArgMatches) -> MonitorConfig {
	let text = |name: &str| {
		args.get_one::<String>(name)
			.map(|value| value.trim().to_string())
	};
	if let Some(address) = text("eth-address") {
		config.ethereum.address = Some(address).filter(|a| !a.is_empty());
	}
	if let Some(address) = text("btc-address") {
		config.bitcoin.address = Some(address).filter(|a| !a.is_empty());
	}
	if let Some(api_key) = text("api-key") {
		config.ethereum.credential = Some(api_key).filter(|k| !k.is_empty());
	}
	if let Some(enabled) = args.get_one::<bool>("eth-enabled") {
		config.ethereum.enabled = *enabled;
	}
	if let Some(enabled) = args.get_one::<bool>("btc-enabled") {
		config.bitcoin.enabled = *enabled;
	}
	config
}

async fn print_status(repository: MonitorStateRepository<JsonFileStore>) -> anyhow::Result<()> {
	let status = StatusService::persisted_only(repository)
		.get_status()
		.await
		.map_err(|e| anyhow!("{}", e))?;
	println!("{}", serde_json::to_string_pretty(&status)?);
	Ok(())
}

async fn run_watcher(config: AppConfig, args: Option<&ArgMatches>) -> anyhow::Result<()> {
	let store = open_store(&config).await.map_err(|e| anyhow!("{}", e))?;
	let adapters = create_adapters(&config).map_err(|e| anyhow!("{}", e))?;
	let services = initialize_services(&config, store, adapters)
		.await
		.map_err(|e| anyhow!("Failed to initialize services: {}", e))?;

	// Highlights left over from a previous process
	for chain in ChainKind::ALL {
		if let Err(e) = services.repository.clear_new_flags(chain).await {
			warn!(chain = %chain, error = %e, "failed to clear stale new flags");
		}
	}

	services
		.watcher
		.start()
		.await
		.map_err(|e| anyhow!("{}", e))?;

	let status_enabled = config.status_server.enabled
		|| args.is_some_and(|a| a.get_flag("status-server"));
	let status_address = args
		.and_then(|a| a.get_one::<String>("status-address").cloned())
		.unwrap_or_else(|| config.status_server.address.clone());

	let status_server = if status_enabled {
		match create_status_server(status_address, services.status.clone()) {
			Ok(server) => Some(server),
			Err(e) => {
				error!("Failed to create status server: {}", e);
				None
			}
		}
	} else {
		info!("Status server disabled. Use --status-server or STATUS_SERVER_ENABLED=true to enable");
		None
	};

	info!("Service started. Press Ctrl+C to shutdown");

	let ctrl_c = tokio::signal::ctrl_c();
	if let Some(server) = status_server {
		tokio::select! {
			result = ctrl_c => {
				if let Err(e) = result {
					error!("Error waiting for Ctrl+C: {}", e);
				}
				info!("Shutdown signal received, stopping services...");
			}
			result = server => {
				if let Err(e) = result {
					error!("Status server error: {}", e);
				}
				info!("Status server stopped, shutting down services...");
			}
		}
	} else {
		let _ = ctrl_c.await;
		info!("Shutdown signal received, stopping services...");
	}

	if let Err(e) = services.watcher.stop().await {
		error!("Error during shutdown: {}", e);
	}

	info!("Shutdown complete");
	Ok(())
}

async fn run_check(config: AppConfig) -> anyhow::Result<()> {
	let store = open_store(&config).await.map_err(|e| anyhow!("{}", e))?;
	let adapters = create_adapters(&config).map_err(|e| anyhow!("{}", e))?;
	let services = initialize_services(&config, store, adapters)
		.await
		.map_err(|e| anyhow!("Failed to initialize services: {}", e))?;

	match services
		.watcher
		.run_cycle()
		.await
		.map_err(|e| anyhow!("{}", e))?
	{
		Some(CycleOutcome::Completed(report)) => {
			info!(
				polled = report.polled.len(),
				new = report.new_transactions.len(),
				failed = report.failures.len(),
				"check finished"
			);
			for failure in &report.failures {
				warn!(chain = %failure.chain, kind = failure.kind, "{}", failure.message);
			}
		}
		Some(CycleOutcome::Skipped(reason)) => {
			info!(reason = reason.label(), "check skipped");
		}
		None => info!("another cycle is in flight"),
	}
	Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let matches = cli().get_matches();

	// Load environment variables from .env file
	dotenv().ok();

	// Only apply CLI options if the corresponding environment variables are NOT already set
	if matches.get_flag("log-file") && var("LOG_MODE").is_err() {
		set_var("LOG_MODE", "file");
	}
	if let Some(level) = matches.get_one::<String>("log-level") {
		if var("LOG_LEVEL").is_err() {
			set_var("LOG_LEVEL", level);
		}
	}
	if let Some(path) = matches.get_one::<String>("log-path") {
		if var("LOG_DATA_DIR").is_err() {
			set_var("LOG_DATA_DIR", path);
		}
	}

	setup_logging().unwrap_or_else(|e| {
		eprintln!("Failed to setup logging: {}", e);
	});

	let mut config = AppConfig::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))
		.context("Failed to load configuration")?;
	config.apply_env_overrides();

	match matches.subcommand() {
		Some(("configure", args)) => {
			let store = open_store(&config).await.map_err(|e| anyhow!("{}", e))?;
			let repository = MonitorStateRepository::new(store);
			let current = repository.load_config().await?;
			let updated = merge_configure_args(current, args);
			repository
				.save_config(&updated)
				.await
				.context("Configuration rejected")?;
			info!("Configuration saved");
			print_status(repository).await
		}
		Some(("clear", _)) => {
			let store = open_store(&config).await.map_err(|e| anyhow!("{}", e))?;
			let repository = MonitorStateRepository::new(store);
			repository.clear_config().await?;
			info!("Configuration cleared");
			print_status(repository).await
		}
		Some(("status", _)) => {
			let store = open_store(&config).await.map_err(|e| anyhow!("{}", e))?;
			print_status(MonitorStateRepository::new(store)).await
		}
		Some(("check", _)) => run_check(config).await,
		Some(("run", args)) => run_watcher(config, Some(args)).await,
		_ => run_watcher(config, None).await,
	}
}

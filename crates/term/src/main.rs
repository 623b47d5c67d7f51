//! `qm`, the quartermaster terminal client.
//!
//! Without a subcommand this starts the interactive screen. `sign-up` and
//! `report` run headless against the same backend and exit.

#![cfg_attr(test, allow(unused_crate_dependencies))]

mod app;
mod cli;
mod commands;
mod config;
#[cfg(test)]
mod harness;
mod input;
mod logging;
mod ui;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();
	logging::init(cli.verbose, cli.command.is_some());
	let config = Config::load(cli.config.as_deref(), cli.api_url)?;
	tracing::info!(api_url = %config.api_url, "starting qm");

	match cli.command {
		Some(Command::SignUp(account)) => commands::sign_up(&config, account).await,
		Some(Command::Report) => commands::export_report(&config).await,
		None => app::run(config).await,
	}
}

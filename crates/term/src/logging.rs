//! Trace output setup.
//!
//! The interactive screen owns the terminal, so traces go to a per-process
//! file under the state directory (`QM_LOG_DIR` overrides it). Headless
//! subcommands fall back to stderr when no file can be opened; the screen
//! just drops traces in that case.

use std::fs::OpenOptions;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub fn init(verbose: bool, headless: bool) {
	let filter = EnvFilter::try_from_env("QM_LOG").unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("qm_term=debug,qm_ledger=debug,qm_api=debug,qm_session=debug,info")
		} else {
			EnvFilter::new("info")
		}
	});

	if let Some((path, file)) = open_log_file() {
		let file_layer = tracing_subscriber::fmt::layer()
			.with_writer(file)
			.with_ansi(false)
			.with_target(true);
		tracing_subscriber::registry().with(filter).with(file_layer).init();
		tracing::debug!(path = ?path, "tracing initialized");
	} else if headless {
		tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
	}
}

fn log_dir() -> Option<PathBuf> {
	if let Some(dir) = std::env::var_os("QM_LOG_DIR") {
		return Some(PathBuf::from(dir));
	}
	dirs::state_dir().or_else(dirs::data_dir).map(|dir| dir.join("quartermaster/logs"))
}

fn open_log_file() -> Option<(PathBuf, std::fs::File)> {
	let dir = log_dir()?;
	std::fs::create_dir_all(&dir).ok()?;
	let path = dir.join(format!("qm.{}.log", std::process::id()));
	let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;
	Some((path, file))
}

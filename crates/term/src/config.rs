//! Configuration file and environment overrides.
//!
//! Everything has a default, so a fresh install runs without any file. The
//! backend URL resolves flag, then `QM_API_URL`, then the file. Other keys
//! come from the file alone.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "http://localhost:4000/api";
const DEFAULT_POLL_SECS: u64 = 60;
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
	pub api_url: String,
	pub poll_interval: Duration,
	pub download_dir: PathBuf,
	pub page_size: u32,
	pub session_dir: PathBuf,
}

/// Raw keys as they appear in `config.toml`. Unknown keys are ignored so
/// configs can be shared across client versions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileConfig {
	pub api_url: Option<String>,
	pub poll_interval_secs: Option<u64>,
	pub download_dir: Option<PathBuf>,
	pub page_size: Option<u32>,
}

impl Config {
	/// Reads the config file and applies overrides.
	///
	/// An explicitly requested file must exist; the default location is
	/// optional.
	pub fn load(explicit: Option<&Path>, api_url_flag: Option<String>) -> Result<Self> {
		let file = match explicit {
			Some(path) => parse_file(path)?,
			None => match default_path() {
				Some(path) if path.exists() => parse_file(&path)?,
				_ => FileConfig::default(),
			},
		};
		Ok(Self::resolve(file, api_url_flag, std::env::var("QM_API_URL").ok()))
	}

	pub fn resolve(
		file: FileConfig,
		api_url_flag: Option<String>,
		api_url_env: Option<String>,
	) -> Self {
		let api_url = api_url_flag
			.or(api_url_env)
			.or(file.api_url)
			.unwrap_or_else(|| DEFAULT_API_URL.to_string());
		// Floor the badge poll at 5s; the endpoint is cheap but not free.
		let poll_secs = file.poll_interval_secs.unwrap_or(DEFAULT_POLL_SECS).max(5);
		let download_dir = file
			.download_dir
			.or_else(dirs::download_dir)
			.unwrap_or_else(|| PathBuf::from("."));
		let page_size = file.page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 100);
		let session_dir = qm_session::default_dir().unwrap_or_else(|| PathBuf::from("."));
		Config {
			api_url,
			poll_interval: Duration::from_secs(poll_secs),
			download_dir,
			page_size,
			session_dir,
		}
	}
}

fn default_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("quartermaster/config.toml"))
}

fn parse_file(path: &Path) -> Result<FileConfig> {
	let raw = std::fs::read_to_string(path)
		.with_context(|| format!("reading config {}", path.display()))?;
	toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

//! Writes the exported inventory report to disk.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Timestamped so repeated exports never clobber each other.
pub fn filename(now: DateTime<Local>) -> String {
	now.format("property-report-%Y%m%d-%H%M%S.pdf").to_string()
}

pub async fn save(dir: &Path, now: DateTime<Local>, bytes: &[u8]) -> io::Result<PathBuf> {
	tokio::fs::create_dir_all(dir).await?;
	let path = dir.join(filename(now));
	tokio::fs::write(&path, bytes).await?;
	Ok(path)
}

//! Session file layout and disk access.

use std::io;
use std::path::{Path, PathBuf};

use crate::session::{Session, SessionError, SessionResult};

const SESSION_FILE: &str = "session.json";

/// Platform data directory for this app, e.g. `~/.local/share/quartermaster`.
pub fn default_dir() -> Option<PathBuf> {
	dirs::data_dir().map(|dir| dir.join("quartermaster"))
}

fn session_path(dir: &Path) -> PathBuf {
	dir.join(SESSION_FILE)
}

/// Read the stored session, if any. A missing file is a normal signed-out
/// start; an unreadable one is reported so the caller can clear it.
pub fn load(dir: &Path) -> SessionResult<Option<Session>> {
	let path = session_path(dir);
	let raw = match std::fs::read_to_string(&path) {
		Ok(raw) => raw,
		Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
		Err(e) => return Err(SessionError::Storage(format!("{}: {e}", path.display()))),
	};
	let session =
		serde_json::from_str(&raw).map_err(|e| SessionError::Corrupt(e.to_string()))?;
	Ok(Some(session))
}

pub fn save(dir: &Path, session: &Session) -> SessionResult<()> {
	std::fs::create_dir_all(dir)
		.map_err(|e| SessionError::Storage(format!("{}: {e}", dir.display())))?;
	let path = session_path(dir);
	let raw = serde_json::to_string_pretty(session)
		.map_err(|e| SessionError::Storage(e.to_string()))?;
	std::fs::write(&path, raw)
		.map_err(|e| SessionError::Storage(format!("{}: {e}", path.display())))?;
	restrict_permissions(&path);
	tracing::debug!(path = %path.display(), "session saved");
	Ok(())
}

/// Remove the session file. Missing is fine; sign-out must succeed even
/// if nothing was stored.
pub fn clear(dir: &Path) -> SessionResult<()> {
	let path = session_path(dir);
	match std::fs::remove_file(&path) {
		Ok(()) => Ok(()),
		Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
		Err(e) => Err(SessionError::Storage(format!("{}: {e}", path.display()))),
	}
}

// The file holds a bearer token; keep it owner-readable only.
#[cfg(unix)]
fn restrict_permissions(path: &Path) {
	use std::os::unix::fs::PermissionsExt;
	let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

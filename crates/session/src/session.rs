//! The on-disk session record.

use chrono::{DateTime, Utc};
use qm_model::User;
use serde::{Deserialize, Serialize};

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
	#[error("session storage error: {0}")]
	Storage(String),
	#[error("session file is corrupt: {0}")]
	Corrupt(String),
}

/// A resumable sign-in: the bearer token plus the account it was issued
/// to at the time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
	pub token: String,
	pub user: User,
	#[serde(default)]
	pub saved_at: Option<DateTime<Utc>>,
}

impl Session {
	pub fn new(token: String, user: User) -> Self {
		Self { token, user, saved_at: Some(Utc::now()) }
	}
}

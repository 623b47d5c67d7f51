//! Signed-in session persistence.
//!
//! Stores the bearer token and the account it belongs to in a JSON file
//! under the platform data directory, so a new process can resume without
//! prompting for credentials. The stored user is a cache for instant
//! startup; the app still revalidates the token against the backend.

#![cfg_attr(test, allow(unused_crate_dependencies))]

/// Session record and error type.
pub mod session;
/// Disk layout and load/save/clear.
pub mod storage;

pub use session::{Session, SessionError, SessionResult};
pub use storage::{clear, default_dir, load, save};

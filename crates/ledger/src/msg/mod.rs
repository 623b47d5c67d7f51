//! Async message bus for background request completions.
//!
//! Spawned requests send [`LedgerMsg`] values back to the main loop, which
//! drains the queue before each draw and aggregates [`Dirty`] flags. Apply
//! handlers only mutate state; when one marks `REFETCH`, the loop asks the
//! ledger to refresh the active view once for the whole batch, so a burst
//! of completions never stampedes the backend.

mod auth;
mod dirty;
mod list;
mod mutate;
mod review;

use std::path::PathBuf;

pub use auth::AuthMsg;
pub use dirty::Dirty;
pub use list::ListMsg;
pub use mutate::MutateMsg;
pub use review::ReviewMsg;
use tokio::sync::mpsc;

use crate::Ledger;
use crate::notify::Level;
use crate::tasks::TaskKey;

/// Channel sender for background tasks.
pub type LedgerSender = mpsc::UnboundedSender<LedgerMsg>;

/// Channel receiver for the main loop.
pub type LedgerReceiver = mpsc::UnboundedReceiver<LedgerMsg>;

/// Creates a new message channel pair.
pub fn channel() -> (LedgerSender, LedgerReceiver) {
	mpsc::unbounded_channel()
}

/// Top-level message enum dispatched to ledger state.
#[derive(Debug)]
pub enum LedgerMsg {
	Auth(AuthMsg),
	List(ListMsg),
	Mutate(MutateMsg),
	Review(ReviewMsg),
	/// The report download finished, successfully or not.
	ReportSaved(Result<PathBuf, String>),
}

impl LedgerMsg {
	/// Applies this message to the ledger, returning dirty flags.
	pub fn apply(self, ledger: &mut Ledger) -> Dirty {
		match self {
			Self::Auth(msg) => msg.apply(ledger),
			Self::List(msg) => msg.apply(ledger),
			Self::Mutate(msg) => msg.apply(ledger),
			Self::Review(msg) => msg.apply(ledger),
			Self::ReportSaved(result) => report_saved(ledger, result),
		}
	}
}

fn report_saved(ledger: &mut Ledger, result: Result<PathBuf, String>) -> Dirty {
	ledger.in_flight.finish(TaskKey::Report);
	match result {
		Ok(path) => ledger.notices.resolve(
			TaskKey::Report,
			Level::Success,
			format!("Report saved to {}", path.display()),
		),
		Err(message) => ledger.notices.resolve(TaskKey::Report, Level::Error, message),
	}
	Dirty::REDRAW
}

impl From<AuthMsg> for LedgerMsg {
	fn from(msg: AuthMsg) -> Self {
		Self::Auth(msg)
	}
}

impl From<ListMsg> for LedgerMsg {
	fn from(msg: ListMsg) -> Self {
		Self::List(msg)
	}
}

impl From<MutateMsg> for LedgerMsg {
	fn from(msg: MutateMsg) -> Self {
		Self::Mutate(msg)
	}
}

impl From<ReviewMsg> for LedgerMsg {
	fn from(msg: ReviewMsg) -> Self {
		Self::Review(msg)
	}
}

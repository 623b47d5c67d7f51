//! Client-side state for the quartermaster terminal.
//!
//! Everything the screens render lives in one [`Ledger`]: the signed-in
//! account, the property table with its per-row interaction modes, the
//! details and approvals views, notifications, and in-flight request
//! tracking. Intents mutate the ledger and spawn backend calls; their
//! completions return through [`msg`] and are applied between draws.
//!
//! The terminal layer on top of this crate owns input and layout only.
//! Every decision worth testing lives here, where no terminal is needed.

#![cfg_attr(test, allow(unused_crate_dependencies))]

mod actions;
mod approvals;
mod badge;
mod details;
mod ledger;
pub mod msg;
mod notify;
pub mod report;
mod rows;
mod store;
mod tasks;
#[cfg(test)]
mod test_support;

pub use approvals::Approvals;
pub use details::{DetailsDraft, DetailsForm, DetailsView};
pub use ledger::{Auth, Ledger, LedgerOptions, View};
pub use msg::{Dirty, LedgerMsg, LedgerReceiver, LedgerSender};
pub use notify::{AutoDismiss, Level, Notice, NotificationCenter};
pub use rows::{
	AssignDisposition, LocationPicker, ReassignProposal, RowSet, RowState, UserPicker,
};
pub use store::{LoadPhase, PropertyStore, Snapshot};
pub use tasks::{InFlight, TaskKey};

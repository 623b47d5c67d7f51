//! Completions for property mutations: add, edit, assign, delete.

use qm_api::{ApiError, AssignOutcome, DeleteOutcome};

use super::Dirty;
use crate::Ledger;
use crate::notify::Level;
use crate::rows::RowState;
use crate::tasks::TaskKey;

#[derive(Debug)]
pub enum MutateMsg {
	Added(Result<(), ApiError>),
	Saved { property_id: i64, result: Result<(), ApiError> },
	LocationSaved { property_id: i64, result: Result<(), ApiError> },
	Assigned { property_id: i64, result: Result<AssignOutcome, ApiError> },
	Deleted { property_id: i64, result: Result<DeleteOutcome, ApiError> },
	DetailsSaved { property_id: i64, result: Result<(), ApiError> },
}

impl MutateMsg {
	pub fn apply(self, ledger: &mut Ledger) -> Dirty {
		match self {
			Self::Added(result) => added(ledger, result),
			Self::Saved { property_id, result } => {
				row_patch_finished(ledger, TaskKey::Save(property_id), result, "Property updated")
			}
			Self::LocationSaved { property_id, result } => row_patch_finished(
				ledger,
				TaskKey::SaveLocation(property_id),
				result,
				"Location updated",
			),
			Self::Assigned { property_id, result } => assigned(ledger, property_id, result),
			Self::Deleted { property_id, result } => deleted(ledger, property_id, result),
			Self::DetailsSaved { property_id, result } => details_saved(ledger, property_id, result),
		}
	}
}

fn added(ledger: &mut Ledger, result: Result<(), ApiError>) -> Dirty {
	ledger.in_flight.finish(TaskKey::Add);
	match result {
		Ok(()) => {
			ledger.rows.clear_add();
			ledger.notices.resolve(TaskKey::Add, Level::Success, "Property added");
			Dirty::REFETCH
		}
		Err(err) => {
			// Duplicate property number and the like: the draft stays so
			// the user can correct it instead of retyping the row.
			ledger.notices.resolve(TaskKey::Add, Level::Error, err.to_string());
			Dirty::REDRAW
		}
	}
}

/// Shared tail for the two single-row patches. Success closes the row and
/// refetches; failure keeps the draft for another attempt.
fn row_patch_finished(
	ledger: &mut Ledger,
	task: TaskKey,
	result: Result<(), ApiError>,
	done: &str,
) -> Dirty {
	let property_id = match task {
		TaskKey::Save(id) | TaskKey::SaveLocation(id) => id,
		_ => return Dirty::NONE,
	};
	ledger.in_flight.finish(task);
	match result {
		Ok(()) => {
			ledger.rows.clear(property_id);
			ledger.notices.resolve(task, Level::Success, done);
			Dirty::REFETCH
		}
		Err(err) => {
			ledger.notices.resolve(task, Level::Error, err.to_string());
			Dirty::REDRAW
		}
	}
}

fn assigned(
	ledger: &mut Ledger,
	property_id: i64,
	result: Result<AssignOutcome, ApiError>,
) -> Dirty {
	let task = TaskKey::Assign(property_id);
	ledger.in_flight.finish(task);
	match result {
		Ok(outcome) => {
			ledger.rows.clear(property_id);
			let level = if outcome.is_queued() { Level::Info } else { Level::Success };
			ledger.notices.resolve(task, level, outcome.message());
			Dirty::REFETCH
		}
		Err(err) if err.is_conflict() => {
			// Raced another actor; reload so the row shows who actually
			// holds it now.
			ledger.rows.clear(property_id);
			ledger.notices.resolve(task, Level::Error, err.to_string());
			Dirty::REFETCH
		}
		Err(err) => {
			ledger.notices.resolve(task, Level::Error, err.to_string());
			Dirty::REDRAW
		}
	}
}

fn deleted(
	ledger: &mut Ledger,
	property_id: i64,
	result: Result<DeleteOutcome, ApiError>,
) -> Dirty {
	let task = TaskKey::Delete(property_id);
	ledger.in_flight.finish(task);
	match result {
		Ok(DeleteOutcome::Deleted) => {
			ledger.rows.clear(property_id);
			ledger.notices.resolve(task, Level::Success, "Property deleted");
			Dirty::REFETCH
		}
		Ok(DeleteOutcome::NeedsConfirmation { message }) => {
			// The server wants its own warning acknowledged; swap it into
			// the open dialog and ask again.
			ledger.rows.replace(property_id, RowState::ConfirmingDelete { prompt: message });
			ledger.notices.resolve(task, Level::Warn, "Delete needs another confirmation");
			Dirty::REDRAW
		}
		Err(err) => {
			ledger.rows.clear(property_id);
			ledger.notices.resolve(task, Level::Error, err.to_string());
			Dirty::REDRAW
		}
	}
}

fn details_saved(ledger: &mut Ledger, property_id: i64, result: Result<(), ApiError>) -> Dirty {
	let task = TaskKey::SaveDetails(property_id);
	ledger.in_flight.finish(task);
	match result {
		Ok(()) => {
			if let Some(view) = &mut ledger.details {
				view.finish_edit();
			}
			ledger.notices.resolve(task, Level::Success, "Property updated");
			Dirty::REFETCH
		}
		Err(err) => {
			ledger.notices.resolve(task, Level::Error, err.to_string());
			Dirty::REDRAW
		}
	}
}

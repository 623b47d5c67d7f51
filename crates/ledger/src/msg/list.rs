//! Fetch completions for the table and details views.

use qm_api::ApiError;
use qm_model::PropertyWithDetails;

use super::Dirty;
use crate::notify::Level;
use crate::store::Snapshot;
use crate::{Ledger, View};

#[derive(Debug)]
pub enum ListMsg {
	Store { generation: u64, result: Result<Snapshot, ApiError> },
	Details { property_id: i64, generation: u64, result: Result<PropertyWithDetails, ApiError> },
}

impl ListMsg {
	pub fn apply(self, ledger: &mut Ledger) -> Dirty {
		match self {
			Self::Store { generation, result } => {
				if ledger.store.apply(generation, result.map_err(|e| e.to_string())) {
					Dirty::REDRAW
				} else {
					Dirty::NONE
				}
			}
			Self::Details { property_id, generation, result } => {
				details_loaded(ledger, property_id, generation, result)
			}
		}
	}
}

fn details_loaded(
	ledger: &mut Ledger,
	property_id: i64,
	generation: u64,
	result: Result<PropertyWithDetails, ApiError>,
) -> Dirty {
	let Some(view) = &mut ledger.details else {
		return Dirty::NONE;
	};
	if !view.matches(property_id, generation) {
		return Dirty::NONE;
	}
	match result {
		Ok(record) => {
			view.apply(property_id, generation, record);
			Dirty::REDRAW
		}
		Err(err) => {
			// Fall back to the listing rather than stranding the user on
			// an empty screen.
			ledger.details = None;
			ledger.view = View::Properties;
			ledger.notices.push(Level::Error, format!("Couldn't load property details: {err}"));
			Dirty::REFETCH
		}
	}
}

//! Approval-queue and badge messages.

use qm_api::ApiError;
use qm_model::{ReassignmentRequest, ReviewStatus};

use super::Dirty;
use crate::Ledger;
use crate::notify::Level;
use crate::tasks::TaskKey;

#[derive(Debug)]
pub enum ReviewMsg {
	Loaded { generation: u64, result: Result<Vec<ReassignmentRequest>, ApiError> },
	Reviewed { request_id: i64, verdict: ReviewStatus, result: Result<(), ApiError> },
	BadgeCount(u64),
}

impl ReviewMsg {
	pub fn apply(self, ledger: &mut Ledger) -> Dirty {
		match self {
			Self::Loaded { generation, result } => loaded(ledger, generation, result),
			Self::Reviewed { request_id, verdict, result } => {
				reviewed(ledger, request_id, verdict, result)
			}
			Self::BadgeCount(count) => {
				if ledger.badge == Some(count) {
					Dirty::NONE
				} else {
					ledger.badge = Some(count);
					Dirty::REDRAW
				}
			}
		}
	}
}

fn loaded(
	ledger: &mut Ledger,
	generation: u64,
	result: Result<Vec<ReassignmentRequest>, ApiError>,
) -> Dirty {
	let ok = result.is_ok();
	if !ledger.approvals.apply(generation, result.map_err(|e| e.to_string())) {
		return Dirty::NONE;
	}
	if ok {
		// The queue on screen is the badge's source of truth.
		ledger.badge = Some(ledger.approvals.requests().len() as u64);
	}
	Dirty::REDRAW
}

fn reviewed(
	ledger: &mut Ledger,
	request_id: i64,
	verdict: ReviewStatus,
	result: Result<(), ApiError>,
) -> Dirty {
	let task = TaskKey::Review(request_id);
	ledger.in_flight.finish(task);
	match result {
		Ok(()) => {
			// One verdict touches one request; drop it locally instead of
			// refetching the rest of the queue.
			if !ledger.approvals.settle(request_id) {
				tracing::debug!(request_id, "reviewed request was already gone");
			}
			if let Some(count) = &mut ledger.badge {
				*count = count.saturating_sub(1);
			}
			let message = match verdict {
				ReviewStatus::Approved => "Reassignment approved",
				ReviewStatus::Denied => "Reassignment denied",
				ReviewStatus::Pending => "Review submitted",
			};
			ledger.notices.resolve(task, Level::Success, message);
			Dirty::REDRAW
		}
		Err(err) if err.is_not_found() || err.is_conflict() => {
			// Another reviewer got there first; reload the queue.
			ledger.notices.resolve(task, Level::Error, err.to_string());
			Dirty::REFETCH
		}
		Err(err) => {
			ledger.notices.resolve(task, Level::Error, err.to_string());
			Dirty::REDRAW
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::test_support;

	fn seeded_ledger() -> (Ledger, crate::msg::LedgerReceiver) {
		let (mut ledger, rx) = test_support::ledger();
		ledger.view = crate::View::Approvals;
		let generation = ledger.approvals.begin();
		ledger.approvals.apply(
			generation,
			Ok(vec![test_support::request(1, 41), test_support::request(2, 42)]),
		);
		ledger.badge = Some(2);
		(ledger, rx)
	}

	#[test]
	fn verdict_settles_locally_without_a_refetch() {
		let (mut ledger, _rx) = seeded_ledger();
		ledger.in_flight.begin(TaskKey::Review(1));

		let dirty = ReviewMsg::Reviewed {
			request_id: 1,
			verdict: ReviewStatus::Approved,
			result: Ok(()),
		}
		.apply(&mut ledger);

		assert!(dirty.needs_redraw());
		assert!(!dirty.needs_refetch());
		assert_eq!(ledger.approvals.requests().len(), 1);
		assert_eq!(ledger.approvals.get(1), None);
		assert_eq!(ledger.badge(), Some(1));
		let notice = ledger.notices.entries().next().unwrap();
		assert_eq!(notice.message, "Reassignment approved");
	}

	#[test]
	fn losing_a_review_race_reloads_the_queue() {
		let (mut ledger, _rx) = seeded_ledger();
		ledger.in_flight.begin(TaskKey::Review(2));

		let dirty = ReviewMsg::Reviewed {
			request_id: 2,
			verdict: ReviewStatus::Denied,
			result: Err(ApiError::Status { status: 404, message: "Request not found".into() }),
		}
		.apply(&mut ledger);

		assert!(dirty.needs_refetch());
		// Local list untouched; the refetch will reconcile it.
		assert_eq!(ledger.approvals.requests().len(), 2);
	}

	#[test]
	fn loading_the_queue_syncs_the_badge() {
		let (mut ledger, _rx) = test_support::ledger();
		let generation = ledger.approvals.begin();

		let dirty = ReviewMsg::Loaded {
			generation,
			result: Ok(vec![test_support::request(1, 41)]),
		}
		.apply(&mut ledger);

		assert!(dirty.needs_redraw());
		assert_eq!(ledger.badge(), Some(1));
	}

	#[test]
	fn unchanged_badge_counts_skip_the_redraw() {
		let (mut ledger, _rx) = test_support::ledger();
		assert_eq!(ReviewMsg::BadgeCount(3).apply(&mut ledger), Dirty::REDRAW);
		assert_eq!(ReviewMsg::BadgeCount(3).apply(&mut ledger), Dirty::NONE);
		assert_eq!(ReviewMsg::BadgeCount(2).apply(&mut ledger), Dirty::REDRAW);
	}
}

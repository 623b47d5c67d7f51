//! Pending reassignment queue for the master admin review screen.

use qm_model::ReassignmentRequest;

use crate::store::LoadPhase;

/// The pending list plus fetch bookkeeping. Reviews resolve locally by
/// request id; unrelated entries are never refetched for one verdict.
#[derive(Debug, Default)]
pub struct Approvals {
	phase: LoadPhase,
	requests: Vec<ReassignmentRequest>,
	generation: u64,
}

impl Approvals {
	pub fn begin(&mut self) -> u64 {
		self.generation += 1;
		self.phase = LoadPhase::Loading;
		self.generation
	}

	pub fn apply(
		&mut self,
		generation: u64,
		result: Result<Vec<ReassignmentRequest>, String>,
	) -> bool {
		if generation != self.generation {
			return false;
		}
		match result {
			Ok(requests) => {
				self.requests = requests;
				self.phase = LoadPhase::Ready;
			}
			Err(message) => self.phase = LoadPhase::Failed(message),
		}
		true
	}

	pub fn phase(&self) -> &LoadPhase {
		&self.phase
	}

	pub fn requests(&self) -> &[ReassignmentRequest] {
		&self.requests
	}

	pub fn get(&self, request_id: i64) -> Option<&ReassignmentRequest> {
		self.requests.iter().find(|r| r.request_id == request_id)
	}

	/// Remove the reviewed request. Returns false when it was not in the
	/// list, e.g. after a competing admin already handled it.
	pub fn settle(&mut self, request_id: i64) -> bool {
		let before = self.requests.len();
		self.requests.retain(|r| r.request_id != request_id);
		self.requests.len() != before
	}

	pub fn reset(&mut self) {
		self.generation += 1;
		self.phase = LoadPhase::Idle;
		self.requests.clear();
	}
}

//! In-flight request tracking.
//!
//! Every mutating request is registered under a stable key before it is
//! spawned and released when its completion message is applied. The key
//! does double duty: it disables the triggering control while the request
//! runs, and it names the loading notice so completion can resolve that
//! same notice in place.

use std::collections::HashSet;

/// Stable identity of one background request.
///
/// List refreshes are not tracked here; they are superseded rather than
/// deduplicated, which the stores handle with generation counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKey {
	Auth,
	Add,
	Save(i64),
	SaveDetails(i64),
	SaveLocation(i64),
	Assign(i64),
	Delete(i64),
	Review(i64),
	Report,
}

/// Set of requests currently in flight.
#[derive(Debug, Default)]
pub struct InFlight {
	keys: HashSet<TaskKey>,
}

impl InFlight {
	/// Register a request. Returns false when one with the same key is
	/// already running, in which case the caller must not spawn another.
	pub fn begin(&mut self, key: TaskKey) -> bool {
		self.keys.insert(key)
	}

	pub fn finish(&mut self, key: TaskKey) {
		self.keys.remove(&key);
	}

	pub fn contains(&self, key: TaskKey) -> bool {
		self.keys.contains(&key)
	}

	/// Whether any mutation for this property is still pending. Rows with
	/// pending work keep their controls disabled.
	pub fn busy_on(&self, property_id: i64) -> bool {
		self.keys.iter().any(|key| match *key {
			TaskKey::Save(id)
			| TaskKey::SaveDetails(id)
			| TaskKey::SaveLocation(id)
			| TaskKey::Assign(id)
			| TaskKey::Delete(id) => id == property_id,
			_ => false,
		})
	}

	pub fn clear(&mut self) {
		self.keys.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn duplicate_begin_is_rejected() {
		let mut in_flight = InFlight::default();
		assert!(in_flight.begin(TaskKey::Assign(4)));
		assert!(!in_flight.begin(TaskKey::Assign(4)));
		assert!(in_flight.begin(TaskKey::Assign(5)));

		in_flight.finish(TaskKey::Assign(4));
		assert!(in_flight.begin(TaskKey::Assign(4)));
	}

	#[test]
	fn busy_on_sees_only_that_rows_mutations() {
		let mut in_flight = InFlight::default();
		in_flight.begin(TaskKey::Delete(9));
		in_flight.begin(TaskKey::Report);
		assert!(in_flight.busy_on(9));
		assert!(!in_flight.busy_on(10));

		in_flight.finish(TaskKey::Delete(9));
		assert!(!in_flight.busy_on(9));
	}
}

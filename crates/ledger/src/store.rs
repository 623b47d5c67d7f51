//! Cached snapshot of the property collection and eligible users.
//!
//! The store never patches itself after a mutation; it refetches, so
//! server-derived fields (assigned department, pending markers) can
//! never drift. Results are keyed to a fetch generation: whatever the
//! latest `begin` issued wins, older results are dropped on the floor.

use qm_model::{PageMeta, Property, User};

/// Where the current fetch stands. Stale items stay visible while a
/// reload is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadPhase {
	#[default]
	Idle,
	Loading,
	Ready,
	Failed(String),
}

/// One fetched page: records plus the users eligible to receive them.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
	pub items: Vec<Property>,
	pub meta: Option<PageMeta>,
	pub users: Vec<User>,
}

#[derive(Debug)]
pub struct PropertyStore {
	phase: LoadPhase,
	items: Vec<Property>,
	meta: PageMeta,
	users: Vec<User>,
	page: u32,
	page_size: u32,
	generation: u64,
}

impl PropertyStore {
	pub fn new(page_size: u32) -> Self {
		Self {
			phase: LoadPhase::Idle,
			items: Vec::new(),
			meta: PageMeta::single_page(0),
			users: Vec::new(),
			page: 1,
			page_size,
			generation: 0,
		}
	}

	/// Start a fetch, invalidating every result issued before this call.
	pub fn begin(&mut self) -> u64 {
		self.generation += 1;
		self.phase = LoadPhase::Loading;
		self.generation
	}

	/// Apply a fetch result. Returns false (and changes nothing) when the
	/// result belongs to a superseded fetch.
	pub fn apply(&mut self, generation: u64, result: Result<Snapshot, String>) -> bool {
		if generation != self.generation {
			tracing::debug!(generation, current = self.generation, "dropping stale fetch result");
			return false;
		}
		match result {
			Ok(snapshot) => {
				let count = snapshot.items.len();
				self.items = snapshot.items;
				self.meta = snapshot.meta.unwrap_or_else(|| PageMeta::single_page(count));
				// The server clamps overshooting page requests; follow it.
				self.page = self.meta.page.max(1);
				self.users = snapshot.users;
				self.phase = LoadPhase::Ready;
			}
			Err(message) => {
				self.phase = LoadPhase::Failed(message);
			}
		}
		true
	}

	pub fn phase(&self) -> &LoadPhase {
		&self.phase
	}

	pub fn is_loading(&self) -> bool {
		self.phase == LoadPhase::Loading
	}

	pub fn items(&self) -> &[Property] {
		&self.items
	}

	pub fn users(&self) -> &[User] {
		&self.users
	}

	pub fn meta(&self) -> &PageMeta {
		&self.meta
	}

	pub fn page(&self) -> u32 {
		self.page
	}

	pub fn page_size(&self) -> u32 {
		self.page_size
	}

	pub fn property(&self, property_id: i64) -> Option<&Property> {
		self.items.iter().find(|p| p.id == property_id)
	}

	/// Resolve the holder display name to a user record, when the holder
	/// is part of the eligible list.
	pub fn holder_of(&self, property: &Property) -> Option<&User> {
		let name = property.assigned_to.as_deref()?;
		self.users.iter().find(|user| user.name == name)
	}

	/// Distinct known locations across the loaded page, sorted.
	pub fn locations(&self) -> Vec<String> {
		let mut locations: Vec<String> = self
			.items
			.iter()
			.filter_map(|p| p.location_detail.as_deref())
			.filter(|loc| !loc.trim().is_empty())
			.map(str::to_owned)
			.collect();
		locations.sort();
		locations.dedup();
		locations
	}

	/// Move to the next page if there is one. The caller refetches.
	pub fn next_page(&mut self) -> bool {
		if self.meta.has_next() {
			self.page += 1;
			true
		} else {
			false
		}
	}

	pub fn prev_page(&mut self) -> bool {
		if self.page > 1 {
			self.page -= 1;
			true
		} else {
			false
		}
	}

	/// Drop everything, e.g. on sign-out. Bumps the generation so any
	/// still-running fetch lands stale.
	pub fn reset(&mut self) {
		self.generation += 1;
		self.phase = LoadPhase::Idle;
		self.items.clear();
		self.users.clear();
		self.meta = PageMeta::single_page(0);
		self.page = 1;
	}
}

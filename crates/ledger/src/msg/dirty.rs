//! Dirty flags aggregated while draining the message queue.

use std::ops::{BitOr, BitOrAssign};

/// What the event loop owes the user after applying messages.
///
/// `REFETCH` marks state changes that invalidate the active view's data
/// (a mutation landed); the loop kicks one refresh for however many
/// messages requested it. Refetching implies redrawing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dirty(u8);

impl Dirty {
	pub const NONE: Dirty = Dirty(0);
	pub const REDRAW: Dirty = Dirty(1);
	pub const REFETCH: Dirty = Dirty(1 | 2);

	pub fn needs_redraw(self) -> bool {
		self.0 & Self::REDRAW.0 != 0
	}

	pub fn needs_refetch(self) -> bool {
		self.0 & 2 != 0
	}
}

impl BitOr for Dirty {
	type Output = Dirty;

	fn bitor(self, rhs: Dirty) -> Dirty {
		Dirty(self.0 | rhs.0)
	}
}

impl BitOrAssign for Dirty {
	fn bitor_assign(&mut self, rhs: Dirty) {
		self.0 |= rhs.0;
	}
}

//! Pagination metadata returned by collection endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
	/// 1-based page index.
	pub page: u32,
	pub page_size: u32,
	pub page_count: u32,
	pub total_count: u64,
}

impl PageMeta {
	/// Metadata for an unpaginated response (e.g. a staff member's own
	/// properties), treating the whole set as one page.
	pub fn single_page(count: usize) -> Self {
		Self {
			page: 1,
			page_size: count as u32,
			page_count: 1,
			total_count: count as u64,
		}
	}

	pub fn has_next(&self) -> bool {
		self.page < self.page_count
	}

	pub fn has_prev(&self) -> bool {
		self.page > 1
	}
}

//! Notification center for transient user-facing notices.
//!
//! Owns typed notice queueing; the frontend is responsible for visual
//! mapping and rendering. Mutation notices are raised as `Pending` under
//! their [`TaskKey`] and later resolved in place, so the user sees one
//! indicator move from loading to its outcome instead of a second toast.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::tasks::TaskKey;

/// Severity level for notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
	#[default]
	Info,
	Warn,
	Error,
	Success,
	/// A request in flight; never auto-dismissed.
	Pending,
}

/// Controls automatic dismissal of notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoDismiss {
	Never,
	After(Duration),
}

impl AutoDismiss {
	/// Default auto-dismiss duration (4 seconds).
	pub const DEFAULT: Self = Self::After(Duration::from_secs(4));
}

impl Default for AutoDismiss {
	fn default() -> Self {
		Self::DEFAULT
	}
}

/// One visible notice.
#[derive(Debug, Clone)]
pub struct Notice {
	/// Set for mutation notices so completion can find and replace them.
	pub task: Option<TaskKey>,
	pub level: Level,
	pub message: String,
	pub auto_dismiss: AutoDismiss,
	pub raised_at: Instant,
}

pub struct NotificationCenter {
	entries: VecDeque<Notice>,
}

impl Default for NotificationCenter {
	fn default() -> Self {
		Self::new()
	}
}

impl NotificationCenter {
	pub fn new() -> Self {
		Self { entries: VecDeque::new() }
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn entries(&self) -> impl Iterator<Item = &Notice> {
		self.entries.iter()
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}

	/// Raise a standalone notice.
	pub fn push(&mut self, level: Level, message: impl Into<String>) {
		self.entries.push_back(Notice {
			task: None,
			level,
			message: message.into(),
			auto_dismiss: AutoDismiss::DEFAULT,
			raised_at: Instant::now(),
		});
	}

	/// Raise a loading notice for a request that just started.
	pub fn begin(&mut self, task: TaskKey, message: impl Into<String>) {
		self.entries.push_back(Notice {
			task: Some(task),
			level: Level::Pending,
			message: message.into(),
			auto_dismiss: AutoDismiss::Never,
			raised_at: Instant::now(),
		});
	}

	/// Resolve the loading notice for `task` in place. Falls back to a
	/// standalone notice if the loading one was already dismissed.
	pub fn resolve(&mut self, task: TaskKey, level: Level, message: impl Into<String>) {
		match self.entries.iter_mut().find(|n| n.task == Some(task)) {
			Some(notice) => {
				notice.level = level;
				notice.message = message.into();
				notice.auto_dismiss = AutoDismiss::DEFAULT;
				notice.raised_at = Instant::now();
			}
			None => self.push(level, message),
		}
	}

	/// Drop notices whose dismiss deadline has passed. Returns true when
	/// anything was removed so the caller can redraw.
	pub fn sweep(&mut self, now: Instant) -> bool {
		let before = self.entries.len();
		self.entries.retain(|notice| match notice.auto_dismiss {
			AutoDismiss::Never => true,
			AutoDismiss::After(after) => now.duration_since(notice.raised_at) < after,
		});
		self.entries.len() != before
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn begin_then_resolve_replaces_in_place() {
		let mut center = NotificationCenter::new();
		center.begin(TaskKey::Save(3), "Updating property...");
		center.resolve(TaskKey::Save(3), Level::Success, "Property updated");

		let entries: Vec<_> = center.entries().collect();
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].level, Level::Success);
		assert_eq!(entries[0].message, "Property updated");
		assert_eq!(entries[0].auto_dismiss, AutoDismiss::DEFAULT);
	}

	#[test]
	fn resolve_without_a_pending_notice_still_surfaces() {
		let mut center = NotificationCenter::new();
		center.resolve(TaskKey::Report, Level::Error, "network error");
		assert_eq!(center.entries().count(), 1);
	}

	#[test]
	fn sweep_keeps_pending_and_drops_expired() {
		let mut center = NotificationCenter::new();
		center.begin(TaskKey::Report, "Preparing report...");
		center.push(Level::Info, "welcome");

		let later = Instant::now() + Duration::from_secs(10);
		assert!(center.sweep(later));

		let entries: Vec<_> = center.entries().collect();
		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0].level, Level::Pending);
	}

	#[test]
	fn sweep_reports_no_change_when_nothing_expired() {
		let mut center = NotificationCenter::new();
		center.push(Level::Info, "fresh");
		assert!(!center.sweep(Instant::now()));
		assert_eq!(center.entries().count(), 1);
	}
}

//! Reassignment requests awaiting master admin review.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::property::Property;
use crate::user::User;

/// Verdict sent back when a request is reviewed, and the state the server
/// reports for requests in its queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
	Pending,
	Approved,
	Denied,
}

/// One queued transfer: the property, both holders, and who asked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReassignmentRequest {
	pub request_id: i64,
	pub property: Property,
	/// Holder losing the property. Always present; a transfer off an
	/// unassigned property is granted immediately and never queued.
	pub from_staff: User,
	pub to_staff: User,
	pub requested_by: User,
	pub status: ReviewStatus,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<DateTime<Utc>>,
}

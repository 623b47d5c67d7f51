//! Roles and the capability rules derived from them.
//!
//! The backend decides what an actor may actually do; these functions only
//! control which actions the client offers. They are pure and cheap, so
//! views call them on every render rather than caching the answers.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Actor role as reported by the identity endpoint.
///
/// `Developer` is a diagnostic role: admin-equivalent visibility for
/// inspecting the system, but never part of the approval chain.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
	Staff,
	PropertyCustodian,
	Admin,
	MasterAdmin,
	Developer,
}

impl Role {
	/// Human-readable label for status lines and tables.
	pub fn label(self) -> &'static str {
		match self {
			Role::Staff => "Staff",
			Role::PropertyCustodian => "Property Custodian",
			Role::Admin => "Admin",
			Role::MasterAdmin => "Master Admin",
			Role::Developer => "Developer",
		}
	}

	/// Whether this actor sees the full paginated inventory.
	///
	/// Staff only ever see their own assigned properties.
	pub fn sees_full_inventory(self) -> bool {
		!matches!(self, Role::Staff)
	}

	/// Whether this actor may edit property records inline.
	pub fn can_edit(self) -> bool {
		matches!(self, Role::Admin | Role::MasterAdmin | Role::Developer)
	}

	/// Whether this actor may delete property records.
	pub fn can_delete(self) -> bool {
		self.can_edit()
	}

	/// Whether this actor may create property records.
	pub fn can_add(self) -> bool {
		self.can_edit()
	}

	/// Whether this actor may assign or reassign holders.
	pub fn can_assign(self) -> bool {
		matches!(
			self,
			Role::PropertyCustodian | Role::Admin | Role::MasterAdmin | Role::Developer
		)
	}

	/// Whether this actor reviews pending reassignment requests.
	///
	/// Exactly one role carries approval authority; the pending-approvals
	/// badge polls only for it.
	pub fn can_review_reassignments(self) -> bool {
		matches!(self, Role::MasterAdmin)
	}

	/// The role an assignment initiated by this actor may target.
	///
	/// Delegation runs downward one step: custodians hand properties to
	/// staff, admins delegate custodianship. `None` means the actor cannot
	/// assign at all.
	pub fn assignable_role(self) -> Option<Role> {
		match self {
			Role::PropertyCustodian => Some(Role::Staff),
			Role::Admin | Role::MasterAdmin | Role::Developer => Some(Role::PropertyCustodian),
			Role::Staff => None,
		}
	}
}

//! Per-row interaction state machine.
//!
//! Each property row is Viewing unless an explicit action moved it into
//! exactly one other mode. Absence from the map means Viewing, and every
//! entry point checks vacancy first, so editing-while-assigning and
//! similar illegal combinations are unrepresentable. Rows are keyed by
//! property id and fully independent of each other.

use std::collections::HashMap;

use qm_model::{Property, PropertyDraft, User};

/// Incremental-search selector over the eligible-user list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPicker {
	pub query: String,
	pub cursor: usize,
}

impl UserPicker {
	/// Users matching the query, case-insensitively, by name or email.
	pub fn filtered<'a>(&self, users: &'a [User]) -> Vec<&'a User> {
		let needle = self.query.to_lowercase();
		users
			.iter()
			.filter(|user| {
				needle.is_empty()
					|| user.name.to_lowercase().contains(&needle)
					|| user.email.to_lowercase().contains(&needle)
			})
			.collect()
	}

	/// The user under the cursor, if the filtered list is non-empty.
	pub fn current<'a>(&self, users: &'a [User]) -> Option<&'a User> {
		let filtered = self.filtered(users);
		filtered.get(self.cursor.min(filtered.len().saturating_sub(1))).copied()
	}

	pub fn push_char(&mut self, c: char) {
		self.query.push(c);
		self.cursor = 0;
	}

	pub fn backspace(&mut self) {
		self.query.pop();
		self.cursor = 0;
	}

	pub fn move_up(&mut self) {
		self.cursor = self.cursor.saturating_sub(1);
	}

	pub fn move_down(&mut self, len: usize) {
		if self.cursor + 1 < len {
			self.cursor += 1;
		}
	}
}

/// Selector over known locations, with free entry for new ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationPicker {
	pub query: String,
	pub cursor: usize,
}

impl LocationPicker {
	pub fn filtered<'a>(&self, options: &'a [String]) -> Vec<&'a str> {
		let needle = self.query.to_lowercase();
		options
			.iter()
			.filter(|option| needle.is_empty() || option.to_lowercase().contains(&needle))
			.map(String::as_str)
			.collect()
	}

	/// The location to submit: the highlighted existing one, else the
	/// typed query as a brand-new location.
	pub fn selection(&self, options: &[String]) -> Option<String> {
		let filtered = self.filtered(options);
		if let Some(hit) = filtered.get(self.cursor) {
			return Some((*hit).to_owned());
		}
		let typed = self.query.trim();
		if typed.is_empty() { None } else { Some(typed.to_owned()) }
	}

	pub fn push_char(&mut self, c: char) {
		self.query.push(c);
		self.cursor = 0;
	}

	pub fn backspace(&mut self) {
		self.query.pop();
		self.cursor = 0;
	}

	pub fn move_up(&mut self) {
		self.cursor = self.cursor.saturating_sub(1);
	}

	pub fn move_down(&mut self, len: usize) {
		if self.cursor + 1 < len {
			self.cursor += 1;
		}
	}
}

/// A reassignment awaiting the explicit second confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignProposal {
	pub property_id: i64,
	pub user_id: i64,
	pub user_name: String,
}

/// Row modes other than the quiescent Viewing state.
#[derive(Debug, Clone, PartialEq)]
pub enum RowState {
	Editing { draft: PropertyDraft },
	Assigning { picker: UserPicker },
	/// Modal dialog holding the proposed transfer; nothing was sent yet.
	ConfirmingReassign { proposal: ReassignProposal },
	/// Delete dialog. The prompt also carries the server's re-prompt when
	/// it answers a confirmed delete with another confirmation demand.
	ConfirmingDelete { prompt: String },
	PickingLocation { picker: LocationPicker },
}

/// What confirming a user selection should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignDisposition {
	/// Unassigned property: submit without further ceremony.
	Submit { user_id: i64 },
	/// Already held by someone else: require the confirmation dialog.
	NeedsConfirmation { proposal: ReassignProposal },
	/// Selected the current holder: warn locally, no network call.
	AlreadyHeld,
	/// A reassignment is already pending review for this property.
	Blocked,
	NoSelection,
}

/// Decide how an assignment selection proceeds. The immediate-vs-queued
/// question stays with the server; this only gates the local ceremony.
pub fn assign_disposition(
	property: &Property,
	candidate: Option<&User>,
	users: &[User],
) -> AssignDisposition {
	let Some(candidate) = candidate else {
		return AssignDisposition::NoSelection;
	};
	if property.has_pending_reassignment() {
		return AssignDisposition::Blocked;
	}
	if !property.is_assigned() {
		return AssignDisposition::Submit { user_id: candidate.id };
	}
	// The wire gives the holder as a display name; join against the
	// eligible list to compare identities.
	let holder = users.iter().find(|user| Some(user.name.as_str()) == property.assigned_to.as_deref());
	if holder.is_some_and(|holder| holder.id == candidate.id) {
		return AssignDisposition::AlreadyHeld;
	}
	AssignDisposition::NeedsConfirmation {
		proposal: ReassignProposal {
			property_id: property.id,
			user_id: candidate.id,
			user_name: candidate.name.clone(),
		},
	}
}

/// Confirmation copy differs for assigned properties, the mechanics do not.
pub fn delete_prompt(property: &Property) -> String {
	if property.is_assigned() {
		"This property is currently assigned. Do you still want to delete it?".into()
	} else {
		"Do you want to delete this property?".into()
	}
}

/// All row states for the collection, plus the synthetic add row.
#[derive(Debug, Default)]
pub struct RowSet {
	rows: HashMap<i64, RowState>,
	adding: Option<PropertyDraft>,
}

impl RowSet {
	pub fn state(&self, property_id: i64) -> Option<&RowState> {
		self.rows.get(&property_id)
	}

	pub fn state_mut(&mut self, property_id: i64) -> Option<&mut RowState> {
		self.rows.get_mut(&property_id)
	}

	pub fn is_viewing(&self, property_id: i64) -> bool {
		!self.rows.contains_key(&property_id)
	}

	/// Enter a non-viewing mode. Refused unless the row is Viewing; modes
	/// never stack or overwrite each other.
	pub fn enter(&mut self, property_id: i64, state: RowState) -> bool {
		if !self.is_viewing(property_id) {
			return false;
		}
		self.rows.insert(property_id, state);
		true
	}

	/// Replace the mode of a row mid-flow, e.g. Assigning to
	/// ConfirmingReassign. The row must already be in some mode.
	pub fn replace(&mut self, property_id: i64, state: RowState) -> bool {
		match self.rows.get_mut(&property_id) {
			Some(slot) => {
				*slot = state;
				true
			}
			None => false,
		}
	}

	/// Return the row to Viewing, discarding any draft.
	pub fn clear(&mut self, property_id: i64) {
		self.rows.remove(&property_id);
	}

	pub fn clear_all(&mut self) {
		self.rows.clear();
		self.adding = None;
	}

	pub fn add_draft(&self) -> Option<&PropertyDraft> {
		self.adding.as_ref()
	}

	pub fn add_draft_mut(&mut self) -> Option<&mut PropertyDraft> {
		self.adding.as_mut()
	}

	pub fn begin_add(&mut self) -> bool {
		if self.adding.is_some() {
			return false;
		}
		self.adding = Some(PropertyDraft::default());
		true
	}

	/// Drop the add row. Used by Cancel and by successful submission;
	/// conflict failures deliberately leave the draft alone.
	pub fn clear_add(&mut self) {
		self.adding = None;
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use qm_model::Role;

	use super::*;

	fn property(assigned_to: Option<&str>, pending: bool) -> Property {
		let json = format!(
			r#"{{"id": 41, "propertyNo": "P-41", "description": "Scope", "quantity": 1,
			"value": 100.0, "serialNo": "S-41"
			{}{}}}"#,
			assigned_to.map(|name| format!(r#", "assignedTo": "{name}""#)).unwrap_or_default(),
			if pending { r#", "reassignmentStatus": "pending""# } else { "" },
		);
		serde_json::from_str(&json).unwrap()
	}

	fn user(id: i64, name: &str) -> User {
		User {
			id,
			name: name.into(),
			email: format!("{}@example.edu", name.to_lowercase().replace(' ', ".")),
			role: Role::Staff,
			department: None,
		}
	}

	#[test]
	fn unassigned_property_submits_directly() {
		let users = vec![user(1, "A. Reyes"), user(2, "B. Cruz")];
		let disposition = assign_disposition(&property(None, false), Some(&users[1]), &users);
		assert_eq!(disposition, AssignDisposition::Submit { user_id: 2 });
	}

	#[test]
	fn selecting_the_current_holder_never_submits() {
		let users = vec![user(1, "A. Reyes"), user(2, "B. Cruz")];
		let held = property(Some("A. Reyes"), false);
		let disposition = assign_disposition(&held, Some(&users[0]), &users);
		assert_eq!(disposition, AssignDisposition::AlreadyHeld);
	}

	#[test]
	fn different_holder_requires_confirmation() {
		let users = vec![user(1, "A. Reyes"), user(2, "B. Cruz")];
		let held = property(Some("A. Reyes"), false);
		match assign_disposition(&held, Some(&users[1]), &users) {
			AssignDisposition::NeedsConfirmation { proposal } => {
				assert_eq!(proposal.property_id, 41);
				assert_eq!(proposal.user_id, 2);
				assert_eq!(proposal.user_name, "B. Cruz");
			}
			other => panic!("expected confirmation, got {other:?}"),
		}
	}

	#[test]
	fn unknown_holder_name_still_requires_confirmation() {
		// Holder is not in the eligible list; treat as a different user.
		let users = vec![user(2, "B. Cruz")];
		let held = property(Some("Departed Employee"), false);
		assert!(matches!(
			assign_disposition(&held, Some(&users[0]), &users),
			AssignDisposition::NeedsConfirmation { .. }
		));
	}

	#[test]
	fn pending_reassignment_blocks_new_attempts() {
		let users = vec![user(1, "A. Reyes"), user(2, "B. Cruz")];
		let held = property(Some("A. Reyes"), true);
		assert_eq!(assign_disposition(&held, Some(&users[1]), &users), AssignDisposition::Blocked);
	}

	#[test]
	fn no_candidate_is_not_an_error() {
		let users = vec![user(1, "A. Reyes")];
		assert_eq!(
			assign_disposition(&property(None, false), None, &users),
			AssignDisposition::NoSelection
		);
	}

	#[test]
	fn row_modes_never_stack() {
		let mut rows = RowSet::default();
		assert!(rows.enter(41, RowState::Assigning { picker: UserPicker::default() }));
		assert!(!rows.enter(41, RowState::Editing { draft: PropertyDraft::default() }));
		assert!(matches!(rows.state(41), Some(RowState::Assigning { .. })));

		// A different row is unaffected.
		assert!(rows.enter(42, RowState::Editing { draft: PropertyDraft::default() }));

		rows.clear(41);
		assert!(rows.is_viewing(41));
		assert!(rows.enter(41, RowState::Editing { draft: PropertyDraft::default() }));
	}

	#[test]
	fn replace_requires_an_active_mode() {
		let mut rows = RowSet::default();
		let proposal =
			ReassignProposal { property_id: 41, user_id: 2, user_name: "B. Cruz".into() };
		assert!(!rows.replace(41, RowState::ConfirmingReassign { proposal: proposal.clone() }));

		rows.enter(41, RowState::Assigning { picker: UserPicker::default() });
		assert!(rows.replace(41, RowState::ConfirmingReassign { proposal }));
	}

	#[test]
	fn add_row_is_single_and_survives_clear_all_only_explicitly() {
		let mut rows = RowSet::default();
		assert!(rows.begin_add());
		assert!(!rows.begin_add());
		rows.add_draft_mut().unwrap().property_no = "P-9".into();

		rows.clear_add();
		assert!(rows.add_draft().is_none());
	}

	#[test]
	fn user_picker_filters_and_clamps() {
		let users =
			vec![user(1, "A. Reyes"), user(2, "B. Cruz"), user(3, "C. Reyes-Tan")];
		let mut picker = UserPicker::default();
		assert_eq!(picker.filtered(&users).len(), 3);

		for c in "reyes".chars() {
			picker.push_char(c);
		}
		let filtered = picker.filtered(&users);
		assert_eq!(filtered.len(), 2);

		picker.move_down(filtered.len());
		picker.move_down(filtered.len());
		assert_eq!(picker.cursor, 1);
		assert_eq!(picker.current(&users).unwrap().id, 3);

		picker.push_char('x');
		assert_eq!(picker.cursor, 0);
		assert!(picker.current(&users).is_none());
	}

	#[test]
	fn location_picker_falls_back_to_typed_entry() {
		let options = vec!["Room 204".to_owned(), "DC-1".to_owned()];
		let mut picker = LocationPicker::default();
		assert_eq!(picker.selection(&options).as_deref(), Some("Room 204"));

		for c in "Warehouse 3".chars() {
			picker.push_char(c);
		}
		assert_eq!(picker.filtered(&options).len(), 0);
		assert_eq!(picker.selection(&options).as_deref(), Some("Warehouse 3"));

		picker.query.clear();
		picker.cursor = 5;
		assert_eq!(picker.selection(&options), None);
	}

	#[test]
	fn delete_prompt_copy_depends_on_assignment() {
		assert!(delete_prompt(&property(Some("A. Reyes"), false)).contains("currently assigned"));
		assert!(!delete_prompt(&property(None, false)).contains("currently assigned"));
	}
}

//! User intents: everything a keypress may ultimately do.
//!
//! Each method checks the role gate and any in-flight guard, mutates row
//! or view state, and spawns at most one backend request whose completion
//! comes back through the message bus. Methods never await.

use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use qm_api::{NewAccount, SignIn};
use qm_model::{PropertyDraft, ReviewStatus};
use qm_session::{Session, storage};

use crate::details::DetailsView;
use crate::msg::{AuthMsg, LedgerMsg, MutateMsg, ReviewMsg};
use crate::notify::Level;
use crate::report;
use crate::rows::{self, AssignDisposition, LocationPicker, RowState, UserPicker};
use crate::tasks::TaskKey;
use crate::{Ledger, View};

impl Ledger {
	// Navigation

	pub fn open_details(&mut self, property_id: i64) {
		if self.store.property(property_id).is_none() {
			return;
		}
		self.view = View::Details;
		self.details = Some(DetailsView::open(property_id));
		self.refresh_details();
	}

	pub fn close_details(&mut self) {
		self.details = None;
		self.show_properties();
	}

	/// Return to the table and reload it; row markers may have changed
	/// while another screen was up.
	pub fn show_properties(&mut self) {
		self.view = View::Properties;
		self.details = None;
		self.refresh_properties();
	}

	pub fn open_approvals(&mut self) {
		if !self.role().is_some_and(|role| role.can_review_reassignments()) {
			return;
		}
		self.view = View::Approvals;
		self.refresh_approvals();
	}

	pub fn next_page(&mut self) {
		if self.store.next_page() {
			self.refresh_properties();
		}
	}

	pub fn prev_page(&mut self) {
		if self.store.prev_page() {
			self.refresh_properties();
		}
	}

	// Auth

	pub fn sign_in(&mut self, email: &str, password: &str) {
		let email = email.trim().to_owned();
		if email.is_empty() || password.is_empty() {
			self.notices.push(Level::Error, "Email and password are required");
			return;
		}
		if !self.in_flight.begin(TaskKey::Auth) {
			return;
		}
		self.notices.begin(TaskKey::Auth, "Signing in");
		let api = Arc::clone(&self.api);
		let tx = self.tx.clone();
		let dir = self.session_dir.clone();
		let password = password.to_owned();
		tokio::spawn(async move {
			let result = api.sign_in(&email, &password).await;
			if let Ok(signed) = &result {
				persist_session(&dir, signed);
			}
			let _ = tx.send(AuthMsg::SignedIn(result).into());
		});
	}

	pub fn sign_up(&mut self, account: NewAccount) {
		if account.name.trim().is_empty()
			|| account.email.trim().is_empty()
			|| account.password.is_empty()
		{
			self.notices.push(Level::Error, "Name, email, and password are required");
			return;
		}
		if !self.in_flight.begin(TaskKey::Auth) {
			return;
		}
		self.notices.begin(TaskKey::Auth, "Creating account");
		let api = Arc::clone(&self.api);
		let tx = self.tx.clone();
		tokio::spawn(async move {
			let result = api.sign_up(&account).await;
			let _ = tx.send(AuthMsg::SignedUp(result).into());
		});
	}

	/// The local session goes away no matter what the backend says.
	pub fn sign_out(&mut self) {
		if !self.in_flight.begin(TaskKey::Auth) {
			return;
		}
		let api = Arc::clone(&self.api);
		let tx = self.tx.clone();
		let dir = self.session_dir.clone();
		tokio::spawn(async move {
			if let Err(err) = api.sign_out().await {
				tracing::debug!("backend sign-out failed: {err}");
			}
			api.set_token(None);
			if let Err(err) = storage::clear(&dir) {
				tracing::warn!("could not clear the stored session: {err}");
			}
			let _ = tx.send(AuthMsg::SignedOut.into());
		});
	}

	// Inline editing

	pub fn start_edit(&mut self, property_id: i64) {
		if !self.role().is_some_and(|role| role.can_edit()) {
			return;
		}
		if self.in_flight.busy_on(property_id) {
			return;
		}
		let Some(property) = self.store.property(property_id) else {
			return;
		};
		let draft = PropertyDraft::from_property(property);
		self.rows.enter(property_id, RowState::Editing { draft });
	}

	/// Abandon whatever mode the row is in.
	pub fn cancel_row(&mut self, property_id: i64) {
		self.rows.clear(property_id);
	}

	pub fn save_edit(&mut self, property_id: i64) {
		let Some(RowState::Editing { draft }) = self.rows.state(property_id) else {
			return;
		};
		let payload = match draft.validate() {
			Ok(payload) => payload,
			Err(err) => {
				self.notices.push(Level::Error, err.to_string());
				return;
			}
		};
		if !self.in_flight.begin(TaskKey::Save(property_id)) {
			return;
		}
		self.notices.begin(TaskKey::Save(property_id), "Saving property");
		let api = Arc::clone(&self.api);
		let tx = self.tx.clone();
		tokio::spawn(async move {
			let result = api.update_property(property_id, &payload).await;
			let _ = tx.send(MutateMsg::Saved { property_id, result }.into());
		});
	}

	// Adding

	pub fn start_add(&mut self) {
		if !self.role().is_some_and(|role| role.can_add()) {
			return;
		}
		self.rows.begin_add();
	}

	pub fn cancel_add(&mut self) {
		self.rows.clear_add();
	}

	pub fn save_add(&mut self) {
		let Some(draft) = self.rows.add_draft() else {
			return;
		};
		let payload = match draft.validate() {
			Ok(payload) => payload,
			Err(err) => {
				self.notices.push(Level::Error, err.to_string());
				return;
			}
		};
		if !self.in_flight.begin(TaskKey::Add) {
			return;
		}
		self.notices.begin(TaskKey::Add, "Adding property");
		let api = Arc::clone(&self.api);
		let tx = self.tx.clone();
		tokio::spawn(async move {
			let result = api.add_property(&payload).await;
			let _ = tx.send(MutateMsg::Added(result).into());
		});
	}

	// Assignment

	pub fn start_assign(&mut self, property_id: i64) {
		if !self.role().is_some_and(|role| role.can_assign()) {
			return;
		}
		if self.in_flight.busy_on(property_id) {
			return;
		}
		let Some(property) = self.store.property(property_id) else {
			return;
		};
		if property.has_pending_reassignment() {
			self.notices
				.push(Level::Warn, "A reassignment for this property is already awaiting review");
			return;
		}
		self.rows.enter(property_id, RowState::Assigning { picker: UserPicker::default() });
	}

	/// Act on the highlighted user: submit straight away for unassigned
	/// properties, otherwise raise the reassignment confirmation.
	pub fn confirm_pick(&mut self, property_id: i64) {
		let Some(RowState::Assigning { picker }) = self.rows.state(property_id) else {
			return;
		};
		let Some(property) = self.store.property(property_id) else {
			return;
		};
		let candidate = picker.current(self.store.users());
		match rows::assign_disposition(property, candidate, self.store.users()) {
			AssignDisposition::NoSelection => {
				self.notices.push(Level::Warn, "No user matches that search");
			}
			AssignDisposition::Blocked => {
				self.rows.clear(property_id);
				self.notices.push(
					Level::Warn,
					"A reassignment for this property is already awaiting review",
				);
			}
			AssignDisposition::AlreadyHeld => {
				let name = candidate.map_or("That user", |user| user.name.as_str());
				self.notices.push(Level::Warn, format!("{name} already holds this property"));
			}
			AssignDisposition::Submit { user_id } => self.send_assign(property_id, user_id),
			AssignDisposition::NeedsConfirmation { proposal } => {
				self.rows.replace(property_id, RowState::ConfirmingReassign { proposal });
			}
		}
	}

	pub fn confirm_reassign(&mut self, property_id: i64) {
		let Some(RowState::ConfirmingReassign { proposal }) = self.rows.state(property_id) else {
			return;
		};
		let user_id = proposal.user_id;
		self.send_assign(property_id, user_id);
	}

	fn send_assign(&mut self, property_id: i64, user_id: i64) {
		if !self.in_flight.begin(TaskKey::Assign(property_id)) {
			return;
		}
		self.notices.begin(TaskKey::Assign(property_id), "Assigning property");
		let api = Arc::clone(&self.api);
		let tx = self.tx.clone();
		tokio::spawn(async move {
			let result = api.assign_property(user_id, property_id).await;
			let _ = tx.send(MutateMsg::Assigned { property_id, result }.into());
		});
	}

	// Deletion

	pub fn start_delete(&mut self, property_id: i64) {
		if !self.role().is_some_and(|role| role.can_delete()) {
			return;
		}
		if self.in_flight.busy_on(property_id) {
			return;
		}
		let Some(property) = self.store.property(property_id) else {
			return;
		};
		let prompt = rows::delete_prompt(property);
		self.rows.enter(property_id, RowState::ConfirmingDelete { prompt });
	}

	pub fn confirm_delete(&mut self, property_id: i64) {
		if !matches!(self.rows.state(property_id), Some(RowState::ConfirmingDelete { .. })) {
			return;
		}
		if !self.in_flight.begin(TaskKey::Delete(property_id)) {
			return;
		}
		self.notices.begin(TaskKey::Delete(property_id), "Deleting property");
		let api = Arc::clone(&self.api);
		let tx = self.tx.clone();
		tokio::spawn(async move {
			let result = api.delete_property(property_id, true).await;
			let _ = tx.send(MutateMsg::Deleted { property_id, result }.into());
		});
	}

	// Location quick-pick

	pub fn start_location(&mut self, property_id: i64) {
		if !self.role().is_some_and(|role| role.can_edit()) {
			return;
		}
		if self.in_flight.busy_on(property_id) {
			return;
		}
		if self.store.property(property_id).is_none() {
			return;
		}
		self.rows
			.enter(property_id, RowState::PickingLocation { picker: LocationPicker::default() });
	}

	pub fn confirm_location(&mut self, property_id: i64) {
		let Some(RowState::PickingLocation { picker }) = self.rows.state(property_id) else {
			return;
		};
		let Some(location) = picker.selection(&self.store.locations()) else {
			self.notices.push(Level::Warn, "Type or pick a location first");
			return;
		};
		if !self.in_flight.begin(TaskKey::SaveLocation(property_id)) {
			return;
		}
		self.notices.begin(TaskKey::SaveLocation(property_id), "Updating location");
		let api = Arc::clone(&self.api);
		let tx = self.tx.clone();
		tokio::spawn(async move {
			let result = api.update_location(property_id, &location).await;
			let _ = tx.send(MutateMsg::LocationSaved { property_id, result }.into());
		});
	}

	// Details form

	pub fn edit_details(&mut self) {
		if !self.role().is_some_and(|role| role.can_edit()) {
			return;
		}
		if let Some(view) = &mut self.details {
			view.begin_edit();
		}
	}

	pub fn cancel_details_edit(&mut self) {
		if let Some(view) = &mut self.details {
			view.cancel_edit();
		}
	}

	/// Core fields and acquisition metadata save as two parallel patches;
	/// the completion message carries the combined outcome.
	pub fn save_details(&mut self) {
		let Some(view) = &self.details else {
			return;
		};
		let property_id = view.property_id;
		let Some(draft) = view.draft() else {
			return;
		};
		let (payload, details) = match draft.build() {
			Ok(parts) => parts,
			Err(err) => {
				self.notices.push(Level::Error, err.to_string());
				return;
			}
		};
		if !self.in_flight.begin(TaskKey::SaveDetails(property_id)) {
			return;
		}
		self.notices.begin(TaskKey::SaveDetails(property_id), "Saving property");
		let api = Arc::clone(&self.api);
		let tx = self.tx.clone();
		tokio::spawn(async move {
			let result = tokio::try_join!(
				api.update_property(property_id, &payload),
				api.update_details(property_id, &details),
			)
			.map(|_| ());
			let _ = tx.send(MutateMsg::DetailsSaved { property_id, result }.into());
		});
	}

	// Review

	pub fn review(&mut self, request_id: i64, verdict: ReviewStatus) {
		if !self.role().is_some_and(|role| role.can_review_reassignments()) {
			return;
		}
		if self.approvals.get(request_id).is_none() {
			return;
		}
		if !self.in_flight.begin(TaskKey::Review(request_id)) {
			return;
		}
		let doing = match verdict {
			ReviewStatus::Approved => "Approving reassignment",
			ReviewStatus::Denied => "Denying reassignment",
			ReviewStatus::Pending => "Submitting review",
		};
		self.notices.begin(TaskKey::Review(request_id), doing);
		let api = Arc::clone(&self.api);
		let tx = self.tx.clone();
		tokio::spawn(async move {
			let result = api.review_reassignment(request_id, verdict).await;
			let _ = tx.send(ReviewMsg::Reviewed { request_id, verdict, result }.into());
		});
	}

	// Report export

	pub fn download_report(&mut self) {
		if !self.role().is_some_and(|role| role.can_edit()) {
			return;
		}
		if !self.in_flight.begin(TaskKey::Report) {
			return;
		}
		self.notices.begin(TaskKey::Report, "Generating report");
		let api = Arc::clone(&self.api);
		let tx = self.tx.clone();
		let dir = self.download_dir.clone();
		tokio::spawn(async move {
			let result = match api.download_report().await {
				Ok(bytes) => report::save(&dir, Local::now(), &bytes)
					.await
					.map_err(|err| format!("could not write the report: {err}")),
				Err(err) => Err(err.to_string()),
			};
			let _ = tx.send(LedgerMsg::ReportSaved(result));
		});
	}
}

fn persist_session(dir: &Path, signed: &SignIn) {
	let Some(token) = &signed.token else {
		tracing::debug!("sign-in response carried no token; session will not persist");
		return;
	};
	let session = Session::new(token.clone(), signed.user.clone());
	if let Err(err) = storage::save(dir, &session) {
		tracing::warn!("could not persist the session: {err}");
	}
}

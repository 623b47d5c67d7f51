//! The shared client state every screen renders from.
//!
//! One [`Ledger`] lives on the main loop. User intents mutate it and spawn
//! backend requests; completions come back as [`crate::msg::LedgerMsg`]
//! values which the loop applies between draws. Nothing here blocks.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use qm_api::{ApiClient, ApiError, ApiResult};
use qm_model::{Role, User};
use qm_session::storage;
use tokio_util::sync::CancellationToken;

use crate::approvals::Approvals;
use crate::badge;
use crate::details::DetailsView;
use crate::msg::{AuthMsg, LedgerSender, ListMsg, ReviewMsg};
use crate::notify::NotificationCenter;
use crate::rows::RowSet;
use crate::store::{PropertyStore, Snapshot};
use crate::tasks::{InFlight, TaskKey};

/// Authentication progress.
#[derive(Debug)]
pub enum Auth {
	/// A stored session is being validated against the backend.
	Resolving,
	SignedOut,
	SignedIn(User),
}

/// Which screen owns the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
	Login,
	Properties,
	Details,
	Approvals,
}

pub struct LedgerOptions {
	pub session_dir: PathBuf,
	pub download_dir: PathBuf,
	pub poll_interval: Duration,
	pub page_size: u32,
}

pub struct Ledger {
	pub(crate) api: Arc<ApiClient>,
	pub(crate) tx: LedgerSender,
	pub auth: Auth,
	pub view: View,
	pub store: PropertyStore,
	pub rows: RowSet,
	pub details: Option<DetailsView>,
	pub approvals: Approvals,
	pub notices: NotificationCenter,
	pub in_flight: InFlight,
	pub(crate) badge: Option<u64>,
	badge_poll: Option<CancellationToken>,
	pub(crate) session_dir: PathBuf,
	pub(crate) download_dir: PathBuf,
	poll_interval: Duration,
}

impl Ledger {
	pub fn new(api: ApiClient, tx: LedgerSender, options: LedgerOptions) -> Self {
		Self {
			api: Arc::new(api),
			tx,
			auth: Auth::Resolving,
			view: View::Login,
			store: PropertyStore::new(options.page_size),
			rows: RowSet::default(),
			details: None,
			approvals: Approvals::default(),
			notices: NotificationCenter::new(),
			in_flight: InFlight::default(),
			badge: None,
			badge_poll: None,
			session_dir: options.session_dir,
			download_dir: options.download_dir,
			poll_interval: options.poll_interval,
		}
	}

	pub fn user(&self) -> Option<&User> {
		match &self.auth {
			Auth::SignedIn(user) => Some(user),
			_ => None,
		}
	}

	pub fn role(&self) -> Option<Role> {
		self.user().map(|user| user.role)
	}

	/// Pending-approval count for the header badge, when polled.
	pub fn badge(&self) -> Option<u64> {
		self.badge
	}

	/// Validate any stored session in the background.
	pub fn resume(&mut self) {
		self.auth = Auth::Resolving;
		self.in_flight.begin(TaskKey::Auth);
		let api = Arc::clone(&self.api);
		let tx = self.tx.clone();
		let dir = self.session_dir.clone();
		tokio::spawn(async move {
			let result = restore_session(&api, &dir).await;
			let _ = tx.send(AuthMsg::SessionResumed(result).into());
		});
	}

	/// On a successful sign-in: land on the table and, for reviewers,
	/// start the badge poller.
	pub(crate) fn enter_signed_in(&mut self, user: User) {
		self.start_badge_poll(&user);
		self.auth = Auth::SignedIn(user);
		self.view = View::Properties;
	}

	/// Drop everything account-scoped and return to the login screen.
	pub(crate) fn reset_to_login(&mut self) {
		self.stop_badge_poll();
		self.auth = Auth::SignedOut;
		self.view = View::Login;
		self.details = None;
		self.store.reset();
		self.rows.clear_all();
		self.approvals.reset();
		self.in_flight.clear();
	}

	/// Refresh whatever the active view shows. The event loop calls this
	/// once per drained batch when any applied message asked for it.
	pub fn refresh_current(&mut self) {
		match self.view {
			View::Login => {}
			View::Properties => self.refresh_properties(),
			View::Details => self.refresh_details(),
			View::Approvals => self.refresh_approvals(),
		}
	}

	pub(crate) fn refresh_properties(&mut self) {
		let Some(user) = self.user() else { return };
		let role = user.role;
		let user_id = user.id;
		let generation = self.store.begin();
		let page = self.store.page();
		let page_size = self.store.page_size();
		let api = Arc::clone(&self.api);
		let tx = self.tx.clone();
		tokio::spawn(async move {
			let result = fetch_snapshot(&api, role, user_id, page, page_size).await;
			let _ = tx.send(ListMsg::Store { generation, result }.into());
		});
	}

	pub(crate) fn refresh_details(&mut self) {
		let Some(details) = &mut self.details else { return };
		let property_id = details.property_id;
		let generation = details.begin();
		let api = Arc::clone(&self.api);
		let tx = self.tx.clone();
		tokio::spawn(async move {
			let result = api.property_details(property_id).await;
			let _ = tx.send(ListMsg::Details { property_id, generation, result }.into());
		});
	}

	pub(crate) fn refresh_approvals(&mut self) {
		let generation = self.approvals.begin();
		let api = Arc::clone(&self.api);
		let tx = self.tx.clone();
		tokio::spawn(async move {
			let result = api.pending_reassignments().await;
			let _ = tx.send(ReviewMsg::Loaded { generation, result }.into());
		});
	}

	/// One-shot badge refresh, used when the terminal regains focus so the
	/// count catches up without waiting out the poll interval.
	pub fn refresh_badge(&self) {
		let Some(user) = self.user() else { return };
		if !user.role.can_review_reassignments() {
			return;
		}
		let api = Arc::clone(&self.api);
		let tx = self.tx.clone();
		tokio::spawn(async move {
			match api.pending_count().await {
				Ok(count) => {
					let _ = tx.send(ReviewMsg::BadgeCount(count).into());
				}
				Err(err) => tracing::debug!("badge refresh failed: {err}"),
			}
		});
	}

	fn start_badge_poll(&mut self, user: &User) {
		self.stop_badge_poll();
		if !user.role.can_review_reassignments() {
			return;
		}
		let token = CancellationToken::new();
		let api = Arc::clone(&self.api);
		badge::spawn(
			self.poll_interval,
			token.clone(),
			move || {
				let api = Arc::clone(&api);
				async move { api.pending_count().await }
			},
			self.tx.clone(),
		);
		self.badge_poll = Some(token);
	}

	fn stop_badge_poll(&mut self) {
		if let Some(token) = self.badge_poll.take() {
			token.cancel();
		}
		self.badge = None;
	}
}

async fn restore_session(api: &ApiClient, dir: &Path) -> Result<Option<User>, ApiError> {
	let session = match storage::load(dir) {
		Ok(Some(session)) => session,
		Ok(None) => return Ok(None),
		Err(err) => {
			tracing::warn!("ignoring unreadable session file: {err}");
			return Ok(None);
		}
	};
	api.set_token(Some(session.token));
	match api.current_user().await {
		Ok(user) => Ok(Some(user)),
		Err(err) if err.is_unauthorized() => {
			// The stored token no longer works; forget it so the next
			// start goes straight to the login screen.
			api.set_token(None);
			if let Err(clear_err) = storage::clear(dir) {
				tracing::warn!("could not discard the stale session: {clear_err}");
			}
			Err(err)
		}
		Err(err) => Err(err),
	}
}

/// The table needs the page of properties plus whichever accounts the
/// actor may assign to, fetched together so one snapshot stays coherent.
async fn fetch_snapshot(
	api: &ApiClient,
	role: Role,
	user_id: i64,
	page: u32,
	page_size: u32,
) -> ApiResult<Snapshot> {
	if !role.sees_full_inventory() {
		let items = api.list_staff_properties(user_id).await?;
		return Ok(Snapshot { items, meta: None, users: Vec::new() });
	}
	let ((items, meta), users) =
		tokio::try_join!(api.list_properties(page, page_size), assignable_users(api, role))?;
	Ok(Snapshot { items, meta: Some(meta), users })
}

async fn assignable_users(api: &ApiClient, role: Role) -> ApiResult<Vec<User>> {
	match role.assignable_role() {
		Some(Role::Staff) => api.list_staff().await,
		Some(target) => api.list_users_with_role(target).await,
		None => Ok(Vec::new()),
	}
}

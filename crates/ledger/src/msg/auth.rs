//! Sign-in, sign-up, and session lifecycle messages.

use qm_api::{ApiError, SignIn};
use qm_model::User;

use super::Dirty;
use crate::notify::Level;
use crate::tasks::TaskKey;
use crate::{Auth, Ledger, View};

#[derive(Debug)]
pub enum AuthMsg {
	/// Stored-session validation finished. `Ok(None)` means there was no
	/// usable session to restore; errors mean there was one but it no
	/// longer works or could not be checked.
	SessionResumed(Result<Option<User>, ApiError>),
	SignedIn(Result<SignIn, ApiError>),
	SignedUp(Result<(), ApiError>),
	/// Local sign-out finished; the backend call may or may not have
	/// succeeded, the local session is gone either way.
	SignedOut,
}

impl AuthMsg {
	pub fn apply(self, ledger: &mut Ledger) -> Dirty {
		match self {
			Self::SessionResumed(result) => session_resumed(ledger, result),
			Self::SignedIn(result) => signed_in(ledger, result),
			Self::SignedUp(result) => signed_up(ledger, result),
			Self::SignedOut => {
				ledger.reset_to_login();
				ledger.notices.clear();
				ledger.notices.push(Level::Info, "Signed out");
				Dirty::REDRAW
			}
		}
	}
}

fn session_resumed(ledger: &mut Ledger, result: Result<Option<User>, ApiError>) -> Dirty {
	ledger.in_flight.finish(TaskKey::Auth);
	match result {
		Ok(Some(user)) => {
			ledger.enter_signed_in(user);
			Dirty::REFETCH
		}
		Ok(None) => {
			ledger.auth = Auth::SignedOut;
			ledger.view = View::Login;
			Dirty::REDRAW
		}
		Err(err) => {
			ledger.auth = Auth::SignedOut;
			ledger.view = View::Login;
			let message = if err.is_unauthorized() {
				"Session expired, sign in again".to_owned()
			} else {
				format!("Couldn't restore the session: {err}")
			};
			ledger.notices.push(Level::Warn, message);
			Dirty::REDRAW
		}
	}
}

fn signed_in(ledger: &mut Ledger, result: Result<SignIn, ApiError>) -> Dirty {
	ledger.in_flight.finish(TaskKey::Auth);
	match result {
		Ok(signed) => {
			ledger.notices.resolve(
				TaskKey::Auth,
				Level::Success,
				format!("Signed in as {}", signed.user.name),
			);
			ledger.enter_signed_in(signed.user);
			Dirty::REFETCH
		}
		Err(err) => {
			ledger.notices.resolve(TaskKey::Auth, Level::Error, err.to_string());
			Dirty::REDRAW
		}
	}
}

fn signed_up(ledger: &mut Ledger, result: Result<(), ApiError>) -> Dirty {
	ledger.in_flight.finish(TaskKey::Auth);
	match result {
		Ok(()) => ledger.notices.resolve(
			TaskKey::Auth,
			Level::Success,
			"Account created, sign in with your new credentials",
		),
		Err(err) => ledger.notices.resolve(TaskKey::Auth, Level::Error, err.to_string()),
	}
	Dirty::REDRAW
}

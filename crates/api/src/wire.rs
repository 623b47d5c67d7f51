//! Response decoding, kept separate from transport.
//!
//! Every function here takes the HTTP status plus the raw body text and
//! produces a typed result, so the interesting branching (error bodies,
//! deferred-approval statuses, soft confirmations) is testable without a
//! server. The client module is the only place that touches the network.

use qm_model::{PageMeta, Property, ReassignmentRequest, User};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};

/// Result of POST /properties/assign. The backend signals "queued for
/// approval" with 202 on the same endpoint it uses for immediate grants,
/// so the status code is part of the contract, not an implementation
/// detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
	Assigned { message: String },
	Queued { message: String },
}

impl AssignOutcome {
	pub fn message(&self) -> &str {
		match self {
			AssignOutcome::Assigned { message } | AssignOutcome::Queued { message } => message,
		}
	}

	/// Queued outcomes left the holder unchanged; only the pending marker
	/// moved. Callers word their feedback accordingly.
	pub fn is_queued(&self) -> bool {
		matches!(self, AssignOutcome::Queued { .. })
	}
}

/// Result of DELETE /properties/:id. Deleting an assigned property is a
/// two-step handshake: the first call comes back as a soft confirmation
/// prompt rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
	Deleted,
	NeedsConfirmation { message: String },
}

/// Successful sign-in payload. Older deployments return the bearer token
/// in the body; newer ones set a cookie and omit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignIn {
	pub token: Option<String>,
	pub user: User,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
	data: T,
}

#[derive(Deserialize)]
struct PageEnvelope {
	data: Vec<Property>,
	meta: Option<PageMeta>,
}

#[derive(Deserialize)]
struct MessageBody {
	message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteBody {
	requires_confirmation: Option<bool>,
	message: Option<String>,
}

#[derive(Deserialize)]
struct CountBody {
	count: u64,
}

#[derive(Deserialize)]
struct UserHolder {
	user: User,
}

#[derive(Deserialize)]
struct SignInBody {
	data: SignInData,
}

#[derive(Deserialize)]
struct SignInData {
	token: Option<String>,
	user: User,
}

fn ok(status: u16) -> bool {
	(200..300).contains(&status)
}

/// Map a non-success response to a typed error, preferring the server's
/// own `message` (or legacy `error`) field over a synthesized one.
pub fn fail(status: u16, body: &str) -> ApiError {
	let message = serde_json::from_str::<serde_json::Value>(body)
		.ok()
		.and_then(|v| {
			v.get("message")
				.and_then(|m| m.as_str())
				.or_else(|| v.get("error")?.as_str())
				.map(str::to_owned)
		})
		.unwrap_or_else(|| format!("request failed with status {status}"));
	ApiError::Status { status, message }
}

fn parse<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
	serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Decode a `{data: T}` envelope, tolerating extra fields like `success`.
pub fn decode_data<T: DeserializeOwned>(status: u16, body: &str) -> ApiResult<T> {
	if !ok(status) {
		return Err(fail(status, body));
	}
	parse::<DataEnvelope<T>>(body).map(|e| e.data)
}

/// Decode the paged collection listing. A response without `meta` is
/// treated as a single full page.
pub fn decode_page(status: u16, body: &str) -> ApiResult<(Vec<Property>, PageMeta)> {
	if !ok(status) {
		return Err(fail(status, body));
	}
	let envelope: PageEnvelope = parse(body)?;
	let meta = envelope
		.meta
		.unwrap_or_else(|| PageMeta::single_page(envelope.data.len()));
	Ok((envelope.data, meta))
}

pub fn decode_assign(status: u16, body: &str) -> ApiResult<AssignOutcome> {
	if !ok(status) {
		return Err(fail(status, body));
	}
	let message = parse::<MessageBody>(body).ok().and_then(|b| b.message);
	if status == 202 {
		Ok(AssignOutcome::Queued {
			message: message.unwrap_or_else(|| "Reassignment submitted for approval".into()),
		})
	} else {
		Ok(AssignOutcome::Assigned {
			message: message.unwrap_or_else(|| "Property assigned".into()),
		})
	}
}

pub fn decode_delete(status: u16, body: &str) -> ApiResult<DeleteOutcome> {
	if !ok(status) {
		return Err(fail(status, body));
	}
	let parsed = parse::<DeleteBody>(body).unwrap_or(DeleteBody {
		requires_confirmation: None,
		message: None,
	});
	if parsed.requires_confirmation == Some(true) {
		Ok(DeleteOutcome::NeedsConfirmation {
			message: parsed
				.message
				.unwrap_or_else(|| "This property is assigned. Confirm to delete it anyway.".into()),
		})
	} else {
		Ok(DeleteOutcome::Deleted)
	}
}

pub fn decode_count(status: u16, body: &str) -> ApiResult<u64> {
	if !ok(status) {
		return Err(fail(status, body));
	}
	parse::<CountBody>(body).map(|b| b.count)
}

pub fn decode_sign_in(status: u16, body: &str) -> ApiResult<SignIn> {
	if !ok(status) {
		return Err(fail(status, body));
	}
	let parsed: SignInBody = parse(body)?;
	Ok(SignIn { token: parsed.data.token, user: parsed.data.user })
}

/// Decode the `{data: {user}}` shape served by /auth/me.
pub fn decode_current_user(status: u16, body: &str) -> ApiResult<User> {
	decode_data::<UserHolder>(status, body).map(|h| h.user)
}

pub fn decode_pending(status: u16, body: &str) -> ApiResult<Vec<ReassignmentRequest>> {
	decode_data(status, body)
}

/// Accept any success status, discarding the body.
pub fn decode_unit(status: u16, body: &str) -> ApiResult<()> {
	if ok(status) { Ok(()) } else { Err(fail(status, body)) }
}

//! HTTP transport for the quartermaster backend.
//!
//! One method per endpoint, each a single attempt with no retries or
//! caching. All response interpretation lives in [`crate::wire`].

use std::time::Duration;

use parking_lot::RwLock;
use qm_model::{
	PageMeta, Property, PropertyDetails, PropertyPayload, PropertyWithDetails,
	ReassignmentRequest, ReviewStatus, Role, User,
};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::wire::{self, AssignOutcome, DeleteOutcome, SignIn};

/// Fields for creating an account. Role and department are only honored
/// by the backend when the caller is privileged; self-registration
/// ignores them.
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
	pub name: String,
	pub email: String,
	pub password: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub role: Option<Role>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub department: Option<String>,
}

/// Shared client holding the base URL and the current bearer token.
///
/// Cheap to clone behind an `Arc`; the token is interior-mutable so a
/// sign-in on one task is visible to every holder.
pub struct ApiClient {
	http: Client,
	base: String,
	token: RwLock<Option<String>>,
}

impl ApiClient {
	pub fn new(base_url: &str) -> ApiResult<Self> {
		let http = Client::builder()
			.timeout(Duration::from_secs(30))
			.build()
			.map_err(|e| ApiError::Network(e.to_string()))?;

		Ok(Self {
			http,
			base: base_url.trim_end_matches('/').to_owned(),
			token: RwLock::new(None),
		})
	}

	pub fn set_token(&self, token: Option<String>) {
		*self.token.write() = token;
	}

	pub fn has_token(&self) -> bool {
		self.token.read().is_some()
	}

	fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
		let token = self.token.read().clone();
		let mut builder = self.http.request(method, format!("{}{path}", self.base));
		if let Some(token) = token {
			builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
		}
		builder
	}

	async fn exchange(path: &str, request: reqwest::RequestBuilder) -> ApiResult<(u16, String)> {
		let response = request.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
		let status = response.status().as_u16();
		let body = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
		tracing::debug!(path, status, "backend response");
		Ok((status, body))
	}

	async fn get(&self, path: &str) -> ApiResult<(u16, String)> {
		Self::exchange(path, self.request(Method::GET, path)).await
	}

	async fn send<B: Serialize + ?Sized>(
		&self,
		method: Method,
		path: &str,
		body: &B,
	) -> ApiResult<(u16, String)> {
		Self::exchange(path, self.request(method, path).json(body)).await
	}

	// Properties

	pub async fn list_properties(
		&self,
		page: u32,
		page_size: u32,
	) -> ApiResult<(Vec<Property>, PageMeta)> {
		let (status, body) =
			self.get(&format!("/properties?page={page}&pageSize={page_size}")).await?;
		wire::decode_page(status, &body)
	}

	/// Properties currently assigned to one user. This is the whole view a
	/// staff account gets.
	pub async fn list_staff_properties(&self, user_id: i64) -> ApiResult<Vec<Property>> {
		let (status, body) = self.get(&format!("/properties/staff/{user_id}")).await?;
		wire::decode_data(status, &body)
	}

	pub async fn property_details(&self, property_id: i64) -> ApiResult<PropertyWithDetails> {
		let (status, body) = self.get(&format!("/properties/{property_id}/details")).await?;
		wire::decode_data(status, &body)
	}

	pub async fn add_property(&self, payload: &PropertyPayload) -> ApiResult<()> {
		#[derive(Serialize)]
		struct Body<'a> {
			property: &'a PropertyPayload,
		}

		let (status, body) =
			self.send(Method::POST, "/properties/add", &Body { property: payload }).await?;
		wire::decode_unit(status, &body)
	}

	pub async fn update_property(
		&self,
		property_id: i64,
		payload: &PropertyPayload,
	) -> ApiResult<()> {
		#[derive(Serialize)]
		struct Body<'a> {
			property: &'a PropertyPayload,
		}

		let path = format!("/properties/update/{property_id}");
		let (status, body) =
			self.send(Method::PATCH, &path, &Body { property: payload }).await?;
		wire::decode_unit(status, &body)
	}

	pub async fn update_details(
		&self,
		property_id: i64,
		details: &PropertyDetails,
	) -> ApiResult<()> {
		#[derive(Serialize)]
		struct Body<'a> {
			details: &'a PropertyDetails,
		}

		let path = format!("/properties/{property_id}/details");
		let (status, body) = self.send(Method::PATCH, &path, &Body { details }).await?;
		wire::decode_unit(status, &body)
	}

	pub async fn update_location(&self, property_id: i64, location: &str) -> ApiResult<()> {
		#[derive(Serialize)]
		struct Location<'a> {
			location_detail: &'a str,
		}
		#[derive(Serialize)]
		struct Body<'a> {
			property: Location<'a>,
		}

		let path = format!("/properties/{property_id}/location-detail");
		let body = Body { property: Location { location_detail: location } };
		let (status, body) = self.send(Method::PATCH, &path, &body).await?;
		wire::decode_unit(status, &body)
	}

	/// Even a confirmed delete can come back as
	/// [`DeleteOutcome::NeedsConfirmation`] when the server wants its own
	/// warning shown, so callers must be ready to re-prompt.
	pub async fn delete_property(
		&self,
		property_id: i64,
		confirmed: bool,
	) -> ApiResult<DeleteOutcome> {
		#[derive(Serialize)]
		struct Body {
			confirmed: bool,
		}

		let path = format!("/properties/{property_id}");
		let (status, body) = self.send(Method::DELETE, &path, &Body { confirmed }).await?;
		wire::decode_delete(status, &body)
	}

	pub async fn assign_property(
		&self,
		user_id: i64,
		property_id: i64,
	) -> ApiResult<AssignOutcome> {
		#[derive(Serialize)]
		#[serde(rename_all = "camelCase")]
		struct Body {
			user_id: i64,
			property_id: i64,
		}

		let (status, body) = self
			.send(Method::POST, "/properties/assign", &Body { user_id, property_id })
			.await?;
		wire::decode_assign(status, &body)
	}

	// Reassignment review

	pub async fn pending_reassignments(&self) -> ApiResult<Vec<ReassignmentRequest>> {
		let (status, body) = self.get("/properties/reassignments/pending").await?;
		wire::decode_pending(status, &body)
	}

	pub async fn pending_count(&self) -> ApiResult<u64> {
		let (status, body) = self.get("/properties/reassignments/pending/count").await?;
		wire::decode_count(status, &body)
	}

	pub async fn review_reassignment(
		&self,
		request_id: i64,
		verdict: ReviewStatus,
	) -> ApiResult<()> {
		#[derive(Serialize)]
		#[serde(rename_all = "camelCase")]
		struct Body {
			request_id: i64,
			new_status: ReviewStatus,
		}

		let (status, body) = self
			.send(
				Method::POST,
				"/properties/reassignments/review",
				&Body { request_id, new_status: verdict },
			)
			.await?;
		wire::decode_unit(status, &body)
	}

	/// Fetch the inventory report as raw PDF bytes. Generation can take a
	/// while, so this call gets a longer deadline than the rest.
	pub async fn download_report(&self) -> ApiResult<Vec<u8>> {
		let response = self
			.request(Method::GET, "/properties/report")
			.timeout(Duration::from_secs(120))
			.send()
			.await
			.map_err(|e| ApiError::Network(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(wire::fail(status.as_u16(), &body));
		}

		let bytes = response.bytes().await.map_err(|e| ApiError::Network(e.to_string()))?;
		tracing::debug!(len = bytes.len(), "report downloaded");
		Ok(bytes.to_vec())
	}

	// Users

	pub async fn list_staff(&self) -> ApiResult<Vec<User>> {
		let (status, body) = self.get("/users/staff").await?;
		wire::decode_data(status, &body)
	}

	pub async fn list_users_with_role(&self, role: Role) -> ApiResult<Vec<User>> {
		let (status, body) = self.get(&format!("/users?roles={role}")).await?;
		wire::decode_data(status, &body)
	}

	// Auth

	pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<SignIn> {
		#[derive(Serialize)]
		struct Body<'a> {
			email: &'a str,
			password: &'a str,
		}

		let (status, body) =
			self.send(Method::POST, "/auth/sign-in", &Body { email, password }).await?;
		let signed = wire::decode_sign_in(status, &body)?;
		self.set_token(signed.token.clone());
		Ok(signed)
	}

	pub async fn sign_up(&self, account: &NewAccount) -> ApiResult<()> {
		let (status, body) = self.send(Method::POST, "/auth/sign-up", account).await?;
		wire::decode_unit(status, &body)
	}

	pub async fn sign_out(&self) -> ApiResult<()> {
		let path = "/auth/sign-out";
		let (status, body) = Self::exchange(path, self.request(Method::POST, path)).await?;
		wire::decode_unit(status, &body)
	}

	/// Validate a stored token and fetch the account it belongs to.
	pub async fn current_user(&self) -> ApiResult<User> {
		let (status, body) = self.get("/auth/me").await?;
		wire::decode_current_user(status, &body)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn base_url_trailing_slash_is_normalized() {
		let client = ApiClient::new("http://localhost:4000/api/").unwrap();
		assert_eq!(client.base, "http://localhost:4000/api");
	}

	#[test]
	fn token_round_trip() {
		let client = ApiClient::new("http://localhost:4000/api").unwrap();
		assert!(!client.has_token());
		client.set_token(Some("jwt-abc".into()));
		assert!(client.has_token());
		client.set_token(None);
		assert!(!client.has_token());
	}

	#[test]
	fn new_account_omits_unset_fields() {
		let account = NewAccount {
			name: "A. Reyes".into(),
			email: "reyes@example.edu".into(),
			password: "hunter2!".into(),
			role: None,
			department: None,
		};
		let json = serde_json::to_value(&account).unwrap();
		assert!(json.get("role").is_none());
		assert!(json.get("department").is_none());

		let account = NewAccount { role: Some(Role::PropertyCustodian), ..account };
		let json = serde_json::to_value(&account).unwrap();
		assert_eq!(json["role"], "property_custodian");
	}
}

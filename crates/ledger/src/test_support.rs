//! Shared fixtures for in-crate tests.

use std::time::Duration;

use qm_api::ApiClient;
use qm_model::{Property, ReassignmentRequest, Role, User};

use crate::msg::{self, LedgerReceiver};
use crate::{Ledger, LedgerOptions};

/// A ledger wired to a dead endpoint. Spawned requests fail fast, and the
/// receiver half is handed back so their completion sends do not error.
pub(crate) fn ledger() -> (Ledger, LedgerReceiver) {
	let (tx, rx) = msg::channel();
	let api = ApiClient::new("http://127.0.0.1:9/api").unwrap();
	let dir = std::env::temp_dir().join("qm-ledger-tests");
	let options = LedgerOptions {
		session_dir: dir.clone(),
		download_dir: dir,
		poll_interval: Duration::from_secs(30),
		page_size: 10,
	};
	(Ledger::new(api, tx, options), rx)
}

pub(crate) fn user(id: i64, name: &str, role: Role) -> User {
	User {
		id,
		name: name.into(),
		email: format!("user{id}@example.edu"),
		role,
		department: Some("Records".into()),
	}
}

pub(crate) fn property(id: i64, assigned_to: Option<&str>) -> Property {
	serde_json::from_value(serde_json::json!({
		"id": id,
		"propertyNo": format!("2024-01-{id:04}"),
		"description": "Document scanner",
		"quantity": 1,
		"value": 18500.0,
		"serialNo": format!("SCN-{id}"),
		"assignedTo": assigned_to,
	}))
	.unwrap()
}

pub(crate) fn request(request_id: i64, property_id: i64) -> ReassignmentRequest {
	serde_json::from_value(serde_json::json!({
		"requestId": request_id,
		"property": property(property_id, Some("A. Reyes")),
		"fromStaff": user(11, "A. Reyes", Role::Staff),
		"toStaff": user(12, "B. Santos", Role::Staff),
		"requestedBy": user(7, "R. Campos", Role::PropertyCustodian),
		"status": "pending",
	}))
	.unwrap()
}

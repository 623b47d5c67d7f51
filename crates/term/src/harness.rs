//! Shared fixtures for input and rendering tests.
//!
//! The ledger is wired to a dead endpoint: spawned requests fail quietly
//! and tests assert on state transitions, never on network traffic.

use std::time::Duration;

use qm_api::ApiClient;
use qm_ledger::{Auth, Ledger, LedgerOptions, LedgerSender, Snapshot, View, msg};
use qm_model::{PageMeta, Property, ReassignmentRequest, ReviewStatus, Role, User};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use crate::app::App;

pub fn app() -> (App, LedgerSender) {
	let api = ApiClient::new("http://127.0.0.1:9/api").unwrap();
	let (tx, rx) = msg::channel();
	let scratch = std::env::temp_dir().join("qm-term-tests");
	let options = LedgerOptions {
		session_dir: scratch.clone(),
		download_dir: scratch,
		poll_interval: Duration::from_secs(60),
		page_size: 10,
	};
	let ledger = Ledger::new(api, tx.clone(), options);
	(App::new(ledger, rx), tx)
}

pub fn signed_in(role: Role) -> (App, LedgerSender) {
	let (mut app, tx) = app();
	app.ledger.auth = Auth::SignedIn(user(99, "C. Tan", role));
	app.ledger.view = View::Properties;
	(app, tx)
}

pub fn user(id: i64, name: &str, role: Role) -> User {
	serde_json::from_value(serde_json::json!({
		"id": id,
		"name": name,
		"email": format!("user{id}@example.edu"),
		"role": role,
	}))
	.unwrap()
}

pub fn property(id: i64, property_no: &str, assigned_to: Option<&str>) -> Property {
	serde_json::from_value(serde_json::json!({
		"id": id,
		"propertyNo": property_no,
		"description": "Lab oscilloscope",
		"quantity": 1,
		"value": 1500.5,
		"serialNo": format!("SN-{id:04}"),
		"category": "Annex A",
		"assignedTo": assigned_to,
		"location_detail": "Science Hall 2F",
	}))
	.unwrap()
}

pub fn request(request_id: i64, property_id: i64) -> ReassignmentRequest {
	ReassignmentRequest {
		request_id,
		property: property(property_id, &format!("P-{property_id}"), Some("A. Reyes")),
		from_staff: user(11, "A. Reyes", Role::Staff),
		to_staff: user(12, "B. Santos", Role::Staff),
		requested_by: user(2, "R. Campos", Role::PropertyCustodian),
		status: ReviewStatus::Pending,
		created_at: "2025-02-11T06:40:00Z".parse().ok(),
	}
}

/// Draw one frame into a test buffer and return it as a text grid.
pub fn render(app: &App) -> String {
	let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
	terminal.draw(|frame| crate::ui::draw(frame, app)).unwrap();
	let buffer = terminal.backend().buffer();
	let mut out = String::new();
	for y in 0..buffer.area.height {
		for x in 0..buffer.area.width {
			out.push_str(buffer.cell((x, y)).map(|cell| cell.symbol()).unwrap_or(" "));
		}
		out.push('\n');
	}
	out
}

/// Land a snapshot in the table as if a fetch had completed.
pub fn seed(app: &mut App, items: Vec<Property>, users: Vec<User>) {
	let generation = app.ledger.store.begin();
	let meta = PageMeta {
		page: 1,
		page_size: 10,
		page_count: 1,
		total_count: items.len() as u64,
	};
	let snapshot = Snapshot { items, meta: Some(meta), users };
	app.ledger.store.apply(generation, Ok(snapshot));
}

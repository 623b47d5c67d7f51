//! Keyboard routing.
//!
//! Keys are interpreted against the active view and, on the table, the
//! selected row's mode. Routing only decides which intent a keypress
//! expresses; the ledger enforces role gates and in-flight guards, so an
//! unauthorized key simply does nothing.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use qm_ledger::{Auth, RowState, View};
use qm_model::{PropertyDraft, ReviewStatus};

use crate::app::App;
use crate::ui::{details, table};

pub fn handle_key(app: &mut App, key: KeyEvent) {
	if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
		app.quit();
		return;
	}
	match app.ledger.view {
		View::Login => login(app, key),
		View::Properties => properties(app, key),
		View::Details => details_screen(app, key),
		View::Approvals => approvals(app, key),
	}
}

fn login(app: &mut App, key: KeyEvent) {
	if matches!(app.ledger.auth, Auth::Resolving) {
		// Session restore is in flight; only bailing out makes sense.
		if key.code == KeyCode::Esc {
			app.quit();
		}
		return;
	}
	match key.code {
		KeyCode::Esc => app.quit(),
		KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => app.ui.login.toggle(),
		KeyCode::Enter => app.ledger.sign_in(&app.ui.login.email, &app.ui.login.password),
		KeyCode::Backspace => app.ui.login.backspace(),
		KeyCode::Char(c) => app.ui.login.push_char(c),
		_ => {}
	}
}

/// Row mode of the selected property, copied out so the borrow on the row
/// set ends before any handler mutates the ledger.
#[derive(Clone, Copy)]
enum RowMode {
	Browse,
	Edit,
	Assign,
	ConfirmReassign,
	ConfirmDelete,
	Location,
}

fn properties(app: &mut App, key: KeyEvent) {
	// The synthetic add row is modal while it is open.
	if app.ledger.rows.add_draft().is_some() {
		add_row(app, key);
		return;
	}
	let selected = app.ui.table.selected(app.ledger.store.items()).map(|property| property.id);
	let mode = match selected {
		None => RowMode::Browse,
		Some(id) => match app.ledger.rows.state(id) {
			None => RowMode::Browse,
			Some(RowState::Editing { .. }) => RowMode::Edit,
			Some(RowState::Assigning { .. }) => RowMode::Assign,
			Some(RowState::ConfirmingReassign { .. }) => RowMode::ConfirmReassign,
			Some(RowState::ConfirmingDelete { .. }) => RowMode::ConfirmDelete,
			Some(RowState::PickingLocation { .. }) => RowMode::Location,
		},
	};
	match (mode, selected) {
		(RowMode::Browse, selected) => browse(app, key, selected),
		(RowMode::Edit, Some(id)) => edit_row(app, key, id),
		(RowMode::Assign, Some(id)) => assign_picker(app, key, id),
		(RowMode::ConfirmReassign, Some(id)) => confirm_reassign(app, key, id),
		(RowMode::ConfirmDelete, Some(id)) => confirm_delete(app, key, id),
		(RowMode::Location, Some(id)) => location_picker(app, key, id),
		_ => {}
	}
}

fn browse(app: &mut App, key: KeyEvent, selected: Option<i64>) {
	match key.code {
		KeyCode::Char('q') => app.quit(),
		KeyCode::Up | KeyCode::Char('k') => app.ui.table.move_up(),
		KeyCode::Down | KeyCode::Char('j') => {
			app.ui.table.move_down(app.ledger.store.items().len());
		}
		KeyCode::Left => app.ledger.prev_page(),
		KeyCode::Right => app.ledger.next_page(),
		KeyCode::Enter => {
			if let Some(id) = selected {
				app.ledger.open_details(id);
			}
		}
		KeyCode::Char('n') => {
			app.ui.table.field = 0;
			app.ledger.start_add();
		}
		KeyCode::Char('e') => {
			if let Some(id) = selected {
				app.ui.table.field = 0;
				app.ledger.start_edit(id);
			}
		}
		KeyCode::Char('a') => {
			if let Some(id) = selected {
				app.ledger.start_assign(id);
			}
		}
		KeyCode::Char('d') => {
			if let Some(id) = selected {
				app.ledger.start_delete(id);
			}
		}
		KeyCode::Char('l') => {
			if let Some(id) = selected {
				app.ledger.start_location(id);
			}
		}
		KeyCode::Char('g') => app.ledger.download_report(),
		KeyCode::Char('v') => app.ledger.open_approvals(),
		KeyCode::Char('r') => app.ledger.refresh_current(),
		KeyCode::Char('o') => {
			app.ui.login = Default::default();
			app.ledger.sign_out();
		}
		_ => {}
	}
}

fn add_row(app: &mut App, key: KeyEvent) {
	match key.code {
		KeyCode::Esc => app.ledger.cancel_add(),
		KeyCode::Enter => app.ledger.save_add(),
		KeyCode::Tab => app.ui.table.next_field(),
		KeyCode::BackTab => app.ui.table.prev_field(),
		code => {
			let field = app.ui.table.field;
			if let Some(draft) = app.ledger.rows.add_draft_mut() {
				draft_key(draft, field, code);
			}
		}
	}
}

fn edit_row(app: &mut App, key: KeyEvent, property_id: i64) {
	match key.code {
		KeyCode::Esc => app.ledger.cancel_row(property_id),
		KeyCode::Enter => app.ledger.save_edit(property_id),
		KeyCode::Tab => app.ui.table.next_field(),
		KeyCode::BackTab => app.ui.table.prev_field(),
		code => {
			let field = app.ui.table.field;
			if let Some(RowState::Editing { draft }) = app.ledger.rows.state_mut(property_id) {
				draft_key(draft, field, code);
			}
		}
	}
}

/// Typing into an inline add/edit row. The category slot cycles through
/// the annex values instead of taking text.
fn draft_key(draft: &mut PropertyDraft, field: usize, code: KeyCode) {
	if field == table::CATEGORY_FIELD {
		if matches!(code, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) {
			draft.category = draft.category.cycled();
		}
		return;
	}
	match code {
		KeyCode::Backspace => {
			if let Some(text) = table::draft_text_mut(draft, field) {
				text.pop();
			}
		}
		KeyCode::Char(c) => {
			if let Some(text) = table::draft_text_mut(draft, field) {
				text.push(c);
			}
		}
		_ => {}
	}
}

fn assign_picker(app: &mut App, key: KeyEvent, property_id: i64) {
	match key.code {
		KeyCode::Esc => app.ledger.cancel_row(property_id),
		KeyCode::Enter => app.ledger.confirm_pick(property_id),
		KeyCode::Down => {
			let len = match app.ledger.rows.state(property_id) {
				Some(RowState::Assigning { picker }) => {
					picker.filtered(app.ledger.store.users()).len()
				}
				_ => return,
			};
			if let Some(RowState::Assigning { picker }) = app.ledger.rows.state_mut(property_id) {
				picker.move_down(len);
			}
		}
		code => {
			if let Some(RowState::Assigning { picker }) = app.ledger.rows.state_mut(property_id) {
				match code {
					KeyCode::Up => picker.move_up(),
					KeyCode::Backspace => picker.backspace(),
					KeyCode::Char(c) => picker.push_char(c),
					_ => {}
				}
			}
		}
	}
}

fn location_picker(app: &mut App, key: KeyEvent, property_id: i64) {
	match key.code {
		KeyCode::Esc => app.ledger.cancel_row(property_id),
		KeyCode::Enter => app.ledger.confirm_location(property_id),
		KeyCode::Down => {
			let options = app.ledger.store.locations();
			let len = match app.ledger.rows.state(property_id) {
				Some(RowState::PickingLocation { picker }) => picker.filtered(&options).len(),
				_ => return,
			};
			if let Some(RowState::PickingLocation { picker }) =
				app.ledger.rows.state_mut(property_id)
			{
				picker.move_down(len);
			}
		}
		code => {
			if let Some(RowState::PickingLocation { picker }) =
				app.ledger.rows.state_mut(property_id)
			{
				match code {
					KeyCode::Up => picker.move_up(),
					KeyCode::Backspace => picker.backspace(),
					KeyCode::Char(c) => picker.push_char(c),
					_ => {}
				}
			}
		}
	}
}

fn confirm_reassign(app: &mut App, key: KeyEvent, property_id: i64) {
	match key.code {
		KeyCode::Enter | KeyCode::Char('y') => app.ledger.confirm_reassign(property_id),
		KeyCode::Esc | KeyCode::Char('n') => app.ledger.cancel_row(property_id),
		_ => {}
	}
}

fn confirm_delete(app: &mut App, key: KeyEvent, property_id: i64) {
	match key.code {
		KeyCode::Enter | KeyCode::Char('y') => app.ledger.confirm_delete(property_id),
		KeyCode::Esc | KeyCode::Char('n') => app.ledger.cancel_row(property_id),
		_ => {}
	}
}

fn details_screen(app: &mut App, key: KeyEvent) {
	let editing = app.ledger.details.as_ref().is_some_and(|view| view.is_editing());
	if editing {
		details_edit(app, key);
		return;
	}
	match key.code {
		KeyCode::Esc | KeyCode::Char('q') => app.ledger.close_details(),
		KeyCode::Char('e') => {
			app.ui.details.field = 0;
			app.ledger.edit_details();
		}
		KeyCode::Char('r') => app.ledger.refresh_current(),
		_ => {}
	}
}

fn details_edit(app: &mut App, key: KeyEvent) {
	match key.code {
		KeyCode::Esc => app.ledger.cancel_details_edit(),
		KeyCode::Enter => app.ledger.save_details(),
		KeyCode::Tab => app.ui.details.next_field(),
		KeyCode::BackTab => app.ui.details.prev_field(),
		code => {
			let field = app.ui.details.field;
			if let Some(draft) = app.ledger.details.as_mut().and_then(|view| view.draft_mut()) {
				details::draft_key(draft, field, code);
			}
		}
	}
}

fn approvals(app: &mut App, key: KeyEvent) {
	match key.code {
		KeyCode::Esc | KeyCode::Char('q') => app.ledger.show_properties(),
		KeyCode::Up | KeyCode::Char('k') => app.ui.approvals.move_up(),
		KeyCode::Down | KeyCode::Char('j') => {
			app.ui.approvals.move_down(app.ledger.approvals.requests().len());
		}
		KeyCode::Char('a') => review(app, ReviewStatus::Approved),
		KeyCode::Char('d') => review(app, ReviewStatus::Denied),
		KeyCode::Char('r') => app.ledger.refresh_current(),
		_ => {}
	}
}

fn review(app: &mut App, verdict: ReviewStatus) {
	let selected = app
		.ui
		.approvals
		.selected(app.ledger.approvals.requests())
		.map(|request| request.request_id);
	if let Some(request_id) = selected {
		app.ledger.review(request_id, verdict);
	}
}

#[cfg(test)]
mod tests {
	use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
	use pretty_assertions::assert_eq;
	use qm_ledger::{Level, RowState, TaskKey, View};
	use qm_model::Role;

	use crate::app::App;
	use crate::harness;

	fn press(app: &mut App, code: KeyCode) {
		super::handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
	}

	fn type_text(app: &mut App, text: &str) {
		for c in text.chars() {
			press(app, KeyCode::Char(c));
		}
	}

	#[tokio::test]
	async fn login_typing_fills_both_fields() {
		let (mut app, _tx) = harness::app();
		app.ledger.auth = qm_ledger::Auth::SignedOut;
		type_text(&mut app, "amy@x.y");
		press(&mut app, KeyCode::Tab);
		type_text(&mut app, "hunter2");
		assert_eq!(app.ui.login.email, "amy@x.y");
		assert_eq!(app.ui.login.password, "hunter2");
	}

	#[tokio::test]
	async fn submitting_blank_credentials_raises_a_notice_locally() {
		let (mut app, _tx) = harness::app();
		app.ledger.auth = qm_ledger::Auth::SignedOut;
		press(&mut app, KeyCode::Enter);
		assert!(!app.ledger.in_flight.contains(TaskKey::Auth));
		let notice = app.ledger.notices.entries().next().unwrap();
		assert_eq!(notice.level, Level::Error);
	}

	#[tokio::test]
	async fn cursor_movement_clamps_to_the_page() {
		let (mut app, _tx) = harness::signed_in(Role::Admin);
		harness::seed(
			&mut app,
			vec![harness::property(1, "P-1", None), harness::property(2, "P-2", None)],
			Vec::new(),
		);
		press(&mut app, KeyCode::Down);
		press(&mut app, KeyCode::Down);
		press(&mut app, KeyCode::Down);
		assert_eq!(app.ui.table.cursor, 1);
		press(&mut app, KeyCode::Up);
		press(&mut app, KeyCode::Up);
		assert_eq!(app.ui.table.cursor, 0);
	}

	#[tokio::test]
	async fn staff_keys_for_privileged_actions_do_nothing() {
		let (mut app, _tx) = harness::signed_in(Role::Staff);
		harness::seed(&mut app, vec![harness::property(4, "P-4", None)], Vec::new());
		for code in [KeyCode::Char('e'), KeyCode::Char('d'), KeyCode::Char('a'), KeyCode::Char('l')] {
			press(&mut app, code);
			assert!(app.ledger.rows.is_viewing(4));
		}
		press(&mut app, KeyCode::Char('n'));
		assert!(app.ledger.rows.add_draft().is_none());
		press(&mut app, KeyCode::Char('v'));
		assert_eq!(app.ledger.view, View::Properties);
	}

	#[tokio::test]
	async fn edit_mode_routes_typing_into_the_focused_field() {
		let (mut app, _tx) = harness::signed_in(Role::Admin);
		harness::seed(&mut app, vec![harness::property(9, "P-9", None)], Vec::new());
		press(&mut app, KeyCode::Char('e'));
		assert!(matches!(app.ledger.rows.state(9), Some(RowState::Editing { .. })));

		// Field 0 is the property number; replace its tail.
		press(&mut app, KeyCode::Backspace);
		type_text(&mut app, "9b");
		press(&mut app, KeyCode::Tab);
		type_text(&mut app, "!");
		let Some(RowState::Editing { draft }) = app.ledger.rows.state(9) else {
			panic!("row left edit mode");
		};
		assert_eq!(draft.property_no, "P-9b");
		assert_eq!(draft.description, "Lab oscilloscope!");
	}

	#[tokio::test]
	async fn category_field_cycles_instead_of_typing() {
		let (mut app, _tx) = harness::signed_in(Role::Admin);
		harness::seed(&mut app, vec![harness::property(9, "P-9", None)], Vec::new());
		press(&mut app, KeyCode::Char('e'));
		for _ in 0..5 {
			press(&mut app, KeyCode::Tab);
		}
		press(&mut app, KeyCode::Char(' '));
		let Some(RowState::Editing { draft }) = app.ledger.rows.state(9) else {
			panic!("row left edit mode");
		};
		assert_eq!(draft.category, qm_model::Category::AnnexB);
	}

	#[tokio::test]
	async fn escape_abandons_an_edit_without_a_request() {
		let (mut app, _tx) = harness::signed_in(Role::Admin);
		harness::seed(&mut app, vec![harness::property(9, "P-9", None)], Vec::new());
		press(&mut app, KeyCode::Char('e'));
		type_text(&mut app, "zzz");
		press(&mut app, KeyCode::Esc);
		assert!(app.ledger.rows.is_viewing(9));
		assert!(!app.ledger.in_flight.contains(TaskKey::Save(9)));
	}

	#[tokio::test]
	async fn add_row_is_modal_and_collects_typed_fields() {
		let (mut app, _tx) = harness::signed_in(Role::Admin);
		harness::seed(&mut app, vec![harness::property(1, "P-1", None)], Vec::new());
		press(&mut app, KeyCode::Char('n'));
		assert!(app.ledger.rows.add_draft().is_some());

		type_text(&mut app, "2024-03-0007");
		// Navigation keys go to the form, not the table.
		press(&mut app, KeyCode::Down);
		assert_eq!(app.ui.table.cursor, 0);
		assert_eq!(
			app.ledger.rows.add_draft().map(|draft| draft.property_no.clone()),
			Some("2024-03-0007".into())
		);
		press(&mut app, KeyCode::Esc);
		assert!(app.ledger.rows.add_draft().is_none());
	}

	#[tokio::test]
	async fn assigning_an_unassigned_property_sends_straight_away() {
		let (mut app, _tx) = harness::signed_in(Role::PropertyCustodian);
		harness::seed(
			&mut app,
			vec![harness::property(7, "P-7", None)],
			vec![harness::user(12, "B. Santos", Role::Staff)],
		);
		press(&mut app, KeyCode::Char('a'));
		assert!(matches!(app.ledger.rows.state(7), Some(RowState::Assigning { .. })));
		type_text(&mut app, "santos");
		press(&mut app, KeyCode::Enter);
		assert!(app.ledger.in_flight.contains(TaskKey::Assign(7)));
	}

	#[tokio::test]
	async fn reassignment_dialog_can_be_declined() {
		let (mut app, _tx) = harness::signed_in(Role::PropertyCustodian);
		harness::seed(
			&mut app,
			vec![harness::property(7, "P-7", Some("A. Reyes"))],
			vec![
				harness::user(11, "A. Reyes", Role::Staff),
				harness::user(12, "B. Santos", Role::Staff),
			],
		);
		press(&mut app, KeyCode::Char('a'));
		type_text(&mut app, "santos");
		press(&mut app, KeyCode::Enter);
		assert!(matches!(app.ledger.rows.state(7), Some(RowState::ConfirmingReassign { .. })));

		press(&mut app, KeyCode::Char('n'));
		assert!(app.ledger.rows.is_viewing(7));
		assert!(!app.ledger.in_flight.contains(TaskKey::Assign(7)));
	}

	#[tokio::test]
	async fn delete_requires_the_dialog_and_y_confirms_it() {
		let (mut app, _tx) = harness::signed_in(Role::MasterAdmin);
		harness::seed(&mut app, vec![harness::property(3, "P-3", None)], Vec::new());
		press(&mut app, KeyCode::Char('d'));
		assert!(matches!(app.ledger.rows.state(3), Some(RowState::ConfirmingDelete { .. })));
		press(&mut app, KeyCode::Char('y'));
		assert!(app.ledger.in_flight.contains(TaskKey::Delete(3)));
	}

	#[tokio::test]
	async fn enter_opens_details_and_escape_returns() {
		let (mut app, _tx) = harness::signed_in(Role::Admin);
		harness::seed(&mut app, vec![harness::property(5, "P-5", None)], Vec::new());
		press(&mut app, KeyCode::Enter);
		assert_eq!(app.ledger.view, View::Details);
		press(&mut app, KeyCode::Esc);
		assert_eq!(app.ledger.view, View::Properties);
	}

	#[tokio::test]
	async fn approvals_keys_review_the_selected_request() {
		let (mut app, _tx) = harness::signed_in(Role::MasterAdmin);
		app.ledger.view = View::Approvals;
		let generation = app.ledger.approvals.begin();
		app.ledger.approvals.apply(generation, Ok(vec![harness::request(18, 7)]));

		press(&mut app, KeyCode::Char('a'));
		assert!(app.ledger.in_flight.contains(TaskKey::Review(18)));
	}

	#[tokio::test]
	async fn ctrl_c_quits_from_any_view() {
		let (mut app, _tx) = harness::signed_in(Role::Staff);
		super::handle_key(
			&mut app,
			KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
		);
		assert!(app.should_quit());
	}
}

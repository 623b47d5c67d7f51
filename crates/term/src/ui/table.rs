//! The property listing: one row per record, with inline add/edit rows
//! and modal overlays for the selected row's dialogs.

use qm_ledger::{LoadPhase, RowState};
use qm_model::{Property, PropertyDraft, Role};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::app::App;
use crate::ui::overlays;

/// Slots of the inline add/edit row, in tab order.
pub const DRAFT_FIELDS: usize = 6;
/// The category slot cycles through the annex values instead of taking text.
pub const CATEGORY_FIELD: usize = 5;

/// Cursor and field focus for the listing.
#[derive(Debug, Default)]
pub struct TableUi {
	pub cursor: usize,
	pub field: usize,
}

impl TableUi {
	/// The property under the cursor, clamped to the current page.
	pub fn selected<'a>(&self, items: &'a [Property]) -> Option<&'a Property> {
		if items.is_empty() {
			None
		} else {
			items.get(self.cursor.min(items.len() - 1))
		}
	}

	pub fn move_up(&mut self) {
		self.cursor = self.cursor.saturating_sub(1);
	}

	pub fn move_down(&mut self, len: usize) {
		if self.cursor + 1 < len {
			self.cursor += 1;
		}
	}

	pub fn next_field(&mut self) {
		self.field = (self.field + 1) % DRAFT_FIELDS;
	}

	pub fn prev_field(&mut self) {
		self.field = (self.field + DRAFT_FIELDS - 1) % DRAFT_FIELDS;
	}
}

/// Text slot of a draft by tab order; None for the category slot.
pub fn draft_text_mut(draft: &mut PropertyDraft, index: usize) -> Option<&mut String> {
	match index {
		0 => Some(&mut draft.property_no),
		1 => Some(&mut draft.description),
		2 => Some(&mut draft.quantity),
		3 => Some(&mut draft.value),
		4 => Some(&mut draft.serial_no),
		_ => None,
	}
}

pub(crate) fn render(frame: &mut Frame, app: &App) {
	let (header, body, footer) = super::screen_chunks(frame.area());
	super::render_header(frame, app, header);

	let role = app.ledger.role().unwrap_or(Role::Staff);
	let full = role.sees_full_inventory();
	let store = &app.ledger.store;
	let items = store.items();

	// A failed fetch keeps the stale page visible under the error line.
	let table_area = if let LoadPhase::Failed(message) = store.phase() {
		let chunks = Layout::default()
			.direction(Direction::Vertical)
			.constraints([Constraint::Length(1), Constraint::Min(1)])
			.split(body);
		frame.render_widget(
			Paragraph::new(format!("fetch failed: {message}"))
				.style(Style::default().fg(Color::Red)),
			chunks[0],
		);
		chunks[1]
	} else {
		body
	};

	let adding = app.ledger.rows.add_draft();
	let mut rows = Vec::with_capacity(items.len() + 1);
	if let Some(draft) = adding {
		rows.push(draft_row(draft, app.ui.table.field, full));
	}
	for property in items {
		rows.push(match app.ledger.rows.state(property.id) {
			Some(RowState::Editing { draft }) => draft_row(draft, app.ui.table.field, full),
			_ => property_row(property, full, app.ledger.in_flight.busy_on(property.id)),
		});
	}

	let selected = if adding.is_some() {
		Some(0)
	} else if items.is_empty() {
		None
	} else {
		Some(app.ui.table.cursor.min(items.len() - 1))
	};

	let table = Table::new(rows, widths(full))
		.header(header_row(full))
		.block(Block::default().borders(Borders::ALL).title(title(app, full)))
		.row_highlight_style(Style::default().bg(Color::DarkGray));
	let mut state = TableState::default().with_selected(selected);
	frame.render_stateful_widget(table, table_area, &mut state);

	super::render_hints(frame, &footer_text(app, role), footer);

	if let Some(property) = app.ui.table.selected(items) {
		if let Some(state) = app.ledger.rows.state(property.id) {
			overlays::render_row_overlay(frame, app, property, state);
		}
	}
}

fn title(app: &App, full: bool) -> String {
	let store = &app.ledger.store;
	let mut title = if full {
		let meta = store.meta();
		format!(
			" Properties  page {}/{}  {} total ",
			meta.page,
			meta.page_count.max(1),
			meta.total_count
		)
	} else {
		format!(" My properties  {} ", store.items().len())
	};
	if store.is_loading() {
		title.push_str(" loading... ");
	}
	title
}

fn header_row(full: bool) -> Row<'static> {
	let mut cells = vec!["No.", "Description", "Qty", "Value", "Serial", "Category"];
	if full {
		cells.extend(["Assigned to", "Department", "Location"]);
	}
	Row::new(cells).style(Style::default().add_modifier(Modifier::BOLD))
}

fn widths(full: bool) -> Vec<Constraint> {
	let mut widths = vec![
		Constraint::Length(14),
		Constraint::Min(18),
		Constraint::Length(4),
		Constraint::Length(10),
		Constraint::Length(10),
		Constraint::Length(8),
	];
	if full {
		widths.extend([Constraint::Length(18), Constraint::Length(12), Constraint::Length(14)]);
	}
	widths
}

fn property_row(property: &Property, full: bool, busy: bool) -> Row<'static> {
	let mut cells = vec![
		property.property_no.clone(),
		property.description.clone(),
		property.quantity.to_string(),
		format!("{:.2}", property.value),
		property.serial_no.clone(),
		property.category.label().to_string(),
	];
	if full {
		cells.push(holder_cell(property));
		cells.push(property.assigned_department.clone().unwrap_or_else(|| "-".into()));
		cells.push(property.location_detail.clone().unwrap_or_else(|| "-".into()));
	}
	let style = if busy {
		Style::default().add_modifier(Modifier::DIM)
	} else {
		Style::default()
	};
	Row::new(cells).style(style)
}

/// Holder column, with the review marker riding along.
fn holder_cell(property: &Property) -> String {
	match (&property.assigned_to, property.has_pending_reassignment()) {
		(Some(name), true) => format!("{name} (pending)"),
		(Some(name), false) => name.clone(),
		// Pending with no holder means the server state is off; show it
		// rather than hide it.
		(None, true) => "? (pending)".into(),
		(None, false) => "-".into(),
	}
}

fn draft_row(draft: &PropertyDraft, focus: usize, full: bool) -> Row<'static> {
	let texts = [
		&draft.property_no,
		&draft.description,
		&draft.quantity,
		&draft.value,
		&draft.serial_no,
	];
	let mut cells: Vec<Cell<'static>> = Vec::with_capacity(if full { 9 } else { 6 });
	for (index, text) in texts.into_iter().enumerate() {
		cells.push(draft_cell(text.clone(), index == focus, true));
	}
	cells.push(draft_cell(
		draft.category.label().to_string(),
		focus == CATEGORY_FIELD,
		false,
	));
	if full {
		cells.extend([Cell::from(""), Cell::from(""), Cell::from("")]);
	}
	Row::new(cells).style(Style::default().fg(Color::Yellow))
}

fn draft_cell(text: String, focused: bool, takes_text: bool) -> Cell<'static> {
	if !focused {
		return Cell::from(text);
	}
	let shown = if takes_text { format!("{text}_") } else { text };
	Cell::from(shown).style(Style::default().add_modifier(Modifier::REVERSED))
}

const EDIT_HINTS: &str =
	"type to fill   tab next field   space cycles category   enter save   esc cancel";
const PICKER_HINTS: &str = "type to filter   up/down choose   enter confirm   esc cancel";
const CONFIRM_HINTS: &str = "y confirm   n cancel";

fn footer_text(app: &App, role: Role) -> String {
	if app.ledger.rows.add_draft().is_some() {
		return EDIT_HINTS.into();
	}
	let mode = app
		.ui
		.table
		.selected(app.ledger.store.items())
		.and_then(|property| app.ledger.rows.state(property.id));
	match mode {
		Some(RowState::Editing { .. }) => EDIT_HINTS.into(),
		Some(RowState::Assigning { .. } | RowState::PickingLocation { .. }) => PICKER_HINTS.into(),
		Some(RowState::ConfirmingReassign { .. } | RowState::ConfirmingDelete { .. }) => {
			CONFIRM_HINTS.into()
		}
		None => browse_hints(role),
	}
}

/// Browse-mode key hints, trimmed to what the role can actually do.
fn browse_hints(role: Role) -> String {
	let mut hints = String::from("up/down move   left/right page   enter details");
	if role.can_add() {
		hints.push_str("   n new");
	}
	if role.can_edit() {
		hints.push_str("   e edit   l location   g report");
	}
	if role.can_assign() {
		hints.push_str("   a assign");
	}
	if role.can_delete() {
		hints.push_str("   d delete");
	}
	if role.can_review_reassignments() {
		hints.push_str("   v approvals");
	}
	hints.push_str("   r refresh   o sign out   q quit");
	hints
}

//! Full-record screen: core fields on the left, acquisition metadata on
//! the right, all editable as one form.

use crossterm::event::KeyCode;
use qm_ledger::{DetailsDraft, DetailsForm};
use qm_model::{PropertyDetails, PropertyWithDetails, Role};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::ui::table;

/// Tab-order slots: five core text fields, the category, the location,
/// then the twelve acquisition fields.
pub const FIELD_COUNT: usize = 19;
pub const CATEGORY_FIELD: usize = 5;
pub const LOCATION_FIELD: usize = 6;
const FORM_BASE: usize = 7;

const CORE_LABELS: [&str; FORM_BASE] = [
	"Property no.",
	"Description",
	"Quantity",
	"Value",
	"Serial no.",
	"Category",
	"Location",
];

#[derive(Debug, Default)]
pub struct DetailsUi {
	pub field: usize,
}

impl DetailsUi {
	pub fn next_field(&mut self) {
		self.field = (self.field + 1) % FIELD_COUNT;
	}

	pub fn prev_field(&mut self) {
		self.field = (self.field + FIELD_COUNT - 1) % FIELD_COUNT;
	}
}

/// Typing into the combined edit form. Mirrors the inline row: the
/// category slot cycles, every other slot takes text.
pub fn draft_key(draft: &mut DetailsDraft, field: usize, code: KeyCode) {
	if field == CATEGORY_FIELD {
		if matches!(code, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) {
			draft.core.category = draft.core.category.cycled();
		}
		return;
	}
	match code {
		KeyCode::Backspace => {
			if let Some(text) = draft_text_mut(draft, field) {
				text.pop();
			}
		}
		KeyCode::Char(c) => {
			if let Some(text) = draft_text_mut(draft, field) {
				text.push(c);
			}
		}
		_ => {}
	}
}

fn draft_text_mut(draft: &mut DetailsDraft, field: usize) -> Option<&mut String> {
	match field {
		CATEGORY_FIELD => None,
		LOCATION_FIELD => Some(&mut draft.location),
		index if index < CATEGORY_FIELD => table::draft_text_mut(&mut draft.core, index),
		index => draft.form.field_mut(index - FORM_BASE),
	}
}

pub(crate) fn render(frame: &mut Frame, app: &App) {
	let (header, body, footer) = super::screen_chunks(frame.area());
	super::render_header(frame, app, header);

	let Some(view) = &app.ledger.details else {
		return;
	};

	let title = match view.record() {
		Some(record) => format!(" Property {} ", record.property.property_no),
		None => " Property ".to_owned(),
	};
	let block = Block::default().borders(Borders::ALL).title(title);
	let inner = block.inner(body);
	frame.render_widget(block, body);

	if view.is_loading() {
		frame.render_widget(
			Paragraph::new("Loading record...").style(Style::default().fg(Color::DarkGray)),
			inner,
		);
		super::render_hints(frame, "esc back", footer);
		return;
	}

	let lines = match view.draft() {
		Some(draft) => edit_lines(draft, app.ui.details.field),
		None => view.record().map(view_lines).unwrap_or_default(),
	};

	let columns = Layout::default()
		.direction(Direction::Horizontal)
		.constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
		.split(inner);
	let split = FORM_BASE.min(lines.len());
	let (left, right) = lines.split_at(split);
	frame.render_widget(Paragraph::new(left.to_vec()), columns[0]);
	frame.render_widget(Paragraph::new(right.to_vec()), columns[1]);

	let hints = if view.is_editing() {
		"tab next field   space cycles category   enter save   esc cancel".to_owned()
	} else {
		let mut hints = String::new();
		if app.ledger.role().is_some_and(Role::can_edit) {
			hints.push_str("e edit   ");
		}
		hints.push_str("r refresh   esc back");
		hints
	};
	super::render_hints(frame, &hints, footer);
}

fn view_lines(record: &PropertyWithDetails) -> Vec<Line<'static>> {
	let property = &record.property;
	let mut values = vec![
		property.property_no.clone(),
		property.description.clone(),
		property.quantity.to_string(),
		format!("{:.2}", property.value),
		property.serial_no.clone(),
		property.category.label().to_string(),
		property.location_detail.clone().unwrap_or_else(|| "-".into()),
	];
	values.extend(form_values(record.details.as_ref()));
	values
		.into_iter()
		.enumerate()
		.map(|(index, value)| field_line(label_of(index), value, false, false))
		.collect()
}

fn form_values(details: Option<&PropertyDetails>) -> Vec<String> {
	let Some(details) = details else {
		return vec!["-".to_owned(); DetailsForm::LABELS.len()];
	};
	let text = |field: &Option<String>| field.clone().unwrap_or_else(|| "-".into());
	vec![
		text(&details.article),
		text(&details.old_property_no),
		text(&details.unit_of_measure),
		text(&details.acquisition_date),
		text(&details.condition),
		text(&details.remarks),
		text(&details.branch),
		text(&details.asset_type),
		text(&details.fund_cluster),
		text(&details.po_no),
		text(&details.invoice_no),
		text(&details.invoice_date),
	]
}

fn edit_lines(draft: &DetailsDraft, focus: usize) -> Vec<Line<'static>> {
	(0..FIELD_COUNT)
		.map(|index| {
			let value = match index {
				0 => draft.core.property_no.clone(),
				1 => draft.core.description.clone(),
				2 => draft.core.quantity.clone(),
				3 => draft.core.value.clone(),
				4 => draft.core.serial_no.clone(),
				CATEGORY_FIELD => draft.core.category.label().to_owned(),
				LOCATION_FIELD => draft.location.clone(),
				index => draft.form.field(index - FORM_BASE).unwrap_or("").to_owned(),
			};
			field_line(label_of(index), value, index == focus, index != CATEGORY_FIELD)
		})
		.collect()
}

fn label_of(index: usize) -> &'static str {
	if index < FORM_BASE {
		CORE_LABELS[index]
	} else {
		DetailsForm::LABELS[index - FORM_BASE]
	}
}

fn field_line(label: &'static str, value: String, focused: bool, takes_text: bool) -> Line<'static> {
	let value_style = if focused {
		Style::default().add_modifier(Modifier::REVERSED)
	} else {
		Style::default()
	};
	let shown = if focused && takes_text { format!("{value}_") } else { value };
	Line::from(vec![
		Span::styled(format!("{label:>17}  "), Style::default().fg(Color::DarkGray)),
		Span::styled(shown, value_style),
	])
}

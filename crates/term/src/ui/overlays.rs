//! Modal popups floating over the listing: pickers and confirm dialogs.

use qm_ledger::{LocationPicker, RowState, UserPicker};
use qm_model::Property;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use crate::app::App;

pub(crate) fn render_row_overlay(
	frame: &mut Frame,
	app: &App,
	property: &Property,
	state: &RowState,
) {
	match state {
		RowState::Assigning { picker } => user_picker(frame, app, property, picker),
		RowState::PickingLocation { picker } => location_picker(frame, app, property, picker),
		RowState::ConfirmingReassign { proposal } => confirm(
			frame,
			" Reassign property ",
			&format!(
				"Hand {} over to {}? The server may queue the transfer for review.",
				property.property_no, proposal.user_name
			),
		),
		RowState::ConfirmingDelete { prompt } => confirm(frame, " Delete property ", prompt),
		// The edit draft renders inline in the table.
		RowState::Editing { .. } => {}
	}
}

/// Search line on top, matching candidates below.
fn picker_chrome(frame: &mut Frame, title: String, query: &str) -> Rect {
	let area = super::centered_rect(48, 14, frame.area());
	frame.render_widget(Clear, area);
	let block = Block::default().borders(Borders::ALL).title(title);
	let inner = block.inner(area);
	frame.render_widget(block, area);

	let chunks = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Length(1), Constraint::Min(1)])
		.split(inner);
	frame.render_widget(Paragraph::new(format!("find: {query}_")), chunks[0]);
	chunks[1]
}

fn candidate_list(frame: &mut Frame, items: Vec<ListItem<'static>>, cursor: usize, area: Rect) {
	let selected = if items.is_empty() {
		None
	} else {
		Some(cursor.min(items.len() - 1))
	};
	let list = List::new(items)
		.highlight_style(Style::default().add_modifier(Modifier::REVERSED))
		.highlight_symbol("> ");
	let mut state = ListState::default().with_selected(selected);
	frame.render_stateful_widget(list, area, &mut state);
}

fn user_picker(frame: &mut Frame, app: &App, property: &Property, picker: &UserPicker) {
	let list_area = picker_chrome(
		frame,
		format!(" Assign {} ", property.property_no),
		&picker.query,
	);
	let items: Vec<ListItem<'static>> = picker
		.filtered(app.ledger.store.users())
		.into_iter()
		.map(|user| {
			let department = user.department.as_deref().unwrap_or("");
			ListItem::new(format!("{}  {}", user.name, department))
		})
		.collect();
	candidate_list(frame, items, picker.cursor, list_area);
}

fn location_picker(frame: &mut Frame, app: &App, property: &Property, picker: &LocationPicker) {
	let list_area = picker_chrome(
		frame,
		format!(" Location of {} ", property.property_no),
		&picker.query,
	);
	let chunks = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Min(1), Constraint::Length(1)])
		.split(list_area);

	let options = app.ledger.store.locations();
	let items: Vec<ListItem<'static>> = picker
		.filtered(&options)
		.into_iter()
		.map(|hit| ListItem::new(hit.to_owned()))
		.collect();
	candidate_list(frame, items, picker.cursor, chunks[0]);
	frame.render_widget(
		Paragraph::new("no match needed; enter saves the typed text")
			.style(Style::default().fg(Color::DarkGray)),
		chunks[1],
	);
}

fn confirm(frame: &mut Frame, title: &str, message: &str) {
	let area = super::centered_rect(54, 7, frame.area());
	frame.render_widget(Clear, area);
	let block = Block::default().borders(Borders::ALL).title(title.to_owned());
	let inner = block.inner(area);
	frame.render_widget(block, area);
	let lines = vec![
		Line::raw(message.to_owned()),
		Line::raw(""),
		Line::styled("[y] confirm    [n] cancel", Style::default().fg(Color::DarkGray)),
	];
	frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

//! Review queue for pending reassignment requests.

use qm_ledger::{LoadPhase, TaskKey};
use qm_model::ReassignmentRequest;
use ratatui::Frame;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::app::App;

#[derive(Debug, Default)]
pub struct ApprovalsUi {
	pub cursor: usize,
}

impl ApprovalsUi {
	/// The request under the cursor, clamped to the queue.
	pub fn selected<'a>(
		&self,
		requests: &'a [ReassignmentRequest],
	) -> Option<&'a ReassignmentRequest> {
		if requests.is_empty() {
			None
		} else {
			requests.get(self.cursor.min(requests.len() - 1))
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
}

pub(crate) fn render(frame: &mut Frame, app: &App) {
	let (header, body, footer) = super::screen_chunks(frame.area());
	super::render_header(frame, app, header);

	let requests = app.ledger.approvals.requests();
	let mut title = format!(" Pending reassignments  {} ", requests.len());
	if matches!(app.ledger.approvals.phase(), LoadPhase::Loading) {
		title.push_str(" loading... ");
	}
	let block = Block::default().borders(Borders::ALL).title(title);
	let inner = block.inner(body);
	frame.render_widget(block, body);

	if let LoadPhase::Failed(message) = app.ledger.approvals.phase() {
		frame.render_widget(
			Paragraph::new(format!("fetch failed: {message}"))
				.style(Style::default().fg(Color::Red)),
			inner,
		);
	} else if requests.is_empty() {
		frame.render_widget(
			Paragraph::new("Nothing awaiting review.").style(Style::default().fg(Color::DarkGray)),
			inner,
		);
	} else {
		let items: Vec<ListItem<'static>> = requests
			.iter()
			.map(|request| {
				let busy = app.ledger.in_flight.contains(TaskKey::Review(request.request_id));
				request_item(request, busy)
			})
			.collect();
		let list = List::new(items)
			.highlight_style(Style::default().add_modifier(Modifier::REVERSED))
			.highlight_symbol("> ");
		let mut state = ListState::default()
			.with_selected(Some(app.ui.approvals.cursor.min(requests.len() - 1)));
		frame.render_stateful_widget(list, inner, &mut state);
	}

	super::render_hints(
		frame,
		"up/down move   a approve   d deny   r refresh   esc back",
		footer,
	);
}

fn request_item(request: &ReassignmentRequest, busy: bool) -> ListItem<'static> {
	let when = request
		.created_at
		.map(|at| at.format("%Y-%m-%d").to_string())
		.unwrap_or_else(|| "-".into());
	let line = format!(
		"#{}  {}  {}  {} to {}  asked by {}  {}",
		request.request_id,
		request.property.property_no,
		request.property.description,
		request.from_staff.name,
		request.to_staff.name,
		request.requested_by.name,
		when,
	);
	let style = if busy {
		Style::default().add_modifier(Modifier::DIM)
	} else {
		Style::default()
	};
	ListItem::new(line).style(style)
}

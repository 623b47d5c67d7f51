//! Screen rendering. Everything here is a pure function of app state;
//! nothing mutates the ledger.

pub mod approvals;
pub mod details;
pub mod login;
pub mod notices;
pub mod overlays;
pub mod table;

use qm_ledger::View;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App) {
	match app.ledger.view {
		View::Login => login::render(frame, app),
		View::Properties => table::render(frame, app),
		View::Details => details::render(frame, app),
		View::Approvals => approvals::render(frame, app),
	}
	// Toasts sit on top of whatever screen is up.
	notices::render(frame, &app.ledger);
}

/// Standard screen scaffold: one header line, the body, one hint line.
pub(crate) fn screen_chunks(area: Rect) -> (Rect, Rect, Rect) {
	let chunks = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1)])
		.split(area);
	(chunks[0], chunks[1], chunks[2])
}

pub(crate) fn render_header(frame: &mut Frame, app: &App, area: Rect) {
	let mut spans = vec![Span::styled(
		" quartermaster ",
		Style::default().fg(Color::Black).bg(Color::Cyan),
	)];
	if let Some(user) = app.ledger.user() {
		spans.push(Span::raw(format!("  {}  {}", user.name, user.role.label())));
		if let Some(department) = &user.department {
			spans.push(Span::styled(
				format!("  {department}"),
				Style::default().fg(Color::DarkGray),
			));
		}
		if let Some(count) = app.ledger.badge() {
			spans.push(Span::styled(
				format!("  pending approvals: {count}"),
				Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
			));
		}
	}
	frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub(crate) fn render_hints(frame: &mut Frame, hints: &str, area: Rect) {
	let line = Paragraph::new(hints.to_string()).style(Style::default().fg(Color::DarkGray));
	frame.render_widget(line, area);
}

/// Fixed-size popup rect centered in `area`, clamped to fit.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
	let width = width.min(area.width);
	let height = height.min(area.height);
	let x = area.x + (area.width - width) / 2;
	let y = area.y + (area.height - height) / 2;
	Rect::new(x, y, width, height)
}

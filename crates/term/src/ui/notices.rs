//! Toast stack in the bottom-right corner, above the hint line.

use qm_ledger::{Ledger, Level, Notice};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};

/// Older notices wait under the stack until the newer ones dismiss.
const SHOW_AT_MOST: usize = 4;

pub(crate) fn render(frame: &mut Frame, ledger: &Ledger) {
	let entries: Vec<&Notice> = ledger.notices.entries().collect();
	if entries.is_empty() {
		return;
	}
	let area = frame.area();
	let start = entries.len().saturating_sub(SHOW_AT_MOST);
	let show = &entries[start..];

	let width = show
		.iter()
		.map(|notice| notice.message.chars().count() + 6)
		.max()
		.unwrap_or(0)
		.min(area.width as usize) as u16;
	let height = (show.len() as u16).min(area.height.saturating_sub(1));
	if width == 0 || height == 0 {
		return;
	}
	let x = area.right().saturating_sub(width);
	let y = area.bottom().saturating_sub(height + 1);
	let rect = Rect::new(x, y, width, height);

	frame.render_widget(Clear, rect);
	let lines: Vec<Line<'static>> = show.iter().map(|notice| line_for(notice)).collect();
	frame.render_widget(Paragraph::new(lines), rect);
}

fn line_for(notice: &Notice) -> Line<'static> {
	let (glyph, color) = badge(notice.level);
	Line::from(vec![
		Span::styled(format!(" {glyph} "), Style::default().fg(Color::Black).bg(color)),
		Span::raw(" "),
		Span::raw(notice.message.clone()),
	])
}

fn badge(level: Level) -> (&'static str, Color) {
	match level {
		Level::Info => ("i", Color::Cyan),
		Level::Warn => ("!", Color::Yellow),
		Level::Error => ("x", Color::Red),
		Level::Success => ("ok", Color::Green),
		Level::Pending => ("..", Color::DarkGray),
	}
}

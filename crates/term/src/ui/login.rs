//! Sign-in screen.

use qm_ledger::Auth;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::App;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Focus {
	#[default]
	Email,
	Password,
}

/// Credential input state. Cleared on sign-out so a second user at the
/// same terminal never inherits the previous password.
#[derive(Debug, Default)]
pub struct LoginForm {
	pub email: String,
	pub password: String,
	focus: Focus,
}

impl LoginForm {
	pub fn toggle(&mut self) {
		self.focus = match self.focus {
			Focus::Email => Focus::Password,
			Focus::Password => Focus::Email,
		};
	}

	pub fn push_char(&mut self, c: char) {
		match self.focus {
			Focus::Email => self.email.push(c),
			Focus::Password => self.password.push(c),
		}
	}

	pub fn backspace(&mut self) {
		match self.focus {
			Focus::Email => {
				self.email.pop();
			}
			Focus::Password => {
				self.password.pop();
			}
		}
	}
}

pub(crate) fn render(frame: &mut Frame, app: &App) {
	let card = super::centered_rect(54, 10, frame.area());
	let block = Block::default().borders(Borders::ALL).title(" quartermaster ");
	let inner = block.inner(card);
	frame.render_widget(Clear, card);
	frame.render_widget(block, card);

	if matches!(app.ledger.auth, Auth::Resolving) {
		frame.render_widget(
			Paragraph::new("Restoring session...").style(Style::default().fg(Color::DarkGray)),
			inner,
		);
		return;
	}

	let form = &app.ui.login;
	let rows = Layout::default()
		.direction(Direction::Vertical)
		.constraints([
			Constraint::Length(1),
			Constraint::Length(1),
			Constraint::Length(1),
			Constraint::Length(1),
			Constraint::Length(1),
			Constraint::Length(1),
			Constraint::Min(0),
		])
		.split(inner);

	frame.render_widget(Paragraph::new("Sign in to the property inventory."), rows[0]);
	frame.render_widget(
		field(" Email", &form.email, form.focus == Focus::Email),
		rows[2],
	);
	let masked = "*".repeat(form.password.chars().count());
	frame.render_widget(
		field("Password", &masked, form.focus == Focus::Password),
		rows[3],
	);
	frame.render_widget(
		Paragraph::new("enter sign in   tab switch   esc quit")
			.style(Style::default().fg(Color::DarkGray)),
		rows[5],
	);
	frame.render_widget(
		Paragraph::new("create an account: qm sign-up --help")
			.style(Style::default().fg(Color::DarkGray)),
		rows[6],
	);
}

fn field(label: &'static str, value: &str, focused: bool) -> Paragraph<'static> {
	let style = if focused {
		Style::default().add_modifier(Modifier::REVERSED)
	} else {
		Style::default()
	};
	let shown = if focused { format!("{value}_") } else { value.to_owned() };
	Paragraph::new(Line::from(vec![
		Span::styled(format!("{label}  "), Style::default().fg(Color::DarkGray)),
		Span::styled(shown, style),
	]))
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::harness;

	#[test]
	fn typing_follows_the_focused_field() {
		let mut form = LoginForm::default();
		form.push_char('a');
		form.toggle();
		form.push_char('b');
		form.push_char('c');
		form.backspace();
		assert_eq!(form.email, "a");
		assert_eq!(form.password, "b");
		form.toggle();
		form.backspace();
		assert_eq!(form.email, "");
	}

	#[tokio::test]
	async fn password_renders_masked() {
		let (mut app, _tx) = harness::app();
		app.ledger.auth = Auth::SignedOut;
		app.ui.login.toggle();
		for c in "hunter2".chars() {
			app.ui.login.push_char(c);
		}
		let screen = harness::render(&app);
		assert!(!screen.contains("hunter2"));
		assert!(screen.contains("*******"));
	}
}

//! Interactive screen lifecycle: terminal setup, the event loop, teardown.

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
	DisableFocusChange, EnableFocusChange, Event, EventStream, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
	EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use qm_api::ApiClient;
use qm_ledger::{Ledger, LedgerMsg, LedgerOptions, LedgerReceiver, msg};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::config::Config;
use crate::input;
use crate::ui;

/// Sweep cadence for expiring notices while no input arrives.
const TICK: Duration = Duration::from_millis(250);

pub struct App {
	pub ledger: Ledger,
	pub ui: UiState,
	rx: LedgerReceiver,
	should_quit: bool,
}

/// View-local state the ledger has no business holding: cursors, focused
/// field indexes, half-typed credentials.
#[derive(Default)]
pub struct UiState {
	pub login: ui::login::LoginForm,
	pub table: ui::table::TableUi,
	pub details: ui::details::DetailsUi,
	pub approvals: ui::approvals::ApprovalsUi,
}

impl App {
	pub fn new(ledger: Ledger, rx: LedgerReceiver) -> Self {
		Self { ledger, ui: UiState::default(), rx, should_quit: false }
	}

	pub fn quit(&mut self) {
		self.should_quit = true;
	}

	pub fn should_quit(&self) -> bool {
		self.should_quit
	}

	fn handle_event(&mut self, event: Event) {
		match event {
			Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(self, key),
			// The badge may have gone stale while the terminal was unfocused.
			Event::FocusGained => self.ledger.refresh_badge(),
			_ => {}
		}
	}

	/// Applies one completion plus everything else already queued, then
	/// refreshes the active view once if any of them invalidated it.
	pub(crate) fn dispatch(&mut self, first: LedgerMsg) {
		let mut dirty = first.apply(&mut self.ledger);
		while let Ok(queued) = self.rx.try_recv() {
			dirty |= queued.apply(&mut self.ledger);
		}
		if dirty.needs_refetch() {
			self.ledger.refresh_current();
		}
	}
}

/// One resolved turn of the event loop.
enum Step {
	Input(Event),
	Completion(LedgerMsg),
	Tick,
	Closed,
}

pub async fn run(config: Config) -> Result<()> {
	let api = ApiClient::new(&config.api_url)?;
	let (tx, rx) = msg::channel();
	let options = LedgerOptions {
		session_dir: config.session_dir.clone(),
		download_dir: config.download_dir.clone(),
		poll_interval: config.poll_interval,
		page_size: config.page_size,
	};
	let mut app = App::new(Ledger::new(api, tx, options), rx);

	install_panic_hook();
	let mut terminal = setup_terminal()?;
	let result = event_loop(&mut terminal, &mut app).await;
	restore_terminal();
	result
}

async fn event_loop(
	terminal: &mut Terminal<CrosstermBackend<Stdout>>,
	app: &mut App,
) -> Result<()> {
	let mut events = EventStream::new();
	let mut ticker = tokio::time::interval(TICK);
	app.ledger.resume();

	while !app.should_quit {
		terminal.draw(|frame| ui::draw(frame, app))?;
		let step = tokio::select! {
			maybe_event = events.next() => match maybe_event {
				Some(Ok(event)) => Step::Input(event),
				Some(Err(err)) => return Err(err.into()),
				None => Step::Closed,
			},
			maybe_msg = app.rx.recv() => maybe_msg.map_or(Step::Closed, Step::Completion),
			_ = ticker.tick() => Step::Tick,
		};
		match step {
			Step::Input(event) => app.handle_event(event),
			Step::Completion(first) => app.dispatch(first),
			Step::Tick => {
				app.ledger.notices.sweep(Instant::now());
			}
			Step::Closed => break,
		}
	}
	Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
	enable_raw_mode()?;
	let mut stdout = io::stdout();
	execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
	Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Best-effort; also called from the panic hook where nothing can be done
/// about failures.
fn restore_terminal() {
	let _ = disable_raw_mode();
	let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableFocusChange);
}

fn install_panic_hook() {
	let original = std::panic::take_hook();
	std::panic::set_hook(Box::new(move |info| {
		restore_terminal();
		original(info);
	}));
}

#[cfg(test)]
mod tests {
	use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
	use pretty_assertions::assert_eq;
	use qm_ledger::msg::{AuthMsg, MutateMsg};
	use qm_ledger::{LoadPhase, TaskKey, View};
	use qm_model::Role;

	use crate::harness;

	#[tokio::test]
	async fn quit_key_sets_the_flag() {
		let (mut app, _tx) = harness::signed_in(Role::Admin);
		assert!(!app.should_quit());
		let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
		app.handle_event(crossterm::event::Event::Key(key));
		assert!(app.should_quit());
	}

	#[tokio::test]
	async fn dispatch_drains_the_queue_and_refreshes_once() {
		let (mut app, tx) = harness::signed_in(Role::Admin);
		app.ledger.in_flight.begin(TaskKey::Save(1));
		app.ledger.in_flight.begin(TaskKey::Delete(2));
		tx.send(
			MutateMsg::Deleted { property_id: 2, result: Ok(qm_api::DeleteOutcome::Deleted) }
				.into(),
		)
		.unwrap();

		// Both completions land in one dispatch; one refresh follows.
		app.dispatch(MutateMsg::Saved { property_id: 1, result: Ok(()) }.into());
		assert!(app.ledger.store.is_loading());
		assert!(!app.ledger.in_flight.contains(TaskKey::Save(1)));
		assert!(!app.ledger.in_flight.contains(TaskKey::Delete(2)));
	}

	#[tokio::test]
	async fn focus_gained_while_signed_out_is_ignored() {
		let (mut app, _tx) = harness::app();
		app.handle_event(crossterm::event::Event::FocusGained);
		assert_eq!(*app.ledger.store.phase(), LoadPhase::Idle);
	}

	#[tokio::test]
	async fn session_restore_miss_lands_on_login() {
		let (mut app, _tx) = harness::app();
		app.dispatch(AuthMsg::SessionResumed(Ok(None)).into());
		assert_eq!(app.ledger.view, View::Login);
	}
}

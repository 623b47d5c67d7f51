//! Headless subcommands that talk to the backend and exit.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::Local;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use qm_api::{ApiClient, NewAccount};
use qm_ledger::report;

use crate::cli::SignUpArgs;
use crate::config::Config;

pub async fn sign_up(config: &Config, args: SignUpArgs) -> Result<()> {
	let password = match args.password {
		Some(password) => password,
		None => prompt_password("Password: ")?,
	};
	if password.is_empty() {
		bail!("password must not be empty");
	}
	// A stored session rides along so a signed-in admin can hand out
	// privileged roles; anonymous sign-up still works without one.
	let api = ApiClient::new(&config.api_url)?;
	if let Ok(Some(session)) = qm_session::load(&config.session_dir) {
		api.set_token(Some(session.token));
	}
	let account = NewAccount {
		name: args.name,
		email: args.email.clone(),
		password,
		role: args.role,
		department: args.department,
	};
	api.sign_up(&account).await.context("sign-up rejected")?;
	println!("Account created for {}; run qm to sign in.", args.email);
	Ok(())
}

pub async fn export_report(config: &Config) -> Result<()> {
	let Some(session) = qm_session::load(&config.session_dir)? else {
		bail!("no stored session; run qm and sign in first");
	};
	let api = ApiClient::new(&config.api_url)?;
	api.set_token(Some(session.token));
	let user = api.current_user().await.context("stored session was not accepted")?;
	if !user.role.can_edit() {
		bail!("the {} role cannot export reports", user.role.label());
	}
	let bytes = api.download_report().await.context("report download failed")?;
	let path = report::save(&config.download_dir, Local::now(), &bytes)
		.await
		.context("writing the report file")?;
	println!("Report saved to {}", path.display());
	Ok(())
}

/// Reads a line with echo off. Raw mode is only held for the read itself.
fn prompt_password(prompt: &str) -> Result<String> {
	print!("{prompt}");
	std::io::stdout().flush()?;
	crossterm::terminal::enable_raw_mode()?;
	let entered = read_line_hidden();
	crossterm::terminal::disable_raw_mode()?;
	println!();
	entered
}

fn read_line_hidden() -> Result<String> {
	let mut line = String::new();
	loop {
		if let Event::Key(key) = crossterm::event::read()? {
			if key.kind != KeyEventKind::Press {
				continue;
			}
			match key.code {
				KeyCode::Enter => return Ok(line),
				KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
					bail!("cancelled")
				}
				KeyCode::Backspace => {
					line.pop();
				}
				KeyCode::Char(c) => line.push(c),
				_ => {}
			}
		}
	}
}

//! Command line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use qm_model::Role;

/// Terminal client for the quartermaster property inventory.
#[derive(Debug, Parser)]
#[command(name = "qm", version, about)]
pub struct Cli {
	/// Backend base URL (overrides QM_API_URL and the config file)
	#[arg(long, value_name = "URL")]
	pub api_url: Option<String>,

	/// Read configuration from this file instead of the default location
	#[arg(long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Log the qm crates at debug level
	#[arg(short, long)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Create an account, then exit
	SignUp(SignUpArgs),
	/// Download the inventory report into the download directory, then exit
	Report,
}

#[derive(Debug, Args)]
pub struct SignUpArgs {
	/// Display name for the new account
	#[arg(long)]
	pub name: String,

	/// Email address used to sign in
	#[arg(long)]
	pub email: String,

	/// Password; prompted for interactively when omitted
	#[arg(long)]
	pub password: Option<String>,

	/// Requested role, e.g. staff or property_custodian. The backend only
	/// honors roles the signed-in caller may hand out.
	#[arg(long)]
	pub role: Option<Role>,

	/// Department the account belongs to
	#[arg(long)]
	pub department: Option<String>,
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn bare_invocation_starts_the_screen() {
		let cli = Cli::try_parse_from(["qm"]).unwrap();
		assert!(cli.command.is_none());
		assert!(cli.api_url.is_none());
		assert!(!cli.verbose);
	}

	#[test]
	fn api_url_and_verbose_flags_parse() {
		let cli =
			Cli::try_parse_from(["qm", "--api-url", "http://gate:4000/api", "-v"]).unwrap();
		assert_eq!(cli.api_url.as_deref(), Some("http://gate:4000/api"));
		assert!(cli.verbose);
	}

	#[test]
	fn sign_up_parses_role_names_from_the_wire_form() {
		let cli = Cli::try_parse_from([
			"qm",
			"sign-up",
			"--name",
			"Dana Cruz",
			"--email",
			"dana@example.com",
			"--role",
			"property_custodian",
		])
		.unwrap();
		let Some(Command::SignUp(args)) = cli.command else {
			panic!("expected sign-up");
		};
		assert_eq!(args.role, Some(Role::PropertyCustodian));
		assert_eq!(args.password, None);
	}

	#[test]
	fn unknown_role_is_rejected() {
		let result = Cli::try_parse_from([
			"qm",
			"sign-up",
			"--name",
			"x",
			"--email",
			"x@y.z",
			"--role",
			"janitor",
		]);
		assert!(result.is_err());
	}

	#[test]
	fn report_takes_no_arguments() {
		let cli = Cli::try_parse_from(["qm", "report"]).unwrap();
		assert!(matches!(cli.command, Some(Command::Report)));
	}
}

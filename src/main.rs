#![deny(
	absolute_paths_not_starting_with_crate,
	future_incompatible,
	keyword_idents,
	macro_use_extern_crate,
	meta_variable_misuse,
	missing_abi,
	missing_copy_implementations,
	non_ascii_idents,
	nonstandard_style,
	noop_method_call,
	pointer_structural_match,
	private_in_public,
	rust_2018_idioms,
	unused_qualifications
)]
#![warn(clippy::pedantic)]
#![allow(clippy::let_underscore_drop)]
#![forbid(unsafe_code)]

use std::process::ExitCode;

use self::args::Outcome;
use self::config::Config;

mod args;
mod config;
mod file_list;
mod read_image;
mod viewer;

/// Directory arguments are always expanded recursively; there is no user
/// facing toggle.
const RECURSIVE: bool = true;

fn main() -> ExitCode {
	let args = match args::parse() {
		Outcome::Continue(args) => args,
		Outcome::ExitSuccess => return ExitCode::SUCCESS,
		Outcome::ExitFailure => return ExitCode::FAILURE,
	};

	let mut config = match Config::load() {
		Ok(config) => config,
		Err(error) => {
			eprintln!("Unable to load configuration: {error}");
			return ExitCode::FAILURE;
		}
	};
	args.apply_to(&mut config);

	let source = match file_list::resolve(&args.files, RECURSIVE) {
		Ok(source) => source,
		Err(error) => {
			eprintln!("{error}");
			return ExitCode::FAILURE;
		}
	};

	if viewer::run(config, source) {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	}
}

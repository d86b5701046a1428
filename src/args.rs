use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

use crate::config::{Color, Config, Geometry, Scale};
use crate::read_image;

/// What the command line asked for. The parser never terminates the process
/// itself; teardown ordering stays with `main`.
#[derive(Debug)]
pub enum Outcome {
	/// Keep going with the parsed options.
	Continue(Args),
	/// Help or version was printed; exit successfully.
	ExitSuccess,
	/// A diagnostic was printed; exit with a failure status.
	ExitFailure,
}

/// View images
#[derive(Parser, Debug)]
#[command(
	name = crate::config::APP_ID,
	version = version_string(),
	args_override_self = true,
	disable_version_flag = true
)]
pub struct Args {
	/// Full screen mode
	#[arg(short, long)]
	pub fullscreen: bool,

	/// Set initial image scale
	#[arg(short, long, value_name = "TYPE")]
	pub scale: Option<Scale>,

	/// Set background color as hex RGB
	#[arg(short, long, value_name = "RRGGBB")]
	pub background: Option<Color>,

	/// Set window geometry
	#[arg(short, long, value_name = "X,Y,W,H")]
	pub geometry: Option<Geometry>,

	/// Show image properties
	#[arg(short, long)]
	pub info: bool,

	/// Set window class/app_id
	#[arg(
		short,
		long,
		value_name = "NAME",
		value_parser = clap::builder::NonEmptyStringValueParser::new()
	)]
	pub class: Option<String>,

	/// Disable integration with Sway WM
	#[arg(short, long)]
	pub no_sway: bool,

	/// Print version info and exit
	#[arg(
		short = 'v',
		long,
		action = clap::ArgAction::Version,
		value_parser = clap::value_parser!(bool)
	)]
	version: Option<bool>,

	/// Image files or directories to show, or `-` to read from standard input
	#[arg(value_name = "FILE")]
	pub files: Vec<PathBuf>,
}

fn version_string() -> String {
	format!(
		"{}\nSupported formats: {}.",
		env!("CARGO_PKG_VERSION"),
		read_image::supported_formats()
	)
}

/// Parse the process arguments. Help, version and diagnostics are printed
/// here; the caller only sees the tagged outcome.
pub fn parse() -> Outcome {
	parse_from(std::env::args_os())
}

fn parse_from<I, T>(itr: I) -> Outcome
where
	I: IntoIterator<Item = T>,
	T: Into<OsString> + Clone,
{
	match Args::try_parse_from(itr) {
		Ok(args) => Outcome::Continue(args),
		Err(error) => {
			// routes help/version to stdout and diagnostics to stderr
			let _ = error.print();
			match error.kind() {
				ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Outcome::ExitSuccess,
				_ => Outcome::ExitFailure,
			}
		}
	}
}

impl Args {
	/// Overlay the parsed options onto the configuration, then run the final
	/// consistency pass.
	pub fn apply_to(&self, config: &mut Config) {
		if self.fullscreen {
			config.fullscreen = true;
		}
		if let Some(scale) = self.scale {
			config.scale = scale;
		}
		if let Some(background) = self.background {
			config.background = Some(background);
		}
		if let Some(geometry) = self.geometry {
			config.geometry = Some(geometry);
		}
		if self.info {
			config.show_info = true;
		}
		if let Some(class) = &self.class {
			config.app_id = class.clone();
		}
		if self.no_sway {
			config.sway = false;
		}
		config.check();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(args: &[&str]) -> Result<Args, clap::Error> {
		Args::try_parse_from(std::iter::once("swivel").chain(args.iter().copied()))
	}

	#[test]
	fn switches() {
		let args = parse(&["-f", "-i", "-n"]).unwrap();
		assert!(args.fullscreen);
		assert!(args.info);
		assert!(args.no_sway);

		let args = parse(&["--fullscreen", "--info", "--no-sway"]).unwrap();
		assert!(args.fullscreen && args.info && args.no_sway);

		let args = parse(&[]).unwrap();
		assert!(!args.fullscreen && !args.info && !args.no_sway);
	}

	#[test]
	fn scale_values() {
		for (text, scale) in [
			("default", Scale::Default),
			("fit", Scale::Fit),
			("real", Scale::Real),
		] {
			assert_eq!(parse(&["--scale", text]).unwrap().scale, Some(scale));
		}
		assert!(parse(&["--scale", "stretch"]).is_err());
		assert!(parse(&["--scale"]).is_err());
	}

	#[test]
	fn last_occurrence_wins() {
		let args = parse(&["-s", "fit", "-s", "real"]).unwrap();
		assert_eq!(args.scale, Some(Scale::Real));

		let args = parse(&["-b", "000000", "-b", "ffffff"]).unwrap();
		assert_eq!(
			args.background,
			Some(Color {
				r: 0xff,
				g: 0xff,
				b: 0xff
			})
		);
	}

	#[test]
	fn geometry_option() {
		let args = parse(&["--geometry", "10,20,640,480"]).unwrap();
		assert_eq!(
			args.geometry,
			Some(Geometry {
				x: 10,
				y: 20,
				width: 640,
				height: 480,
			})
		);
		assert!(parse(&["--geometry", "bad"]).is_err());
	}

	#[test]
	fn class_must_not_be_empty() {
		assert_eq!(parse(&["--class", "pics"]).unwrap().class.as_deref(), Some("pics"));
		assert!(parse(&["--class", ""]).is_err());
	}

	#[test]
	fn positional_arguments_are_collected_in_order() {
		let args = parse(&["-i", "b.jpg", "a.png"]).unwrap();
		assert_eq!(
			args.files,
			vec![PathBuf::from("b.jpg"), PathBuf::from("a.png")]
		);

		let args = parse(&["-"]).unwrap();
		assert_eq!(args.files, vec![PathBuf::from("-")]);
	}

	#[test]
	fn help_and_version_short_circuit() {
		// whichever token is scanned first wins
		assert_eq!(
			parse(&["--help", "--bogus"]).unwrap_err().kind(),
			ErrorKind::DisplayHelp
		);
		assert_eq!(
			parse(&["-v", "--bogus"]).unwrap_err().kind(),
			ErrorKind::DisplayVersion
		);
		assert_eq!(
			parse(&["--version", "--scale", "stretch"]).unwrap_err().kind(),
			ErrorKind::DisplayVersion
		);
		assert_ne!(
			parse(&["--bogus", "-v"]).unwrap_err().kind(),
			ErrorKind::DisplayVersion
		);
	}

	#[test]
	fn outcome_mapping() {
		assert!(matches!(
			parse_from(["swivel", "-h"]),
			Outcome::ExitSuccess
		));
		assert!(matches!(
			parse_from(["swivel", "-v"]),
			Outcome::ExitSuccess
		));
		assert!(matches!(
			parse_from(["swivel", "--bogus"]),
			Outcome::ExitFailure
		));
		assert!(matches!(
			parse_from(["swivel", "-s", "nope"]),
			Outcome::ExitFailure
		));
		assert!(matches!(
			parse_from(["swivel", "a.png"]),
			Outcome::Continue(_)
		));
	}

	#[test]
	fn apply_overrides_and_checks() {
		let mut config = Config::default();
		parse(&["-f", "-s", "real", "-c", "gallery"])
			.unwrap()
			.apply_to(&mut config);
		assert!(config.fullscreen);
		assert_eq!(config.scale, Scale::Real);
		assert_eq!(config.app_id, "gallery");
		// fullscreen always forces the sway integration off
		assert!(!config.sway);

		let mut config = Config::default();
		parse(&["-n"]).unwrap().apply_to(&mut config);
		assert!(!config.sway);
	}

	#[test]
	fn apply_keeps_unset_fields() {
		let mut config = Config {
			scale: Scale::Fit,
			show_info: true,
			..Config::default()
		};
		parse(&["-b", "123456"]).unwrap().apply_to(&mut config);
		assert_eq!(config.scale, Scale::Fit);
		assert!(config.show_info);
		assert_eq!(
			config.background,
			Some(Color {
				r: 0x12,
				g: 0x34,
				b: 0x56
			})
		);
	}

	#[test]
	fn version_text_names_the_formats() {
		assert!(version_string().contains("Supported formats:"));
		assert!(version_string().contains("PNG"));
	}
}

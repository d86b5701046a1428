use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::str::FromStr;

use figment::providers::{Format as _, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Default window class/app_id, also the name of the config directory.
pub const APP_ID: &str = "swivel";

/// Runtime settings. Loaded from the config file, then overridden by the
/// command line, then checked for cross-field consistency.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
	pub fullscreen: bool,
	pub scale: Scale,
	pub background: Option<Color>,
	pub geometry: Option<Geometry>,
	pub show_info: bool,
	pub app_id: String,
	pub sway: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			fullscreen: false,
			scale: Scale::Default,
			background: None,
			geometry: None,
			show_info: false,
			app_id: APP_ID.to_owned(),
			sway: true,
		}
	}
}

fn config_path() -> Option<PathBuf> {
	directories_next::ProjectDirs::from("", "", APP_ID)
		.map(|dirs| dirs.config_dir().join("config.toml"))
}

impl Config {
	/// Load the persisted configuration. Fields the file does not set keep
	/// their defaults; a missing file is not an error.
	pub fn load() -> Result<Self, figment::Error> {
		let mut figment = Figment::new();
		if let Some(path) = config_path() {
			figment = figment.merge(Toml::file(path));
		}
		figment.extract()
	}

	/// Cross-field consistency pass. Runs once, after all overrides.
	pub fn check(&mut self) {
		// fullscreen windows are managed by the compositor alone
		if self.fullscreen {
			self.sway = false;
		}
		if self.app_id.is_empty() {
			self.app_id = APP_ID.to_owned();
		}
	}
}

/// Initial image scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
	/// Fit the window, but never upscale
	#[default]
	Default,
	/// Fit the window
	Fit,
	/// Real size (100%)
	Real,
}

/// Background color, parsed from exactly six hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("expected six hex digits (RRGGBB), got {0:?}")]
pub struct ColorError(String);

impl FromStr for Color {
	type Err = ColorError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
			return Err(ColorError(s.to_owned()));
		}
		let channel = |range: std::ops::Range<usize>| {
			u8::from_str_radix(&s[range], 16).map_err(|_| ColorError(s.to_owned()))
		};
		Ok(Self {
			r: channel(0..2)?,
			g: channel(2..4)?,
			b: channel(4..6)?,
		})
	}
}

impl TryFrom<String> for Color {
	type Error = ColorError;

	fn try_from(s: String) -> Result<Self, Self::Error> {
		s.parse()
	}
}

impl From<Color> for String {
	fn from(color: Color) -> Self {
		color.to_string()
	}
}

impl fmt::Display for Color {
	fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(formatter, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

/// Window geometry: position and size, parsed from `X,Y,W,H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Geometry {
	pub x: i32,
	pub y: i32,
	pub width: u32,
	pub height: u32,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum GeometryError {
	#[error("expected four comma separated integers (X,Y,W,H)")]
	Arity,
	#[error(transparent)]
	Int(#[from] ParseIntError),
	#[error("width and height must be positive")]
	Zero,
}

impl FromStr for Geometry {
	type Err = GeometryError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut parts = s.split(',');
		let mut next = || parts.next().ok_or(GeometryError::Arity);
		let x = next()?.trim().parse()?;
		let y = next()?.trim().parse()?;
		let width: u32 = next()?.trim().parse()?;
		let height: u32 = next()?.trim().parse()?;
		drop(next);
		if parts.next().is_some() {
			return Err(GeometryError::Arity);
		}
		if width == 0 || height == 0 {
			return Err(GeometryError::Zero);
		}
		Ok(Self {
			x,
			y,
			width,
			height,
		})
	}
}

impl TryFrom<String> for Geometry {
	type Error = GeometryError;

	fn try_from(s: String) -> Result<Self, Self::Error> {
		s.parse()
	}
}

impl From<Geometry> for String {
	fn from(geometry: Geometry) -> Self {
		geometry.to_string()
	}
}

impl fmt::Display for Geometry {
	fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			formatter,
			"{},{},{},{}",
			self.x, self.y, self.width, self.height
		)
	}
}

use std::path::Path;
use std::process::Command;

use eframe::{CreationContext, NativeOptions};
use egui::{Color32, Context, Frame, Key, Pos2, TextureHandle, TextureOptions, Vec2};
use image::error::ImageError;
use image::ImageFormat;

use crate::config::{Config, Scale};
use crate::file_list::{FileList, Source};
use crate::read_image;

/// Run the viewer with the given configuration and input source.
///
/// Returns false when the initial image cannot be shown. Failures after the
/// window is open are reported inside it.
pub fn run(config: Config, source: Source) -> bool {
	let first = match &source {
		Source::List(files) => read_image::Image::read(&files.paths()[0]),
		Source::Stdin => read_image::Image::read_stdin(),
	};
	let first = match first {
		Ok(image) => image,
		Err(error) => {
			eprintln!("Unable to load the first image: {error}");
			return false;
		}
	};

	if config.sway && !config.fullscreen && std::env::var_os("SWAYSOCK").is_some() {
		sway_floating_rule(&config.app_id);
	}

	let native_options = NativeOptions {
		fullscreen: config.fullscreen,
		initial_window_pos: config
			.geometry
			.map(|geometry| Pos2::new(az::cast(geometry.x), az::cast(geometry.y))),
		initial_window_size: config
			.geometry
			.map(|geometry| Vec2::new(az::cast(geometry.width), az::cast(geometry.height))),
		..NativeOptions::default()
	};

	let app_id = config.app_id.clone();
	eframe::run_native(
		&app_id,
		native_options,
		Box::new(move |cc| Box::new(App::new(config, source, first, cc))),
	);
	true
}

/// Ask Sway to float our window before it opens. Best effort: failures are
/// ignored, the viewer works the same without the rule.
fn sway_floating_rule(app_id: &str) {
	let _ = Command::new("swaymsg")
		.arg(format!("for_window [title=\"{app_id}\"] floating enable"))
		.output();
}

struct Loaded {
	texture: TextureHandle,
	format: ImageFormat,
	width: u32,
	height: u32,
	file_size: Option<u64>,
	name: String,
}

impl Loaded {
	fn new(ctx: &Context, image: read_image::Image, path: Option<&Path>) -> Self {
		let name = path.map_or_else(|| "(stdin)".to_owned(), |path| path.display().to_string());
		let texture = ctx.load_texture(
			name.clone(),
			egui::ColorImage {
				size: [az::cast(image.width), az::cast(image.height)],
				pixels: image.pixels,
			},
			TextureOptions::LINEAR,
		);
		let file_size = path
			.and_then(|path| std::fs::metadata(path).ok())
			.map(|metadata| metadata.len());
		Self {
			texture,
			format: image.format,
			width: image.width,
			height: image.height,
			file_size,
			name,
		}
	}

	fn load(ctx: &Context, path: &Path) -> Result<Self, ImageError> {
		read_image::Image::read(path).map(|image| Self::new(ctx, image, Some(path)))
	}
}

#[derive(Clone, Copy)]
enum Direction {
	Next,
	Prev,
}

enum Action {
	Quit,
	ToggleFullscreen,
	ToggleInfo,
	Go(Direction),
}

struct App {
	config: Config,
	/// Absent in pipe mode, where there is nothing to navigate.
	files: Option<FileList>,
	index: usize,
	image: Result<Loaded, ImageError>,
}

impl App {
	fn new(config: Config, source: Source, first: read_image::Image, cc: &CreationContext<'_>) -> Self {
		let files = match source {
			Source::List(files) => Some(files),
			Source::Stdin => None,
		};
		let path = files.as_ref().map(|files| files.paths()[0].clone());
		let image = Ok(Loaded::new(&cc.egui_ctx, first, path.as_deref()));
		Self {
			config,
			files,
			index: 0,
			image,
		}
	}

	fn navigate(&mut self, ctx: &Context, direction: Direction) {
		let Some(files) = &self.files else { return };
		let len = files.paths().len();
		self.index = match direction {
			Direction::Next => (self.index + 1) % len,
			Direction::Prev => self.index.checked_sub(1).unwrap_or(len - 1),
		};
		self.image = Loaded::load(ctx, &files.paths()[self.index]);
	}

	fn handle_keys(&mut self, ctx: &Context, frame: &mut eframe::Frame) {
		let action = {
			let input = ctx.input();
			if input.key_pressed(Key::Escape) || input.key_pressed(Key::Q) {
				Some(Action::Quit)
			} else if input.key_pressed(Key::F) {
				Some(Action::ToggleFullscreen)
			} else if input.key_pressed(Key::I) {
				Some(Action::ToggleInfo)
			} else if input.key_pressed(Key::ArrowRight)
				|| input.key_pressed(Key::Space)
				|| input.key_pressed(Key::N)
			{
				Some(Action::Go(Direction::Next))
			} else if input.key_pressed(Key::ArrowLeft)
				|| input.key_pressed(Key::Backspace)
				|| input.key_pressed(Key::P)
			{
				Some(Action::Go(Direction::Prev))
			} else {
				None
			}
		};

		match action {
			Some(Action::Quit) => frame.close(),
			Some(Action::ToggleFullscreen) => {
				let fullscreen = frame.info().window_info.fullscreen;
				frame.set_fullscreen(!fullscreen);
			}
			Some(Action::ToggleInfo) => self.config.show_info = !self.config.show_info,
			Some(Action::Go(direction)) => self.navigate(ctx, direction),
			None => {}
		}
	}

	fn show_info(&self, ctx: &Context) {
		fn key(ui: &mut egui::Ui, s: &str) {
			ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
				ui.label(s);
			});
		}

		if !self.config.show_info {
			return;
		}

		let Ok(image) = &self.image else { return };

		let properties = |ui: &mut egui::Ui| {
			key(ui, "File");
			ui.label(&image.name);
			ui.end_row();

			key(ui, "Format");
			ui.label(read_image::format_name(image.format));
			ui.end_row();

			key(ui, "Size");
			ui.label(format!("{}x{}", image.width, image.height));
			ui.end_row();

			if let Some(file_size) = image.file_size {
				key(ui, "File size");
				ui.label(humansize::format_size(file_size, humansize::BINARY));
				ui.end_row();
			}
		};

		egui::SidePanel::right("properties").show(ctx, |ui| {
			ui.vertical_centered(|ui| {
				ui.heading("Properties");
				egui::Grid::new("properties-grid")
					.num_columns(2)
					.show(ui, properties);
			});
		});
	}

	fn show_central(&self, ctx: &Context) {
		let panel = egui::CentralPanel::default().frame(Frame::none());
		panel.show(ctx, |ui| match &self.image {
			Ok(image) => {
				ui.centered_and_justified(|ui| {
					let background = self.config.background.map_or_else(
						|| ui.style().visuals.widgets.noninteractive.bg_fill,
						|color| Color32::from_rgb(color.r, color.g, color.b),
					);
					ui.painter()
						.rect_filled(ui.max_rect(), egui::Rounding::none(), background);
					let size = display_size(
						image.texture.size_vec2(),
						ui.available_size(),
						self.config.scale,
					);
					ui.add(egui::widgets::Image::new(image.texture.id(), size));
				});
			}
			Err(error) => {
				ui.heading(format!("error: {error:?}"));
			}
		});
	}
}

impl eframe::App for App {
	fn update(&mut self, ctx: &Context, frame: &mut eframe::Frame) {
		self.handle_keys(ctx, frame);
		self.show_info(ctx);
		self.show_central(ctx);
	}
}

/// Size at which to paint the image under the configured initial scale.
fn display_size(actual: Vec2, available: Vec2, scale: Scale) -> Vec2 {
	fn fit(actual: Vec2, available: Vec2) -> Vec2 {
		let x_ratio = available.x / actual.x;
		let y_ratio = available.y / actual.y;
		actual * std::cmp::min_by(x_ratio, y_ratio, |a, b| a.partial_cmp(b).unwrap())
	}

	match scale {
		Scale::Real => actual,
		Scale::Fit => fit(actual, available),
		Scale::Default => {
			if actual.x < available.x && actual.y < available.y {
				actual
			} else {
				fit(actual, available)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const WINDOW: Vec2 = Vec2::new(800.0, 600.0);

	#[test]
	fn real_scale_keeps_the_actual_size() {
		let actual = Vec2::new(4000.0, 100.0);
		assert_eq!(display_size(actual, WINDOW, Scale::Real), actual);
	}

	#[test]
	fn fit_scale_always_fits_the_window() {
		// larger than the window: shrinks, aspect kept
		let size = display_size(Vec2::new(1600.0, 600.0), WINDOW, Scale::Fit);
		assert_eq!(size, Vec2::new(800.0, 300.0));

		// smaller than the window: grows, aspect kept
		let size = display_size(Vec2::new(80.0, 60.0), WINDOW, Scale::Fit);
		assert_eq!(size, Vec2::new(800.0, 600.0));
	}

	#[test]
	fn default_scale_never_upscales() {
		let small = Vec2::new(80.0, 60.0);
		assert_eq!(display_size(small, WINDOW, Scale::Default), small);

		let large = Vec2::new(1600.0, 600.0);
		assert_eq!(
			display_size(large, WINDOW, Scale::Default),
			Vec2::new(800.0, 300.0)
		);
	}
}

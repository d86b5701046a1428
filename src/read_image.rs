use std::io::{BufRead, Cursor, Read as _, Seek};
use std::path::Path;

use egui::Color32;
use image::error::{ImageError, ImageFormatHint};
use image::ImageFormat;

/// A decoded image: RGBA pixels ready for texture upload.
pub struct Image {
	pub format: ImageFormat,
	pub width: u32,
	pub height: u32,
	pub pixels: Vec<Color32>,
}

impl Image {
	/// Read an image file. The format is guessed from the content, not the
	/// file name.
	pub fn read(path: &Path) -> Result<Self, ImageError> {
		let reader = image::io::Reader::open(path)?;
		let reader = reader.with_guessed_format()?;
		let format = reader.format().ok_or_else(|| {
			ImageError::Unsupported(ImageFormatHint::PathExtension(path.to_owned()).into())
		})?;
		Self::decode(reader, format)
	}

	/// Read a single image from standard input (pipe mode).
	pub fn read_stdin() -> Result<Self, ImageError> {
		let mut data = Vec::new();
		std::io::stdin().lock().read_to_end(&mut data)?;
		let reader = image::io::Reader::new(Cursor::new(data)).with_guessed_format()?;
		let format = reader
			.format()
			.ok_or_else(|| ImageError::Unsupported(ImageFormatHint::Unknown.into()))?;
		Self::decode(reader, format)
	}

	fn decode<R: BufRead + Seek>(
		reader: image::io::Reader<R>,
		format: ImageFormat,
	) -> Result<Self, ImageError> {
		let image = reader.decode()?.into_rgba8();
		let (width, height) = image.dimensions();
		Ok(Self {
			format,
			width,
			height,
			pixels: bytemuck::allocation::cast_vec(image.into_raw()),
		})
	}
}

pub fn format_name(format: ImageFormat) -> &'static str {
	match format {
		ImageFormat::Png => "PNG",
		ImageFormat::Jpeg => "JPEG",
		ImageFormat::Gif => "GIF",
		ImageFormat::WebP => "WEBP",
		ImageFormat::Pnm => "PNM",
		ImageFormat::Tiff => "TIFF",
		ImageFormat::Tga => "TGA",
		ImageFormat::Dds => "DDS",
		ImageFormat::Bmp => "BMP",
		ImageFormat::Ico => "ICO",
		ImageFormat::Hdr => "HDR",
		ImageFormat::OpenExr => "OpenEXR",
		ImageFormat::Farbfeld => "Farbfeld",
		_ => "unknown",
	}
}

/// Human readable list of decodable formats, printed by `--version`.
pub fn supported_formats() -> String {
	const SUPPORTED: &[ImageFormat] = &[
		ImageFormat::Png,
		ImageFormat::Jpeg,
		ImageFormat::Gif,
		ImageFormat::WebP,
		ImageFormat::Pnm,
		ImageFormat::Tiff,
		ImageFormat::Tga,
		ImageFormat::Dds,
		ImageFormat::Bmp,
		ImageFormat::Ico,
		ImageFormat::Hdr,
		ImageFormat::OpenExr,
		ImageFormat::Farbfeld,
	];

	let names: Vec<&str> = SUPPORTED.iter().copied().map(format_name).collect();
	names.join(", ")
}

#[cfg(test)]
mod tests {
	use std::fs;

	use super::*;

	#[test]
	fn reads_back_an_encoded_image() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("red.png");
		image::RgbaImage::from_pixel(2, 3, image::Rgba([255, 0, 0, 255]))
			.save(&path)
			.unwrap();

		let image = Image::read(&path).unwrap();
		assert_eq!(image.format, ImageFormat::Png);
		assert_eq!((image.width, image.height), (2, 3));
		assert_eq!(image.pixels.len(), 6);
		assert!(image
			.pixels
			.iter()
			.all(|&pixel| pixel == Color32::from_rgb(255, 0, 0)));
	}

	#[test]
	fn format_is_guessed_from_content() {
		// the extension lies; the bytes are PNG
		let mut bytes = Vec::new();
		image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 255]))
			.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
			.unwrap();

		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("mislabeled.jpg");
		fs::write(&path, &bytes).unwrap();

		assert_eq!(Image::read(&path).unwrap().format, ImageFormat::Png);
	}

	#[test]
	fn missing_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		assert!(Image::read(&dir.path().join("nope.png")).is_err());
	}

	#[test]
	fn garbage_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("garbage.png");
		fs::write(&path, b"not an image at all").unwrap();
		assert!(Image::read(&path).is_err());
	}

	#[test]
	fn supported_formats_lists_the_usual_suspects() {
		let formats = supported_formats();
		for name in ["PNG", "JPEG", "GIF", "BMP", "WEBP"] {
			assert!(formats.contains(name), "missing {name} in {formats}");
		}
	}
}

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Token that selects pipe mode when it is the sole positional argument.
const STDIN_MARKER: &str = "-";

/// Resolved input source for the viewer.
#[derive(Debug)]
pub enum Source {
	/// Ordered list of image files to show.
	List(FileList),
	/// Read a single image from standard input.
	Stdin,
}

/// Why resolution produced nothing. The resolver never prints; the caller
/// reports this.
#[derive(Debug, Clone, Copy, thiserror::Error)]
pub enum ResolveError {
	#[error("No image files found in the current directory")]
	EmptyDirectory,
	#[error("Unable to compose a file list from the given arguments")]
	EmptyArguments,
}

/// Ordered, non-empty collection of candidate image paths.
#[derive(Debug)]
pub struct FileList {
	paths: Vec<PathBuf>,
}

/// Resolve the residual (non-option) arguments into an input source.
pub fn resolve(args: &[PathBuf], recursive: bool) -> Result<Source, ResolveError> {
	match args {
		[] => FileList::from_paths(&[PathBuf::from(".")], recursive)
			.map(Source::List)
			.ok_or(ResolveError::EmptyDirectory),
		[only] if only.as_os_str() == STDIN_MARKER => Ok(Source::Stdin),
		paths => FileList::from_paths(paths, recursive)
			.map(Source::List)
			.ok_or(ResolveError::EmptyArguments),
	}
}

impl FileList {
	/// Build a list from explicit paths, in argument order: directories are
	/// scanned for image files, plain files are taken as given, anything
	/// else is skipped. Returns `None` when nothing usable is found.
	pub fn from_paths(paths: &[PathBuf], recursive: bool) -> Option<Self> {
		let mut collected = Vec::new();
		for path in paths {
			if path.is_dir() {
				scan_directory(path, recursive, &mut collected);
			} else if path.is_file() {
				collected.push(path.clone());
			}
		}
		collected.dedup();
		if collected.is_empty() {
			None
		} else {
			Some(Self { paths: collected })
		}
	}

	pub fn paths(&self) -> &[PathBuf] {
		&self.paths
	}
}

/// Collect image files under `dir`, sorted by file name at every level so
/// the traversal order is stable.
fn scan_directory(dir: &Path, recursive: bool, out: &mut Vec<PathBuf>) {
	let mut walk = WalkDir::new(dir).sort_by_file_name();
	if !recursive {
		walk = walk.max_depth(1);
	}
	out.extend(
		walk.into_iter()
			.filter_map(Result::ok)
			.filter(|entry| entry.file_type().is_file())
			.filter(|entry| image::ImageFormat::from_path(entry.path()).is_ok())
			.map(walkdir::DirEntry::into_path),
	);
}

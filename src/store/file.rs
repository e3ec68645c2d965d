use crate::error::{Result, StoreError};
use crate::store::layered::{Destination, LayeredConfig};
use crate::store::section::Section;
use crate::store::writer::write_layer;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the directory under the platform config dir holding the global file.
const APP_DIR: &str = "inilayer";

/// File name used for both the local and the global configuration.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// A configuration loaded from disk, with the paths that could not be opened.
#[derive(Debug, Default)]
pub struct Loaded {
	/// The parsed configuration (empty layers for unopenable files).
	pub config: LayeredConfig,

	/// Files that could not be opened, in the order they were tried.
	pub missing: Vec<PathBuf>,
}

impl Loaded {
	/// Whether any requested file could not be opened.
	pub fn no_file(&self) -> bool {
		!self.missing.is_empty()
	}

	pub fn into_inner(self) -> LayeredConfig {
		self.config
	}
}

impl LayeredConfig {
	/// Load the local layer from `path`.
	///
	/// A file that cannot be opened is not an error: it is logged, recorded in
	/// [`Loaded::missing`] and leaves the layer empty.
	pub fn from_file(path: impl AsRef<Path>) -> Loaded {
		let mut loaded = Loaded::default();
		load_into(&mut loaded, path.as_ref(), Destination::Local);
		loaded
	}

	/// Load both layers. The global file is read first.
	pub fn from_files(local: impl AsRef<Path>, global: impl AsRef<Path>) -> Loaded {
		let mut loaded = Loaded::default();
		load_into(&mut loaded, global.as_ref(), Destination::Global);
		load_into(&mut loaded, local.as_ref(), Destination::Local);
		loaded
	}

	/// Write the local layer to `path`, replacing its content.
	pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();
		let file = open_for_write(path)?;
		replace_content(file, self.layer(Destination::Local), path)
	}

	/// Write both layers to their files.
	///
	/// Both files are opened before either is modified, so a destination that
	/// cannot be opened leaves both files untouched.
	pub fn to_files(&self, local: impl AsRef<Path>, global: impl AsRef<Path>) -> Result<()> {
		let (local, global) = (local.as_ref(), global.as_ref());
		let local_file = open_for_write(local)?;
		let global_file = open_for_write(global)?;

		replace_content(global_file, self.layer(Destination::Global), global)?;
		replace_content(local_file, self.layer(Destination::Local), local)
	}
}

fn load_into(loaded: &mut Loaded, path: &Path, destination: Destination) {
	match File::open(path) {
		Ok(file) => {
			tracing::debug!(path = %path.display(), ?destination, "Loading configuration file");
			loaded.config.parse(BufReader::new(file), destination);
		}
		Err(error) => {
			tracing::warn!(path = %path.display(), %error, "Unable to open configuration file");
			loaded.missing.push(path.to_path_buf());
		}
	}
}

/// Open without truncating; content is only replaced once writing starts.
fn open_for_write(path: &Path) -> Result<File> {
	OpenOptions::new()
		.write(true)
		.create(true)
		.truncate(false)
		.open(path)
		.map_err(|source| StoreError::Write {
			path: path.to_path_buf(),
			source,
		})
}

fn replace_content(file: File, layer: &BTreeMap<String, Section>, path: &Path) -> Result<()> {
	let write = || -> std::io::Result<()> {
		file.set_len(0)?;
		let mut writer = BufWriter::new(&file);
		write_layer(layer, &mut writer)?;
		writer.flush()
	};

	write().map_err(|source| StoreError::Write {
		path: path.to_path_buf(),
		source,
	})
}

/// Default location of the global configuration file.
pub fn default_global_path() -> Result<PathBuf> {
	let config_dir = dirs::config_dir().ok_or(StoreError::ConfigDirNotFound)?;
	Ok(config_dir.join(APP_DIR).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	#[test]
	fn test_from_file_missing_is_empty() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("absent.ini");

		let loaded = LayeredConfig::from_file(&path);

		assert!(loaded.no_file());
		assert_eq!(loaded.missing, vec![path]);
		assert!(loaded.config.is_empty());
	}

	#[test]
	fn test_from_file_reads_local_layer() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("config.ini");
		fs::write(&path, "[s]\nk = v\n").unwrap();

		let loaded = LayeredConfig::from_file(&path);

		assert!(!loaded.no_file());
		let config = loaded.into_inner();
		assert_eq!(config.layer(Destination::Local)["s"].get("k"), Some("v"));
	}

	#[test]
	fn test_from_files_reports_each_missing_file() {
		let temp_dir = tempfile::tempdir().unwrap();
		let local = temp_dir.path().join("local.ini");
		let global = temp_dir.path().join("global.ini");
		fs::write(&global, "[s]\nk = g\n").unwrap();

		let loaded = LayeredConfig::from_files(&local, &global);
		assert_eq!(loaded.missing, vec![local.clone()]);
		assert_eq!(loaded.config.get("s", "k"), Some("g"));

		fs::remove_file(&global).unwrap();
		let loaded = LayeredConfig::from_files(&local, &global);
		assert_eq!(loaded.missing, vec![global, local]);
	}

	#[test]
	fn test_to_file_round_trip() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("config.ini");

		let mut config = LayeredConfig::new();
		let _ = config.set("s", "k", "v", Destination::Local);
		let _ = config.set("g", "k", "global only", Destination::Global);
		config.to_file(&path).unwrap();

		assert_eq!(fs::read_to_string(&path).unwrap(), "[s]\nk = v\n\n");

		let reloaded = LayeredConfig::from_file(&path).into_inner();
		assert_eq!(reloaded.get("s", "k"), Some("v"));
		assert!(reloaded.find("g").is_none());
	}

	#[test]
	fn test_to_file_replaces_longer_content() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("config.ini");
		fs::write(&path, "[old]\nsome = very long content that must disappear\n").unwrap();

		let mut config = LayeredConfig::new();
		let _ = config.set("s", "k", "v", Destination::Local);
		config.to_file(&path).unwrap();

		assert_eq!(fs::read_to_string(&path).unwrap(), "[s]\nk = v\n\n");
	}

	#[test]
	fn test_to_file_unwritable_path() {
		let temp_dir = tempfile::tempdir().unwrap();
		let path = temp_dir.path().join("no/such/dir/config.ini");

		let config = LayeredConfig::new();
		let result = config.to_file(&path);

		match result {
			Err(StoreError::Write { path: failed, .. }) => assert_eq!(failed, path),
			other => panic!("Expected Write error, got {other:?}"),
		}
	}

	#[test]
	fn test_to_files_writes_both_layers() {
		let temp_dir = tempfile::tempdir().unwrap();
		let local = temp_dir.path().join("local.ini");
		let global = temp_dir.path().join("global.ini");

		let mut config = LayeredConfig::new();
		let _ = config.set("s", "k", "l", Destination::Local);
		let _ = config.set("s", "k", "g", Destination::Global);
		config.to_files(&local, &global).unwrap();

		assert_eq!(fs::read_to_string(&local).unwrap(), "[s]\nk = l\n\n");
		assert_eq!(fs::read_to_string(&global).unwrap(), "[s]\nk = g\n\n");
	}

	#[test]
	fn test_to_files_leaves_local_untouched_when_global_fails() {
		let temp_dir = tempfile::tempdir().unwrap();
		let local = temp_dir.path().join("local.ini");
		let global = temp_dir.path().join("missing-dir/global.ini");
		fs::write(&local, "[keep]\nme = 1\n").unwrap();

		let mut config = LayeredConfig::new();
		let _ = config.set("s", "k", "new", Destination::Local);
		let result = config.to_files(&local, &global);

		assert!(matches!(result, Err(StoreError::Write { .. })));
		assert_eq!(fs::read_to_string(&local).unwrap(), "[keep]\nme = 1\n");
	}

	#[test]
	fn test_default_global_path() {
		if let Ok(path) = default_global_path() {
			assert!(path.ends_with("inilayer/config.ini"));
		}
	}
}

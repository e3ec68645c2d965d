use std::path::PathBuf;

/// Library-level structured errors for inilayer.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("Failed to write configuration file: {path}")]
	Write {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to serialize configuration")]
	Serialize {
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to export configuration as TOML")]
	Export {
		#[source]
		source: toml::ser::Error,
	},

	#[error("Failed to resolve the platform configuration directory")]
	ConfigDirNotFound,
}

/// Why a token value could not be read as a number.
///
/// Accessors recover from these by substituting the caller's default, so they
/// only surface through [`crate::codec::parse_number`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
	#[error("empty value")]
	Empty,

	#[error("value does not start with a number")]
	Invalid,

	#[error("value out of range for the target type")]
	OutOfRange,

	#[error("unexpected characters after the number")]
	TrailingCharacters,

	#[error("unsupported base: {base}")]
	UnsupportedBase { base: u32 },
}

/// Result type alias using StoreError.
pub type Result<T> = std::result::Result<T, StoreError>;

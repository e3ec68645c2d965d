//! Diagnostics sink setup.
//!
//! The library only emits `tracing` events; nothing is printed until the
//! application installs a subscriber with [`init`].

use tracing::Level;

/// Map a `-v` count to the most verbose level that is shown.
pub fn level_for(verbosity: u8) -> Level {
	match verbosity {
		0 => Level::WARN,
		1 => Level::INFO,
		2 => Level::DEBUG,
		_ => Level::TRACE,
	}
}

/// Install a stderr subscriber for the whole process.
pub fn init(verbosity: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	tracing_subscriber::fmt()
		.with_max_level(level_for(verbosity))
		.with_writer(std::io::stderr)
		.with_target(false)
		.try_init()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_level_for_verbosity() {
		assert_eq!(level_for(0), Level::WARN);
		assert_eq!(level_for(1), Level::INFO);
		assert_eq!(level_for(2), Level::DEBUG);
		assert_eq!(level_for(3), Level::TRACE);
		assert_eq!(level_for(200), Level::TRACE);
	}
}

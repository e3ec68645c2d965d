use crate::error::{Result, StoreError};
use crate::store::layered::{Destination, LayeredConfig};
use crate::store::section::Section;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};

/// Write one layer in the text format.
///
/// Headers are only written for sections with at least one non-empty value,
/// and empty values are never written. Every section is followed by a blank
/// line.
pub(crate) fn write_layer<W: Write>(
	layer: &BTreeMap<String, Section>,
	writer: &mut W,
) -> io::Result<()> {
	for (name, section) in layer {
		let mut header_written = false;
		for (key, value) in section {
			if value.is_empty() {
				continue;
			}
			if !header_written {
				writeln!(writer, "[{name}]")?;
				header_written = true;
			}
			writeln!(writer, "{key} = {value}")?;
		}
		writeln!(writer)?;
	}
	Ok(())
}

impl LayeredConfig {
	/// Write the local layer.
	pub fn serialize<W: Write>(&self, mut local: W) -> Result<()> {
		write_layer(self.layer(Destination::Local), &mut local)
			.map_err(|source| StoreError::Serialize { source })
	}

	/// Write both layers, global first.
	pub fn serialize_both<L: Write, G: Write>(&self, mut local: L, mut global: G) -> Result<()> {
		write_layer(self.layer(Destination::Global), &mut global)
			.and_then(|()| write_layer(self.layer(Destination::Local), &mut local))
			.map_err(|source| StoreError::Serialize { source })
	}

	/// Effective configuration as a TOML document, one table per section.
	pub fn to_toml(&self) -> Result<String> {
		let merged: BTreeMap<String, Section> = self
			.names()
			.into_iter()
			.map(|name| {
				let section = self.merged(&name);
				(name, section)
			})
			.collect();

		toml::to_string(&merged).map_err(|source| StoreError::Export { source })
	}
}

/// Every section name with its resolved section, empty values included.
impl fmt::Display for LayeredConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for name in self.names() {
			writeln!(f, "[{name}]")?;
			for (key, value) in self.section(&name) {
				writeln!(f, "{key} = {value}")?;
			}
			writeln!(f)?;
		}
		Ok(())
	}
}

use crate::store::section::Section;
use std::collections::BTreeMap;
use std::io::{BufRead, ErrorKind};

/// Byte order mark some editors put at the start of UTF-8 files.
const BOM: char = '\u{feff}';

/// What a single trimmed line of the format means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line<'a> {
	/// Nothing to do: blank, no `=`, or an empty value.
	Skip,
	/// `[name]` switches the current section.
	Header(&'a str),
	/// `key = value` with a non-empty value.
	Entry(&'a str, &'a str),
}

/// Classify one line. Anything that is not a header or `key = value` is skipped.
pub(crate) fn parse_line(line: &str) -> Line<'_> {
	let line = line.trim();
	if line.is_empty() {
		return Line::Skip;
	}

	if line.len() >= 2
		&& let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']'))
	{
		return Line::Header(name);
	}

	match line.split_once('=') {
		Some((key, value)) if !value.trim().is_empty() => Line::Entry(key.trim(), value.trim()),
		_ => Line::Skip,
	}
}

/// Read a whole stream into `layer`.
///
/// Entries before the first header land in `no_section`. Sections already in
/// `layer` are reused, so repeated headers merge. Reading stops at end of
/// stream or at the first I/O error, keeping whatever was read so far.
pub(crate) fn parse_into<R: BufRead>(
	mut reader: R,
	no_section: &mut Section,
	layer: &mut BTreeMap<String, Section>,
) {
	let mut current: Option<String> = None;
	let mut buffer = Vec::new();
	let mut first_line = true;

	loop {
		buffer.clear();
		match reader.read_until(b'\n', &mut buffer) {
			Ok(0) => break,
			Ok(_) => {}
			Err(error) if error.kind() == ErrorKind::Interrupted => continue,
			Err(error) => {
				tracing::warn!(%error, "Stopped reading configuration stream");
				break;
			}
		}

		let decoded = String::from_utf8_lossy(&buffer);
		let mut text = decoded.as_ref();
		if first_line {
			text = text.trim_start_matches(BOM);
			first_line = false;
		}

		match parse_line(text) {
			Line::Skip => {}
			Line::Header(name) => {
				layer
					.entry(name.to_string())
					.or_insert_with(|| Section::new(name));
				current = Some(name.to_string());
			}
			Line::Entry(key, value) => {
				let section = match current.as_deref() {
					Some(name) => layer
						.entry(name.to_string())
						.or_insert_with(|| Section::new(name)),
					None => &mut *no_section,
				};
				let _ = section.set(key, value);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::{self, Cursor, Read};

	fn parse_str(content: &str) -> (Section, BTreeMap<String, Section>) {
		let mut no_section = Section::unnamed();
		let mut layer = BTreeMap::new();
		parse_into(Cursor::new(content), &mut no_section, &mut layer);
		(no_section, layer)
	}

	#[test]
	fn test_parse_line_shapes() {
		assert_eq!(parse_line(""), Line::Skip);
		assert_eq!(parse_line("   \t"), Line::Skip);
		assert_eq!(parse_line(" [core] "), Line::Header("core"));
		assert_eq!(parse_line("[]"), Line::Header(""));
		assert_eq!(parse_line("key = value"), Line::Entry("key", "value"));
		assert_eq!(parse_line("key=a=b"), Line::Entry("key", "a=b"));
		assert_eq!(parse_line("key ="), Line::Skip);
		assert_eq!(parse_line("no equals here"), Line::Skip);
		assert_eq!(parse_line("[unterminated"), Line::Skip);
		assert_eq!(parse_line("["), Line::Skip);
	}

	#[test]
	fn test_parse_header_keeps_inner_spaces() {
		assert_eq!(parse_line("[ spaced ]"), Line::Header(" spaced "));
	}

	#[test]
	fn test_parse_sections_and_values() {
		let (no_section, layer) = parse_str("[a]\nk = 1\n\n[b]\nk2 = \n");

		assert!(no_section.is_empty());
		assert_eq!(layer["a"].get("k"), Some("1"));
		assert!(layer.contains_key("b"));
		assert!(layer["b"].is_empty());
	}

	#[test]
	fn test_parse_keys_before_header_go_to_no_section() {
		let (no_section, layer) = parse_str("top = level\n[s]\nk = v\n");

		assert_eq!(no_section.get("top"), Some("level"));
		assert_eq!(layer["s"].get("k"), Some("v"));
		assert!(!layer["s"].contains_key("top"));
	}

	#[test]
	fn test_parse_repeated_header_merges() {
		let (_, layer) = parse_str("[s]\na = 1\n[t]\nx = 0\n[s]\nb = 2\na = 3\n");

		assert_eq!(layer.len(), 2);
		assert_eq!(layer["s"].get("a"), Some("3"));
		assert_eq!(layer["s"].get("b"), Some("2"));
	}

	#[test]
	fn test_parse_ignores_malformed_lines() {
		let (_, layer) = parse_str("[s]\n; not a comment, just junk\nvalid = yes\n]odd[\n");

		assert_eq!(layer["s"].len(), 1);
		assert_eq!(layer["s"].get("valid"), Some("yes"));
	}

	#[test]
	fn test_parse_crlf_and_bom() {
		let (_, layer) = parse_str("\u{feff}[s]\r\nkey = value\r\n");

		assert_eq!(layer["s"].get("key"), Some("value"));
	}

	#[test]
	fn test_parse_invalid_utf8_is_lossy() {
		let bytes: &[u8] = b"[s]\nk = caf\xe9\nn = 1\n";
		let mut no_section = Section::unnamed();
		let mut layer = BTreeMap::new();
		parse_into(bytes, &mut no_section, &mut layer);

		assert_eq!(layer["s"].get("k"), Some("caf\u{fffd}"));
		assert_eq!(layer["s"].get("n"), Some("1"));
	}

	#[test]
	fn test_parse_last_line_without_newline() {
		let (_, layer) = parse_str("[s]\nk = v");
		assert_eq!(layer["s"].get("k"), Some("v"));
	}

	struct FailingReader {
		served: bool,
	}

	impl Read for FailingReader {
		fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
			if self.served {
				return Err(io::Error::other("disk on fire"));
			}
			self.served = true;
			let chunk = b"[s]\nk = v\n";
			buf[..chunk.len()].copy_from_slice(chunk);
			Ok(chunk.len())
		}
	}

	#[test]
	fn test_parse_stops_at_read_error() {
		let mut no_section = Section::unnamed();
		let mut layer = BTreeMap::new();
		let reader = io::BufReader::new(FailingReader { served: false });
		parse_into(reader, &mut no_section, &mut layer);

		assert_eq!(layer["s"].get("k"), Some("v"));
	}
}

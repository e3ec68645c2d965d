/// Separator between elements of an encoded list value.
pub const SEPARATOR: char = ',';

/// Escape character; the character following it is always taken literally.
pub const ESCAPE: char = '\\';

/// Optional quote around an element; separators inside quotes are literal.
pub const QUOTE: char = '"';

/// Encode a sequence of strings into a single value.
///
/// Every separator, escape and quote character inside an element is escaped,
/// so `decode` gives back the same elements (modulo surrounding whitespace).
pub fn encode<S: AsRef<str>>(items: &[S]) -> String {
	let mut encoded = String::new();

	for (i, item) in items.iter().enumerate() {
		if i > 0 {
			encoded.push(SEPARATOR);
		}
		for c in item.as_ref().chars() {
			if matches!(c, SEPARATOR | ESCAPE | QUOTE) {
				encoded.push(ESCAPE);
			}
			encoded.push(c);
		}
	}

	encoded
}

/// Decode a value into its elements.
///
/// Always yields at least one element: an empty value decodes to `[""]`.
pub fn decode(value: &str) -> Vec<String> {
	let mut items = Vec::new();
	let mut current = String::new();
	let mut within_quotes = false;
	let mut chars = value.chars();

	while let Some(c) = chars.next() {
		match c {
			ESCAPE => match chars.next() {
				Some(next) => current.push(next),
				// A dangling escape has nothing to protect; keep it.
				None => current.push(ESCAPE),
			},
			QUOTE => within_quotes = !within_quotes,
			SEPARATOR if !within_quotes => {
				items.push(current.trim().to_string());
				current.clear();
			}
			c => current.push(c),
		}
	}

	items.push(current.trim().to_string());
	items
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_encode_plain_items() {
		assert_eq!(encode(&["a", "b", "c"]), "a,b,c");
	}

	#[test]
	fn test_encode_escapes_special_characters() {
		assert_eq!(encode(&["a", "b,c", "d\\e"]), r"a,b\,c,d\\e");
		assert_eq!(encode(&[r#"say "hi""#]), r#"say \"hi\""#);
	}

	#[test]
	fn test_encode_empty_slice() {
		let empty: [&str; 0] = [];
		assert_eq!(encode(&empty), "");
	}

	#[test]
	fn test_round_trip_with_separator_and_escape() {
		let items = vec!["a".to_string(), "b,c".to_string(), "d\\e".to_string()];
		assert_eq!(decode(&encode(&items)), items);
	}

	#[test]
	fn test_round_trip_trims_elements() {
		let decoded = decode(&encode(&["  padded  ", "x"]));
		assert_eq!(decoded, vec!["padded", "x"]);
	}

	#[test]
	fn test_decode_empty_value_yields_one_element() {
		assert_eq!(decode(""), vec![""]);
	}

	#[test]
	fn test_decode_keeps_empty_elements() {
		assert_eq!(decode("a,,b"), vec!["a", "", "b"]);
		assert_eq!(decode(","), vec!["", ""]);
	}

	#[test]
	fn test_decode_trims_whitespace() {
		assert_eq!(decode(" a , b ,c "), vec!["a", "b", "c"]);
	}

	#[test]
	fn test_decode_quoted_elements() {
		assert_eq!(decode(r#""a","b","c\,d""#), vec!["a", "b", "c,d"]);
		assert_eq!(decode(r#""x,y", z"#), vec!["x,y", "z"]);
	}

	#[test]
	fn test_decode_escaped_quote_is_literal() {
		assert_eq!(decode(r#"\"a\",b"#), vec![r#""a""#, "b"]);
	}

	#[test]
	fn test_decode_dangling_escape() {
		assert_eq!(decode("a,b\\"), vec!["a", "b\\"]);
	}
}

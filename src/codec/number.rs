use crate::error::ConversionError;

/// Lowercase digits for every base up to 36.
const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A value that can be stored as a number (or boolean) in a section.
///
/// Conversions never consult the process locale, so the text form is the same
/// on every host.
pub trait Number: Copy {
	/// Convert the whole of `text` in the given base.
	///
	/// Base `0` guesses the base from the prefix (`0x` hexadecimal, leading `0`
	/// octal, decimal otherwise). Floats ignore the base.
	fn parse_in_base(text: &str, base: u32) -> Result<Self, ConversionError>;

	/// Render the value in the given base.
	fn format_in_base(self, base: u32) -> String;
}

/// Convert `text` to a number, failing on any unconsumed suffix.
pub fn parse_number<T: Number>(text: &str, base: u32) -> Result<T, ConversionError> {
	T::parse_in_base(text, base)
}

/// Convert `text` to a number, falling back to `default`.
///
/// The flag is `true` when the conversion failed and `default` was used.
pub fn parse_number_or<T: Number>(text: &str, default: T, base: u32) -> (T, bool) {
	match T::parse_in_base(text, base) {
		Ok(value) => (value, false),
		Err(_) => (default, true),
	}
}

/// Render a number in the given base.
pub fn format_number<T: Number>(value: T, base: u32) -> String {
	value.format_in_base(base)
}

/// Split an integer literal into its sign and magnitude.
fn scan_integer(text: &str, base: u32) -> Result<(bool, u128), ConversionError> {
	let text = text.trim_start();
	if text.is_empty() {
		return Err(ConversionError::Empty);
	}

	let (negative, unsigned) = if let Some(rest) = text.strip_prefix('-') {
		(true, rest)
	} else if let Some(rest) = text.strip_prefix('+') {
		(false, rest)
	} else {
		(false, text)
	};

	let (radix, digits) = resolve_radix(unsigned, base)?;
	let mut magnitude: u128 = 0;

	for (i, c) in digits.char_indices() {
		let Some(digit) = c.to_digit(radix) else {
			return Err(if i == 0 {
				ConversionError::Invalid
			} else {
				ConversionError::TrailingCharacters
			});
		};
		magnitude = magnitude
			.checked_mul(u128::from(radix))
			.and_then(|m| m.checked_add(u128::from(digit)))
			.ok_or(ConversionError::OutOfRange)?;
	}

	if digits.is_empty() {
		return Err(ConversionError::Invalid);
	}

	Ok((negative, magnitude))
}

fn resolve_radix(digits: &str, base: u32) -> Result<(u32, &str), ConversionError> {
	match base {
		0 => {
			if let Some(rest) = strip_hex_prefix(digits) {
				Ok((16, rest))
			} else if digits.starts_with('0') {
				Ok((8, digits))
			} else {
				Ok((10, digits))
			}
		}
		16 => Ok((16, strip_hex_prefix(digits).unwrap_or(digits))),
		2..=36 => Ok((base, digits)),
		_ => Err(ConversionError::UnsupportedBase { base }),
	}
}

/// Strip `0x`/`0X`, but only when a hex digit follows.
fn strip_hex_prefix(digits: &str) -> Option<&str> {
	digits
		.strip_prefix("0x")
		.or_else(|| digits.strip_prefix("0X"))
		.filter(|rest| rest.starts_with(|c: char| c.is_ascii_hexdigit()))
}

fn format_magnitude(negative: bool, magnitude: u128, base: u32) -> String {
	let base = if (2..=36).contains(&base) { base } else { 10 };
	let sign = if negative && magnitude != 0 { "-" } else { "" };

	if base == 10 {
		return format!("{sign}{magnitude}");
	}

	let prefix = match (base, magnitude) {
		(_, 0) => "",
		(16, _) => "0x",
		(8, _) => "0",
		_ => "",
	};

	let mut digits = Vec::new();
	let mut rest = magnitude;
	loop {
		// The remainder is below `base`, which is at most 36.
		digits.push(DIGITS[(rest % u128::from(base)) as usize]);
		rest /= u128::from(base);
		if rest == 0 {
			break;
		}
	}
	digits.reverse();

	format!("{sign}{prefix}{}", String::from_utf8_lossy(&digits))
}

macro_rules! impl_signed {
	($($t:ty),*) => {$(
		impl Number for $t {
			fn parse_in_base(text: &str, base: u32) -> Result<Self, ConversionError> {
				let (negative, magnitude) = scan_integer(text, base)?;
				let wide = if negative {
					0i128.checked_sub_unsigned(magnitude)
				} else {
					i128::try_from(magnitude).ok()
				};
				let wide = wide.ok_or(ConversionError::OutOfRange)?;
				<$t>::try_from(wide).map_err(|_| ConversionError::OutOfRange)
			}

			fn format_in_base(self, base: u32) -> String {
				format_magnitude(self < 0, self.unsigned_abs() as u128, base)
			}
		}
	)*};
}

macro_rules! impl_unsigned {
	($($t:ty),*) => {$(
		impl Number for $t {
			fn parse_in_base(text: &str, base: u32) -> Result<Self, ConversionError> {
				let (negative, magnitude) = scan_integer(text, base)?;
				if negative && magnitude != 0 {
					return Err(ConversionError::OutOfRange);
				}
				<$t>::try_from(magnitude).map_err(|_| ConversionError::OutOfRange)
			}

			fn format_in_base(self, base: u32) -> String {
				format_magnitude(false, self as u128, base)
			}
		}
	)*};
}

macro_rules! impl_float {
	($($t:ty),*) => {$(
		impl Number for $t {
			fn parse_in_base(text: &str, _base: u32) -> Result<Self, ConversionError> {
				let text = text.trim_start();
				if text.is_empty() {
					return Err(ConversionError::Empty);
				}

				let value = text.parse::<$t>().map_err(|_| {
					let has_number_prefix = (1..text.len())
						.filter(|&i| text.is_char_boundary(i))
						.any(|i| text[..i].parse::<$t>().is_ok());
					if has_number_prefix {
						ConversionError::TrailingCharacters
					} else {
						ConversionError::Invalid
					}
				})?;

				// `1e999` parses to infinity instead of failing.
				if value.is_infinite() && !text.to_ascii_lowercase().contains("inf") {
					return Err(ConversionError::OutOfRange);
				}

				Ok(value)
			}

			fn format_in_base(self, _base: u32) -> String {
				self.to_string()
			}
		}
	)*};
}

impl_signed!(i8, i16, i32, i64, i128, isize);
impl_unsigned!(u8, u16, u32, u64, u128, usize);
impl_float!(f32, f64);

impl Number for bool {
	fn parse_in_base(text: &str, base: u32) -> Result<Self, ConversionError> {
		let trimmed = text.trim_start();
		if trimmed.eq_ignore_ascii_case("true") {
			return Ok(true);
		}
		if trimmed.eq_ignore_ascii_case("false") {
			return Ok(false);
		}

		match u8::parse_in_base(text, base)? {
			0 => Ok(false),
			1 => Ok(true),
			_ => Err(ConversionError::OutOfRange),
		}
	}

	fn format_in_base(self, _base: u32) -> String {
		self.to_string()
	}
}

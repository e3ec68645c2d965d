use crate::codec::number::format_number;
use std::borrow::Cow;
use std::fmt::Display;

/// A value that knows how to render itself as a token value.
///
/// Strings are stored as-is, numbers and booleans go through
/// [`format_number`] in the requested base. Other types either implement this
/// trait or are wrapped in [`Displayed`].
pub trait ToValue {
	/// Render `self`; `base` only matters for integers.
	fn to_value(&self, base: u32) -> String;
}

/// Store any [`Display`] type through its `to_string` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Displayed<T>(pub T);

impl<T: Display> ToValue for Displayed<T> {
	fn to_value(&self, _base: u32) -> String {
		self.0.to_string()
	}
}

impl ToValue for str {
	fn to_value(&self, _base: u32) -> String {
		self.to_string()
	}
}

impl ToValue for String {
	fn to_value(&self, _base: u32) -> String {
		self.clone()
	}
}

impl ToValue for Cow<'_, str> {
	fn to_value(&self, _base: u32) -> String {
		self.to_string()
	}
}

impl<T: ToValue + ?Sized> ToValue for &T {
	fn to_value(&self, base: u32) -> String {
		(**self).to_value(base)
	}
}

macro_rules! impl_numeric_value {
	($($t:ty),*) => {$(
		impl ToValue for $t {
			fn to_value(&self, base: u32) -> String {
				format_number(*self, base)
			}
		}
	)*};
}

impl_numeric_value!(
	i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool
);

use crate::codec::list;
use crate::codec::number::{Number, parse_number};
use crate::codec::value::ToValue;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// All the token/value pairs of one `[name]` block.
///
/// Values are always stored as strings; the typed accessors convert on the
/// way in and out, so there is a single source of truth per token.
///
/// Serializes as a plain key/value map; the name belongs to the enclosing
/// table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Section {
	#[serde(skip)]
	name: String,
	entries: BTreeMap<String, String>,
}

impl Section {
	/// Create an empty section.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			entries: BTreeMap::new(),
		}
	}

	/// Unnamed empty section, usable in statics.
	pub(crate) const fn unnamed() -> Self {
		Self {
			name: String::new(),
			entries: BTreeMap::new(),
		}
	}

	/// The name given at creation.
	#[must_use]
	pub fn name(&self) -> &str {
		&self.name
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	#[must_use]
	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	/// Entries in key order.
	pub fn iter(&self) -> Iter<'_> {
		Iter {
			inner: self.entries.iter(),
		}
	}

	/// Raw value of a token.
	#[must_use]
	pub fn get(&self, key: &str) -> Option<&str> {
		self.entries.get(key).map(String::as_str)
	}

	/// Raw access to a token, created empty if missing.
	pub fn entry(&mut self, key: impl Into<String>) -> &mut String {
		self.entries.entry(key.into()).or_default()
	}

	/// Build a `T` from the raw value, or return `default` when absent.
	#[must_use]
	pub fn get_or<T>(&self, key: &str, default: T) -> T
	where
		T: for<'a> From<&'a str>,
	{
		self.get(key).map(T::from).unwrap_or(default)
	}

	/// Convert the raw value with `convert`, or return `default` when absent.
	#[must_use]
	pub fn get_with<T, F>(&self, key: &str, convert: F, default: T) -> T
	where
		F: FnOnce(&str) -> T,
	{
		self.get(key).map(convert).unwrap_or(default)
	}

	/// Read a number (or boolean) in the given base.
	///
	/// Returns `default` when the token is absent or cannot be converted.
	#[must_use]
	pub fn get_number<T: Number>(&self, key: &str, default: T, base: u32) -> T {
		let Some(raw) = self.get(key) else {
			return default;
		};

		match parse_number(raw, base) {
			Ok(value) => value,
			Err(error) => {
				tracing::debug!(section = %self.name, key, value = raw, %error, "Using default for unconvertible value");
				default
			}
		}
	}

	/// Decode a list value into `T`s. Absent tokens give an empty list.
	#[must_use]
	pub fn get_vector<T>(&self, key: &str) -> Vec<T>
	where
		T: for<'a> From<&'a str>,
	{
		self.get_vector_with(key, |item| T::from(item))
	}

	/// Decode a list value and convert each element with `convert`.
	#[must_use]
	pub fn get_vector_with<T, F>(&self, key: &str, mut convert: F) -> Vec<T>
	where
		F: FnMut(&str) -> T,
	{
		self.get(key)
			.map(|raw| {
				list::decode(raw)
					.iter()
					.map(|item| convert(item.as_str()))
					.collect()
			})
			.unwrap_or_default()
	}

	/// Decode a list of numbers.
	///
	/// Elements that fail to convert are dropped rather than defaulted.
	#[must_use]
	pub fn get_number_vector<T: Number>(&self, key: &str, base: u32) -> Vec<T> {
		self.get(key)
			.map(|raw| {
				list::decode(raw)
					.iter()
					.filter_map(|item| parse_number(item, base).ok())
					.collect()
			})
			.unwrap_or_default()
	}

	/// Store `value` and return its stored form.
	pub fn set<V: ToValue>(&mut self, key: impl Into<String>, value: V) -> &str {
		self.set_in_base(key, value, 10)
	}

	/// Store `value`, rendering integers in `base`.
	pub fn set_in_base<V: ToValue>(&mut self, key: impl Into<String>, value: V, base: u32) -> &str {
		let slot = self.entry(key);
		*slot = value.to_value(base);
		slot.as_str()
	}

	/// Store `values` as an encoded list and return the stored form.
	pub fn set_vector<V: ToValue>(&mut self, key: impl Into<String>, values: &[V]) -> &str {
		self.set_vector_in_base(key, values, 10)
	}

	/// Store `values` as an encoded list, rendering integers in `base`.
	pub fn set_vector_in_base<V: ToValue>(
		&mut self,
		key: impl Into<String>,
		values: &[V],
		base: u32,
	) -> &str {
		let rendered: Vec<String> = values.iter().map(|value| value.to_value(base)).collect();
		let slot = self.entry(key);
		*slot = list::encode(&rendered);
		slot.as_str()
	}

	/// Remove a token, returning whether it existed.
	pub fn remove(&mut self, key: &str) -> bool {
		self.entries.remove(key).is_some()
	}
}

/// Iterator over the entries of a [`Section`], in key order.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
	inner: btree_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
	type Item = (&'a str, &'a str);

	fn next(&mut self) -> Option<Self::Item> {
		self.inner
			.next()
			.map(|(key, value)| (key.as_str(), value.as_str()))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<'a> IntoIterator for &'a Section {
	type Item = (&'a str, &'a str);
	type IntoIter = Iter<'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

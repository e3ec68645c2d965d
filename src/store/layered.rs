use crate::codec::number::Number;
use crate::codec::value::ToValue;
use crate::store::parser::parse_into;
use crate::store::section::Section;
use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;

/// Returned by read-only lookups of a section that exists in neither layer.
static EMPTY_SECTION: Section = Section::unnamed();

/// Which layer a write goes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Destination {
	/// Per-instance values; always consulted first.
	#[default]
	Local,
	/// Shared defaults; consulted when the local layer has no entry.
	Global,
}

/// A local layer of sections that wins over a global one.
///
/// Reads resolve `(section, key)` against the local layer first and fall back
/// to the global layer when either the section or the token is missing there.
/// Writes go to one explicit [`Destination`].
#[derive(Debug, Default)]
pub struct LayeredConfig {
	no_section: Section,
	local: BTreeMap<String, Section>,
	global: BTreeMap<String, Section>,
}

impl LayeredConfig {
	/// An empty configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse `local` as the local layer.
	pub fn from_reader<R: BufRead>(local: R) -> Self {
		let mut config = Self::new();
		config.parse(local, Destination::Local);
		config
	}

	/// Parse both layers. The global stream is read first.
	pub fn from_readers<L: BufRead, G: BufRead>(local: L, global: G) -> Self {
		let mut config = Self::new();
		config.parse(global, Destination::Global);
		config.parse(local, Destination::Local);
		config
	}

	/// Parse a stream into one layer, merging with what is already there.
	///
	/// Entries before the first header go to the shared no-section.
	pub fn parse<R: BufRead>(&mut self, reader: R, destination: Destination) {
		let layer = match destination {
			Destination::Local => &mut self.local,
			Destination::Global => &mut self.global,
		};
		parse_into(reader, &mut self.no_section, layer);
	}

	/// Entries that appeared before any `[header]`.
	pub fn no_section(&self) -> &Section {
		&self.no_section
	}

	/// Read-only view of one layer.
	pub fn layer(&self, destination: Destination) -> &BTreeMap<String, Section> {
		match destination {
			Destination::Local => &self.local,
			Destination::Global => &self.global,
		}
	}

	fn layer_mut(&mut self, destination: Destination) -> &mut BTreeMap<String, Section> {
		match destination {
			Destination::Local => &mut self.local,
			Destination::Global => &mut self.global,
		}
	}

	/// Number of distinct section names across both layers.
	pub fn len(&self) -> usize {
		self.local.len()
			+ self
				.global
				.keys()
				.filter(|name| !self.local.contains_key(*name))
				.count()
	}

	pub fn is_empty(&self) -> bool {
		self.local.is_empty() && self.global.is_empty()
	}

	/// Sorted union of the section names of both layers.
	pub fn names(&self) -> BTreeSet<String> {
		self.local
			.keys()
			.chain(self.global.keys())
			.cloned()
			.collect()
	}

	/// The local section, else the global one.
	pub fn find(&self, name: &str) -> Option<&Section> {
		self.local.get(name).or_else(|| self.global.get(name))
	}

	/// Mutable form of [`find`](Self::find); never creates anything.
	pub fn find_mut(&mut self, name: &str) -> Option<&mut Section> {
		if self.local.contains_key(name) {
			self.local.get_mut(name)
		} else {
			self.global.get_mut(name)
		}
	}

	/// The resolved section, or a shared empty section when neither layer has it.
	pub fn section(&self, name: &str) -> &Section {
		self.find(name).unwrap_or(&EMPTY_SECTION)
	}

	/// The resolved section, created in the local layer when neither layer has it.
	pub fn section_mut(&mut self, name: &str) -> &mut Section {
		if !self.local.contains_key(name)
			&& let Some(section) = self.global.get_mut(name)
		{
			return section;
		}
		self.local
			.entry(name.to_string())
			.or_insert_with(|| Section::new(name))
	}

	/// The section of that name in one layer, created there if missing.
	///
	/// A global write never touches a local section of the same name.
	pub fn section_in(&mut self, name: &str, destination: Destination) -> &mut Section {
		self.layer_mut(destination)
			.entry(name.to_string())
			.or_insert_with(|| Section::new(name))
	}

	/// Effective view of one section: global entries overlaid with local ones,
	/// without empty values.
	pub fn merged(&self, name: &str) -> Section {
		let mut merged = Section::new(name);
		for layer in [&self.global, &self.local] {
			if let Some(section) = layer.get(name) {
				for (key, value) in section {
					let _ = merged.set(key, value);
				}
			}
		}
		let empty: Vec<String> = merged
			.iter()
			.filter(|(_, value)| value.is_empty())
			.map(|(key, _)| key.to_string())
			.collect();
		for key in empty {
			merged.remove(&key);
		}
		merged
	}

	/// The section holding `key`, local layer first.
	fn resolve(&self, section: &str, key: &str) -> Option<&Section> {
		[&self.local, &self.global]
			.into_iter()
			.filter_map(|layer| layer.get(section))
			.find(|candidate| candidate.contains_key(key))
	}

	/// Raw value of a token.
	#[must_use]
	pub fn get(&self, section: &str, key: &str) -> Option<&str> {
		self.resolve(section, key)
			.and_then(|resolved| resolved.get(key))
	}

	/// See [`Section::get_or`].
	#[must_use]
	pub fn get_or<T>(&self, section: &str, key: &str, default: T) -> T
	where
		T: for<'a> From<&'a str>,
	{
		match self.resolve(section, key) {
			Some(resolved) => resolved.get_or(key, default),
			None => default,
		}
	}

	/// See [`Section::get_with`].
	#[must_use]
	pub fn get_with<T, F>(&self, section: &str, key: &str, convert: F, default: T) -> T
	where
		F: FnOnce(&str) -> T,
	{
		match self.resolve(section, key) {
			Some(resolved) => resolved.get_with(key, convert, default),
			None => default,
		}
	}

	/// See [`Section::get_number`].
	#[must_use]
	pub fn get_number<T: Number>(&self, section: &str, key: &str, default: T, base: u32) -> T {
		match self.resolve(section, key) {
			Some(resolved) => resolved.get_number(key, default, base),
			None => default,
		}
	}

	/// See [`Section::get_vector`].
	#[must_use]
	pub fn get_vector<T>(&self, section: &str, key: &str) -> Vec<T>
	where
		T: for<'a> From<&'a str>,
	{
		self.resolve(section, key)
			.map(|resolved| resolved.get_vector(key))
			.unwrap_or_default()
	}

	/// See [`Section::get_vector_with`].
	#[must_use]
	pub fn get_vector_with<T, F>(&self, section: &str, key: &str, convert: F) -> Vec<T>
	where
		F: FnMut(&str) -> T,
	{
		self.resolve(section, key)
			.map(|resolved| resolved.get_vector_with(key, convert))
			.unwrap_or_default()
	}

	/// See [`Section::get_number_vector`].
	#[must_use]
	pub fn get_number_vector<T: Number>(&self, section: &str, key: &str, base: u32) -> Vec<T> {
		self.resolve(section, key)
			.map(|resolved| resolved.get_number_vector(key, base))
			.unwrap_or_default()
	}

	/// Store `value` in one layer and return its stored form.
	pub fn set<V: ToValue>(
		&mut self,
		section: &str,
		key: &str,
		value: V,
		destination: Destination,
	) -> &str {
		self.section_in(section, destination).set(key, value)
	}

	/// Like [`set`](Self::set), rendering integers in `base`.
	pub fn set_in_base<V: ToValue>(
		&mut self,
		section: &str,
		key: &str,
		value: V,
		destination: Destination,
		base: u32,
	) -> &str {
		self.section_in(section, destination)
			.set_in_base(key, value, base)
	}

	/// Store `values` as an encoded list in one layer.
	pub fn set_vector<V: ToValue>(
		&mut self,
		section: &str,
		key: &str,
		values: &[V],
		destination: Destination,
	) -> &str {
		self.section_in(section, destination)
			.set_vector(key, values)
	}

	/// Like [`set_vector`](Self::set_vector), rendering integers in `base`.
	pub fn set_vector_in_base<V: ToValue>(
		&mut self,
		section: &str,
		key: &str,
		values: &[V],
		destination: Destination,
		base: u32,
	) -> &str {
		self.section_in(section, destination)
			.set_vector_in_base(key, values, base)
	}

	/// Remove a token from one layer, returning whether it existed there.
	pub fn remove(&mut self, section: &str, key: &str, destination: Destination) -> bool {
		self.layer_mut(destination)
			.get_mut(section)
			.is_some_and(|found| found.remove(key))
	}
}

//! The markup representation produced by the template builder.
//!
//! A [`Parsed`] value pairs a markup string with a [`Bindings`] table. Values
//! that cannot be serialized into markup are stored in the table under a
//! [`PlaceholderKey`], and the key's decimal form is written into the markup as
//! an attribute value to be resolved again by the linker.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::value::Value;

/// Process-wide placeholder key source. Never reset.
static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// A unique placeholder token embedded in markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlaceholderKey(u64);

impl PlaceholderKey {
	/// Draws a fresh key from the process-wide counter.
	pub fn next() -> Self {
		Self(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
	}

	/// Returns the numeric value of the key.
	pub fn get(self) -> u64 {
		self.0
	}
}

impl From<u64> for PlaceholderKey {
	fn from(value: u64) -> Self {
		Self(value)
	}
}

impl fmt::Display for PlaceholderKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Error returned when attribute text is not a placeholder token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a placeholder key: {0:?}")]
pub struct InvalidPlaceholder(pub String);

impl FromStr for PlaceholderKey {
	type Err = InvalidPlaceholder;

	/// Only the canonical decimal form written by the builder is accepted.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) || (s.len() > 1 && s.starts_with('0'))
		{
			return Err(InvalidPlaceholder(s.to_string()));
		}
		s.parse::<u64>()
			.map(Self)
			.map_err(|_| InvalidPlaceholder(s.to_string()))
	}
}

/// Placeholder lookup table of a [`Parsed`] value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings(HashMap<PlaceholderKey, Value>);

impl Bindings {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the value bound to a key.
	pub fn get(&self, key: PlaceholderKey) -> Option<&Value> {
		self.0.get(&key)
	}

	/// Resolves attribute text to a bound value.
	///
	/// Returns `None` when the text is not a placeholder token or the token is
	/// not bound in this table.
	pub fn resolve(&self, token: &str) -> Option<&Value> {
		token
			.parse::<PlaceholderKey>()
			.ok()
			.and_then(|key| self.0.get(&key))
	}

	/// Binds a value, replacing any previous binding for the key.
	pub fn insert(&mut self, key: PlaceholderKey, value: Value) -> Option<Value> {
		self.0.insert(key, value)
	}

	/// Returns true if the key is bound.
	pub fn contains_key(&self, key: PlaceholderKey) -> bool {
		self.0.contains_key(&key)
	}

	/// Merges another table into this one. Existing entries win.
	pub fn merge_under(&mut self, other: Bindings) {
		for (key, value) in other.0 {
			if let Entry::Vacant(slot) = self.0.entry(key) {
				slot.insert(value);
			}
		}
	}

	/// Returns the number of bindings.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if nothing is bound.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates over the bindings in unspecified order.
	pub fn iter(&self) -> impl Iterator<Item = (PlaceholderKey, &Value)> {
		self.0.iter().map(|(key, value)| (*key, value))
	}
}

impl FromIterator<(PlaceholderKey, Value)> for Bindings {
	fn from_iter<I: IntoIterator<Item = (PlaceholderKey, Value)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

/// Markup plus the placeholder table needed to link it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parsed {
	markup: String,
	bindings: Bindings,
}

impl Parsed {
	/// Creates an empty value.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a value from existing parts.
	pub fn from_parts(markup: impl Into<String>, bindings: Bindings) -> Self {
		Self {
			markup: markup.into(),
			bindings,
		}
	}

	/// Returns the markup.
	pub fn markup(&self) -> &str {
		&self.markup
	}

	/// Returns the placeholder table.
	pub fn bindings(&self) -> &Bindings {
		&self.bindings
	}

	/// Returns true if there is neither markup nor bindings.
	pub fn is_empty(&self) -> bool {
		self.markup.is_empty() && self.bindings.is_empty()
	}

	/// Appends raw markup.
	pub fn push_str(&mut self, markup: &str) {
		self.markup.push_str(markup);
	}

	/// Stores a value under a fresh placeholder key and writes the key into
	/// the markup.
	pub fn bind(&mut self, value: impl Into<Value>) -> PlaceholderKey {
		let key = PlaceholderKey::next();
		self.bindings.insert(key, value.into());
		self.markup.push_str(&key.to_string());
		key
	}

	/// Appends a value.
	///
	/// A nested [`Parsed`] contributes its markup and its bindings, with this
	/// value's entries taking precedence on key collision. Anything else is
	/// converted to text and appended verbatim, without escaping.
	pub fn append(&mut self, value: impl Into<Value>) {
		match value.into() {
			Value::Parsed(nested) => {
				self.markup.push_str(&nested.markup);
				self.bindings.merge_under(nested.bindings);
			}
			other => self.markup.push_str(&other.to_text()),
		}
	}

	/// Splits the value into markup and bindings.
	pub fn into_parts(self) -> (String, Bindings) {
		(self.markup, self.bindings)
	}
}

impl fmt::Display for Parsed {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.markup)
	}
}

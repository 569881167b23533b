//! Escaping helpers for text and attribute contexts.
//!
//! Both helpers return a borrowed string when nothing needs escaping.

use std::borrow::Cow;

/// Escapes a value for use inside a double-quoted attribute.
///
/// Replaces `&`, `"`, `<`, `>` and the no-break space. Single quotes are left
/// alone because the builder always emits double quotes.
pub fn escape_attr(s: &str) -> Cow<'_, str> {
	escape_with(s, |c| match c {
		'&' => Some("&amp;"),
		'"' => Some("&quot;"),
		'<' => Some("&lt;"),
		'>' => Some("&gt;"),
		'\u{a0}' => Some("&nbsp;"),
		_ => None,
	})
}

/// Escapes raw text for use as text-node content.
///
/// Replaces `&`, `<`, `>` and the no-break space. Quotes are left alone.
pub fn escape_text(s: &str) -> Cow<'_, str> {
	escape_with(s, |c| match c {
		'&' => Some("&amp;"),
		'<' => Some("&lt;"),
		'>' => Some("&gt;"),
		'\u{a0}' => Some("&nbsp;"),
		_ => None,
	})
}

fn escape_with(s: &str, replacement: impl Fn(char) -> Option<&'static str>) -> Cow<'_, str> {
	let Some(first) = s.char_indices().find(|(_, c)| replacement(*c).is_some()) else {
		return Cow::Borrowed(s);
	};

	let mut escaped = String::with_capacity(s.len() + 8);
	escaped.push_str(&s[..first.0]);
	for c in s[first.0..].chars() {
		match replacement(c) {
			Some(entity) => escaped.push_str(entity),
			None => escaped.push(c),
		}
	}
	Cow::Owned(escaped)
}

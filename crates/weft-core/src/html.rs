//! The markup builder.
//!
//! [`html`] interleaves literal template segments with interpolated values and
//! decides, from the text immediately before each value, how the value enters
//! the result:
//!
//! - after ` on<name>=`, ` p:<name>=` or ` ref=` the value is stored in the
//!   bindings table and only its placeholder key is written into the markup;
//! - after any other `=` the value is escaped and written as a quoted
//!   attribute value;
//! - anywhere else the value is content: nested [`Parsed`] values are merged,
//!   lists are flattened one level, and everything else is written as text
//!   without escaping.
//!
//! The [`html!`](crate::html!) macro is the usual way to call the builder.
//!
//! ```
//! use weft_core::html;
//!
//! let name = "World";
//! let greeting = html!("<p class=", "hello", ">Hello, ", name, "!</p>");
//! assert_eq!(greeting.markup(), r#"<p class="hello">Hello, World!</p>"#);
//! ```

use std::sync::OnceLock;

use regex::Regex;

use crate::dom::Event;
use crate::escape::escape_attr;
use crate::parsed::Parsed;
use crate::value::{Handler, Value};

static MARKER: OnceLock<Regex> = OnceLock::new();

fn marker() -> &'static Regex {
	MARKER.get_or_init(|| {
		Regex::new(r"\s(p:\S+|on\S+|ref)=$").expect("placeholder marker pattern is valid")
	})
}

/// Builds a [`Parsed`] value from literal segments and interpolated values.
///
/// `values[i]` follows `segments[i]`. Values beyond the last segment are
/// ignored and a missing value contributes nothing.
pub fn html(segments: &[&str], values: Vec<Value>) -> Parsed {
	let mut result = Parsed::new();
	let mut values = values.into_iter();

	for (index, segment) in segments.iter().enumerate() {
		result.push_str(segment);
		if index + 1 == segments.len() {
			break;
		}
		let Some(value) = values.next() else {
			continue;
		};

		if marker().is_match(segment) {
			let key = result.bind(value);
			tracing::trace!(%key, "bound placeholder");
		} else if segment.ends_with('=') {
			result.push_str("\"");
			result.push_str(&escape_attr(&value.to_text()));
			result.push_str("\"");
		} else {
			match value {
				Value::List(items) => {
					for item in items {
						result.append(item);
					}
				}
				other => result.append(other),
			}
		}
	}

	let ignored = values.count();
	if ignored > 0 {
		tracing::trace!(ignored, "ignored values beyond the last template segment");
	}
	result
}

/// Wraps a closure as an event handler for `on<name>=` bindings.
pub fn on<F>(f: F) -> Handler
where
	F: Fn(&Event) + 'static,
{
	Handler::new(f)
}

/// Builds a [`Parsed`] value from alternating literal segments and values.
///
/// ```
/// use weft_core::{html, html::on};
///
/// let items = vec![html!("<li>", "a", "</li>"), html!("<li>", "b", "</li>")];
/// let list = html!("<ul onclick=", on(|_| {}), ">", items, "</ul>");
/// assert_eq!(list.bindings().len(), 1);
/// assert!(list.markup().ends_with("><li>a</li><li>b</li></ul>"));
/// ```
#[macro_export]
macro_rules! html {
	() => {
		$crate::parsed::Parsed::new()
	};
	($first:literal $(, $value:expr, $segment:literal)* $(,)?) => {
		$crate::html::html(
			&[$first $(, $segment)*],
			::std::vec![$($crate::value::Value::from($value)),*],
		)
	};
}

//! Markup parsing.
//!
//! Markup is parsed as an HTML fragment with the html5ever tree builder that
//! `scraper` wraps, then copied into a detached [`Node`] fragment. Whitespace
//! text and comments are kept so that reconciliation sees the same child list
//! a browser would build.

use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

use crate::dom::Node;
use crate::error::{MarkupError, Result};

/// Markup parsing options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
	/// Reject markup the parser had to recover from instead of applying the
	/// recovered tree.
	pub strict: bool,
}

impl ParseOptions {
	/// Creates lenient parsing options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Enables strict parsing.
	pub fn strict(mut self) -> Self {
		self.strict = true;
		self
	}
}

/// Parses markup into a detached fragment.
///
/// In lenient mode the parser's recovered tree is returned as-is. In strict
/// mode any recovery turns into [`MarkupError::Malformed`].
pub fn parse_fragment(markup: &str, options: &ParseOptions) -> Result<Node> {
	let document = Html::parse_fragment(markup);

	if !document.errors.is_empty() {
		if options.strict {
			return Err(MarkupError::Malformed {
				errors: document.errors.iter().map(|e| e.to_string()).collect(),
			});
		}
		tracing::debug!(errors = document.errors.len(), "recovered from malformed markup");
	}

	let fragment = Node::fragment();
	copy_children(document.root_element(), &fragment);
	Ok(fragment)
}

fn copy_children(source: ElementRef<'_>, target: &Node) {
	for child in source.children() {
		match child.value() {
			scraper::Node::Text(text) => target.append_child(&Node::text(&**text)),
			scraper::Node::Comment(comment) => target.append_child(&Node::comment(&**comment)),
			scraper::Node::Element(_) => {
				let Some(element) = ElementRef::wrap(child) else {
					continue;
				};
				let node = Node::element(element.value().name());
				for (name, value) in element.value().attrs() {
					node.set_attribute(name, value);
				}
				copy_children(element, &node);
				target.append_child(&node);
			}
			_ => {}
		}
	}
}

//! Markup serialization of node trees.

use super::node::{Node, NodeKind};
use crate::escape::{escape_attr, escape_text};

const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
	"track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &[
	"style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

impl Node {
	/// Serializes the node's children.
	pub fn inner_html(&self) -> String {
		let mut out = String::new();
		let raw = self
			.tag_name()
			.is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag.as_str()));
		for child in self.children() {
			write_node(&child, raw, &mut out);
		}
		out
	}

	/// Serializes the node itself.
	pub fn outer_html(&self) -> String {
		let mut out = String::new();
		write_node(self, false, &mut out);
		out
	}
}

fn write_node(node: &Node, raw_parent: bool, out: &mut String) {
	let data = node.0.borrow();
	match &data.kind {
		NodeKind::Text(text) if raw_parent => out.push_str(text),
		NodeKind::Text(text) => out.push_str(&escape_text(text)),
		NodeKind::Comment(text) => {
			out.push_str("<!--");
			out.push_str(text);
			out.push_str("-->");
		}
		NodeKind::Fragment | NodeKind::ShadowRoot => {
			for child in &data.children {
				write_node(child, false, out);
			}
		}
		NodeKind::Element(tag) => {
			out.push('<');
			out.push_str(tag);
			for attr in &data.attributes {
				out.push(' ');
				out.push_str(&attr.name);
				out.push_str("=\"");
				out.push_str(&escape_attr(&attr.value));
				out.push('"');
			}
			out.push('>');
			if VOID_ELEMENTS.contains(&tag.as_str()) {
				return;
			}
			let raw = RAW_TEXT_ELEMENTS.contains(&tag.as_str());
			for child in &data.children {
				write_node(child, raw, out);
			}
			out.push_str("</");
			out.push_str(tag);
			out.push('>');
		}
	}
}

//! The reconciler.
//!
//! Reconciliation is positional: the n-th child of the target is compared with
//! the n-th remaining child of the live container. There are no keys and no
//! lookahead, so inserting at the front of a list rewrites every following
//! node while appending only creates the new one.

use std::collections::VecDeque;

use crate::dom::Node;
use crate::error::Result;
use crate::link::{LinkReport, link};
use crate::parse::{ParseOptions, parse_fragment};
use crate::parsed::Parsed;

/// Makes `container`'s children match `parsed` and links its bindings.
///
/// Uses lenient parsing. See [`apply_with`].
pub fn apply(container: &Node, parsed: &Parsed) -> Result<LinkReport> {
	apply_with(container, parsed, &ParseOptions::default())
}

/// Makes `container`'s children match `parsed` and links its bindings.
///
/// The markup is parsed before anything is touched, so a parse failure leaves
/// the live tree as it was.
pub fn apply_with(container: &Node, parsed: &Parsed, options: &ParseOptions) -> Result<LinkReport> {
	let next = parse_fragment(parsed.markup(), options)?;
	diff(container, &next);
	Ok(link(container, parsed.bindings()))
}

/// Mutates `current`'s children to match `next`'s.
///
/// Existing nodes are kept wherever the node name matches. For each target
/// child, in order:
///
/// 1. with no live node left, a copy is appended;
/// 2. a live node with a different name is replaced by a copy;
/// 3. a target with children is reconciled recursively, then its attributes
///    replace the live node's;
/// 4. a custom element (a name with a hyphen) only has its attributes
///    replaced;
/// 5. a node whose text differs is replaced by a copy;
/// 6. anything else is left untouched.
///
/// Live nodes beyond the target's length are removed.
pub fn diff(current: &Node, next: &Node) {
	let mut remaining: VecDeque<Node> = current.children().into();

	for target in next.children() {
		let Some(live) = remaining.pop_front() else {
			tracing::trace!(node = %target.node_name(), "append");
			current.append_child(&target.clone_node(true));
			continue;
		};

		let name = live.node_name();
		if name != target.node_name() {
			tracing::trace!(from = %name, to = %target.node_name(), "replace");
			current.replace_child(&target.clone_node(true), &live);
		} else if target.has_child_nodes() {
			diff(&live, &target);
			sync_attributes(&live, &target);
		} else if name.contains('-') {
			sync_attributes(&live, &target);
		} else if live.text_content() != target.text_content() {
			tracing::trace!(node = %name, "replace changed text");
			current.replace_child(&target.clone_node(true), &live);
		}
	}

	for stale in remaining {
		tracing::trace!(node = %stale.node_name(), "remove");
		stale.remove();
	}
}

fn sync_attributes(live: &Node, target: &Node) {
	live.clear_attributes();
	for attribute in target.attributes() {
		live.set_attribute(&attribute.name, &attribute.value);
	}
}

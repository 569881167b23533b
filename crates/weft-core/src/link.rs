//! The binding linker.
//!
//! After reconciliation the live tree carries placeholder tokens as attribute
//! values. [`link`] walks every element below the root, resolves the tokens
//! against a [`Bindings`] table and wires the values in:
//!
//! - `on<name>`: the handler becomes the only listener this linker keeps for
//!   the camel-cased event name on that element;
//! - `p:<name>`: the value is set as the camel-cased property;
//! - `ref`: the reference cell is pointed at the element.
//!
//! Listeners attached here are remembered in a per-thread side table keyed by
//! node identity, so a later pass can detach the previous handler before
//! attaching a new one. Tokens that do not resolve are left alone.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::dom::{Node, WeakNode};
use crate::parsed::Bindings;
use crate::value::{Handler, Value};

struct Attached {
	node: WeakNode,
	by_event: HashMap<String, Handler>,
}

thread_local! {
	static ATTACHED: RefCell<HashMap<usize, Attached>> = RefCell::new(HashMap::new());
}

/// Counts of what a [`link`] pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkReport {
	/// Event listeners attached or confirmed.
	pub listeners: usize,
	/// Properties set.
	pub properties: usize,
	/// Reference cells populated.
	pub refs: usize,
	/// Binding attributes whose value did not resolve to something usable.
	pub skipped: usize,
}

impl LinkReport {
	/// Returns the number of bindings applied.
	pub fn applied(&self) -> usize {
		self.listeners + self.properties + self.refs
	}
}

/// Resolves binding attributes below `root` against `bindings`.
///
/// The root element itself is not processed.
pub fn link(root: &Node, bindings: &Bindings) -> LinkReport {
	prune();
	let mut report = LinkReport::default();

	for element in root.descendant_elements() {
		for attribute in element.attributes() {
			let name = attribute.name.as_str();
			let resolved = bindings.resolve(&attribute.value);

			if name == "ref" {
				match resolved {
					Some(Value::Ref(cell)) => {
						cell.set(&element);
						report.refs += 1;
					}
					Some(other) => {
						tracing::warn!(value = ?other, "ref= bound to a value that is not a reference cell");
						report.skipped += 1;
					}
					None => report.skipped += 1,
				}
			} else if name.starts_with("p:") {
				match resolved {
					Some(value) => {
						element.set_property(&camel_case(name), value.clone());
						report.properties += 1;
					}
					None => report.skipped += 1,
				}
			} else if name.starts_with("on") {
				match resolved {
					Some(Value::Handler(handler)) => {
						attach(&element, &camel_case(name), handler);
						report.listeners += 1;
					}
					_ => report.skipped += 1,
				}
			}
		}
	}

	tracing::debug!(
		listeners = report.listeners,
		properties = report.properties,
		refs = report.refs,
		skipped = report.skipped,
		"linked bindings"
	);
	report
}

fn attach(element: &Node, event: &str, handler: &Handler) {
	ATTACHED.with(|table| {
		let mut table = table.borrow_mut();
		let entry = table.entry(element.key()).or_insert_with(|| Attached {
			node: element.downgrade(),
			by_event: HashMap::new(),
		});
		if let Some(previous) = entry.by_event.insert(event.to_string(), handler.clone()) {
			element.remove_event_listener(event, &previous);
		}
	});
	element.add_event_listener(event, handler);
}

fn prune() {
	ATTACHED.with(|table| {
		table
			.borrow_mut()
			.retain(|_, attached| attached.node.upgrade().is_some());
	});
}

/// Returns the handler the linker currently keeps on `node` for `event`.
pub fn attached_listener(node: &Node, event: &str) -> Option<Handler> {
	ATTACHED.with(|table| {
		table
			.borrow()
			.get(&node.key())
			.and_then(|attached| attached.by_event.get(event).cloned())
	})
}

/// Converts a binding attribute name to a property or event name.
///
/// The two-character prefix (`on` or `p:`) is dropped and each `-x` becomes
/// `X`, so `onitem-selected` names the `itemSelected` event.
pub fn camel_case(name: &str) -> String {
	let mut out = String::with_capacity(name.len());
	let mut chars = name.chars().skip(2).peekable();
	while let Some(c) = chars.next() {
		match (c, chars.peek()) {
			('-', Some(next)) => {
				out.extend(next.to_uppercase());
				chars.next();
			}
			_ => out.push(c),
		}
	}
	out
}

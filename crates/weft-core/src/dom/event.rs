//! Events and listener dispatch.
//!
//! Dispatch runs the target's listeners first and then, for bubbling events,
//! each ancestor's. A shadow root is a propagation boundary: only composed
//! events continue to the host element, and listeners outside the shadow tree
//! see the host as the event target.

use std::cell::{Cell, RefCell};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::node::{Node, NodeType};
use crate::value::{Handler, Value};

/// A listener registered on a node.
#[derive(Debug, Clone)]
pub(crate) struct Listener {
	pub(crate) event_type: String,
	pub(crate) handler: Handler,
}

/// Options for a dispatched event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventInit {
	/// Whether the event propagates to ancestors.
	pub bubbles: bool,
	/// Whether the event crosses shadow root boundaries.
	pub composed: bool,
	/// Whether [`Event::prevent_default`] has an effect.
	pub cancelable: bool,
}

impl EventInit {
	/// Creates options with every flag cleared.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the `bubbles` flag.
	pub fn bubbles(mut self, bubbles: bool) -> Self {
		self.bubbles = bubbles;
		self
	}

	/// Sets the `composed` flag.
	pub fn composed(mut self, composed: bool) -> Self {
		self.composed = composed;
		self
	}

	/// Sets the `cancelable` flag.
	pub fn cancelable(mut self, cancelable: bool) -> Self {
		self.cancelable = cancelable;
		self
	}
}

/// An event travelling through a tree.
pub struct Event {
	event_type: String,
	detail: Value,
	init: EventInit,
	default_prevented: Cell<bool>,
	propagation_stopped: Cell<bool>,
	target: RefCell<Option<Node>>,
	current_target: RefCell<Option<Node>>,
}

impl Event {
	/// Creates a non-bubbling event with no detail.
	pub fn new(event_type: impl Into<String>) -> Self {
		Self::with_init(event_type, EventInit::default())
	}

	/// Creates an event with the given options.
	pub fn with_init(event_type: impl Into<String>, init: EventInit) -> Self {
		Self::custom(event_type, Value::Null, init)
	}

	/// Creates an event carrying a detail payload.
	pub fn custom(event_type: impl Into<String>, detail: impl Into<Value>, init: EventInit) -> Self {
		Self {
			event_type: event_type.into(),
			detail: detail.into(),
			init,
			default_prevented: Cell::new(false),
			propagation_stopped: Cell::new(false),
			target: RefCell::new(None),
			current_target: RefCell::new(None),
		}
	}

	/// Returns the event type.
	pub fn event_type(&self) -> &str {
		&self.event_type
	}

	/// Returns the detail payload.
	pub fn detail(&self) -> &Value {
		&self.detail
	}

	/// Returns whether the event bubbles.
	pub fn bubbles(&self) -> bool {
		self.init.bubbles
	}

	/// Returns whether the event crosses shadow boundaries.
	pub fn composed(&self) -> bool {
		self.init.composed
	}

	/// Returns whether the event is cancelable.
	pub fn cancelable(&self) -> bool {
		self.init.cancelable
	}

	/// Marks the default action as cancelled. Ignored for non-cancelable events.
	pub fn prevent_default(&self) {
		if self.init.cancelable {
			self.default_prevented.set(true);
		}
	}

	/// Returns true if a listener cancelled the default action.
	pub fn default_prevented(&self) -> bool {
		self.default_prevented.get()
	}

	/// Stops propagation after the current node's listeners have run.
	pub fn stop_propagation(&self) {
		self.propagation_stopped.set(true);
	}

	/// Returns the target as seen from the node currently being visited.
	pub fn target(&self) -> Option<Node> {
		self.target.borrow().clone()
	}

	/// Returns the node whose listeners are currently running.
	pub fn current_target(&self) -> Option<Node> {
		self.current_target.borrow().clone()
	}
}

impl fmt::Debug for Event {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Event")
			.field("type", &self.event_type)
			.field("detail", &self.detail)
			.field("init", &self.init)
			.field("default_prevented", &self.default_prevented.get())
			.finish()
	}
}

impl Node {
	/// Registers a listener. Registering the same handler twice for the same
	/// event type is ignored and returns false.
	pub fn add_event_listener(&self, event_type: &str, handler: &Handler) -> bool {
		let mut data = self.0.borrow_mut();
		let duplicate = data
			.listeners
			.iter()
			.any(|l| l.event_type == event_type && l.handler.ptr_eq(handler));
		if duplicate {
			return false;
		}
		data.listeners.push(Listener {
			event_type: event_type.to_string(),
			handler: handler.clone(),
		});
		true
	}

	/// Removes a previously registered listener. Returns true if it was found.
	pub fn remove_event_listener(&self, event_type: &str, handler: &Handler) -> bool {
		let mut data = self.0.borrow_mut();
		let before = data.listeners.len();
		data.listeners
			.retain(|l| !(l.event_type == event_type && l.handler.ptr_eq(handler)));
		data.listeners.len() != before
	}

	/// Returns the number of listeners registered for an event type.
	pub fn listener_count(&self, event_type: &str) -> usize {
		self.0
			.borrow()
			.listeners
			.iter()
			.filter(|l| l.event_type == event_type)
			.count()
	}

	/// Dispatches an event at this node.
	///
	/// Returns false if a listener cancelled the event.
	pub fn dispatch_event(&self, event: &Event) -> bool {
		*event.target.borrow_mut() = Some(self.clone());
		let mut current = Some(self.clone());

		while let Some(node) = current {
			*event.current_target.borrow_mut() = Some(node.clone());

			let handlers: Vec<Handler> = node
				.0
				.borrow()
				.listeners
				.iter()
				.filter(|l| l.event_type == event.event_type)
				.map(|l| l.handler.clone())
				.collect();
			for handler in handlers {
				handler.call(event);
			}

			if event.propagation_stopped.get() || !event.init.bubbles {
				break;
			}

			current = if node.node_type() == NodeType::ShadowRoot {
				if !event.init.composed {
					break;
				}
				let host = node.host();
				if let Some(host) = &host {
					*event.target.borrow_mut() = Some(host.clone());
				}
				host
			} else {
				node.parent()
			};
		}

		*event.current_target.borrow_mut() = None;
		!event.default_prevented()
	}

	/// Dispatches a bubbling, cancelable `click` event.
	pub fn click(&self) -> bool {
		self.dispatch_event(&Event::with_init(
			"click",
			EventInit::new().bubbles(true).cancelable(true),
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::rc::Rc;

	fn recorder(log: &Rc<RefCell<Vec<String>>>, label: &str) -> Handler {
		let log = Rc::clone(log);
		let label = label.to_string();
		Handler::new(move |_| log.borrow_mut().push(label.clone()))
	}

	#[rstest]
	fn test_listener_runs_on_target() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let button = Node::element("button");
		button.add_event_listener("click", &recorder(&log, "button"));

		button.click();

		assert_eq!(*log.borrow(), ["button"]);
	}

	#[rstest]
	fn test_duplicate_listener_is_ignored() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let button = Node::element("button");
		let handler = recorder(&log, "once");

		assert!(button.add_event_listener("click", &handler));
		assert!(!button.add_event_listener("click", &handler));
		button.click();

		assert_eq!(log.borrow().len(), 1);
		assert_eq!(button.listener_count("click"), 1);
	}

	#[rstest]
	fn test_removed_listener_does_not_run() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let button = Node::element("button");
		let handler = recorder(&log, "gone");
		button.add_event_listener("click", &handler);

		assert!(button.remove_event_listener("click", &handler));
		button.click();

		assert!(log.borrow().is_empty());
	}

	#[rstest]
	fn test_bubbling_reaches_ancestors_in_order() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let outer = Node::element("div");
		let inner = Node::element("button");
		outer.append_child(&inner);
		outer.add_event_listener("click", &recorder(&log, "outer"));
		inner.add_event_listener("click", &recorder(&log, "inner"));

		inner.click();

		assert_eq!(*log.borrow(), ["inner", "outer"]);
	}

	#[rstest]
	fn test_non_bubbling_event_stays_on_target() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let outer = Node::element("div");
		let inner = Node::element("span");
		outer.append_child(&inner);
		outer.add_event_listener("ping", &recorder(&log, "outer"));

		inner.dispatch_event(&Event::new("ping"));

		assert!(log.borrow().is_empty());
	}

	#[rstest]
	fn test_stop_propagation() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let outer = Node::element("div");
		let inner = Node::element("button");
		outer.append_child(&inner);
		outer.add_event_listener("click", &recorder(&log, "outer"));
		inner.add_event_listener("click", &Handler::new(|e: &Event| e.stop_propagation()));

		inner.click();

		assert!(log.borrow().is_empty());
	}

	#[rstest]
	fn test_prevent_default_requires_cancelable() {
		let node = Node::element("a");
		node.add_event_listener("go", &Handler::new(|e: &Event| e.prevent_default()));

		assert!(node.dispatch_event(&Event::new("go")));
		assert!(!node.dispatch_event(&Event::with_init(
			"go",
			EventInit::new().cancelable(true)
		)));
	}

	#[rstest]
	#[case(false, 0)]
	#[case(true, 1)]
	fn test_shadow_boundary(#[case] composed: bool, #[case] expected: usize) {
		let log = Rc::new(RefCell::new(Vec::new()));
		let host = Node::element("x-card");
		let shadow = host.attach_shadow();
		let inner = Node::element("button");
		shadow.append_child(&inner);
		host.add_event_listener("picked", &recorder(&log, "host"));

		inner.dispatch_event(&Event::with_init(
			"picked",
			EventInit::new().bubbles(true).composed(composed),
		));

		assert_eq!(log.borrow().len(), expected);
	}

	#[rstest]
	fn test_composed_event_is_retargeted_to_host() {
		let seen = Rc::new(RefCell::new(None::<Node>));
		let host = Node::element("x-card");
		let inner = Node::element("button");
		host.attach_shadow().append_child(&inner);
		let sink = Rc::clone(&seen);
		host.add_event_listener(
			"picked",
			&Handler::new(move |e: &Event| *sink.borrow_mut() = e.target()),
		);

		inner.dispatch_event(&Event::with_init(
			"picked",
			EventInit::new().bubbles(true).composed(true),
		));

		assert!(seen.borrow().as_ref().is_some_and(|t| t.ptr_eq(&host)));
	}

	#[rstest]
	fn test_event_init_deserializes_with_defaults() {
		let init: EventInit = serde_json::from_str(r#"{"bubbles":true}"#).unwrap();
		assert_eq!(init, EventInit::new().bubbles(true));
	}
}

//! Reference cells.
//!
//! A [`NodeRef`] is created before rendering, interpolated into a template with
//! `ref=`, and filled in by the linker once the real element exists. It only
//! observes the element: the cell holds a weak handle and never keeps a node
//! alive on its own.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::dom::{Node, WeakNode};

/// A reference cell populated with an element by the linker.
#[derive(Clone, Default)]
pub struct NodeRef(Rc<RefCell<Option<WeakNode>>>);

impl NodeRef {
	/// Creates an empty reference cell.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a reference cell with an initial element.
	pub fn with_initial(node: Option<&Node>) -> Self {
		Self(Rc::new(RefCell::new(node.map(Node::downgrade))))
	}

	/// Returns the referenced element if it is still alive.
	pub fn get(&self) -> Option<Node> {
		self.0.borrow().as_ref().and_then(WeakNode::upgrade)
	}

	/// Points the cell at an element.
	pub fn set(&self, node: &Node) {
		*self.0.borrow_mut() = Some(node.downgrade());
	}

	/// Empties the cell.
	pub fn clear(&self) {
		*self.0.borrow_mut() = None;
	}

	/// Returns true if the cell references a live element.
	pub fn is_set(&self) -> bool {
		self.get().is_some()
	}

	/// Returns true if both handles share the same cell.
	pub fn ptr_eq(&self, other: &NodeRef) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for NodeRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NodeRef")
			.field("node", &self.get().map(|n| n.node_name()))
			.finish()
	}
}

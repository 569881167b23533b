//! Tree nodes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use super::event::Listener;
use crate::value::Value;

/// The type of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
	/// An element.
	Element,
	/// A text node.
	Text,
	/// A comment.
	Comment,
	/// A detached document fragment.
	Fragment,
	/// A shadow root attached to a host element.
	ShadowRoot,
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
	Element(String),
	Text(String),
	Comment(String),
	Fragment,
	ShadowRoot,
}

/// A name/value attribute pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	/// Lower-case attribute name.
	pub name: String,
	/// Attribute value.
	pub value: String,
}

pub(crate) struct NodeData {
	pub(crate) kind: NodeKind,
	pub(crate) parent: Weak<RefCell<NodeData>>,
	pub(crate) children: Vec<Node>,
	pub(crate) attributes: Vec<Attribute>,
	pub(crate) properties: HashMap<String, Value>,
	pub(crate) listeners: Vec<Listener>,
	pub(crate) shadow_root: Option<Node>,
	pub(crate) host: Weak<RefCell<NodeData>>,
}

/// A shared handle to a node in a live or detached tree.
///
/// Cloning the handle does not clone the node; use [`Node::clone_node`] for
/// that. Parents own their children; children refer back weakly.
#[derive(Clone)]
pub struct Node(pub(crate) Rc<RefCell<NodeData>>);

/// A weak handle to a node.
#[derive(Clone)]
pub struct WeakNode(Weak<RefCell<NodeData>>);

impl WeakNode {
	/// Returns the node if it is still alive.
	pub fn upgrade(&self) -> Option<Node> {
		self.0.upgrade().map(Node)
	}
}

impl fmt::Debug for WeakNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("WeakNode").field(&self.upgrade()).finish()
	}
}

impl Node {
	fn from_kind(kind: NodeKind) -> Self {
		Self(Rc::new(RefCell::new(NodeData {
			kind,
			parent: Weak::new(),
			children: Vec::new(),
			attributes: Vec::new(),
			properties: HashMap::new(),
			listeners: Vec::new(),
			shadow_root: None,
			host: Weak::new(),
		})))
	}

	/// Creates an element. The tag name is stored in lower case.
	pub fn element(tag: &str) -> Self {
		Self::from_kind(NodeKind::Element(tag.to_ascii_lowercase()))
	}

	/// Creates a text node.
	pub fn text(data: impl Into<String>) -> Self {
		Self::from_kind(NodeKind::Text(data.into()))
	}

	/// Creates a comment node.
	pub fn comment(data: impl Into<String>) -> Self {
		Self::from_kind(NodeKind::Comment(data.into()))
	}

	/// Creates an empty document fragment.
	pub fn fragment() -> Self {
		Self::from_kind(NodeKind::Fragment)
	}

	/// Returns the node type.
	pub fn node_type(&self) -> NodeType {
		match self.0.borrow().kind {
			NodeKind::Element(_) => NodeType::Element,
			NodeKind::Text(_) => NodeType::Text,
			NodeKind::Comment(_) => NodeType::Comment,
			NodeKind::Fragment => NodeType::Fragment,
			NodeKind::ShadowRoot => NodeType::ShadowRoot,
		}
	}

	/// Returns true for elements.
	pub fn is_element(&self) -> bool {
		self.node_type() == NodeType::Element
	}

	/// Returns the DOM node name: the upper-case tag for elements, `#text`,
	/// `#comment`, or `#document-fragment`.
	pub fn node_name(&self) -> String {
		match &self.0.borrow().kind {
			NodeKind::Element(tag) => tag.to_ascii_uppercase(),
			NodeKind::Text(_) => "#text".to_string(),
			NodeKind::Comment(_) => "#comment".to_string(),
			NodeKind::Fragment | NodeKind::ShadowRoot => "#document-fragment".to_string(),
		}
	}

	/// Returns the lower-case tag name of an element.
	pub fn tag_name(&self) -> Option<String> {
		match &self.0.borrow().kind {
			NodeKind::Element(tag) => Some(tag.clone()),
			_ => None,
		}
	}

	/// Returns the character data of a text or comment node.
	pub fn data(&self) -> Option<String> {
		match &self.0.borrow().kind {
			NodeKind::Text(data) | NodeKind::Comment(data) => Some(data.clone()),
			_ => None,
		}
	}

	/// Replaces the character data of a text or comment node.
	pub fn set_data(&self, value: impl Into<String>) {
		if let NodeKind::Text(data) | NodeKind::Comment(data) = &mut self.0.borrow_mut().kind {
			*data = value.into();
		}
	}

	/// Returns true if both handles refer to the same node.
	pub fn ptr_eq(&self, other: &Node) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}

	/// Returns a weak handle to this node.
	pub fn downgrade(&self) -> WeakNode {
		WeakNode(Rc::downgrade(&self.0))
	}

	/// Returns an identity key, stable while any handle to the node exists.
	pub fn key(&self) -> usize {
		Rc::as_ptr(&self.0) as usize
	}

	// ------------------------------------------------------------------
	// Tree structure
	// ------------------------------------------------------------------

	/// Returns the parent node.
	pub fn parent(&self) -> Option<Node> {
		self.0.borrow().parent.upgrade().map(Node)
	}

	/// Returns a snapshot of the child list.
	pub fn children(&self) -> Vec<Node> {
		self.0.borrow().children.clone()
	}

	/// Returns the number of children.
	pub fn child_count(&self) -> usize {
		self.0.borrow().children.len()
	}

	/// Returns true if the node has children.
	pub fn has_child_nodes(&self) -> bool {
		!self.0.borrow().children.is_empty()
	}

	/// Returns the child at `index`.
	pub fn child(&self, index: usize) -> Option<Node> {
		self.0.borrow().children.get(index).cloned()
	}

	/// Returns the first child.
	pub fn first_child(&self) -> Option<Node> {
		self.child(0)
	}

	/// Returns the element children, skipping text and comments.
	pub fn element_children(&self) -> Vec<Node> {
		self.children()
			.into_iter()
			.filter(Node::is_element)
			.collect()
	}

	/// Appends a child, detaching it from its previous parent first.
	///
	/// Appending a fragment moves the fragment's children instead.
	pub fn append_child(&self, child: &Node) {
		if child.node_type() == NodeType::Fragment {
			for grandchild in child.children() {
				self.append_child(&grandchild);
			}
			return;
		}
		child.remove();
		child.0.borrow_mut().parent = Rc::downgrade(&self.0);
		self.0.borrow_mut().children.push(child.clone());
	}

	/// Replaces `old` with `new` in this node's child list.
	///
	/// Returns false if `old` is not a child of this node.
	pub fn replace_child(&self, new: &Node, old: &Node) -> bool {
		if new.ptr_eq(old) {
			return true;
		}
		new.remove();

		let replaced = {
			let mut data = self.0.borrow_mut();
			match data.children.iter().position(|c| c.ptr_eq(old)) {
				Some(index) => {
					data.children[index] = new.clone();
					true
				}
				None => false,
			}
		};

		if replaced {
			old.0.borrow_mut().parent = Weak::new();
			new.0.borrow_mut().parent = Rc::downgrade(&self.0);
		}
		replaced
	}

	/// Detaches this node from its parent.
	pub fn remove(&self) {
		if let Some(parent) = self.parent() {
			parent
				.0
				.borrow_mut()
				.children
				.retain(|child| !child.ptr_eq(self));
		}
		self.0.borrow_mut().parent = Weak::new();
	}

	/// Removes every child.
	pub fn clear_children(&self) {
		for child in self.children() {
			child.remove();
		}
	}

	/// Copies the node.
	///
	/// Attributes and character data are copied, and children too when `deep`
	/// is set. Listeners, properties and shadow roots are never copied.
	pub fn clone_node(&self, deep: bool) -> Node {
		let data = self.0.borrow();
		let copy = Node::from_kind(data.kind.clone());
		copy.0.borrow_mut().attributes = data.attributes.clone();
		if deep {
			for child in &data.children {
				copy.append_child(&child.clone_node(true));
			}
		}
		copy
	}

	/// Returns the concatenated text of all descendant text nodes, or the data
	/// of a text or comment node.
	pub fn text_content(&self) -> String {
		let data = self.0.borrow();
		match &data.kind {
			NodeKind::Text(text) | NodeKind::Comment(text) => text.clone(),
			_ => {
				let mut out = String::new();
				collect_text(&data.children, &mut out);
				out
			}
		}
	}

	/// Replaces all children with a single text node.
	pub fn set_text_content(&self, text: &str) {
		if let Some(data) = self.data() {
			if data != text {
				self.set_data(text);
			}
			return;
		}
		self.clear_children();
		if !text.is_empty() {
			self.append_child(&Node::text(text));
		}
	}

	/// Returns every descendant element in document order. The node itself is
	/// not included and shadow trees are not entered.
	pub fn descendant_elements(&self) -> Vec<Node> {
		let mut out = Vec::new();
		collect_elements(self, &mut out);
		out
	}

	/// Returns the first descendant element matching the predicate.
	pub fn find(&self, predicate: impl Fn(&Node) -> bool) -> Option<Node> {
		self.descendant_elements().into_iter().find(|n| predicate(n))
	}

	/// Returns the descendant element with the given `id`.
	pub fn get_element_by_id(&self, id: &str) -> Option<Node> {
		self.find(|n| n.get_attribute("id").as_deref() == Some(id))
	}

	/// Returns descendant elements with the given tag name.
	pub fn elements_by_tag(&self, tag: &str) -> Vec<Node> {
		let tag = tag.to_ascii_lowercase();
		self.descendant_elements()
			.into_iter()
			.filter(|n| n.tag_name().as_deref() == Some(tag.as_str()))
			.collect()
	}

	/// Returns descendant elements whose `class` list contains `class`.
	pub fn elements_by_class(&self, class: &str) -> Vec<Node> {
		self.descendant_elements()
			.into_iter()
			.filter(|n| {
				n.get_attribute("class")
					.is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
			})
			.collect()
	}

	// ------------------------------------------------------------------
	// Attributes and properties
	// ------------------------------------------------------------------

	/// Returns the attributes in insertion order.
	pub fn attributes(&self) -> Vec<Attribute> {
		self.0.borrow().attributes.clone()
	}

	/// Returns an attribute value.
	pub fn get_attribute(&self, name: &str) -> Option<String> {
		let name = name.to_ascii_lowercase();
		self.0
			.borrow()
			.attributes
			.iter()
			.find(|a| a.name == name)
			.map(|a| a.value.clone())
	}

	/// Returns true if the attribute is present.
	pub fn has_attribute(&self, name: &str) -> bool {
		self.get_attribute(name).is_some()
	}

	/// Sets an attribute, keeping its position if it already exists.
	pub fn set_attribute(&self, name: &str, value: &str) {
		if !self.is_element() {
			return;
		}
		let name = name.to_ascii_lowercase();
		let mut data = self.0.borrow_mut();
		match data.attributes.iter_mut().find(|a| a.name == name) {
			Some(existing) => existing.value = value.to_string(),
			None => data.attributes.push(Attribute {
				name,
				value: value.to_string(),
			}),
		}
	}

	/// Removes an attribute. Returns true if it was present.
	pub fn remove_attribute(&self, name: &str) -> bool {
		let name = name.to_ascii_lowercase();
		let mut data = self.0.borrow_mut();
		let before = data.attributes.len();
		data.attributes.retain(|a| a.name != name);
		data.attributes.len() != before
	}

	/// Removes every attribute.
	pub fn clear_attributes(&self) {
		self.0.borrow_mut().attributes.clear();
	}

	/// Returns a property value.
	pub fn property(&self, name: &str) -> Option<Value> {
		self.0.borrow().properties.get(name).cloned()
	}

	/// Sets a property directly on the node, bypassing attributes.
	pub fn set_property(&self, name: &str, value: Value) {
		self.0
			.borrow_mut()
			.properties
			.insert(name.to_string(), value);
	}

	// ------------------------------------------------------------------
	// Shadow roots
	// ------------------------------------------------------------------

	/// Attaches an open shadow root to an element and returns it.
	///
	/// Returns the existing shadow root if one is already attached.
	pub fn attach_shadow(&self) -> Node {
		if let Some(existing) = self.shadow_root() {
			return existing;
		}
		let root = Node::from_kind(NodeKind::ShadowRoot);
		root.0.borrow_mut().host = Rc::downgrade(&self.0);
		self.0.borrow_mut().shadow_root = Some(root.clone());
		root
	}

	/// Returns the attached shadow root.
	pub fn shadow_root(&self) -> Option<Node> {
		self.0.borrow().shadow_root.clone()
	}

	/// Returns the host element of a shadow root.
	pub fn host(&self) -> Option<Node> {
		self.0.borrow().host.upgrade().map(Node)
	}
}

fn collect_text(children: &[Node], out: &mut String) {
	for child in children {
		let data = child.0.borrow();
		match &data.kind {
			NodeKind::Text(text) => out.push_str(text),
			NodeKind::Comment(_) => {}
			_ => collect_text(&data.children, out),
		}
	}
}

fn collect_elements(node: &Node, out: &mut Vec<Node>) {
	for child in node.children() {
		if child.is_element() {
			out.push(child.clone());
		}
		collect_elements(&child, out);
	}
}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Node")
			.field("name", &self.node_name())
			.field("children", &self.child_count())
			.finish()
	}
}

impl PartialEq for Node {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

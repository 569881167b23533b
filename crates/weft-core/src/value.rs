//! Dynamic values interpolated into templates.
//!
//! Templates accept heterogeneous values: primitives that are stringified into
//! markup, nested [`Parsed`] fragments that are merged, and non-serializable
//! values (event handlers, reference cells, rich objects) that travel through
//! the placeholder table instead of the markup string.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use crate::dom::Event;
use crate::parsed::Parsed;
use crate::refs::NodeRef;

/// A shared event handler.
///
/// Handlers compare by identity: two handlers are equal only when they share
/// the same allocation. This is what lets the linker keep exactly one active
/// listener per event name per node.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&Event)>);

impl Handler {
	/// Wraps a closure as a handler.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(&Event) + 'static,
	{
		Self(Rc::new(f))
	}

	/// Invokes the handler with an event.
	pub fn call(&self, event: &Event) {
		(self.0)(event)
	}

	/// Returns true if both handlers share the same closure.
	pub fn ptr_eq(&self, other: &Handler) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for Handler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Handler")
			.field(&Rc::as_ptr(&self.0).cast::<()>())
			.finish()
	}
}

impl PartialEq for Handler {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

/// An opaque, richly typed value.
///
/// Used to pass structured data into element properties (`p:name=`) without
/// serializing it into an attribute.
#[derive(Clone)]
pub struct AnyValue(Rc<dyn Any>);

impl AnyValue {
	/// Wraps an arbitrary value.
	pub fn new<T: Any>(value: T) -> Self {
		Self(Rc::new(value))
	}

	/// Returns a reference to the inner value if it has type `T`.
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.0.downcast_ref::<T>()
	}

	/// Returns true if both values share the same allocation.
	pub fn ptr_eq(&self, other: &AnyValue) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for AnyValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("AnyValue")
			.field(&Rc::as_ptr(&self.0).cast::<()>())
			.finish()
	}
}

/// A value interpolated into a template.
#[derive(Debug, Clone, Default)]
pub enum Value {
	/// Absent value; renders as the empty string.
	#[default]
	Null,
	/// A boolean.
	Bool(bool),
	/// An integer.
	Int(i64),
	/// A floating point number.
	Float(f64),
	/// A string.
	Str(String),
	/// A nested template result.
	Parsed(Parsed),
	/// A list of values, flattened one level in content position.
	List(Vec<Value>),
	/// An event handler.
	Handler(Handler),
	/// A reference cell populated with an element by the linker.
	Ref(NodeRef),
	/// An arbitrary typed value.
	Any(AnyValue),
}

impl Value {
	/// Wraps an arbitrary typed value.
	pub fn any<T: Any>(value: T) -> Self {
		Value::Any(AnyValue::new(value))
	}

	/// Converts the value to the text written into markup.
	///
	/// Nested lists join their elements with `,`. Handlers, reference cells and
	/// opaque values have no textual form and render as the empty string.
	pub fn to_text(&self) -> Cow<'_, str> {
		match self {
			Value::Null => Cow::Borrowed(""),
			Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
			Value::Int(n) => Cow::Owned(n.to_string()),
			Value::Float(n) => Cow::Owned(format_float(*n)),
			Value::Str(s) => Cow::Borrowed(s),
			Value::Parsed(p) => Cow::Borrowed(p.markup()),
			Value::List(items) => Cow::Owned(
				items
					.iter()
					.map(|item| item.to_text())
					.collect::<Vec<_>>()
					.join(","),
			),
			Value::Handler(_) | Value::Ref(_) | Value::Any(_) => Cow::Borrowed(""),
		}
	}

	/// Returns true for [`Value::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	/// Returns the handler, if this is one.
	pub fn as_handler(&self) -> Option<&Handler> {
		match self {
			Value::Handler(h) => Some(h),
			_ => None,
		}
	}

	/// Returns the reference cell, if this is one.
	pub fn as_node_ref(&self) -> Option<&NodeRef> {
		match self {
			Value::Ref(r) => Some(r),
			_ => None,
		}
	}

	/// Returns the string, if this is one.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(s) => Some(s),
			_ => None,
		}
	}

	/// Returns the integer, if this is one.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Int(n) => Some(*n),
			_ => None,
		}
	}

	/// Returns the number as a float, converting integers.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Int(n) => Some(*n as f64),
			Value::Float(n) => Some(*n),
			_ => None,
		}
	}

	/// Returns the boolean, if this is one.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// Returns the nested template, if this is one.
	pub fn as_parsed(&self) -> Option<&Parsed> {
		match self {
			Value::Parsed(p) => Some(p),
			_ => None,
		}
	}

	/// Downcasts an opaque value.
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		match self {
			Value::Any(v) => v.downcast_ref::<T>(),
			_ => None,
		}
	}
}

fn format_float(n: f64) -> String {
	if n.is_nan() {
		"NaN".to_string()
	} else if n.is_infinite() {
		let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
		text.to_string()
	} else {
		n.to_string()
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_text())
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Null, Value::Null) => true,
			(Value::Bool(a), Value::Bool(b)) => a == b,
			(Value::Int(a), Value::Int(b)) => a == b,
			(Value::Float(a), Value::Float(b)) => a == b,
			(Value::Str(a), Value::Str(b)) => a == b,
			(Value::Parsed(a), Value::Parsed(b)) => a == b,
			(Value::List(a), Value::List(b)) => a == b,
			(Value::Handler(a), Value::Handler(b)) => a.ptr_eq(b),
			(Value::Ref(a), Value::Ref(b)) => a.ptr_eq(b),
			(Value::Any(a), Value::Any(b)) => a.ptr_eq(b),
			_ => false,
		}
	}
}

impl From<()> for Value {
	fn from(_: ()) -> Self {
		Value::Null
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}

macro_rules! impl_from_int {
	($($t:ty),*) => {
		$(
			impl From<$t> for Value {
				fn from(value: $t) -> Self {
					Value::Int(i64::from(value))
				}
			}
		)*
	};
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
	fn from(value: u64) -> Self {
		i64::try_from(value).map_or(Value::Float(value as f64), Value::Int)
	}
}

impl From<usize> for Value {
	fn from(value: usize) -> Self {
		i64::try_from(value).map_or(Value::Float(value as f64), Value::Int)
	}
}

impl From<isize> for Value {
	fn from(value: isize) -> Self {
		Value::Int(value as i64)
	}
}

impl From<f32> for Value {
	fn from(value: f32) -> Self {
		Value::Float(f64::from(value))
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Float(value)
	}
}

impl From<char> for Value {
	fn from(value: char) -> Self {
		Value::Str(value.to_string())
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::Str(value.to_string())
	}
}

impl From<&String> for Value {
	fn from(value: &String) -> Self {
		Value::Str(value.clone())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::Str(value)
	}
}

impl From<Cow<'_, str>> for Value {
	fn from(value: Cow<'_, str>) -> Self {
		Value::Str(value.into_owned())
	}
}

impl From<Parsed> for Value {
	fn from(value: Parsed) -> Self {
		Value::Parsed(value)
	}
}

impl From<Handler> for Value {
	fn from(value: Handler) -> Self {
		Value::Handler(value)
	}
}

impl From<NodeRef> for Value {
	fn from(value: NodeRef) -> Self {
		Value::Ref(value)
	}
}

impl From<&NodeRef> for Value {
	fn from(value: &NodeRef) -> Self {
		Value::Ref(value.clone())
	}
}

impl From<AnyValue> for Value {
	fn from(value: AnyValue) -> Self {
		Value::Any(value)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Value::Null, Into::into)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(value: Vec<T>) -> Self {
		Value::List(value.into_iter().map(Into::into).collect())
	}
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
	fn from(value: [T; N]) -> Self {
		Value::List(value.into_iter().map(Into::into).collect())
	}
}

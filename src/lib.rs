//! Weft - a minimal UI-component runtime
//!
//! Weft renders components from tagged-template style markup into a tree of
//! nodes, keeps the tree in sync with positional reconciliation, and wires
//! event handlers, element properties and reference cells through placeholder
//! tokens embedded in the markup.
//!
//! ## Architecture
//!
//! - [`markup`]: the markup builder, [`Parsed`] values, the in-memory tree,
//!   the reconciler and the binding linker (from `weft-core`)
//! - [`component`]: components, hosts, reactive state, effects and frame
//!   scheduling (from `weft-component`, behind the `component` feature)
//!
//! ## Template protocol
//!
//! | Segment ends with | Interpolated value becomes |
//! |-------------------|----------------------------|
//! | ` on<name>=`      | an event listener for the camel-cased `<name>` |
//! | ` p:<name>=`      | the camel-cased element property `<name>` |
//! | ` ref=`           | the element, stored in a [`NodeRef`] |
//! | any other `=`     | an escaped, double-quoted attribute value |
//! | anything else     | content; nested [`Parsed`] values are merged and lists flattened |
//!
//! ## Example
//!
//! ```
//! use weft::prelude::*;
//!
//! struct Greeting {
//! 	name: Reactive<String>,
//! }
//!
//! impl Component for Greeting {
//! 	fn render(&self) -> Option<Parsed> {
//! 		Some(html!("<h1>Hello, ", self.name.get(), "!</h1>"))
//! 	}
//! }
//!
//! let frames = FrameQueue::new();
//! let host = Host::new(Node::element("x-greeting"), HostOptions::new(), frames.clone(), |cx| {
//! 	Greeting { name: cx.reactive("World".to_string()) }
//! });
//! host.connect().unwrap();
//! assert_eq!(host.root().inner_html(), "<h1>Hello, World!</h1>");
//!
//! host.with_component(|c| c.name.set("Weft".to_string())).unwrap();
//! frames.run_frame();
//! assert_eq!(host.root().inner_html(), "<h1>Hello, Weft!</h1>");
//! ```

#![warn(missing_docs)]

#[cfg(feature = "component")]
pub mod component;
pub mod markup;

pub use weft_core::html;
pub use weft_core::{Node, NodeRef, Parsed, Value};

/// Commonly used types and macros.
pub mod prelude {
	pub use crate::markup::{
		Event, EventInit, Handler, MarkupError, Node, NodeRef, ParseOptions, Parsed, Value, apply,
		on,
	};
	pub use weft_core::html;

	#[cfg(feature = "component")]
	pub use crate::component::{
		Component, Context, Effects, Emitter, FrameQueue, FrameScheduler, Host, HostOptions,
		Lifecycle, Reactive, UpdateError,
	};
}

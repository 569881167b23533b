//! Weft Core - markup building, reconciliation and binding
//!
//! The rendering half of Weft. Templates are built into [`Parsed`] values,
//! parsed into a detached tree, reconciled position-by-position against a live
//! [`Node`] tree, and finally linked: placeholder tokens left in attributes
//! are resolved to event handlers, element properties and reference cells.
//!
//! ## Modules
//!
//! - [`html`](mod@html): the markup builder and the [`html!`] macro
//! - [`parsed`]: the [`Parsed`] value and its placeholder table
//! - [`value`]: values accepted by templates
//! - [`dom`]: the in-memory document tree and event dispatch
//! - [`parse`]: markup parsing with html5ever
//! - [`reconcile`]: positional tree diffing
//! - [`link`]: placeholder resolution
//! - [`refs`]: reference cells
//! - [`escape`]: text and attribute escaping
//!
//! ## Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use weft_core::{Node, html, html::on, reconcile};
//!
//! let clicks = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&clicks);
//! let view = html!(
//! 	"<button onclick=", on(move |_| counter.set(counter.get() + 1)), ">Click</button>"
//! );
//!
//! let root = Node::element("div");
//! reconcile::apply(&root, &view).unwrap();
//! root.elements_by_tag("button")[0].click();
//!
//! assert_eq!(clicks.get(), 1);
//! ```

#![warn(missing_docs)]

pub mod dom;
pub mod error;
pub mod escape;
pub mod html;
pub mod link;
pub mod parse;
pub mod parsed;
pub mod reconcile;
pub mod refs;
pub mod value;

pub use dom::{Attribute, Event, EventInit, Node, NodeType, WeakNode};
pub use error::MarkupError;
pub use escape::{escape_attr, escape_text};
pub use link::{LinkReport, link};
pub use parse::{ParseOptions, parse_fragment};
pub use parsed::{Bindings, InvalidPlaceholder, Parsed, PlaceholderKey};
pub use reconcile::{apply, apply_with, diff};
pub use refs::NodeRef;
pub use value::{AnyValue, Handler, Value};

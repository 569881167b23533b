//! A small in-memory document tree.
//!
//! The tree is the render target for reconciliation: elements, text and
//! comment nodes with ordered attributes, free-form properties, event
//! listeners and optional shadow roots. Handles are reference counted and
//! single-threaded.

mod event;
mod node;
mod serialize;

pub use event::{Event, EventInit};
pub use node::{Attribute, Node, NodeType, WeakNode};

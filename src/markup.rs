//! Markup building, reconciliation and binding
//!
//! This module re-exports `weft-core`.
//!
//! ```
//! use weft::markup::{Node, apply, on};
//! use weft::html;
//!
//! let root = Node::element("div");
//! let items = vec!["a", "b", "c"];
//! let view = html!(
//! 	"<ul onclick=", on(|_| {}), ">",
//! 	items.iter().map(|item| html!("<li>", *item, "</li>")).collect::<Vec<_>>(),
//! 	"</ul>"
//! );
//!
//! let report = apply(&root, &view).unwrap();
//! assert_eq!(report.listeners, 1);
//! assert_eq!(root.elements_by_tag("li").len(), 3);
//! ```

pub use weft_core::*;
pub use weft_core::html::on;

//! Reconciliation and linking through the facade

use proptest::prelude::*;
use rstest::{fixture, rstest};
use std::cell::RefCell;
use std::rc::Rc;
use weft::html;
use weft::markup::{Event, Node, Parsed, apply, on};

#[fixture]
fn root() -> Node {
	Node::element("section")
}

fn list(items: &[&str]) -> Parsed {
	let rows: Vec<Parsed> = items
		.iter()
		.map(|item| html!("<li class=", "row", ">", *item, "</li>"))
		.collect();
	html!("<ul>", rows, "</ul>")
}

#[rstest]
fn test_applying_twice_is_idempotent(root: Node) {
	let view = list(&["a", "b", "c"]);
	apply(&root, &view).unwrap();
	let first = root.inner_html();
	let nodes = root.descendant_elements();

	apply(&root, &view).unwrap();

	assert_eq!(root.inner_html(), first);
	assert!(
		nodes
			.iter()
			.zip(root.descendant_elements())
			.all(|(a, b)| a.ptr_eq(&b))
	);
}

#[rstest]
fn test_one_changed_row_keeps_every_element(root: Node) {
	apply(&root, &list(&["a", "b", "c"])).unwrap();
	let rows = root.elements_by_tag("li");

	apply(&root, &list(&["a", "B", "c"])).unwrap();

	let after = root.elements_by_tag("li");
	assert!(rows.iter().zip(&after).all(|(a, b)| a.ptr_eq(b)));
	assert_eq!(after[1].text_content(), "B");
}

#[rstest]
fn test_inserting_at_the_front_rewrites_positionally(root: Node) {
	apply(&root, &list(&["b", "c"])).unwrap();
	let rows = root.elements_by_tag("li");

	apply(&root, &list(&["a", "b", "c"])).unwrap();

	let after = root.elements_by_tag("li");
	assert!(after[0].ptr_eq(&rows[0]));
	assert!(after[1].ptr_eq(&rows[1]));
	let texts: Vec<String> = after.iter().map(Node::text_content).collect();
	assert_eq!(texts, ["a", "b", "c"]);
}

#[rstest]
fn test_rerender_swaps_listener(root: Node) {
	let log = Rc::new(RefCell::new(Vec::new()));
	let view = |label: &'static str| {
		let sink = Rc::clone(&log);
		html!(
			"<button onclick=",
			on(move |_: &Event| sink.borrow_mut().push(label)),
			">go</button>"
		)
	};

	apply(&root, &view("first")).unwrap();
	let button = root.elements_by_tag("button")[0].clone();
	apply(&root, &view("second")).unwrap();
	button.click();

	assert!(root.elements_by_tag("button")[0].ptr_eq(&button));
	assert_eq!(*log.borrow(), ["second"]);
}

#[rstest]
fn test_property_binding_reaches_nested_element(root: Node) {
	let config = vec![("theme", "dark")];
	let view = html!("<div><x-settings p:initial-config=", weft::Value::any(config), "></x-settings></div>");

	apply(&root, &view).unwrap();

	let settings = root.elements_by_tag("x-settings")[0].clone();
	let value = settings.property("initialConfig").unwrap();
	assert_eq!(
		value.downcast_ref::<Vec<(&'static str, &'static str)>>(),
		Some(&vec![("theme", "dark")])
	);
}

proptest! {
	#[test]
	fn prop_reconciles_to_exact_length(from in 0usize..12, to in 0usize..12) {
		let root = Node::element("ol");
		let rows = |n: usize| -> Parsed {
			let items: Vec<Parsed> = (0..n).map(|i| html!("<li>", i, "</li>")).collect();
			html!("", items, "")
		};

		apply(&root, &rows(from)).unwrap();
		apply(&root, &rows(to)).unwrap();

		prop_assert_eq!(root.child_count(), to);
		prop_assert_eq!(root.inner_html(), rows(to).markup().to_string());
	}
}

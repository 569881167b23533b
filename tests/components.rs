//! End-to-end component scenarios
//!
//! Each test drives a host with a [`FrameQueue`] so frames run exactly when
//! the test asks for them.

#![cfg(feature = "component")]

use rstest::{fixture, rstest};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use weft::prelude::*;

#[fixture]
fn frames() -> FrameQueue {
	FrameQueue::new()
}

// ---------------------------------------------------------------------------
// Counter
// ---------------------------------------------------------------------------

struct Counter {
	count: Reactive<i64>,
	renders: Rc<Cell<usize>>,
}

impl Component for Counter {
	fn render(&self) -> Option<Parsed> {
		self.renders.set(self.renders.get() + 1);
		let count = self.count.clone();
		Some(html!(
			"<button onclick=",
			on(move |_| {
				count.update(|n| *n += 1);
				count.update(|n| *n += 1);
			}),
			">Count: ",
			self.count.get(),
			"</button>"
		))
	}
}

fn counter(frames: &FrameQueue) -> (Host<Counter>, Rc<Cell<usize>>) {
	let renders = Rc::new(Cell::new(0));
	let tally = Rc::clone(&renders);
	let host = Host::new(
		Node::element("x-counter"),
		HostOptions::new(),
		frames.clone(),
		move |cx| Counter {
			count: cx.reactive(0),
			renders: tally,
		},
	);
	host.connect().unwrap();
	(host, renders)
}

#[rstest]
fn test_two_increments_in_one_click_render_once(frames: FrameQueue) {
	let (host, renders) = counter(&frames);
	let button = host.root().elements_by_tag("button")[0].clone();
	assert_eq!(button.text_content(), "Count: 0");

	button.click();

	assert_eq!(frames.pending(), 1);
	assert_eq!(renders.get(), 1);

	let report = frames.run_frame();

	assert!(report.is_ok());
	assert_eq!(renders.get(), 2);
	assert_eq!(host.root().inner_html().matches("<button").count(), 1);
	assert!(host.root().elements_by_tag("button")[0].ptr_eq(&button));
	assert_eq!(button.text_content(), "Count: 2");
}

#[rstest]
fn test_relinked_handler_keeps_counting(frames: FrameQueue) {
	let (host, _) = counter(&frames);

	for _ in 0..3 {
		host.root().elements_by_tag("button")[0].click();
		frames.run_frame();
	}

	assert_eq!(host.root().text_content(), "Count: 6");
	assert_eq!(host.root().elements_by_tag("button")[0].listener_count("click"), 1);
}

#[rstest]
fn test_equal_write_does_not_schedule(frames: FrameQueue) {
	let (host, renders) = counter(&frames);

	host.with_component(|c| c.count.set(0)).unwrap();

	assert_eq!(frames.pending(), 0);
	assert!(!host.is_update_pending());
	assert_eq!(renders.get(), 1);
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

struct TodoList {
	items: Reactive<Vec<String>>,
}

impl Component for TodoList {
	fn render(&self) -> Option<Parsed> {
		let rows: Vec<Parsed> = self.items.with(|items| {
			items
				.iter()
				.enumerate()
				.map(|(index, item)| {
					let list = self.items.clone();
					html!(
						"<li>",
						item.as_str(),
						"<button onclick=",
						on(move |_| {
							list.update(|items| {
								items.remove(index);
							});
						}),
						">x</button></li>"
					)
				})
				.collect()
		});
		Some(html!("<ul>", rows, "</ul>"))
	}
}

#[rstest]
fn test_removing_the_middle_item_keeps_order(frames: FrameQueue) {
	let host = Host::new(Node::element("x-todos"), HostOptions::new(), frames.clone(), |cx| TodoList {
		items: cx.reactive(vec!["a".to_string(), "b".to_string(), "c".to_string()]),
	});
	host.connect().unwrap();
	let first = host.root().elements_by_tag("li")[0].clone();

	host.root().elements_by_tag("button")[1].click();
	frames.run_frame();

	let rows = host.root().elements_by_tag("li");
	let texts: Vec<String> = rows.iter().map(Node::text_content).collect();
	assert_eq!(texts, ["ax", "cx"]);
	assert!(rows[0].ptr_eq(&first));
}

// ---------------------------------------------------------------------------
// Refs and mount hooks
// ---------------------------------------------------------------------------

struct Canvas {
	surface: NodeRef,
	mounted_with: Rc<RefCell<Option<String>>>,
}

impl Component for Canvas {
	fn render(&self) -> Option<Parsed> {
		Some(html!("<div><canvas ref=", &self.surface, " width=", 300, "></canvas></div>"))
	}

	fn on_mount(&mut self) {
		*self.mounted_with.borrow_mut() = self.surface.get().map(|n| n.node_name());
	}
}

#[rstest]
fn test_ref_is_populated_before_mount(frames: FrameQueue) {
	let mounted_with = Rc::new(RefCell::new(None));
	let seen = Rc::clone(&mounted_with);
	let host = Host::new(Node::element("x-canvas"), HostOptions::new(), frames, move |cx| Canvas {
		surface: cx.node_ref(None),
		mounted_with: seen,
	});

	host.connect().unwrap();

	assert_eq!(mounted_with.borrow().as_deref(), Some("CANVAS"));
	let surface = host.with_component(|c| c.surface.clone()).unwrap();
	let canvas = surface.get().unwrap();
	assert_eq!(canvas.get_attribute("width").as_deref(), Some("300"));
	assert!(canvas.ptr_eq(&host.root().elements_by_tag("canvas")[0]));
}

// ---------------------------------------------------------------------------
// Shadow roots and events
// ---------------------------------------------------------------------------

struct Picker {
	emitter: Emitter,
}

impl Component for Picker {
	fn render(&self) -> Option<Parsed> {
		let emitter = self.emitter.clone();
		Some(html!(
			"<button onclick=",
			on(move |_| {
				emitter.emit_with("picked", 3, emitter.event_init().bubbles(true));
			}),
			">pick</button>"
		))
	}
}

#[rstest]
fn test_shadow_host_events_cross_the_boundary(frames: FrameQueue) {
	let page = Node::element("main");
	let element = Node::element("x-picker");
	page.append_child(&element);
	let host = Host::new(element.clone(), HostOptions::new().shadow_root(), frames, |cx| Picker {
		emitter: cx.emitter(),
	});
	host.connect().unwrap();

	let picked = Rc::new(RefCell::new(Vec::new()));
	let clicks = Rc::new(Cell::new(0));
	let sink = Rc::clone(&picked);
	page.add_event_listener(
		"picked",
		&Handler::new(move |e: &Event| {
			let from_host = e.target().is_some_and(|t| t.node_name() == "X-PICKER");
			sink.borrow_mut().push((e.detail().as_i64(), from_host));
		}),
	);
	let counter = Rc::clone(&clicks);
	page.add_event_listener("click", &Handler::new(move |_| counter.set(counter.get() + 1)));

	assert!(element.inner_html().is_empty());
	host.root().elements_by_tag("button")[0].click();

	assert_eq!(*picked.borrow(), [(Some(3), true)]);
	assert_eq!(clicks.get(), 0);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

struct Raw {
	content: Reactive<String>,
}

impl Component for Raw {
	fn render(&self) -> Option<Parsed> {
		Some(html!("<p>", self.content.get(), "</p>"))
	}
}

#[rstest]
fn test_malformed_update_leaves_previous_tree(frames: FrameQueue) {
	let host = Host::new(
		Node::element("x-raw"),
		HostOptions::new().strict_markup(),
		frames.clone(),
		|cx| Raw {
			content: cx.reactive("fine".to_string()),
		},
	);
	host.connect().unwrap();

	host.with_component(|c| c.content.set("broken</span>".to_string()))
		.unwrap();
	let report = frames.run_frame();

	assert_eq!(report.errors.len(), 1);
	assert!(matches!(
		report.errors[0],
		UpdateError::Markup(MarkupError::Malformed { .. })
	));
	assert_eq!(host.root().inner_html(), "<p>fine</p>");
	assert_eq!(host.lifecycle(), Lifecycle::Mounted);
}

struct Watched {
	count: Reactive<i64>,
	log: Rc<RefCell<Vec<&'static str>>>,
}

impl Component for Watched {
	fn render(&self) -> Option<Parsed> {
		Some(html!("<span>", self.count.get(), "</span>"))
	}

	fn on_init(&mut self, effects: &mut Effects) {
		let count = self.count.clone();
		let log = Rc::clone(&self.log);
		effects.watch(
			move || count.get(),
			move |new: &i64, _old: &i64| -> Result<(), String> {
				log.borrow_mut().push("first");
				if *new > 1 {
					return Err(format!("too many: {new}"));
				}
				Ok(())
			},
		);

		let count = self.count.clone();
		let log = Rc::clone(&self.log);
		effects.watch(move || count.get(), move |_: &i64, _: &i64| log.borrow_mut().push("second"));
	}

	fn on_update(&mut self) {
		self.log.borrow_mut().push("update");
	}
}

#[rstest]
fn test_effect_failure_aborts_the_cycle(frames: FrameQueue) {
	let log = Rc::new(RefCell::new(Vec::new()));
	let entries = Rc::clone(&log);
	let host = Host::new(Node::element("x-watched"), HostOptions::new(), frames.clone(), move |cx| Watched {
		count: cx.reactive(0),
		log: entries,
	});
	host.connect().unwrap();
	let count = host.with_component(|c| c.count.clone()).unwrap();
	assert_eq!(host.effect_count(), 2);
	log.borrow_mut().clear();

	count.set(1);
	assert!(frames.run_frame().is_ok());
	assert_eq!(*log.borrow(), ["first", "second", "update"]);
	log.borrow_mut().clear();

	count.set(2);
	let report = frames.run_frame();

	assert_eq!(*log.borrow(), ["first"]);
	assert_eq!(report.errors.len(), 1);
	assert_eq!(report.errors[0].to_string(), "effect 0 failed: too many: 2");
	assert_eq!(host.root().text_content(), "2");
}

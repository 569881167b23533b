//! Components and their hosts.
//!
//! A [`Component`] renders markup from its state and reacts to lifecycle
//! hooks. A [`Host`] binds one component instance to an element and drives it:
//! connecting runs `on_init`, a synchronous first render and `on_mount`;
//! changing writes to [`Reactive`] state schedule at most one re-render per
//! frame; disconnecting runs `on_unmount`.
//!
//! ```
//! use weft_component::{Component, Context, FrameQueue, Host, HostOptions, Reactive};
//! use weft_core::{Node, Parsed, html, html::on};
//!
//! struct Counter {
//! 	count: Reactive<i64>,
//! }
//!
//! impl Component for Counter {
//! 	fn render(&self) -> Option<Parsed> {
//! 		let count = self.count.clone();
//! 		Some(html!(
//! 			"<button onclick=", on(move |_| { count.update(|n| *n += 1); }), ">Count: ",
//! 			self.count.get(), "</button>"
//! 		))
//! 	}
//! }
//!
//! let frames = FrameQueue::new();
//! let host = Host::new(Node::element("x-counter"), HostOptions::new(), frames.clone(), |cx: &Context| {
//! 	Counter { count: cx.reactive(0) }
//! });
//! host.connect().unwrap();
//!
//! host.root().elements_by_tag("button")[0].click();
//! frames.run_frame();
//!
//! assert_eq!(host.root().text_content(), "Count: 1");
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use weft_core::{Event, EventInit, Node, NodeRef, Parsed, Value, WeakNode, reconcile};

use crate::effects::Effects;
use crate::error::UpdateError;
use crate::options::HostOptions;
use crate::reactive::Reactive;
use crate::scheduler::{FrameScheduler, UpdateSignal, UpdateTarget};

/// A renderable unit with optional lifecycle hooks.
///
/// Every method has a no-op default, so components implement only what they
/// use.
pub trait Component: 'static {
	/// Produces the component's markup. `None` renders nothing.
	fn render(&self) -> Option<Parsed> {
		None
	}

	/// Called once, before the first render. Register effects here.
	fn on_init(&mut self, _effects: &mut Effects) {}

	/// Called after the first render.
	fn on_mount(&mut self) {}

	/// Called when the host is disconnected.
	fn on_unmount(&mut self) {}

	/// Called after each render and effect check.
	fn on_update(&mut self) {}

	/// Host attributes whose changes are reported to
	/// [`on_attribute_changed`](Component::on_attribute_changed).
	fn observed_attributes(&self) -> &'static [&'static str] {
		&[]
	}

	/// Called when an observed attribute changes.
	fn on_attribute_changed(&mut self, _name: &str, _old: Option<&str>, _new: Option<&str>) {}

	/// Returns the component's name for diagnostics.
	fn name() -> &'static str
	where
		Self: Sized,
	{
		std::any::type_name::<Self>()
	}
}

/// Where a host is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
	/// Created but never connected.
	Uninitialized,
	/// Connected and rendered.
	Mounted,
	/// Disconnected.
	Unmounted,
}

/// Dispatches custom events from a host element.
#[derive(Debug, Clone)]
pub struct Emitter {
	element: WeakNode,
	composed: bool,
}

impl Emitter {
	/// Returns the default options for events from this host: composed when
	/// the host renders into a shadow root, otherwise all flags cleared.
	pub fn event_init(&self) -> EventInit {
		EventInit::new().composed(self.composed)
	}

	/// Dispatches `name` with a detail payload and the host's default options.
	///
	/// Returns false if a listener cancelled the event or the host element is
	/// gone.
	pub fn emit(&self, name: &str, detail: impl Into<Value>) -> bool {
		self.emit_with(name, detail, self.event_init())
	}

	/// Dispatches `name` with explicit options.
	pub fn emit_with(&self, name: &str, detail: impl Into<Value>, init: EventInit) -> bool {
		let Some(element) = self.element.upgrade() else {
			tracing::debug!(event = name, "emit on a dropped host element");
			return false;
		};
		element.dispatch_event(&Event::custom(name, detail, init))
	}
}

/// Construction context passed to a component factory.
pub struct Context {
	signal: Rc<UpdateSignal>,
	element: Node,
	shadow: bool,
}

impl Context {
	/// Wraps state so that changing writes re-render this host.
	pub fn reactive<T: PartialEq + 'static>(&self, value: T) -> Reactive<T> {
		Reactive::attached(value, Rc::clone(&self.signal))
	}

	/// Creates a reference cell, optionally pointing at an initial element.
	pub fn node_ref(&self, initial: Option<&Node>) -> NodeRef {
		NodeRef::with_initial(initial)
	}

	/// Returns an emitter for the host element.
	pub fn emitter(&self) -> Emitter {
		Emitter {
			element: self.element.downgrade(),
			composed: self.shadow,
		}
	}

	/// Returns the host element.
	pub fn element(&self) -> &Node {
		&self.element
	}
}

struct HostInner<C> {
	name: &'static str,
	element: Node,
	options: HostOptions,
	signal: Rc<UpdateSignal>,
	component: RefCell<C>,
	effects: RefCell<Effects>,
	lifecycle: Cell<Lifecycle>,
	initialized: Cell<bool>,
	updating: Cell<bool>,
}

/// Marks a host as updating until dropped.
struct UpdateGuard<'a>(&'a Cell<bool>);

impl<'a> UpdateGuard<'a> {
	fn enter(flag: &'a Cell<bool>) -> Result<Self, UpdateError> {
		if flag.replace(true) {
			return Err(UpdateError::Busy);
		}
		Ok(Self(flag))
	}
}

impl Drop for UpdateGuard<'_> {
	fn drop(&mut self) {
		self.0.set(false);
	}
}

impl<C: Component> HostInner<C> {
	fn root(&self) -> Node {
		self.element
			.shadow_root()
			.unwrap_or_else(|| self.element.clone())
	}

	fn update(&self) -> Result<(), UpdateError> {
		let _guard = UpdateGuard::enter(&self.updating).inspect_err(|_| {
			tracing::debug!(component = self.name, "update re-entered while rendering");
		})?;
		let parsed = self
			.component
			.try_borrow()
			.map_err(|_| UpdateError::Busy)?
			.render()
			.unwrap_or_default();

		let report = reconcile::apply_with(&self.root(), &parsed, &self.options.parse)?;
		tracing::debug!(
			component = self.name,
			bindings = report.applied(),
			skipped = report.skipped,
			"rendered"
		);

		self.effects
			.try_borrow_mut()
			.map_err(|_| UpdateError::Busy)?
			.check()?;
		self.component
			.try_borrow_mut()
			.map_err(|_| UpdateError::Busy)?
			.on_update();
		Ok(())
	}
}

impl<C: Component> UpdateTarget for HostInner<C> {
	fn run_scheduled_update(&self) -> Result<(), UpdateError> {
		self.signal.clear();
		if self.lifecycle.get() != Lifecycle::Mounted {
			tracing::warn!(
				component = self.name,
				lifecycle = ?self.lifecycle.get(),
				"skipping scheduled update for a host that is not mounted"
			);
			return Ok(());
		}
		self.update()
	}
}

/// Binds a component instance to a host element.
pub struct Host<C> {
	inner: Rc<HostInner<C>>,
}

impl<C: Component> Host<C> {
	/// Creates a host for `element`, building the component with `factory`.
	///
	/// With `HostOptions::shadow_root` set, an open shadow root is attached
	/// immediately and becomes the render target.
	pub fn new<S, F>(element: Node, options: HostOptions, scheduler: S, factory: F) -> Self
	where
		S: FrameScheduler + 'static,
		F: FnOnce(&Context) -> C,
	{
		let scheduler: Rc<dyn FrameScheduler> = Rc::new(scheduler);
		if options.shadow_root {
			element.attach_shadow();
		}

		let inner = Rc::new_cyclic(|weak: &Weak<HostInner<C>>| {
			let target: Weak<dyn UpdateTarget> = weak.clone();
			let signal = Rc::new(UpdateSignal::new(scheduler, target));
			let context = Context {
				signal: Rc::clone(&signal),
				element: element.clone(),
				shadow: options.shadow_root,
			};
			let component = factory(&context);

			HostInner {
				name: C::name(),
				element,
				options,
				signal,
				component: RefCell::new(component),
				effects: RefCell::new(Effects::new()),
				lifecycle: Cell::new(Lifecycle::Uninitialized),
				initialized: Cell::new(false),
				updating: Cell::new(false),
			}
		});

		Self { inner }
	}

	/// Connects the host: `on_init` on first connection, a synchronous render,
	/// then `on_mount`. Connecting a mounted host does nothing.
	///
	/// If the first render fails the host stays unmounted. A later `connect`
	/// retries the render without running `on_init` again.
	pub fn connect(&self) -> Result<(), UpdateError> {
		let inner = &self.inner;
		if inner.lifecycle.get() == Lifecycle::Mounted {
			return Ok(());
		}
		if !inner.initialized.get() {
			let mut component = inner.component.try_borrow_mut().map_err(|_| UpdateError::Busy)?;
			let mut effects = inner.effects.try_borrow_mut().map_err(|_| UpdateError::Busy)?;
			component.on_init(&mut effects);
			inner.initialized.set(true);
		}

		inner.update()?;
		inner.lifecycle.set(Lifecycle::Mounted);
		inner
			.component
			.try_borrow_mut()
			.map_err(|_| UpdateError::Busy)?
			.on_mount();
		tracing::debug!(component = inner.name, "mounted");
		Ok(())
	}

	/// Disconnects the host and runs `on_unmount`. Pending scheduled updates
	/// are skipped from now on.
	pub fn disconnect(&self) -> Result<(), UpdateError> {
		let inner = &self.inner;
		if inner.lifecycle.get() != Lifecycle::Mounted {
			return Ok(());
		}
		inner.lifecycle.set(Lifecycle::Unmounted);
		inner
			.component
			.try_borrow_mut()
			.map_err(|_| UpdateError::Busy)?
			.on_unmount();
		tracing::debug!(component = inner.name, "unmounted");
		Ok(())
	}

	/// Sets or removes a host attribute and notifies the component if the
	/// attribute is observed.
	///
	/// Returns true if the component was notified.
	pub fn attribute_changed(&self, name: &str, value: Option<&str>) -> Result<bool, UpdateError> {
		let element = &self.inner.element;
		let old = element.get_attribute(name);
		match value {
			Some(value) => element.set_attribute(name, value),
			None => {
				element.remove_attribute(name);
			}
		}

		let mut component = self
			.inner
			.component
			.try_borrow_mut()
			.map_err(|_| UpdateError::Busy)?;
		if !component.observed_attributes().iter().any(|observed| *observed == name) {
			return Ok(false);
		}
		component.on_attribute_changed(name, old.as_deref(), value);
		Ok(true)
	}

	/// Renders synchronously, outside the frame schedule.
	///
	/// Returns [`UpdateError::Busy`] without rendering when called while this
	/// host is already updating, for example from an effect callback.
	pub fn update(&self) -> Result<(), UpdateError> {
		self.inner.update()
	}

	/// Schedules a re-render on the next frame. Returns false if one is
	/// already pending.
	pub fn request_update(&self) -> bool {
		self.inner.signal.notify()
	}

	/// Returns true while a scheduled re-render has not run yet.
	pub fn is_update_pending(&self) -> bool {
		self.inner.signal.is_pending()
	}

	/// Returns the host element.
	pub fn element(&self) -> &Node {
		&self.inner.element
	}

	/// Returns the render target: the shadow root if there is one, otherwise
	/// the host element.
	pub fn root(&self) -> Node {
		self.inner.root()
	}

	/// Runs `f` with mutable access to the component.
	pub fn with_component<R>(&self, f: impl FnOnce(&mut C) -> R) -> Result<R, UpdateError> {
		let mut component = self
			.inner
			.component
			.try_borrow_mut()
			.map_err(|_| UpdateError::Busy)?;
		Ok(f(&mut component))
	}

	/// Returns the current lifecycle state.
	pub fn lifecycle(&self) -> Lifecycle {
		self.inner.lifecycle.get()
	}

	/// Returns the number of registered effects.
	pub fn effect_count(&self) -> usize {
		self.inner.effects.borrow().len()
	}
}

impl<C> Clone for Host<C> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<C> fmt::Debug for Host<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Host")
			.field("component", &self.inner.name)
			.field("element", &self.inner.element)
			.field("lifecycle", &self.inner.lifecycle.get())
			.finish()
	}
}

//! Mutation-tracked state.
//!
//! [`Reactive`] is the Rust counterpart of a watched state record: every write
//! goes through a method that compares the old and new value, and only a
//! changing write raises the owning host's [`UpdateSignal`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::scheduler::UpdateSignal;

struct Shared<T> {
	value: RefCell<T>,
	signal: Option<Rc<UpdateSignal>>,
}

/// Shared state whose changing writes schedule a re-render.
///
/// Clones share the same value.
pub struct Reactive<T> {
	shared: Rc<Shared<T>>,
}

impl<T: PartialEq> Reactive<T> {
	pub(crate) fn attached(value: T, signal: Rc<UpdateSignal>) -> Self {
		Self {
			shared: Rc::new(Shared {
				value: RefCell::new(value),
				signal: Some(signal),
			}),
		}
	}

	/// Creates state that belongs to no host. Writes are tracked but never
	/// schedule anything.
	pub fn detached(value: T) -> Self {
		Self {
			shared: Rc::new(Shared {
				value: RefCell::new(value),
				signal: None,
			}),
		}
	}

	/// Returns a copy of the current value.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.shared.value.borrow().clone()
	}

	/// Reads the current value without copying it.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.shared.value.borrow())
	}

	/// Writes a value. Returns true if it differed from the current one.
	pub fn set(&self, value: T) -> bool {
		let changed = *self.shared.value.borrow() != value;
		if changed {
			*self.shared.value.borrow_mut() = value;
			self.notify();
		}
		changed
	}

	/// Writes a value and returns the previous one. Schedules an update only
	/// if they differ.
	pub fn replace(&self, value: T) -> T {
		let changed = *self.shared.value.borrow() != value;
		let previous = self.shared.value.replace(value);
		if changed {
			self.notify();
		}
		previous
	}

	/// Mutates the value in place. Returns true if the mutation changed it.
	pub fn update(&self, f: impl FnOnce(&mut T)) -> bool
	where
		T: Clone,
	{
		let changed = {
			let mut value = self.shared.value.borrow_mut();
			let before = value.clone();
			f(&mut value);
			*value != before
		};
		if changed {
			self.notify();
		}
		changed
	}

	fn notify(&self) {
		if let Some(signal) = &self.shared.signal {
			signal.notify();
		}
	}
}

impl<T> Clone for Reactive<T> {
	fn clone(&self) -> Self {
		Self {
			shared: Rc::clone(&self.shared),
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for Reactive<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Reactive")
			.field(&*self.shared.value.borrow())
			.finish()
	}
}

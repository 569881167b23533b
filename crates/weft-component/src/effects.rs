//! Change-triggered callbacks.
//!
//! An effect pairs a dependency function with a callback. After every render
//! cycle [`Effects::check`] recomputes each dependency in registration order
//! and calls the callback with `(new, old)` when the value changed.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use weft_component::{Effects, Reactive};
//!
//! let count = Reactive::detached(1);
//! let seen = Rc::new(Cell::new(0));
//!
//! let mut effects = Effects::new();
//! let source = count.clone();
//! let sink = Rc::clone(&seen);
//! effects.watch(move || source.get(), move |new: &i32, _old: &i32| sink.set(*new));
//!
//! count.set(5);
//! effects.check().unwrap();
//! assert_eq!(seen.get(), 5);
//! ```

use std::fmt;
use std::rc::Rc;

use crate::error::{BoxError, EffectError};

/// Values an effect callback may return.
///
/// Callbacks return either `()` or `Result<(), E>`; an error stops the
/// current [`Effects::check`] pass.
pub trait EffectOutcome {
	/// Converts the callback's return value.
	fn into_result(self) -> Result<(), BoxError>;
}

impl EffectOutcome for () {
	fn into_result(self) -> Result<(), BoxError> {
		Ok(())
	}
}

impl<E> EffectOutcome for Result<(), E>
where
	E: Into<BoxError>,
{
	fn into_result(self) -> Result<(), BoxError> {
		self.map_err(Into::into)
	}
}

struct Record {
	id: usize,
	check: Box<dyn FnMut() -> Result<(), BoxError>>,
}

/// An ordered set of effects, keyed by dependency function identity.
#[derive(Default)]
pub struct Effects {
	records: Vec<Record>,
}

impl Effects {
	/// Creates an empty tracker.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers an effect.
	///
	/// The dependency function is evaluated once immediately to seed the last
	/// value. Registering the same function again replaces its callback and
	/// last value but keeps its original position.
	pub fn add<T, F, C, R>(&mut self, dependency: Rc<F>, mut callback: C)
	where
		T: PartialEq + 'static,
		F: Fn() -> T + 'static,
		C: FnMut(&T, &T) -> R + 'static,
		R: EffectOutcome,
	{
		let id = Rc::as_ptr(&dependency) as usize;
		let mut last = dependency();
		let check: Box<dyn FnMut() -> Result<(), BoxError>> = Box::new(move || -> Result<(), BoxError> {
			let next = dependency();
			if next != last {
				callback(&next, &last).into_result()?;
				last = next;
			}
			Ok(())
		});

		match self.records.iter_mut().find(|r| r.id == id) {
			Some(record) => record.check = check,
			None => self.records.push(Record { id, check }),
		}
	}

	/// Registers an effect for a plain closure and returns the shared handle
	/// that identifies it.
	pub fn watch<T, F, C, R>(&mut self, dependency: F, callback: C) -> Rc<F>
	where
		T: PartialEq + 'static,
		F: Fn() -> T + 'static,
		C: FnMut(&T, &T) -> R + 'static,
		R: EffectOutcome,
	{
		let dependency = Rc::new(dependency);
		self.add(Rc::clone(&dependency), callback);
		dependency
	}

	/// Recomputes every dependency in registration order.
	///
	/// The first callback error aborts the pass; the failing effect keeps its
	/// previous value and later effects are not checked.
	pub fn check(&mut self) -> Result<(), EffectError> {
		for (index, record) in self.records.iter_mut().enumerate() {
			(record.check)().map_err(|source| EffectError::Callback { index, source })?;
		}
		Ok(())
	}

	/// Returns the number of registered effects.
	pub fn len(&self) -> usize {
		self.records.len()
	}

	/// Returns true if no effect is registered.
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Drops every effect.
	pub fn clear(&mut self) {
		self.records.clear();
	}
}

impl fmt::Debug for Effects {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Effects")
			.field("len", &self.records.len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::cell::{Cell, RefCell};

	#[rstest]
	fn test_callback_runs_only_on_change() {
		let source = Rc::new(Cell::new(1));
		let calls = Rc::new(RefCell::new(Vec::new()));
		let mut effects = Effects::new();
		let value = Rc::clone(&source);
		let log = Rc::clone(&calls);
		effects.watch(move || value.get(), move |new: &i32, old: &i32| {
			log.borrow_mut().push((*new, *old));
		});

		effects.check().unwrap();
		source.set(2);
		effects.check().unwrap();
		effects.check().unwrap();

		assert_eq!(*calls.borrow(), [(2, 1)]);
	}

	#[rstest]
	fn test_effects_run_in_registration_order() {
		let source = Rc::new(Cell::new(0));
		let order = Rc::new(RefCell::new(Vec::new()));
		let mut effects = Effects::new();
		for label in ["a", "b", "c"] {
			let value = Rc::clone(&source);
			let log = Rc::clone(&order);
			effects.watch(move || value.get(), move |_: &i32, _: &i32| log.borrow_mut().push(label));
		}

		source.set(1);
		effects.check().unwrap();

		assert_eq!(*order.borrow(), ["a", "b", "c"]);
	}

	#[rstest]
	fn test_re_adding_keeps_position_and_replaces_callback() {
		let source = Rc::new(Cell::new(0));
		let order = Rc::new(RefCell::new(Vec::new()));
		let mut effects = Effects::new();

		let value = Rc::clone(&source);
		let first = Rc::new(move || value.get());
		let log = Rc::clone(&order);
		effects.add(Rc::clone(&first), move |_: &i32, _: &i32| log.borrow_mut().push("old"));
		let value = Rc::clone(&source);
		let log = Rc::clone(&order);
		effects.watch(move || value.get(), move |_: &i32, _: &i32| log.borrow_mut().push("second"));
		let log = Rc::clone(&order);
		effects.add(first, move |_: &i32, _: &i32| log.borrow_mut().push("new"));

		source.set(1);
		effects.check().unwrap();

		assert_eq!(effects.len(), 2);
		assert_eq!(*order.borrow(), ["new", "second"]);
	}

	#[rstest]
	fn test_error_aborts_remaining_checks() {
		let source = Rc::new(Cell::new(0));
		let reached = Rc::new(Cell::new(false));
		let mut effects = Effects::new();
		let value = Rc::clone(&source);
		effects.watch(move || value.get(), |_: &i32, _: &i32| -> Result<(), &'static str> {
			Err("boom")
		});
		let value = Rc::clone(&source);
		let flag = Rc::clone(&reached);
		effects.watch(move || value.get(), move |_: &i32, _: &i32| flag.set(true));

		source.set(1);
		let err = effects.check().unwrap_err();

		assert!(matches!(err, EffectError::Callback { index: 0, .. }));
		assert_eq!(err.to_string(), "effect 0 failed: boom");
		assert!(!reached.get());
	}

	#[rstest]
	fn test_failing_effect_keeps_previous_value() {
		let source = Rc::new(Cell::new(0));
		let attempts = Rc::new(Cell::new(0));
		let mut effects = Effects::new();
		let value = Rc::clone(&source);
		let counter = Rc::clone(&attempts);
		effects.watch(move || value.get(), move |_: &i32, _: &i32| -> Result<(), String> {
			counter.set(counter.get() + 1);
			Err("again".to_string())
		});

		source.set(1);
		assert!(effects.check().is_err());
		assert!(effects.check().is_err());

		assert_eq!(attempts.get(), 2);
	}

	#[rstest]
	fn test_clear_disposes_everything() {
		let mut effects = Effects::new();
		effects.watch(|| 1, |_: &i32, _: &i32| {});
		assert!(!effects.is_empty());

		effects.clear();

		assert!(effects.is_empty());
		assert!(effects.check().is_ok());
	}
}

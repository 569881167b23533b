//! Frame scheduling and update debouncing.
//!
//! Hosts never re-render synchronously on a state change. A changing write
//! raises the host's [`UpdateSignal`], which asks the [`FrameScheduler`] for
//! one frame callback and ignores further writes until that callback runs.
//!
//! [`FrameQueue`] is the in-process scheduler: frames run when the embedder
//! calls [`FrameQueue::run_frame`], which makes update timing fully
//! deterministic in tests and headless hosts.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::UpdateError;

/// A callback to run on the next frame.
pub type FrameCallback = Box<dyn FnOnce() -> Result<(), UpdateError>>;

/// A source of frames, such as a display's refresh callback.
pub trait FrameScheduler {
	/// Schedules `callback` to run once on the next frame.
	fn request_frame(&self, callback: FrameCallback);
}

/// Outcome of running one or more frames.
#[derive(Debug, Default)]
pub struct FrameReport {
	/// Number of callbacks executed.
	pub executed: usize,
	/// Errors returned by callbacks, in execution order.
	pub errors: Vec<UpdateError>,
}

impl FrameReport {
	/// Returns true if every callback succeeded.
	pub fn is_ok(&self) -> bool {
		self.errors.is_empty()
	}
}

/// A manually driven frame queue.
///
/// Clones share the same queue.
#[derive(Clone, Default)]
pub struct FrameQueue {
	callbacks: Rc<RefCell<VecDeque<FrameCallback>>>,
}

impl FrameQueue {
	/// Creates an empty queue.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the number of callbacks waiting for the next frame.
	pub fn pending(&self) -> usize {
		self.callbacks.borrow().len()
	}

	/// Runs one frame.
	///
	/// Only callbacks queued before the frame started are executed; anything
	/// they schedule waits for the next frame. A failing callback does not
	/// prevent the others from running.
	pub fn run_frame(&self) -> FrameReport {
		let batch: Vec<FrameCallback> = self.callbacks.borrow_mut().drain(..).collect();
		let mut report = FrameReport::default();

		for callback in batch {
			report.executed += 1;
			if let Err(error) = callback() {
				tracing::error!(%error, "frame callback failed");
				report.errors.push(error);
			}
		}

		tracing::trace!(executed = report.executed, "frame finished");
		report
	}

	/// Runs frames until the queue is empty or `max_frames` frames have run.
	pub fn run_until_idle(&self, max_frames: usize) -> FrameReport {
		let mut total = FrameReport::default();
		for _ in 0..max_frames {
			if self.pending() == 0 {
				break;
			}
			let report = self.run_frame();
			total.executed += report.executed;
			total.errors.extend(report.errors);
		}
		total
	}
}

impl FrameScheduler for FrameQueue {
	fn request_frame(&self, callback: FrameCallback) {
		self.callbacks.borrow_mut().push_back(callback);
	}
}

impl fmt::Debug for FrameQueue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FrameQueue")
			.field("pending", &self.pending())
			.finish()
	}
}

/// Something that re-renders when its scheduled frame arrives.
pub trait UpdateTarget {
	/// Runs a scheduled update. Implementations must call
	/// [`UpdateSignal::clear`] before rendering.
	fn run_scheduled_update(&self) -> Result<(), UpdateError>;
}

/// The single-slot update debounce shared by a host and its reactive state.
pub struct UpdateSignal {
	pending: Cell<bool>,
	scheduler: Rc<dyn FrameScheduler>,
	target: Weak<dyn UpdateTarget>,
}

impl UpdateSignal {
	/// Creates a signal that schedules frames for `target`.
	pub fn new(scheduler: Rc<dyn FrameScheduler>, target: Weak<dyn UpdateTarget>) -> Self {
		Self {
			pending: Cell::new(false),
			scheduler,
			target,
		}
	}

	/// Requests an update.
	///
	/// Schedules a frame unless one is already pending. Returns true if a frame
	/// was scheduled.
	pub fn notify(&self) -> bool {
		if self.pending.replace(true) {
			tracing::trace!("update already pending");
			return false;
		}

		let target = self.target.clone();
		self.scheduler.request_frame(Box::new(move || match target.upgrade() {
			Some(target) => target.run_scheduled_update(),
			None => Ok(()),
		}));
		true
	}

	/// Returns true while a scheduled frame has not run yet.
	pub fn is_pending(&self) -> bool {
		self.pending.get()
	}

	/// Clears the pending flag.
	pub fn clear(&self) {
		self.pending.set(false);
	}
}

impl fmt::Debug for UpdateSignal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("UpdateSignal")
			.field("pending", &self.pending.get())
			.finish()
	}
}

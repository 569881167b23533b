//! Weft Component - hosts, reactive state and effects
//!
//! The runtime half of Weft. A [`Host`] owns one [`Component`] instance and
//! renders it into an element (or the element's shadow root) through
//! [`weft_core::reconcile`]. State wrapped by [`Context::reactive`] schedules
//! re-renders through a [`FrameScheduler`]; a burst of writes inside one frame
//! produces a single render. After each render the host checks its
//! [`Effects`] and calls the component's `on_update` hook.
//!
//! ## Modules
//!
//! - [`component`]: the [`Component`] trait, [`Host`], [`Context`] and [`Emitter`]
//! - [`reactive`]: mutation-tracked state
//! - [`effects`]: change-triggered callbacks
//! - [`scheduler`]: frame scheduling and the update debounce
//! - [`options`]: host configuration
//! - [`error`]: error types

#![warn(missing_docs)]

pub mod component;
pub mod effects;
pub mod error;
pub mod options;
pub mod reactive;
pub mod scheduler;

pub use component::{Component, Context, Emitter, Host, Lifecycle};
pub use effects::{EffectOutcome, Effects};
pub use error::{BoxError, EffectError, UpdateError};
pub use options::HostOptions;
pub use reactive::Reactive;
pub use scheduler::{
	FrameCallback, FrameQueue, FrameReport, FrameScheduler, UpdateSignal, UpdateTarget,
};

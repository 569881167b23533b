//! Error types.

use thiserror::Error;
use weft_core::MarkupError;

/// A boxed error returned by an effect callback.
pub type BoxError = Box<dyn std::error::Error>;

/// Errors raised while checking effects.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EffectError {
	/// An effect callback returned an error. Effects after it were not checked.
	#[error("effect {index} failed: {source}")]
	Callback {
		/// Registration position of the failing effect.
		index: usize,
		/// The callback's error.
		source: BoxError,
	},
}

/// Errors raised by an update cycle.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum UpdateError {
	/// The rendered markup could not be parsed.
	#[error(transparent)]
	Markup(#[from] MarkupError),

	/// An effect callback failed after reconciliation.
	#[error(transparent)]
	Effect(#[from] EffectError),

	/// The component was already borrowed, typically because an update was
	/// requested synchronously from inside a hook or render.
	#[error("component is busy with another update or hook")]
	Busy,
}

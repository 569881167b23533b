//! Error types.

use thiserror::Error;

/// Errors raised while turning markup into nodes.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
	/// The parser reported errors and strict parsing was requested.
	#[error("malformed markup: {}", errors.join("; "))]
	Malformed {
		/// Parser messages in the order they were reported.
		errors: Vec<String>,
	},
}

/// Result alias for markup operations.
pub type Result<T> = std::result::Result<T, MarkupError>;

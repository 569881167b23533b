//! Host configuration.

use serde::{Deserialize, Serialize};
use weft_core::ParseOptions;

/// Options for a component [`Host`](crate::Host).
///
/// ```
/// use weft_component::HostOptions;
///
/// let options = HostOptions::new().shadow_root().strict_markup();
/// assert!(options.shadow_root);
/// assert!(options.parse.strict);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostOptions {
	/// Render into an open shadow root instead of the host element itself.
	/// Events emitted by such hosts are composed by default.
	pub shadow_root: bool,
	/// How rendered markup is parsed.
	pub parse: ParseOptions,
}

impl HostOptions {
	/// Creates default options: light-tree rendering, lenient parsing.
	pub fn new() -> Self {
		Self::default()
	}

	/// Renders into a shadow root.
	pub fn shadow_root(mut self) -> Self {
		self.shadow_root = true;
		self
	}

	/// Rejects markup the parser had to recover from.
	pub fn strict_markup(mut self) -> Self {
		self.parse = self.parse.strict();
		self
	}
}

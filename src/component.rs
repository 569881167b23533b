//! Components, reactive state and scheduling
//!
//! This module re-exports `weft-component`.

pub use weft_component::*;

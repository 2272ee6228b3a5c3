//! # Clip Module
//!
//! Turns the user's loosely written `start`/`end` values into exact offsets
//! and derives what the extractor needs for each clip.

pub mod bounds;
pub mod timestamp;
pub mod types;

pub use bounds::resolve;
pub use timestamp::{RawTimestamp, TimeOffset};
pub use types::{index_sections, ClipBounds, ClipSpec, Section};

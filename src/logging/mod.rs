//! # Logging Module
//!
//! Named log channels with independent verbosity, emitted through `tracing`.
//!
//! Each channel (`clipper`, `ffmpeg`, `ffprobe`) filters by its own level and
//! tags every event with a `channel` field. The [`ChannelRegistry`] is built
//! once at startup and handed down, never stored globally.
//!
//! ```rust
//! use videoclipper::logging::{Channel, ChannelRegistry, Verbosity};
//!
//! let mut registry = ChannelRegistry::new();
//! let log = registry.channel(Channel::Clipper);
//! registry.broadcast(Verbosity::Debug);
//! assert_eq!(log.level(), Verbosity::Debug);
//! ```

pub mod channel;
pub mod registry;

pub use channel::{Channel, LogChannel, Verbosity};
pub use registry::ChannelRegistry;

use tracing::Level;

/// Install the process-wide `tracing` subscriber
///
/// Everything down to `DEBUG` is let through; the channels do their own
/// filtering. All events share one target, so it is hidden; the `channel`
/// field tells them apart.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .without_time()
        .init();
}

use std::collections::BTreeMap;

use crate::config::DebugConfig;
use crate::error::ConfigError;
use crate::logging::channel::{Channel, LogChannel, Verbosity};

/// Owner of every log channel handed out during a run
///
/// Channels are created on first request. Because the registry remembers
/// them, a level change can be pushed to all channels created so far, and
/// the same level becomes the starting point for channels created later.
#[derive(Debug)]
pub struct ChannelRegistry {
    channels: BTreeMap<Channel, LogChannel>,
    default_level: Verbosity,
}

impl ChannelRegistry {
    /// Create an empty registry whose channels start at `INFO`
    pub fn new() -> Self {
        Self::with_default_level(Verbosity::Info)
    }

    pub fn with_default_level(default_level: Verbosity) -> Self {
        Self {
            channels: BTreeMap::new(),
            default_level,
        }
    }

    /// Get a channel, creating it at the default level if needed
    pub fn channel(&mut self, channel: Channel) -> LogChannel {
        let default_level = self.default_level;
        self.channels
            .entry(channel)
            .or_insert_with(|| LogChannel::new(channel, default_level))
            .clone()
    }

    /// Set the level of a single channel
    pub fn set_level(&mut self, channel: Channel, level: Verbosity) {
        self.channel(channel).set_level(level);
    }

    /// Set the level of every known channel, and of channels created later
    pub fn broadcast(&mut self, level: Verbosity) {
        self.default_level = level;
        for channel in self.channels.values() {
            channel.set_level(level);
        }
    }

    /// Assign the levels named in the `[debug]` section
    ///
    /// All names are checked before any channel is touched, so a bad name
    /// leaves the registry as it was.
    pub fn apply(&mut self, debug: &DebugConfig) -> Result<(), ConfigError> {
        let mut levels = Vec::with_capacity(Channel::ALL.len());
        for (channel, name) in debug.entries() {
            let level = name
                .parse::<Verbosity>()
                .map_err(|_| ConfigError::InvalidVerbosityName {
                    channel: channel.name().to_string(),
                    name: name.to_string(),
                })?;
            levels.push((channel, level));
        }

        for (channel, level) in levels {
            self.set_level(channel, level);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

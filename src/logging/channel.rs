use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Severity levels understood by the `[debug]` configuration section
///
/// Ordered from most to least severe; a channel set to `Info` shows
/// `Critical`, `Error`, `Warning` and `Info` messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verbosity {
    Critical = 0,
    Error = 1,
    Warning = 2,
    Info = 3,
    Debug = 4,
}

impl Verbosity {
    pub const ALL: [Verbosity; 5] = [
        Verbosity::Critical,
        Verbosity::Error,
        Verbosity::Warning,
        Verbosity::Info,
        Verbosity::Debug,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Critical,
            1 => Self::Error,
            2 => Self::Warning,
            3 => Self::Info,
            _ => Self::Debug,
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a level name is not one of the five known names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVerbosity(pub String);

impl FromStr for Verbosity {
    type Err = UnknownVerbosity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|level| level.name() == upper)
            .ok_or_else(|| UnknownVerbosity(s.to_string()))
    }
}

/// The well-known log channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    /// Messages from the clipper itself
    Clipper,
    /// Raw output of the extraction tool
    Ffmpeg,
    /// Raw output of the probe tool
    Ffprobe,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Clipper, Channel::Ffmpeg, Channel::Ffprobe];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Clipper => "clipper",
            Self::Ffmpeg => "ffmpeg",
            Self::Ffprobe => "ffprobe",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named log destination with its own level
///
/// Clones share the level, so a change made through the registry is seen by
/// every handle already given out.
#[derive(Debug, Clone)]
pub struct LogChannel {
    channel: Channel,
    level: Arc<AtomicU8>,
}

impl LogChannel {
    pub(crate) fn new(channel: Channel, level: Verbosity) -> Self {
        Self {
            channel,
            level: Arc::new(AtomicU8::new(level as u8)),
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn level(&self) -> Verbosity {
        Verbosity::from_u8(self.level.load(Ordering::Relaxed))
    }

    pub(crate) fn set_level(&self, level: Verbosity) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    pub fn enabled(&self, level: Verbosity) -> bool {
        level <= self.level()
    }

    pub fn log(&self, level: Verbosity, message: impl fmt::Display) {
        if !self.enabled(level) {
            return;
        }
        let channel = self.channel.name();
        match level {
            Verbosity::Critical => {
                tracing::error!(channel = channel, critical = true, "{}", message)
            }
            Verbosity::Error => tracing::error!(channel = channel, "{}", message),
            Verbosity::Warning => tracing::warn!(channel = channel, "{}", message),
            Verbosity::Info => tracing::info!(channel = channel, "{}", message),
            Verbosity::Debug => tracing::debug!(channel = channel, "{}", message),
        }
    }

    pub fn critical(&self, message: impl fmt::Display) {
        self.log(Verbosity::Critical, message);
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.log(Verbosity::Error, message);
    }

    pub fn warning(&self, message: impl fmt::Display) {
        self.log(Verbosity::Warning, message);
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.log(Verbosity::Info, message);
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Verbosity::Debug, message);
    }
}

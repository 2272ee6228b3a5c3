use thiserror::Error;

/// Main error type for the videoclipper library
#[derive(Error, Debug)]
pub enum ClipperError {
    #[error("Timestamp error: {0}")]
    Timestamp(#[from] TimestampError),

    #[error("Clip error: {0}")]
    Clip(#[from] ClipError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("External tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Project error: {0}")]
    Project(#[from] ProjectError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Timestamp parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("\"{input}\" is not a valid time string")]
    Invalid { input: String },

    #[error("missing time string")]
    Missing,
}

/// Per-clip errors
#[derive(Error, Debug)]
pub enum ClipError {
    #[error("clip {title}: start time {start} should be earlier than end time {end}")]
    InvalidRange {
        title: String,
        start: String,
        end: String,
    },

    #[error("clip {title}: {source}")]
    BadTimestamp {
        title: String,
        #[source]
        source: TimestampError,
    },
}

/// Orchestration errors
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("output directory {path} is unusable: {reason}")]
    OutputDirUnusable { path: String, reason: String },

    #[error("cannot open video file {path}: {message} (code {code})")]
    SourceVideoInvalid {
        path: String,
        code: i64,
        message: String,
    },
}

/// External process errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("failed to launch {tool}: {source}")]
    SpawnFailed {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read output of {tool}: {source}")]
    ReadFailed {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}")]
    Exited { tool: String, status: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("{name} is not a valid level name (debug.{channel})")]
    InvalidVerbosityName { channel: String, name: String },

    #[error("Failed to write configuration template {path}: {reason}")]
    TemplateWrite { path: String, reason: String },
}

/// Project file errors
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("Failed to read project file {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse project file {path}: {reason}")]
    Malformed { path: String, reason: String },
}

/// Coarse classification of every failure the pipeline can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidTimestamp,
    InvalidClipRange,
    OutputDirUnusable,
    SourceVideoInvalid,
    ExternalToolFailure,
    ConfigMalformed,
    InvalidVerbosityName,
    ProjectInvalid,
    Io,
}

/// Convenience type alias for Results using ClipperError
pub type Result<T> = std::result::Result<T, ClipperError>;

impl ClipperError {
    /// Classify the error into the pipeline's taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timestamp(_) => ErrorKind::InvalidTimestamp,
            Self::Clip(ClipError::BadTimestamp { .. }) => ErrorKind::InvalidTimestamp,
            Self::Clip(ClipError::InvalidRange { .. }) => ErrorKind::InvalidClipRange,
            Self::Pipeline(PipelineError::OutputDirUnusable { .. }) => ErrorKind::OutputDirUnusable,
            Self::Pipeline(PipelineError::SourceVideoInvalid { .. }) => {
                ErrorKind::SourceVideoInvalid
            }
            Self::Tool(_) => ErrorKind::ExternalToolFailure,
            Self::Config(ConfigError::InvalidVerbosityName { .. }) => {
                ErrorKind::InvalidVerbosityName
            }
            Self::Config(_) => ErrorKind::ConfigMalformed,
            Self::Project(_) => ErrorKind::ProjectInvalid,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Tool(ToolError::SpawnFailed { tool, .. }) => {
                format!("Could not run '{}'. Check the [tools] section of the configuration file.", tool)
            }
            Self::Pipeline(PipelineError::SourceVideoInvalid { path, message, .. }) => {
                format!("Cannot open video file '{}': {}", path, message)
            }
            Self::Config(ConfigError::InvalidVerbosityName { channel, name }) => {
                format!(
                    "'{}' is not a valid level for debug.{}. Use one of CRITICAL, ERROR, WARNING, INFO, DEBUG.",
                    name, channel
                )
            }
            _ => self.to_string(),
        }
    }
}

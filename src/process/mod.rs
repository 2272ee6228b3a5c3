//! # Process Module
//!
//! Launches the external tools and turns their output into log lines.
//!
//! - [`classifier`] - byte stream to line splitting, tagged by pipe
//! - [`runner`] - spawning a tool and draining both pipes through the classifier
//! - [`commands`] - probe/export command lines and the probe's JSON verdict

pub mod classifier;
pub mod commands;
pub mod runner;

pub use classifier::{LineBuffer, LineReader, OutputLine, StreamKind, TextEncoding};
pub use commands::{export_command, parse_probe_response, probe_command, ProbeVerdict, ToolInvocation};
pub use runner::{run_tool, ToolOutput};

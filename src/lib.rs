//! # videoclipper
//!
//! Cut named sub-clips out of a single source video with `ffmpeg`.
//!
//! A YAML project file lists the sections to extract; a TOML tool
//! configuration says where `ffmpeg`/`ffprobe` live and how chatty each log
//! channel should be. Every section becomes one stream-copied output file
//! named `<NN>-<title>-<speaker>.<format>`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use videoclipper::{
//!     config::Config,
//!     logging::{Channel, ChannelRegistry},
//!     pipeline::ClipPipeline,
//!     project::ProjectDescriptor,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let mut registry = ChannelRegistry::new();
//! let log = registry.channel(Channel::Clipper);
//!
//! let config = Config::resolve("videoclipper.toml", &log)?;
//! registry.apply(&config.debug)?;
//!
//! let project = ProjectDescriptor::load("talks/project.yaml")?;
//! let report = ClipPipeline::new(config, project, &mut registry)?.run().await?;
//! println!("{} clips in {}", report.clips.len(), report.outdir.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`clip`] - timestamp parsing and per-clip start/duration
//! - [`process`] - running external tools and splitting their output into lines
//! - [`config`] - defaults merged with the user's override file
//! - [`logging`] - named channels with their own verbosity
//! - [`project`] - the YAML project file
//! - [`pipeline`] - the run itself

pub mod clip;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod process;
pub mod project;

// Re-export commonly used types for convenience
pub use crate::{
    clip::{ClipSpec, RawTimestamp, Section, TimeOffset},
    config::Config,
    error::{ClipperError, ErrorKind, Result},
    logging::{Channel, ChannelRegistry, LogChannel, Verbosity},
    pipeline::{ClipPipeline, PipelineReport, PipelineState},
    project::ProjectDescriptor,
};

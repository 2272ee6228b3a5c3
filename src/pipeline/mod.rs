//! Pipeline orchestration: output directory, source probe, clip export

pub mod engine;

pub use engine::{ClipPipeline, PipelineReport, PipelineState};

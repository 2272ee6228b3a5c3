use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::{
    clip::{bounds, index_sections, ClipSpec},
    config::Config,
    error::{PipelineError, Result},
    logging::{Channel, ChannelRegistry, LogChannel},
    process::{
        export_command, parse_probe_response, probe_command, run_tool, ProbeVerdict,
        TextEncoding,
    },
    project::ProjectDescriptor,
};

/// Where a clipping run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Init,
    PreparingOutputDir,
    ValidatingSource,
    /// Exporting the clip with this 1-based index
    ExportingClips { index: usize },
    Done,
    Aborted,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => f.write_str("init"),
            Self::PreparingOutputDir => f.write_str("preparing output directory"),
            Self::ValidatingSource => f.write_str("validating source video"),
            Self::ExportingClips { index } => write!(f, "exporting clip {}", index),
            Self::Done => f.write_str("done"),
            Self::Aborted => f.write_str("aborted"),
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub outdir: PathBuf,
    /// Exported files in section order
    pub clips: Vec<PathBuf>,
}

/// Runs one project from start to finish
///
/// The pipeline is strictly sequential:
/// 1. Output directory - create `<project dir>/<output.dir>/<title>`
/// 2. Source validation - probe the video and stop if the prober objects
/// 3. Clip export - one extractor run per section, in declaration order
///
/// The first failure aborts the run. Clips exported before it stay on disk.
pub struct ClipPipeline {
    config: Config,
    project: ProjectDescriptor,
    encoding: TextEncoding,
    log: LogChannel,
    ffmpeg_log: LogChannel,
    ffprobe_log: LogChannel,
    state: PipelineState,
    produced: Vec<PathBuf>,
}

impl ClipPipeline {
    /// Create a pipeline, taking its log channels from `registry`
    pub fn new(
        config: Config,
        project: ProjectDescriptor,
        registry: &mut ChannelRegistry,
    ) -> Result<Self> {
        let encoding = config.clip.text_encoding()?;
        Ok(Self {
            config,
            project,
            encoding,
            log: registry.channel(Channel::Clipper),
            ffmpeg_log: registry.channel(Channel::Ffmpeg),
            ffprobe_log: registry.channel(Channel::Ffprobe),
            state: PipelineState::Init,
            produced: Vec::new(),
        })
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn project(&self) -> &ProjectDescriptor {
        &self.project
    }

    /// Files exported so far, including those of an aborted run
    pub fn produced(&self) -> &[PathBuf] {
        &self.produced
    }

    /// Run every step; on error the pipeline ends in [`PipelineState::Aborted`]
    pub async fn run(&mut self) -> Result<PipelineReport> {
        self.log.info(format!("🎬 Clipping project '{}'", self.project.title));
        self.log.info(format!("   Video: {}", self.project.video.display()));
        self.log.info(format!("   Sections: {}", self.project.sections.len()));

        match self.run_steps().await {
            Ok(report) => {
                self.transition(PipelineState::Done);
                self.log.info(format!(
                    "✅ Exported {} clip(s) to {}",
                    report.clips.len(),
                    report.outdir.display()
                ));
                Ok(report)
            }
            Err(e) => {
                self.log.debug(format!("Run stopped while {}", self.state));
                self.transition(PipelineState::Aborted);
                Err(e)
            }
        }
    }

    async fn run_steps(&mut self) -> Result<PipelineReport> {
        self.transition(PipelineState::PreparingOutputDir);
        let outdir = self.prepare_output_dir()?;

        self.transition(PipelineState::ValidatingSource);
        self.validate_source().await?;

        let clips = index_sections(&self.project.sections);
        for clip in &clips {
            self.transition(PipelineState::ExportingClips { index: clip.index });
            let output = self.export_clip(clip, &outdir, clips.len()).await?;
            self.produced.push(output);
        }

        Ok(PipelineReport {
            outdir,
            clips: self.produced.clone(),
        })
    }

    fn transition(&mut self, next: PipelineState) {
        self.log.debug(format!("State: {} -> {}", self.state, next));
        self.state = next;
    }

    // ==========================================
    // STEP 1: OUTPUT DIRECTORY
    // ==========================================

    /// Create the output directory and make sure it can be used
    fn prepare_output_dir(&mut self) -> Result<PathBuf> {
        let outdir = self.project.output_dir();
        let unusable = |reason: String| PipelineError::OutputDirUnusable {
            path: outdir.display().to_string(),
            reason,
        };

        match std::fs::create_dir_all(&outdir) {
            Ok(()) => self.log.debug(format!("Output directory: {}", outdir.display())),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                self.log.debug(format!("{} already exists", outdir.display()))
            }
            Err(e) => return Err(unusable(e.to_string()).into()),
        }

        let metadata = std::fs::metadata(&outdir).map_err(|e| unusable(e.to_string()))?;
        if !metadata.is_dir() {
            return Err(unusable("not a directory".to_string()).into());
        }
        // Mode bits alone ignore ownership; ask the filesystem directly.
        tempfile::tempfile_in(&outdir)
            .map_err(|e| unusable(format!("directory is not writable: {}", e)))?;
        std::fs::read_dir(&outdir).map_err(|e| unusable(format!("directory is not readable: {}", e)))?;

        self.project.outdir = Some(outdir.clone());
        Ok(outdir)
    }

    // ==========================================
    // STEP 2: SOURCE VALIDATION
    // ==========================================

    async fn validate_source(&self) -> Result<()> {
        let ffprobe = &self.config.tools.ffprobe;
        let video = &self.project.video;
        self.log.info(format!("🔍 Probing {}", video.display()));

        let command = probe_command(ffprobe, video);
        let output = run_tool(&command, &self.ffprobe_log, self.encoding, true).await?;

        match parse_probe_response(&output.captured.join("\n")) {
            ProbeVerdict::Valid => {}
            ProbeVerdict::Invalid { code, message } => {
                return Err(PipelineError::SourceVideoInvalid {
                    path: video.display().to_string(),
                    code,
                    message,
                }
                .into());
            }
            ProbeVerdict::Unreadable(reason) => {
                self.log.warning(format!("Could not read {} response: {}", ffprobe, reason));
            }
        }

        output.check(ffprobe)?;
        Ok(())
    }

    // ==========================================
    // STEP 3: CLIP EXPORT
    // ==========================================

    async fn export_clip(&self, clip: &ClipSpec, outdir: &Path, total: usize) -> Result<PathBuf> {
        let bounds = bounds::resolve(clip)?;
        let output = outdir.join(clip.file_name(&self.project.output.format));

        self.log.info(format!(
            "✂️  [{}/{}] {} (start {}, {}s) -> {}",
            clip.index,
            total,
            clip.title(),
            bounds.start,
            bounds.duration_secs,
            output.display()
        ));

        let ffmpeg = &self.config.tools.ffmpeg;
        let command = export_command(
            ffmpeg,
            &self.project.video,
            &bounds,
            self.config.clip.overwrite,
            &output,
        );
        run_tool(&command, &self.ffmpeg_log, self.encoding, false)
            .await?
            .check(ffmpeg)?;

        Ok(output)
    }
}

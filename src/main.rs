use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use videoclipper::{
    logging::{self, Channel, ChannelRegistry, Verbosity},
    ClipPipeline, ClipperError, Config, PipelineReport, ProjectDescriptor,
};

#[derive(Parser)]
#[command(
    name = "videoclipper",
    version,
    about = "Cut named sub-clips out of a video with ffmpeg",
    long_about = "videoclipper reads a YAML project file listing sections of a source video and exports each one as a separate stream-copied file."
)]
struct Cli {
    /// Project file (YAML)
    project: PathBuf,

    /// Tool configuration file; a template is written here if it is missing
    #[arg(short, long, default_value = "videoclipper.toml")]
    config: PathBuf,

    /// Show debug output on every channel
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing();

    let mut registry = ChannelRegistry::new();
    let log = registry.channel(Channel::Clipper);

    match run(cli, &mut registry).await {
        Ok(report) => {
            for clip in &report.clips {
                log.debug(format!("   {}", clip.display()));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log.critical(failure_message(&e));
            ExitCode::FAILURE
        }
    }
}

/// The outermost context followed by the library's own explanation
///
/// Library errors already spell out their causes, so the anyhow chain is not
/// printed on top of them.
fn failure_message(e: &anyhow::Error) -> String {
    match e.downcast_ref::<ClipperError>() {
        Some(cause) => format!("{}: {}", e, cause.user_message()),
        None => format!("{:#}", e),
    }
}

async fn run(cli: Cli, registry: &mut ChannelRegistry) -> Result<PipelineReport> {
    let log = registry.channel(Channel::Clipper);
    log.info(format!("Starting videoclipper v{}", env!("CARGO_PKG_VERSION")));

    let config = Config::resolve(&cli.config, &log)
        .map_err(ClipperError::from)
        .with_context(|| format!("Cannot load tool configuration {}", cli.config.display()))?;
    registry
        .apply(&config.debug)
        .map_err(ClipperError::from)
        .with_context(|| format!("Bad [debug] section in {}", cli.config.display()))?;
    if cli.verbose {
        registry.broadcast(Verbosity::Debug);
    }

    let project = ProjectDescriptor::load(&cli.project)
        .map_err(ClipperError::from)
        .with_context(|| format!("Cannot load project {}", cli.project.display()))?;
    let title = project.title.clone();
    let mut pipeline = ClipPipeline::new(config, project, registry)
        .with_context(|| format!("Cannot set up clipping of '{}'", title))?;
    let report = pipeline
        .run()
        .await
        .with_context(|| format!("Clipping '{}' aborted", title))?;

    Ok(report)
}

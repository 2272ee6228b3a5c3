use std::ffi::OsString;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::clip::ClipBounds;

/// A program and its arguments, ready to spawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    program: String,
    args: Vec<OsString>,
}

impl ToolInvocation {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg<S: Into<OsString>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// `ffprobe -i <video> -show_error -of json`
pub fn probe_command(ffprobe: &str, video: &Path) -> ToolInvocation {
    ToolInvocation::new(ffprobe)
        .arg("-i")
        .arg(video)
        .args(["-show_error", "-of", "json"])
}

/// Stream-copy `duration_secs` seconds starting at the user's start text
pub fn export_command(
    ffmpeg: &str,
    video: &Path,
    bounds: &ClipBounds,
    overwrite: bool,
    output: &Path,
) -> ToolInvocation {
    ToolInvocation::new(ffmpeg)
        .arg("-ss")
        .arg(bounds.start.as_str())
        .arg("-i")
        .arg(video)
        .args(["-c", "copy", "-nostdin"])
        .arg(if overwrite { "-y" } else { "-n" })
        .arg("-t")
        .arg(bounds.duration_secs.to_string())
        .arg(output)
}

#[derive(Debug, Deserialize)]
struct ProbeResponse {
    #[serde(default)]
    error: Option<ProbeErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ProbeErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    string: String,
}

/// What the probe said about the source video
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeVerdict {
    Valid,
    Invalid { code: i64, message: String },
    /// The response was not the expected JSON
    Unreadable(String),
}

pub fn parse_probe_response(json: &str) -> ProbeVerdict {
    match serde_json::from_str::<ProbeResponse>(json) {
        Ok(ProbeResponse { error: None }) => ProbeVerdict::Valid,
        Ok(ProbeResponse { error: Some(error) }) => ProbeVerdict::Invalid {
            code: error.code,
            message: error.string,
        },
        Err(e) => ProbeVerdict::Unreadable(e.to_string()),
    }
}

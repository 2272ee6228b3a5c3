use std::io;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{clip::Section, error::ProjectError};

/// Where and in what container the clips are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    /// Base directory, relative to the project file
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// File extension of every clip, also picks ffmpeg's muxer
    #[serde(default = "default_output_format")]
    pub format: String,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: default_output_format(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_format() -> String {
    "mp4".to_string()
}

#[derive(Debug, Deserialize)]
struct ProjectFile {
    title: String,
    video: PathBuf,
    #[serde(default)]
    output: OutputSpec,
    #[serde(default)]
    sections: Vec<Section>,
}

/// A clipping project as read from the user's YAML file
///
/// Relative paths in the file are taken relative to the file's own
/// directory; `video` is stored already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDescriptor {
    pub title: String,
    pub video: PathBuf,
    pub output: OutputSpec,
    pub sections: Vec<Section>,
    /// Absolute path of the project file
    pub source: PathBuf,
    /// Set once the output directory has been prepared
    pub outdir: Option<PathBuf>,
}

impl ProjectDescriptor {
    /// Load a project from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ProjectError> {
        let path = path.as_ref();
        let unreadable = |source| ProjectError::Unreadable {
            path: path.display().to_string(),
            source,
        };

        let source = absolutize(path).map_err(unreadable)?;
        let content = std::fs::read_to_string(&source).map_err(unreadable)?;
        Self::from_yaml_str(&content, &source)
    }

    /// Parse project YAML as if it had been read from `source`
    pub fn from_yaml_str(content: &str, source: &Path) -> Result<Self, ProjectError> {
        let file: ProjectFile = serde_yaml::from_str(content).map_err(|e| ProjectError::Malformed {
            path: source.display().to_string(),
            reason: e.to_string(),
        })?;

        let base_dir = source.parent().unwrap_or_else(|| Path::new("."));
        Ok(Self {
            title: file.title,
            video: base_dir.join(file.video),
            output: file.output,
            sections: file.sections,
            source: source.to_path_buf(),
            outdir: None,
        })
    }

    /// Directory holding the project file
    pub fn base_dir(&self) -> &Path {
        self.source.parent().unwrap_or_else(|| Path::new("."))
    }

    /// `<project dir>/<output.dir>/<title>`, with `.` and `..` resolved
    pub fn output_dir(&self) -> PathBuf {
        normalize(&self.base_dir().join(&self.output.dir).join(&self.title))
    }
}

/// Lexically drop `.` components and fold `..` into its parent
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}

fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

use serde::{Deserialize, Serialize};

use crate::clip::timestamp::RawTimestamp;

/// One entry of the project's `sections` list, as declared by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Title used in the output file name
    pub title: String,

    /// Speaker used in the output file name
    #[serde(default)]
    pub speaker: String,

    /// Start of the clip, passed to the extractor verbatim
    #[serde(default)]
    pub start: Option<RawTimestamp>,

    /// End of the clip, only used to derive the duration
    #[serde(default)]
    pub end: Option<RawTimestamp>,
}

impl Section {
    pub fn new<S, T>(title: S, speaker: S, start: T, end: T) -> Self
    where
        S: Into<String>,
        T: Into<RawTimestamp>,
    {
        Self {
            title: title.into(),
            speaker: speaker.into(),
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }
}

/// A section with its 1-based position in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSpec {
    pub index: usize,
    pub section: Section,
}

impl ClipSpec {
    pub fn new(index: usize, section: Section) -> Self {
        Self { index, section }
    }

    pub fn title(&self) -> &str {
        &self.section.title
    }

    /// Output file name: `<2-digit index>-<title>-<speaker>.<format>`
    pub fn file_name(&self, format: &str) -> String {
        format!(
            "{:02}-{}-{}.{}",
            self.index, self.section.title, self.section.speaker, format
        )
    }
}

/// Number the sections 1..=N in the order they were declared
pub fn index_sections(sections: &[Section]) -> Vec<ClipSpec> {
    sections
        .iter()
        .enumerate()
        .map(|(i, section)| ClipSpec::new(i + 1, section.clone()))
        .collect()
}

/// Where the extractor should start and how long it should run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipBounds {
    /// The user's start timestamp, untouched
    pub start: String,

    /// Whole seconds, rounded up
    pub duration_secs: u64,
}

use crate::clip::timestamp::RawTimestamp;
use crate::clip::types::{ClipBounds, ClipSpec};
use crate::error::ClipError;

/// Work out the extractor's start and duration for a clip
///
/// The start is handed back exactly as the user wrote it so the extractor
/// can apply its own, possibly finer, parsing. Only the duration comes from
/// our parsed offsets, and it is rounded up so a clip is never shorter than
/// requested. `start` must be strictly earlier than `end`.
pub fn resolve(clip: &ClipSpec) -> Result<ClipBounds, ClipError> {
    let section = &clip.section;
    let bad_timestamp = |source| ClipError::BadTimestamp {
        title: section.title.clone(),
        source,
    };

    let start = RawTimestamp::parse_optional(section.start.as_ref()).map_err(bad_timestamp)?;
    let end = RawTimestamp::parse_optional(section.end.as_ref()).map_err(bad_timestamp)?;

    if start >= end {
        return Err(ClipError::InvalidRange {
            title: section.title.clone(),
            start: display_raw(section.start.as_ref()),
            end: display_raw(section.end.as_ref()),
        });
    }

    let span_millis = end - start;
    Ok(ClipBounds {
        start: display_raw(section.start.as_ref()),
        duration_secs: span_millis.div_ceil(1000),
    })
}

fn display_raw(raw: Option<&RawTimestamp>) -> String {
    raw.map(ToString::to_string).unwrap_or_default()
}

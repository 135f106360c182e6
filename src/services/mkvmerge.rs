//! mkvmerge service for reading track metadata.

use crate::models::media::{FileRecord, TrackKind, TrackRecord};
use crate::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

/// mkvmerge identification output (`mkvmerge -J`).
#[derive(Debug, Deserialize)]
struct MkvmergeOutput {
    tracks: Vec<MkvmergeTrack>,
}

/// mkvmerge track information.
#[derive(Debug, Deserialize)]
struct MkvmergeTrack {
    id: u32,
    #[serde(rename = "type")]
    track_type: String,
    codec: String,
    #[serde(default)]
    properties: MkvmergeProperties,
}

/// mkvmerge track properties. Every property is optional.
#[derive(Debug, Default, Deserialize)]
struct MkvmergeProperties {
    language_ietf: Option<String>,
    language: Option<String>,
    track_name: Option<String>,
    forced_track: Option<bool>,
    default_track: Option<bool>,
    flag_hearing_impaired: Option<bool>,
    flag_commentary: Option<bool>,
}

/// Check if mkvmerge is installed.
pub fn is_installed() -> bool {
    super::tool_runs("mkvmerge")
}

/// Get mkvmerge version.
pub fn get_version() -> Result<String> {
    super::tool_version("mkvmerge")
}

/// Read the tracks of a container file using `mkvmerge -J`.
pub fn probe(path: &Path, codec_aliases: &BTreeMap<String, String>) -> Result<FileRecord> {
    let output = Command::new("mkvmerge")
        .arg("-J")
        .arg(path)
        .output()
        .map_err(|e| crate::Error::probe(path, e.to_string()))?;

    // mkvmerge exits with 1 for warnings and still prints valid JSON.
    if !output.status.success() && output.status.code() != Some(1) {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(crate::Error::probe(
            path,
            format!("mkvmerge exited with {}: {}", output.status, stderr.trim()),
        ));
    }

    parse_identification(&output.stdout, path, codec_aliases)
}

/// Parse `mkvmerge -J` output into a file record.
pub fn parse_identification(
    json: &[u8],
    path: &Path,
    codec_aliases: &BTreeMap<String, String>,
) -> Result<FileRecord> {
    let parsed: MkvmergeOutput =
        serde_json::from_slice(json).map_err(|e| crate::Error::probe(path, e.to_string()))?;

    let mut record = FileRecord::new(path);

    for track in parsed.tracks {
        let Some(kind) = TrackKind::from_mkvmerge_type(&track.track_type) else {
            tracing::warn!(
                "Ignoring track {} of unknown type '{}' in {}",
                track.id,
                track.track_type,
                path.display()
            );
            continue;
        };

        record.push(to_track_record(track, kind, codec_aliases));
    }

    Ok(record)
}

fn to_track_record(
    track: MkvmergeTrack,
    kind: TrackKind,
    codec_aliases: &BTreeMap<String, String>,
) -> TrackRecord {
    let codec = codec_aliases
        .get(&track.codec)
        .cloned()
        .unwrap_or(track.codec);

    let mut record = TrackRecord::new(track.id, kind, codec);
    let props = track.properties;

    // Prefer the IETF tag over the legacy ISO 639-2 code
    if let Some(lang) = props.language_ietf.or(props.language) {
        record.language = lang;
    }
    if let Some(name) = props.track_name {
        record.name = name;
    }

    match kind {
        TrackKind::Video => {}
        TrackKind::Audio => {
            record.default = props.default_track.unwrap_or(false);
            record.commentary = props.flag_commentary.unwrap_or(false);
        }
        TrackKind::Subtitle => {
            record.forced = props.forced_track.unwrap_or(false);
            record.default = props.default_track.unwrap_or(false);
            record.hearing_impaired = props.flag_hearing_impaired.unwrap_or(false);
            record.commentary = props.flag_commentary.unwrap_or(false);
        }
    }

    record
}

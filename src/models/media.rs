//! Media-related data models.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Language used when the probe reports none.
pub const UNDETERMINED_LANGUAGE: &str = "und";

/// Name used when the probe reports none.
pub const EMPTY_TRACK_NAME: &str = "empty";

/// Track kind enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Subtitle,
}

impl TrackKind {
    /// Map the `type` field reported by `mkvmerge -J`.
    pub fn from_mkvmerge_type(s: &str) -> Option<Self> {
        match s {
            "video" => Some(TrackKind::Video),
            "audio" => Some(TrackKind::Audio),
            "subtitles" => Some(TrackKind::Subtitle),
            _ => None,
        }
    }

    /// Selector prefix used by mkvpropedit (`track:a1`, `track:s2`, ...).
    pub fn selector_prefix(&self) -> char {
        match self {
            TrackKind::Video => 'v',
            TrackKind::Audio => 'a',
            TrackKind::Subtitle => 's',
        }
    }
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackKind::Video => write!(f, "video"),
            TrackKind::Audio => write!(f, "audio"),
            TrackKind::Subtitle => write!(f, "subtitles"),
        }
    }
}

/// One track inside a container file, as reported by the probe.
///
/// Flags that do not apply to the track kind are always `false`:
/// video tracks carry none, audio tracks only `default` and `commentary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Stream-local track id.
    pub id: u32,
    /// Track kind.
    pub kind: TrackKind,
    /// IETF tag or legacy code.
    pub language: String,
    /// Track name.
    pub name: String,
    /// Codec, after display alias mapping.
    pub codec: String,
    pub default: bool,
    pub forced: bool,
    pub hearing_impaired: bool,
    pub commentary: bool,
}

impl TrackRecord {
    /// Create a track with placeholder language/name and no flags set.
    pub fn new(id: u32, kind: TrackKind, codec: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            language: UNDETERMINED_LANGUAGE.to_string(),
            name: EMPTY_TRACK_NAME.to_string(),
            codec: codec.into(),
            default: false,
            forced: false,
            hearing_impaired: false,
            commentary: false,
        }
    }
}

/// All tracks of one scanned container file, partitioned by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Full path to the file.
    pub path: PathBuf,
    pub video: Vec<TrackRecord>,
    pub audio: Vec<TrackRecord>,
    pub subtitles: Vec<TrackRecord>,
}

impl FileRecord {
    /// Create an empty record for a path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Append a track to the list matching its kind.
    pub fn push(&mut self, track: TrackRecord) {
        match track.kind {
            TrackKind::Video => self.video.push(track),
            TrackKind::Audio => self.audio.push(track),
            TrackKind::Subtitle => self.subtitles.push(track),
        }
    }

    /// Track counts as (video, audio, subtitles).
    pub fn layout(&self) -> TrackLayout {
        TrackLayout {
            video: self.video.len(),
            audio: self.audio.len(),
            subtitles: self.subtitles.len(),
        }
    }

    /// File name without directory.
    pub fn filename(&self) -> String {
        crate::utils::fs::file_name_string(&self.path)
    }
}

/// Number of tracks per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackLayout {
    pub video: usize,
    pub audio: usize,
    pub subtitles: usize,
}

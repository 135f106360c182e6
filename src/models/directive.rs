//! Edit directive model.
//!
//! An `EditDirective` is the parsed form of one operator code line such as
//! `ja, de en1, def en1`: one video token, then the audio and subtitle tokens
//! in track order.

use serde::{Deserialize, Serialize};

/// Token that leaves a track's classification untouched.
pub const SKIP_TOKEN: &str = "-";

/// One per-track token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackToken {
    /// `-`: keep language/name, only re-enable (and infer flags).
    Skip,
    /// A configured language code, optionally marked as default (`en1`).
    Code { code: String, default: bool },
}

impl TrackToken {
    /// Parse a single token. A trailing digit is the default marker:
    /// `en1` is `en` marked default, `en0` is `en` explicitly not default.
    pub fn parse(token: &str) -> Self {
        if token == SKIP_TOKEN {
            return TrackToken::Skip;
        }

        let mut chars = token.chars();
        match chars.next_back() {
            Some(last) if last.is_ascii_digit() => TrackToken::Code {
                code: chars.as_str().to_string(),
                default: last != '0',
            },
            _ => TrackToken::Code {
                code: token.to_string(),
                default: false,
            },
        }
    }

    /// Language code without the default marker, if not a skip.
    pub fn code(&self) -> Option<&str> {
        match self {
            TrackToken::Skip => None,
            TrackToken::Code { code, .. } => Some(code),
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, TrackToken::Skip)
    }
}

/// Parsed operator decision for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditDirective {
    pub video: TrackToken,
    pub audio: Vec<TrackToken>,
    pub subtitles: Vec<TrackToken>,
}

impl EditDirective {
    /// Every non-skip language code, in line order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(&self.video)
            .chain(self.audio.iter())
            .chain(self.subtitles.iter())
            .filter_map(TrackToken::code)
    }
}

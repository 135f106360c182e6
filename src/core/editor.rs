//! Edit command builder and executor.
//!
//! Translates an operator's directive into one mkvpropedit invocation per
//! file:
//! - container title and first video track name: the resolved title
//! - tokens with a code: language, name and flags from the language table
//! - `-` tokens: re-enable the track and, with auto flags on, infer
//!   forced/SDH/commentary from the existing name and flags

use crate::core::categorizer::{Categories, Category};
use crate::core::title;
use crate::error::ValidationError;
use crate::models::config::{Language, Settings};
use crate::models::directive::{EditDirective, TrackToken};
use crate::models::media::{FileRecord, TrackKind, TrackRecord};
use crate::models::summary::RunSummary;
use crate::services::mkvpropedit::{EditCommand, EditExecutor};
use crate::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;

/// Append the subtitle format to a track name: `English` -> `English (SRT)`.
///
/// A format suffix left by a previous run is stripped first, so applying
/// this repeatedly gives the same name.
pub fn with_subtitle_format(name: &str, codec: &str, existing_suffix: &Regex) -> String {
    let base = existing_suffix
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(name);
    format!("{} ({})", base, codec)
}

fn selector(kind: TrackKind, position: usize) -> String {
    format!("track:{}{}", kind.selector_prefix(), position + 1)
}

fn lookup<'a>(settings: &'a Settings, code: &str) -> Result<&'a Language> {
    settings
        .language(code)
        .ok_or_else(|| ValidationError::UnknownCodes(vec![code.to_string()]).into())
}

fn track_at<'a>(tracks: &'a [TrackRecord], kind: TrackKind, position: usize) -> Result<&'a TrackRecord> {
    tracks.get(position).ok_or_else(|| {
        crate::Error::other(format!(
            "directive has more {} codes than the file has tracks",
            kind
        ))
    })
}

/// Build the edit command for one file.
pub fn build_command(
    record: &FileRecord,
    title: &str,
    directive: &EditDirective,
    settings: &Settings,
) -> Result<EditCommand> {
    let mut cmd = EditCommand::new(&record.path);

    cmd.edit("info").set("title", title);
    cmd.edit(selector(TrackKind::Video, 0)).set("name", title);
    if let Some(code) = directive.video.code() {
        cmd.set("language", &lookup(settings, code)?.tag);
    }

    for (i, token) in directive.audio.iter().enumerate() {
        let track = track_at(&record.audio, TrackKind::Audio, i)?;
        cmd.edit(selector(TrackKind::Audio, i));

        match token {
            TrackToken::Skip => {
                cmd.flag("flag-enabled", true);
                if settings.auto_set_flags {
                    let commentary = settings.commentary_rule.infer(&track.name, track.commentary);
                    cmd.flag("flag-commentary", commentary);
                }
            }
            TrackToken::Code { code, default } => {
                let lang = lookup(settings, code)?;
                cmd.flag("flag-default", *default)
                    .flag("flag-forced", false)
                    .flag("flag-commentary", settings.comm_langs.contains(code))
                    .flag("flag-enabled", true)
                    .set("name", &lang.name)
                    .set("language", &lang.tag);
            }
        }
    }

    for (i, token) in directive.subtitles.iter().enumerate() {
        let track = track_at(&record.subtitles, TrackKind::Subtitle, i)?;
        cmd.edit(selector(TrackKind::Subtitle, i));

        match token {
            TrackToken::Skip => {
                cmd.flag("flag-enabled", true);
                if settings.append_sub_format {
                    let name = with_subtitle_format(
                        &track.name,
                        &track.codec,
                        &settings.pattern_sub_format,
                    );
                    cmd.set("name", name);
                }
                if settings.auto_set_flags {
                    cmd.flag("flag-forced", settings.forced_rule.infer(&track.name, track.forced))
                        .flag(
                            "flag-hearing-impaired",
                            settings.sdh_rule.infer(&track.name, track.hearing_impaired),
                        )
                        .flag(
                            "flag-commentary",
                            settings.commentary_rule.infer(&track.name, track.commentary),
                        );
                }
            }
            TrackToken::Code { code, default } => {
                let lang = lookup(settings, code)?;
                let name = if settings.append_sub_format {
                    format!("{} ({})", lang.name, track.codec)
                } else {
                    lang.name.clone()
                };
                cmd.flag("flag-default", *default)
                    .flag("flag-forced", settings.forced_langs.contains(code))
                    .flag("flag-hearing-impaired", settings.sdh_langs.contains(code))
                    .flag("flag-commentary", settings.comm_langs.contains(code))
                    .flag("flag-enabled", true)
                    .set("name", name)
                    .set("language", &lang.tag);
            }
        }
    }

    Ok(cmd)
}

/// Apply an accepted directive to every file of a category.
///
/// A failure on one file is reported and recorded; the remaining files are
/// still edited.
pub fn apply_category(
    category: &Category,
    categories: &Categories,
    directive: &EditDirective,
    settings: &Settings,
    executor: &dyn EditExecutor,
    summary: &mut RunSummary,
) {
    let pb = ProgressBar::new(category.files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    for path in &category.files {
        pb.set_message(crate::utils::fs::file_name_string(path));

        let Some(record) = categories.record(path) else {
            tracing::warn!("No track information for {}", path.display());
            summary.edit_failed.push(path.clone());
            pb.inc(1);
            continue;
        };

        let title = title::resolve_title(path, settings);
        let result = build_command(record, &title, directive, settings)
            .and_then(|cmd| executor.execute(&cmd));

        match result {
            Ok(()) => summary.edited += 1,
            Err(e) => {
                pb.suspend(|| println!("{} {}", "[ERROR]".red(), e));
                tracing::warn!("Edit failed: {}", e);
                summary.edit_failed.push(path.clone());
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::{Config, ToggleOverrides, DEFAULT_PATTERN_SUB_FORMAT};

    fn settings() -> Settings {
        Settings::from_config(Config::default(), ToggleOverrides::default()).unwrap()
    }

    fn track(id: u32, kind: TrackKind, name: &str, codec: &str) -> TrackRecord {
        let mut t = TrackRecord::new(id, kind, codec);
        t.name = name.to_string();
        t
    }

    fn record() -> FileRecord {
        let mut r = FileRecord::new("/tv/ep.mkv");
        r.push(track(0, TrackKind::Video, "old", "HEVC"));
        r.push(track(1, TrackKind::Audio, "Japanese", "FLAC"));
        r.push(track(2, TrackKind::Audio, "Director's Commentary", "AAC"));
        r.push(track(3, TrackKind::Subtitle, "English Forced", "SRT"));
        r.push(track(4, TrackKind::Subtitle, "English (PGS)", "PGS"));
        r
    }

    fn directive(line_video: &str, audio: &[&str], subs: &[&str]) -> EditDirective {
        EditDirective {
            video: TrackToken::parse(line_video),
            audio: audio.iter().map(|t| TrackToken::parse(t)).collect(),
            subtitles: subs.iter().map(|t| TrackToken::parse(t)).collect(),
        }
    }

    #[test]
    fn test_subtitle_format_idempotent() {
        let re = Regex::new(DEFAULT_PATTERN_SUB_FORMAT).unwrap();
        let once = with_subtitle_format("English", "SRT", &re);
        assert_eq!(once, "English (SRT)");
        assert_eq!(with_subtitle_format(&once, "SRT", &re), "English (SRT)");
        assert_eq!(with_subtitle_format("English SRT", "PGS", &re), "English (PGS)");
    }

    #[test]
    fn test_title_and_video_language() {
        let s = settings();
        let cmd = build_command(&record(), "Pilot", &directive("ja", &["ja1", "en"], &["enf", "en"]), &s)
            .unwrap();

        assert_eq!(cmd.value_of("info", "title"), Some("Pilot"));
        assert_eq!(cmd.value_of("track:v1", "name"), Some("Pilot"));
        assert_eq!(cmd.value_of("track:v1", "language"), Some("ja"));
        assert_eq!(&cmd.args[..4], &["--edit", "info", "--set", "title=Pilot"]);
    }

    #[test]
    fn test_video_skip_keeps_language() {
        let s = settings();
        let cmd = build_command(&record(), "Pilot", &directive("-", &["-", "-"], &["-", "-"]), &s)
            .unwrap();
        assert_eq!(cmd.value_of("track:v1", "language"), None);
        assert_eq!(cmd.value_of("track:v1", "name"), Some("Pilot"));
    }

    #[test]
    fn test_audio_codes() {
        let s = settings();
        let cmd = build_command(&record(), "T", &directive("ja", &["ja1", "enc"], &["-", "-"]), &s)
            .unwrap();

        assert_eq!(cmd.value_of("track:a1", "flag-default"), Some("1"));
        assert_eq!(cmd.value_of("track:a1", "flag-forced"), Some("0"));
        assert_eq!(cmd.value_of("track:a1", "flag-commentary"), Some("0"));
        assert_eq!(cmd.value_of("track:a1", "flag-enabled"), Some("1"));
        assert_eq!(cmd.value_of("track:a1", "name"), Some("Japanese"));
        assert_eq!(cmd.value_of("track:a1", "language"), Some("ja"));

        assert_eq!(cmd.value_of("track:a2", "flag-default"), Some("0"));
        assert_eq!(cmd.value_of("track:a2", "flag-commentary"), Some("1"));
        assert_eq!(cmd.value_of("track:a2", "name"), Some("English Commentary"));
        assert_eq!(cmd.value_of("track:a2", "language"), Some("en"));
    }

    #[test]
    fn test_audio_skip_infers_commentary() {
        let s = settings();
        let cmd = build_command(&record(), "T", &directive("ja", &["-", "-"], &["-", "-"]), &s)
            .unwrap();

        assert_eq!(cmd.value_of("track:a1", "flag-enabled"), Some("1"));
        assert_eq!(cmd.value_of("track:a1", "flag-commentary"), Some("0"));
        assert_eq!(cmd.value_of("track:a1", "name"), None);
        assert_eq!(cmd.value_of("track:a2", "flag-commentary"), Some("1"));
    }

    #[test]
    fn test_skip_never_clears_existing_flag() {
        let s = settings();
        let mut r = record();
        r.audio[0].commentary = true;
        r.subtitles[1].hearing_impaired = true;

        let cmd = build_command(&r, "T", &directive("ja", &["-", "-"], &["-", "-"]), &s).unwrap();
        assert_eq!(cmd.value_of("track:a1", "flag-commentary"), Some("1"));
        assert_eq!(cmd.value_of("track:s2", "flag-hearing-impaired"), Some("1"));
    }

    #[test]
    fn test_auto_flags_disabled() {
        let overrides = ToggleOverrides {
            no_auto_flags: true,
            ..Default::default()
        };
        let s = Settings::from_config(Config::default(), overrides).unwrap();
        let cmd = build_command(&record(), "T", &directive("ja", &["-", "-"], &["-", "-"]), &s)
            .unwrap();

        assert_eq!(cmd.value_of("track:a2", "flag-commentary"), None);
        assert_eq!(cmd.value_of("track:s1", "flag-forced"), None);
        assert_eq!(cmd.value_of("track:s1", "flag-enabled"), Some("1"));
    }

    #[test]
    fn test_subtitle_skip_infers_and_appends_format() {
        let s = settings();
        let cmd = build_command(&record(), "T", &directive("ja", &["-", "-"], &["-", "-"]), &s)
            .unwrap();

        assert_eq!(cmd.value_of("track:s1", "name"), Some("English Forced (SRT)"));
        assert_eq!(cmd.value_of("track:s1", "flag-forced"), Some("1"));
        assert_eq!(cmd.value_of("track:s1", "flag-hearing-impaired"), Some("0"));
        assert_eq!(cmd.value_of("track:s2", "name"), Some("English (PGS)"));
        assert_eq!(cmd.value_of("track:s2", "flag-forced"), Some("0"));
    }

    #[test]
    fn test_subtitle_codes() {
        let s = settings();
        let cmd = build_command(&record(), "T", &directive("ja", &["-", "-"], &["def", "ens1"]), &s)
            .unwrap();

        assert_eq!(cmd.value_of("track:s1", "flag-forced"), Some("1"));
        assert_eq!(cmd.value_of("track:s1", "flag-default"), Some("0"));
        assert_eq!(cmd.value_of("track:s1", "name"), Some("German Forced (SRT)"));
        assert_eq!(cmd.value_of("track:s1", "language"), Some("de"));

        assert_eq!(cmd.value_of("track:s2", "flag-default"), Some("1"));
        assert_eq!(cmd.value_of("track:s2", "flag-hearing-impaired"), Some("1"));
        assert_eq!(cmd.value_of("track:s2", "flag-forced"), Some("0"));
        assert_eq!(cmd.value_of("track:s2", "name"), Some("English SDH (PGS)"));
    }

    #[test]
    fn test_subtitle_codes_without_format() {
        let overrides = ToggleOverrides {
            no_subformat: true,
            ..Default::default()
        };
        let s = Settings::from_config(Config::default(), overrides).unwrap();
        let cmd = build_command(&record(), "T", &directive("ja", &["-", "-"], &["en", "-"]), &s)
            .unwrap();

        assert_eq!(cmd.value_of("track:s1", "name"), Some("English"));
        assert_eq!(cmd.value_of("track:s2", "name"), None);
    }

    #[test]
    fn test_too_many_tokens_rejected() {
        let s = settings();
        let result = build_command(&record(), "T", &directive("ja", &["ja", "en", "de"], &[]), &s);
        assert!(result.is_err());
    }
}

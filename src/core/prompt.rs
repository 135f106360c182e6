//! Interactive plan builder.
//!
//! For each category the operator sees the tracks of one representative file
//! and answers with a code line:
//!
//! ```text
//! <video>, <audio> <audio> ..., <subtitle> <subtitle> ...
//! ja, de en1, def en1
//! ```
//!
//! A token is `-` (keep classification) or a configured code, optionally
//! followed by a digit marking the track as default. Besides code lines the
//! operator may enter `s` (skip group), `v` (list codes), `f` (list file
//! names) or `ff` (list paths).

use crate::core::categorizer::Category;
use crate::error::ValidationError;
use crate::models::config::Settings;
use crate::models::directive::{EditDirective, TrackToken};
use crate::models::media::{FileRecord, TrackLayout, TrackRecord};
use crate::Result;
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::PathBuf;

const BAR_WIDTH: usize = 100;

/// What an input line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Skip,
    ShowCodes,
    ShowFiles,
    ShowPaths,
    Codes(EditDirective),
}

/// Prompt states for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptState {
    Prompting,
    ShowingCodes,
    ShowingFiles,
    ShowingPaths,
    Skipped,
    Accepted(EditDirective),
}

/// Final answer for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Skip,
    Accept(EditDirective),
}

fn split_tokens(part: Option<&&str>) -> Vec<String> {
    part.map(|p| p.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Validate a code line against a track layout and the configured codes.
///
/// Checks run in order: video, audio and subtitle token counts, line syntax,
/// then every code must be configured.
pub fn parse_codes(
    line: &str,
    layout: TrackLayout,
    settings: &Settings,
) -> std::result::Result<EditDirective, ValidationError> {
    let parts: Vec<&str> = line.split(',').collect();
    let video = split_tokens(parts.first());
    let audio = split_tokens(parts.get(1));
    let subtitles = split_tokens(parts.get(2));

    if video.len() != layout.video {
        return Err(ValidationError::VideoCount {
            expected: layout.video,
            given: video.len(),
        });
    }
    if audio.len() != layout.audio {
        return Err(ValidationError::AudioCount {
            expected: layout.audio,
            given: audio.len(),
        });
    }
    if subtitles.len() != layout.subtitles {
        return Err(ValidationError::SubtitleCount {
            expected: layout.subtitles,
            given: subtitles.len(),
        });
    }

    let token_re = regex::Regex::new(r"^(?:-|\w{2,5})$").map_err(|_| ValidationError::Syntax)?;
    let well_formed = parts.len() == 3
        && video.len() == 1
        && video
            .iter()
            .chain(&audio)
            .chain(&subtitles)
            .all(|t| token_re.is_match(t));
    if !well_formed {
        return Err(ValidationError::Syntax);
    }

    let directive = EditDirective {
        video: TrackToken::parse(&video[0]),
        audio: audio.iter().map(|t| TrackToken::parse(t)).collect(),
        subtitles: subtitles.iter().map(|t| TrackToken::parse(t)).collect(),
    };

    let mut unknown: Vec<String> = Vec::new();
    for code in directive.codes() {
        if settings.language(code).is_none() && !unknown.iter().any(|u| u == code) {
            unknown.push(code.to_string());
        }
    }
    if !unknown.is_empty() {
        return Err(ValidationError::UnknownCodes(unknown));
    }

    Ok(directive)
}

/// Interpret one input line.
pub fn interpret(
    line: &str,
    layout: TrackLayout,
    settings: &Settings,
) -> std::result::Result<Reply, ValidationError> {
    match line.trim() {
        "s" => Ok(Reply::Skip),
        "v" => Ok(Reply::ShowCodes),
        "f" => Ok(Reply::ShowFiles),
        "ff" => Ok(Reply::ShowPaths),
        other => parse_codes(other, layout, settings).map(Reply::Codes),
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn flag_label(set: bool, label: &str) -> &str {
    if set {
        label
    } else {
        ""
    }
}

fn write_flag_row<W: Write>(out: &mut W, t: &TrackRecord, forced: &str, sdh: &str) -> Result<()> {
    writeln!(
        out,
        "{:2} | {:^5} | {:40} | {:^6} | {:^6} | {:^7} | {:^3} | {:^10}",
        t.id,
        t.language,
        truncate(&t.name, 40),
        truncate(&t.codec, 6),
        forced,
        flag_label(t.default, "Default"),
        sdh,
        flag_label(t.commentary, "Commentary"),
    )?;
    Ok(())
}

/// Render the track table of a file.
pub fn render_table<W: Write>(out: &mut W, record: &FileRecord) -> Result<()> {
    let bar = "─".repeat(BAR_WIDTH);

    writeln!(out)?;
    writeln!(out, "{}", bar)?;
    writeln!(out, "{}", truncate(&record.filename(), BAR_WIDTH).bold())?;
    writeln!(out, "{}", bar)?;

    if !record.video.is_empty() {
        for t in &record.video {
            writeln!(
                out,
                "{:2} | {:^5} | {:40} | {:20}",
                t.id,
                t.language,
                truncate(&t.name, 40),
                t.codec
            )?;
        }
        writeln!(out, "{}", bar)?;
    }
    if !record.audio.is_empty() {
        for t in &record.audio {
            write_flag_row(out, t, "", "")?;
        }
        writeln!(out, "{}", bar)?;
    }
    if !record.subtitles.is_empty() {
        for t in &record.subtitles {
            write_flag_row(
                out,
                t,
                flag_label(t.forced, "Forced"),
                flag_label(t.hearing_impaired, "SDH"),
            )?;
        }
        writeln!(out, "{}", bar)?;
    }

    Ok(())
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

/// Reads operator decisions from an input and writes prompts to an output.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the output, e.g. to inspect what was written.
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(crate::Error::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn wait_for_enter(&mut self) -> Result<()> {
        write!(self.output, "Press Enter to continue...")?;
        self.read_line().map(|_| ())
    }

    fn list_files(&mut self, category: &Category, absolute: bool) -> Result<()> {
        let bar = "─".repeat(BAR_WIDTH);
        writeln!(self.output, "{}", bar)?;
        writeln!(
            self.output,
            "{} will be affected:",
            plural(category.files.len(), "file")
        )?;
        for path in &category.files {
            if absolute {
                let abs: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| path.clone());
                writeln!(self.output, "{}", abs.display())?;
            } else {
                writeln!(self.output, "{}", crate::utils::fs::file_name_string(path))?;
            }
        }
        writeln!(self.output, "{}", bar)?;
        Ok(())
    }

    fn list_codes(&mut self, settings: &Settings) -> Result<()> {
        let bar = "─".repeat(BAR_WIDTH);
        writeln!(self.output, "{}", bar)?;
        writeln!(self.output, "Possible values:")?;
        for (code, lang) in &settings.langs {
            writeln!(self.output, "{:4} | {}", code, lang.name)?;
        }
        writeln!(self.output, "{}", bar)?;
        Ok(())
    }

    fn prompt(
        &mut self,
        group: usize,
        category: &Category,
        record: &FileRecord,
        settings: &Settings,
    ) -> Result<PromptState> {
        let bar = "─".repeat(BAR_WIDTH);
        render_table(&mut self.output, record)?;
        writeln!(self.output, "{}", bar)?;
        writeln!(self.output, "Example: ja, de en1, def en1")?;
        writeln!(
            self.output,
            "  \"s\" skip current group, \"v\" show possible codes, \"f\" show filenames in group, \"ff\" show filepaths"
        )?;
        writeln!(self.output, "{}", bar)?;
        writeln!(
            self.output,
            "Group {} contains {}.",
            group + 1,
            plural(category.files.len(), "file")
        )?;
        writeln!(self.output, "Codes please:")?;

        let line = self.read_line()?;
        let next = match interpret(&line, record.layout(), settings) {
            Ok(Reply::Skip) => PromptState::Skipped,
            Ok(Reply::ShowCodes) => PromptState::ShowingCodes,
            Ok(Reply::ShowFiles) => PromptState::ShowingFiles,
            Ok(Reply::ShowPaths) => PromptState::ShowingPaths,
            Ok(Reply::Codes(directive)) => PromptState::Accepted(directive),
            Err(e) => {
                writeln!(self.output, "{}", e.to_string().red())?;
                PromptState::Prompting
            }
        };
        Ok(next)
    }

    /// Ask for the decision on one category. `group` is its zero-based index.
    pub fn ask(
        &mut self,
        group: usize,
        category: &Category,
        record: &FileRecord,
        settings: &Settings,
    ) -> Result<Decision> {
        let mut state = PromptState::Prompting;

        loop {
            state = match state {
                PromptState::Prompting => self.prompt(group, category, record, settings)?,
                PromptState::ShowingCodes => {
                    self.list_codes(settings)?;
                    self.wait_for_enter()?;
                    PromptState::Prompting
                }
                PromptState::ShowingFiles => {
                    self.list_files(category, false)?;
                    self.wait_for_enter()?;
                    PromptState::Prompting
                }
                PromptState::ShowingPaths => {
                    self.list_files(category, true)?;
                    self.wait_for_enter()?;
                    PromptState::Prompting
                }
                PromptState::Skipped => return Ok(Decision::Skip),
                PromptState::Accepted(directive) => return Ok(Decision::Accept(directive)),
            };
        }
    }
}

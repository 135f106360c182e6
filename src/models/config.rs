//! Configuration model.

use crate::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Default regex matching forced subtitle track names.
pub const DEFAULT_PATTERN_FORCED: &str = r"(?i)\bforced\b";
/// Default regex matching SDH subtitle track names.
pub const DEFAULT_PATTERN_SDH: &str = r"(?i)\b(?:SDH|CC)\b";
/// Default regex matching commentary track names.
pub const DEFAULT_PATTERN_COMMENTARY: &str = r"(?i)\bcommentary\b";
/// Default regex extracting the episode title from a tv-show file name.
pub const DEFAULT_PATTERN_TVSHOW: &str =
    r"^.*\(\d{4}\)\s-\s\S\d{2,4}E\d{2,3}(?:\sS\d{2}E\d{2,3})*\s-\s([^\[]+)\s\[.*\](?:\s\(\d\))?\.mkv$";
/// Default regex extracting the movie title from a movie file name.
pub const DEFAULT_PATTERN_MOVIE: &str = r"^(.*)\s\(\d{4}\)\s.*\.mkv$";
/// Default regex detecting an already appended subtitle format suffix.
pub const DEFAULT_PATTERN_SUB_FORMAT: &str =
    r"^(.*) (?:\(?SRT\)?|\(?ASS\)?|\(?VOB\)?|\(?PGS\)?)$";
/// Default regex matching trailers, samples and similar files.
pub const DEFAULT_PATTERN_UNWANTED: &str = r"^.*-trailer\.mkv$|^.*-sample\.mkv$";

/// Display name and IETF tag of a language code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Language {
    /// Name written to the track (e.g. "English SDH").
    pub name: String,
    /// IETF tag written to the track (e.g. "en").
    pub tag: String,
}

impl From<(String, String)> for Language {
    fn from((name, tag): (String, String)) -> Self {
        Self { name, tag }
    }
}

impl From<Language> for (String, String) {
    fn from(lang: Language) -> Self {
        (lang.name, lang.tag)
    }
}

/// Regex patterns as written in the config file. Empty means built-in default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub forced: String,
    pub sdh: String,
    pub commentary: String,
    pub tvshow: String,
    pub movie: String,
    pub sub_format: String,
    pub unwanted: String,
}

/// Application configuration, as stored in `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Strip " (1)" counters and rename files to match their sidecar.
    pub rename_files: bool,
    /// Infer forced/SDH/commentary flags from track names on skipped tracks.
    pub auto_set_flags: bool,
    /// Append " (SRT)" etc. to subtitle track names.
    pub append_sub_format: bool,
    /// Codes that set the forced flag.
    pub forced_langs: Vec<String>,
    /// Codes that set the hearing-impaired flag.
    pub sdh_langs: Vec<String>,
    /// Codes that set the commentary flag.
    pub comm_langs: Vec<String>,
    /// Directory names (case-insensitive) that are never scanned.
    pub ignore_dirs: Vec<String>,
    /// Sidecar file names that are never used for renaming.
    pub ignore_sidecars: Vec<String>,
    /// Regex patterns.
    pub patterns: PatternConfig,
    /// Language codes the operator may enter.
    pub langs: BTreeMap<String, Language>,
    /// Probe codec name -> display alias.
    pub codec_aliases: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rename_files: true,
            auto_set_flags: true,
            append_sub_format: true,
            forced_langs: strings(&["def", "enf", "jaf", "frf", "esf"]),
            sdh_langs: strings(&["des", "ens"]),
            comm_langs: strings(&["dec", "enc"]),
            ignore_dirs: strings(&[
                "extras",
                "featurettes",
                "behind the scenes",
                "deleted scenes",
                "interviews",
                "scenes",
                "shorts",
                "trailers",
                "other",
                "sample",
                "samples",
            ]),
            ignore_sidecars: strings(&["tvshow.nfo", "season.nfo", "movie.nfo"]),
            patterns: PatternConfig::default(),
            langs: default_langs(),
            codec_aliases: [
                ("SubRip/SRT", "SRT"),
                ("SubStationAlpha", "ASS"),
                ("HDMV PGS", "PGS"),
                ("VobSub", "VOB"),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_langs() -> BTreeMap<String, Language> {
    [
        ("en", "English", "en"),
        ("enf", "English Forced", "en"),
        ("ens", "English SDH", "en"),
        ("enc", "English Commentary", "en"),
        ("de", "German", "de"),
        ("def", "German Forced", "de"),
        ("des", "German SDH", "de"),
        ("dec", "German Commentary", "de"),
        ("ja", "Japanese", "ja"),
        ("jaf", "Japanese Forced", "ja"),
        ("fr", "French", "fr"),
        ("frf", "French Forced", "fr"),
        ("es", "Spanish", "es"),
        ("esf", "Spanish Forced", "es"),
        ("it", "Italian", "it"),
        ("pt", "Portuguese", "pt"),
        ("nl", "Dutch", "nl"),
        ("sv", "Swedish", "sv"),
        ("da", "Danish", "da"),
        ("no", "Norwegian", "no"),
        ("fi", "Finnish", "fi"),
        ("pl", "Polish", "pl"),
        ("cs", "Czech", "cs"),
        ("hu", "Hungarian", "hu"),
        ("ru", "Russian", "ru"),
        ("tr", "Turkish", "tr"),
        ("ko", "Korean", "ko"),
        ("zh", "Chinese", "zh"),
        ("ar", "Arabic", "ar"),
        ("hi", "Hindi", "hi"),
        ("und", "Undetermined", "und"),
    ]
    .iter()
    .map(|(code, name, tag)| {
        (
            code.to_string(),
            Language {
                name: name.to_string(),
                tag: tag.to_string(),
            },
        )
    })
    .collect()
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mkvprops")
}

/// Default location of the config file.
pub fn default_config_path() -> PathBuf {
    dirs_config_path().join("config.toml")
}

/// Load configuration.
///
/// An explicit path must exist. Without one, the file in the platform config
/// directory is used when present, otherwise the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(crate::Error::PathNotFound(p.display().to_string()));
            }
            p.to_path_buf()
        }
        None => {
            let p = default_config_path();
            if !p.exists() {
                tracing::debug!("No config at {}, using defaults", p.display());
                return Ok(Config::default());
            }
            p
        }
    };

    tracing::debug!("Loading config from {}", config_path.display());
    let content = std::fs::read_to_string(&config_path)?;
    parse_config(&content)
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    Ok(config)
}

/// Feature toggles that can be negated from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToggleOverrides {
    pub no_renaming: bool,
    pub no_auto_flags: bool,
    pub no_subformat: bool,
}

/// A flag inferred from a track name, never clearing an existing flag.
#[derive(Debug, Clone)]
pub struct FlagRule {
    pattern: Regex,
}

impl FlagRule {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }

    /// The flag is set if it already was, or if the name matches.
    pub fn infer(&self, name: &str, existing: bool) -> bool {
        existing || self.pattern.is_match(name)
    }
}

/// Resolved, immutable settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub rename_files: bool,
    pub auto_set_flags: bool,
    pub append_sub_format: bool,
    pub langs: BTreeMap<String, Language>,
    pub forced_langs: BTreeSet<String>,
    pub sdh_langs: BTreeSet<String>,
    pub comm_langs: BTreeSet<String>,
    /// Lower-cased directory names.
    pub ignore_dirs: BTreeSet<String>,
    pub ignore_sidecars: BTreeSet<String>,
    pub codec_aliases: BTreeMap<String, String>,
    pub forced_rule: FlagRule,
    pub sdh_rule: FlagRule,
    pub commentary_rule: FlagRule,
    pub pattern_tvshow: Regex,
    pub pattern_movie: Regex,
    pub pattern_sub_format: Regex,
    pub pattern_unwanted: Regex,
}

impl Settings {
    /// Compile a config, applying command line negations.
    pub fn from_config(config: Config, overrides: ToggleOverrides) -> Result<Self> {
        let p = &config.patterns;

        for code in config
            .forced_langs
            .iter()
            .chain(&config.sdh_langs)
            .chain(&config.comm_langs)
        {
            if !config.langs.contains_key(code) {
                return Err(crate::Error::Config(format!(
                    "flag language '{}' is not defined in [langs]",
                    code
                )));
            }
        }

        Ok(Self {
            rename_files: config.rename_files && !overrides.no_renaming,
            auto_set_flags: config.auto_set_flags && !overrides.no_auto_flags,
            append_sub_format: config.append_sub_format && !overrides.no_subformat,
            forced_rule: FlagRule::new(compile(&p.forced, DEFAULT_PATTERN_FORCED)?),
            sdh_rule: FlagRule::new(compile(&p.sdh, DEFAULT_PATTERN_SDH)?),
            commentary_rule: FlagRule::new(compile(&p.commentary, DEFAULT_PATTERN_COMMENTARY)?),
            pattern_tvshow: compile(&p.tvshow, DEFAULT_PATTERN_TVSHOW)?,
            pattern_movie: compile(&p.movie, DEFAULT_PATTERN_MOVIE)?,
            pattern_sub_format: compile(&p.sub_format, DEFAULT_PATTERN_SUB_FORMAT)?,
            pattern_unwanted: compile(&p.unwanted, DEFAULT_PATTERN_UNWANTED)?,
            forced_langs: config.forced_langs.into_iter().collect(),
            sdh_langs: config.sdh_langs.into_iter().collect(),
            comm_langs: config.comm_langs.into_iter().collect(),
            ignore_dirs: config
                .ignore_dirs
                .iter()
                .map(|d| d.to_lowercase())
                .collect(),
            ignore_sidecars: config.ignore_sidecars.into_iter().collect(),
            codec_aliases: config.codec_aliases,
            langs: config.langs,
        })
    }

    /// Look up a configured language code.
    pub fn language(&self, code: &str) -> Option<&Language> {
        self.langs.get(code)
    }
}

fn compile(pattern: &str, fallback: &str) -> Result<Regex> {
    let source = if pattern.is_empty() { fallback } else { pattern };
    Ok(Regex::new(source)?)
}

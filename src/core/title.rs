//! Title resolution.
//!
//! The title written to a file comes from its `.nfo` sidecar when one exists.
//! Multi-episode files have several concatenated `<episodedetails>` documents
//! in one sidecar; their titles are merged into one:
//!
//! | titles                      | result                  |
//! |-----------------------------|-------------------------|
//! | `Pilot`                     | `Pilot`                 |
//! | `Ep 1`, `Ep 2`              | `Ep 1 & 2`              |
//! | `Alpha`, `Beta`             | `Alpha & Beta`          |
//! | `S1`, `S2`, `S3`            | `S 1-3`                 |
//! | `Alpha`, `Beta`, `Gamma`    | `Alpha, Beta & Gamma`   |
//!
//! Without a usable sidecar the title is extracted from the file name.

use crate::core::scanner::SIDECAR_EXTENSION;
use crate::models::config::Settings;
use crate::utils::fs::file_name_string;
use crate::Result;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Sidecar path for a container file (same base name, `.nfo`).
pub fn sidecar_path(path: &Path) -> PathBuf {
    path.with_extension(SIDECAR_EXTENSION)
}

/// Resolve the display title of a container file. May be empty.
pub fn resolve_title(path: &Path, settings: &Settings) -> String {
    let sidecar = sidecar_path(path);

    if sidecar.is_file() {
        match read_sidecar_titles(&sidecar) {
            Ok(titles) => return merge_titles(&titles),
            Err(e) => {
                tracing::warn!("{}", e);
                tracing::warn!("Extracting the title from the file name instead");
            }
        }
    }

    title_from_filename(
        &file_name_string(path),
        &settings.pattern_tvshow,
        &settings.pattern_movie,
    )
}

/// Read every `<title>` of a sidecar file, in document order.
pub fn read_sidecar_titles(sidecar: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(sidecar).map_err(|e| crate::Error::SidecarParse {
        path: sidecar.to_path_buf(),
        reason: e.to_string(),
    })?;

    parse_sidecar_titles(&content).map_err(|reason| crate::Error::SidecarParse {
        path: sidecar.to_path_buf(),
        reason,
    })
}

/// Collect the `title` child of every top-level element.
///
/// XML declarations are dropped and the rest is wrapped in a synthetic root,
/// so several concatenated documents parse as one.
pub fn parse_sidecar_titles(xml: &str) -> std::result::Result<Vec<String>, String> {
    let declaration = Regex::new(r"<\?xml[^>]*\?>").map_err(|e| e.to_string())?;
    let body = declaration.replace_all(xml.trim_start_matches('\u{feff}'), "");
    let wrapped = format!("<root>{}</root>", body);

    let doc = roxmltree::Document::parse(&wrapped).map_err(|e| e.to_string())?;

    let titles = doc
        .root_element()
        .children()
        .filter(|n| n.is_element())
        .filter_map(|element| {
            element
                .children()
                .find(|n| n.is_element() && n.tag_name().name() == "title")
                .map(|title| title.text().unwrap_or("").to_string())
        })
        .collect();

    Ok(titles)
}

/// Split `Ep 1`, `Ep (1)` or `S1` into base and part.
fn split_numbered(title: &str) -> Option<(String, String)> {
    let re = Regex::new(r"^(.+?) ?(\(\d+\)|\d+)$").ok()?;
    let caps = re.captures(title)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

/// If every title is `<base> <part>` with one shared base, the base and parts.
fn shared_base(titles: &[String]) -> Option<(String, Vec<String>)> {
    let mut base: Option<String> = None;
    let mut parts = Vec::with_capacity(titles.len());

    for title in titles {
        let (b, part) = split_numbered(title)?;
        match &base {
            None => base = Some(b),
            // A second distinct base abandons the numbered merge
            Some(existing) if *existing != b => return None,
            Some(_) => {}
        }
        parts.push(part);
    }

    base.map(|b| (b, parts))
}

fn part_number(part: &str) -> Option<u32> {
    part.trim_start_matches('(').trim_end_matches(')').parse().ok()
}

/// Parts are consecutive numbers in ascending order.
fn is_sequential(parts: &[String]) -> bool {
    let numbers: Option<Vec<u32>> = parts.iter().map(|p| part_number(p)).collect();
    match numbers {
        Some(numbers) => numbers.windows(2).all(|w| w[1] == w[0] + 1),
        None => false,
    }
}

/// Merge sidecar titles into one display title.
pub fn merge_titles(titles: &[String]) -> String {
    match titles {
        [] => String::new(),
        [single] => single.clone(),
        [first, second] => match shared_base(titles) {
            Some((base, parts)) => format!("{} {} & {}", base, parts[0], parts[1]),
            None => format!("{} & {}", first, second),
        },
        [init @ .., last] => match shared_base(titles) {
            Some((base, parts)) if is_sequential(&parts) => {
                format!("{} {}-{}", base, parts[0], parts[parts.len() - 1])
            }
            _ => format!("{} & {}", init.join(", "), last),
        },
    }
}

/// Extract a title from the file name using the tv-show pattern, then the
/// movie pattern. Underscores stand in for colons in file names.
pub fn title_from_filename(filename: &str, tvshow: &Regex, movie: &Regex) -> String {
    [tvshow, movie]
        .iter()
        .find_map(|re| re.captures(filename))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().replace('_', ":"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::{DEFAULT_PATTERN_MOVIE, DEFAULT_PATTERN_TVSHOW};

    fn titles(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_zero_and_one() {
        assert_eq!(merge_titles(&[]), "");
        assert_eq!(merge_titles(&titles(&["Pilot"])), "Pilot");
    }

    #[test]
    fn test_merge_two_numbered() {
        assert_eq!(merge_titles(&titles(&["Ep 1", "Ep 2"])), "Ep 1 & 2");
        assert_eq!(
            merge_titles(&titles(&["The Finale (1)", "The Finale (2)"])),
            "The Finale (1) & (2)"
        );
    }

    #[test]
    fn test_merge_two_plain() {
        assert_eq!(merge_titles(&titles(&["Alpha", "Beta"])), "Alpha & Beta");
        assert_eq!(merge_titles(&titles(&["Ep 1", "Beta"])), "Ep 1 & Beta");
    }

    #[test]
    fn test_merge_two_distinct_bases() {
        assert_eq!(merge_titles(&titles(&["Alpha 1", "Beta 2"])), "Alpha 1 & Beta 2");
    }

    #[test]
    fn test_merge_many_numbered() {
        assert_eq!(merge_titles(&titles(&["S1", "S2", "S3"])), "S 1-3");
        assert_eq!(
            merge_titles(&titles(&["Part 1", "Part 2", "Part 3", "Part 4"])),
            "Part 1-4"
        );
    }

    #[test]
    fn test_merge_many_plain() {
        assert_eq!(
            merge_titles(&titles(&["Alpha", "Beta", "Gamma"])),
            "Alpha, Beta & Gamma"
        );
    }

    #[test]
    fn test_merge_many_partially_shared_base() {
        assert_eq!(
            merge_titles(&titles(&["Ep 1", "Ep 2", "Other 3"])),
            "Ep 1, Ep 2 & Other 3"
        );
    }

    #[test]
    fn test_merge_many_gap_in_parts() {
        assert_eq!(
            merge_titles(&titles(&["Ep 1", "Ep 2", "Ep 4"])),
            "Ep 1, Ep 2 & Ep 4"
        );
    }

    #[test]
    fn test_parse_multi_episode_sidecar() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>
<episodedetails>
  <title>Ep 1</title>
  <season>1</season>
</episodedetails>
<episodedetails>
  <title>Ep 2</title>
  <season>1</season>
</episodedetails>"#;
        assert_eq!(parse_sidecar_titles(xml).unwrap(), titles(&["Ep 1", "Ep 2"]));
    }

    #[test]
    fn test_parse_sidecar_ignores_nested_titles() {
        let xml = "<movie><title>Heat</title><set><title>Collection</title></set></movie>";
        assert_eq!(parse_sidecar_titles(xml).unwrap(), titles(&["Heat"]));
    }

    #[test]
    fn test_parse_sidecar_malformed() {
        assert!(parse_sidecar_titles("<movie><title>Heat</movie>").is_err());
    }

    #[test]
    fn test_title_from_tvshow_filename() {
        let tvshow = Regex::new(DEFAULT_PATTERN_TVSHOW).unwrap();
        let movie = Regex::new(DEFAULT_PATTERN_MOVIE).unwrap();
        assert_eq!(
            title_from_filename(
                "Show (2019) - S01E02 - Who_ Me [1080p].mkv",
                &tvshow,
                &movie
            ),
            "Who: Me"
        );
    }

    #[test]
    fn test_title_from_movie_filename() {
        let tvshow = Regex::new(DEFAULT_PATTERN_TVSHOW).unwrap();
        let movie = Regex::new(DEFAULT_PATTERN_MOVIE).unwrap();
        assert_eq!(
            title_from_filename("Mission_ Impossible (1996) [Bluray-1080p].mkv", &tvshow, &movie),
            "Mission: Impossible"
        );
        assert_eq!(title_from_filename("random.mkv", &tvshow, &movie), "");
    }
}

//! Categorizer module.
//!
//! Files whose tracks would receive identical edits are grouped under one
//! category key, so the operator answers once per group instead of once per
//! file.

use crate::models::media::FileRecord;
use std::collections::HashMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Equality key of a file's track layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryKey(String);

impl CategoryKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Fields are separated so that adjacent values can never run together
// (`1` + `en` vs `1e` + `n`).
const FIELD_SEP: char = '\u{1f}';
const TRACK_SEP: char = '\u{1e}';

fn push_track(key: &mut String, kind: char, fields: &[&dyn std::fmt::Display]) {
    key.push(kind);
    for field in fields {
        key.push(FIELD_SEP);
        let _ = write!(key, "{}", field);
    }
    key.push(TRACK_SEP);
}

/// Compute the category key of a file.
///
/// Video: id, language. Audio: id, language, name, default, commentary.
/// Subtitles: id, language, name, codec, forced, default, hearing impaired,
/// commentary. Every field that changes an edit decision is included; the
/// file path and title are not.
pub fn category_key(record: &FileRecord) -> CategoryKey {
    let mut key = String::new();

    for t in &record.video {
        push_track(&mut key, 'v', &[&t.id, &t.language]);
    }
    for t in &record.audio {
        push_track(&mut key, 'a', &[&t.id, &t.language, &t.name, &t.default, &t.commentary]);
    }
    for t in &record.subtitles {
        push_track(
            &mut key,
            's',
            &[
                &t.id,
                &t.language,
                &t.name,
                &t.codec,
                &t.forced,
                &t.default,
                &t.hearing_impaired,
                &t.commentary,
            ],
        );
    }

    CategoryKey(key)
}

/// A group of files sharing one category key.
#[derive(Debug, Clone)]
pub struct Category {
    pub key: CategoryKey,
    /// Member files in scan order.
    pub files: Vec<PathBuf>,
}

impl Category {
    /// The file whose tracks are shown to the operator.
    pub fn representative(&self) -> &PathBuf {
        &self.files[0]
    }
}

/// Categories in first-seen order.
#[derive(Debug, Default)]
pub struct Categories {
    categories: Vec<Category>,
    index: HashMap<CategoryKey, usize>,
    records: HashMap<PathBuf, FileRecord>,
}

impl Categories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to its category, creating the category on first sight.
    pub fn insert(&mut self, record: FileRecord) {
        let key = category_key(&record);
        let path = record.path.clone();

        match self.index.get(&key) {
            Some(&i) => self.categories[i].files.push(path.clone()),
            None => {
                self.index.insert(key.clone(), self.categories.len());
                self.categories.push(Category {
                    key,
                    files: vec![path.clone()],
                });
            }
        }

        self.records.insert(path, record);
    }

    /// Probe record of a file.
    pub fn record(&self, path: &Path) -> Option<&FileRecord> {
        self.records.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of categorized files.
    pub fn file_count(&self) -> usize {
        self.records.len()
    }
}

impl FromIterator<FileRecord> for Categories {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        let mut categories = Categories::new();
        for record in iter {
            categories.insert(record);
        }
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::{TrackKind, TrackRecord};

    fn track(id: u32, kind: TrackKind, language: &str, name: &str, codec: &str) -> TrackRecord {
        let mut t = TrackRecord::new(id, kind, codec);
        t.language = language.to_string();
        t.name = name.to_string();
        t
    }

    fn sample(path: &str) -> FileRecord {
        let mut record = FileRecord::new(path);
        record.push(track(0, TrackKind::Video, "und", "Old Title", "HEVC"));
        record.push(track(1, TrackKind::Audio, "ja", "Japanese", "FLAC"));
        record.push(track(2, TrackKind::Audio, "en", "English", "AC-3"));
        record.push(track(3, TrackKind::Subtitle, "en", "English", "SRT"));
        record
    }

    #[test]
    fn test_same_layout_same_key() {
        assert_eq!(category_key(&sample("/a.mkv")), category_key(&sample("/b.mkv")));
    }

    #[test]
    fn test_ignored_fields_do_not_split() {
        let a = sample("/a.mkv");
        let mut b = sample("/b.mkv");
        // Video name and codec are overwritten by every edit
        b.video[0].name = "Other Title".to_string();
        b.video[0].codec = "AVC".to_string();
        // Audio codec never influences a decision
        b.audio[0].codec = "Opus".to_string();
        assert_eq!(category_key(&a), category_key(&b));
    }

    #[test]
    fn test_decision_fields_split() {
        let a = sample("/a.mkv");

        let mut b = sample("/b.mkv");
        b.audio[1].default = true;
        assert_ne!(category_key(&a), category_key(&b));

        let mut c = sample("/c.mkv");
        c.audio[1].commentary = true;
        assert_ne!(category_key(&a), category_key(&c));

        let mut d = sample("/d.mkv");
        d.subtitles[0].codec = "PGS".to_string();
        assert_ne!(category_key(&a), category_key(&d));

        let mut e = sample("/e.mkv");
        e.subtitles[0].hearing_impaired = true;
        assert_ne!(category_key(&a), category_key(&e));

        let mut f = sample("/f.mkv");
        f.video[0].language = "ja".to_string();
        assert_ne!(category_key(&a), category_key(&f));
    }

    #[test]
    fn test_track_count_splits() {
        let a = sample("/a.mkv");
        let mut b = sample("/b.mkv");
        b.push(track(4, TrackKind::Subtitle, "de", "German", "SRT"));
        assert_ne!(category_key(&a), category_key(&b));
    }

    #[test]
    fn test_fields_do_not_run_together() {
        let mut a = FileRecord::new("/a.mkv");
        a.push(track(1, TrackKind::Video, "1en", "", ""));
        let mut b = FileRecord::new("/b.mkv");
        b.push(track(11, TrackKind::Video, "en", "", ""));
        assert_ne!(category_key(&a), category_key(&b));
    }

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let mut other = sample("/2.mkv");
        other.audio.pop();

        let categories: Categories =
            vec![sample("/1.mkv"), other, sample("/3.mkv"), sample("/0.mkv")]
                .into_iter()
                .collect();

        assert_eq!(categories.len(), 2);
        assert_eq!(categories.file_count(), 4);

        let groups: Vec<_> = categories.iter().collect();
        assert_eq!(
            groups[0].files,
            vec![
                PathBuf::from("/1.mkv"),
                PathBuf::from("/3.mkv"),
                PathBuf::from("/0.mkv")
            ]
        );
        assert_eq!(groups[1].files, vec![PathBuf::from("/2.mkv")]);
        assert_eq!(groups[0].representative(), &PathBuf::from("/1.mkv"));
        assert!(categories.record(Path::new("/2.mkv")).is_some());
    }
}

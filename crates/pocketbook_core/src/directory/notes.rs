//! Note directory keyed by note title.
//!
//! # Responsibility
//! - Own all note records and expose title lookup and removal.
//! - Answer content search, tag search and tag ordering queries.
//!
//! # Invariants
//! - Keys are unique; `add` with an existing title replaces the note silently.
//! - Iteration is in ascending title order.

use crate::model::field::normalize_tag;
use crate::model::note::Note;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// In-memory notebook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Note>", into = "Vec<Note>")]
pub struct NoteDirectory {
    records: BTreeMap<String, Note>,
}

impl From<Vec<Note>> for NoteDirectory {
    fn from(value: Vec<Note>) -> Self {
        let mut directory = Self::new();
        for note in value {
            directory.add(note);
        }
        directory
    }
}

impl From<NoteDirectory> for Vec<Note> {
    fn from(value: NoteDirectory) -> Self {
        value.records.into_values().collect()
    }
}

impl NoteDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `note`, replacing any note with the same title.
    pub fn add(&mut self, note: Note) {
        self.records.insert(note.title().to_string(), note);
    }

    pub fn find(&self, title: &str) -> Option<&Note> {
        self.records.get(title)
    }

    pub fn find_mut(&mut self, title: &str) -> Option<&mut Note> {
        self.records.get_mut(title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.records.contains_key(title)
    }

    /// Removes the note keyed by `title`. Returns whether one was removed.
    pub fn delete(&mut self, title: &str) -> bool {
        self.records.remove(title).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.records.values()
    }

    /// Notes whose title or content contains `query`, ignoring case.
    pub fn search_by_content(&self, query: &str) -> Vec<&Note> {
        let needle = query.to_lowercase();
        self.iter().filter(|note| note.matches(&needle)).collect()
    }

    /// Notes carrying a tag equal to `tag` after normalization.
    ///
    /// Exact match only; a blank tag matches nothing.
    pub fn search_by_tags(&self, tag: &str) -> Vec<&Note> {
        let Some(needle) = normalize_tag(tag) else {
            return Vec::new();
        };
        self.iter().filter(|note| note.has_tag(&needle)).collect()
    }

    /// All notes ordered by their tag lists compared lexicographically.
    ///
    /// Tags inside a note keep insertion order; untagged notes sort first.
    /// Ties keep directory order.
    pub fn sort_by_tags(&self) -> Vec<&Note> {
        let mut notes: Vec<&Note> = self.iter().collect();
        notes.sort_by(|left, right| left.tag_key().cmp(&right.tag_key()));
        notes
    }
}

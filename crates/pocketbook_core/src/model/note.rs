//! Note record model.
//!
//! # Responsibility
//! - Aggregate one note's title, content and ordered tag set.
//! - Track creation and modification timestamps.
//!
//! # Invariants
//! - `title` is non-empty and never changes after construction.
//! - Tags are unique by normalized value and keep insertion order.
//! - `modified_at` moves on content replacement, on a tag insertion that
//!   actually happened, and on every `remove_tag` call.

use crate::model::field::{validate_title, Field, Tag, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

const PREVIEW_CHARS: usize = 50;

/// Free-text note keyed by its title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NoteWire")]
pub struct Note {
    title: String,
    content: String,
    tags: Vec<Tag>,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

/// Deserialization shape; routed through `Note::from_parts` for validation.
#[derive(Deserialize)]
struct NoteWire {
    title: String,
    content: String,
    tags: Vec<Tag>,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl TryFrom<NoteWire> for Note {
    type Error = ValidationError;

    fn try_from(value: NoteWire) -> Result<Self, Self::Error> {
        Self::from_parts(
            value.title,
            value.content,
            value.tags,
            value.created_at,
            value.modified_at,
        )
    }
}

impl Note {
    /// Creates a note stamped with the current time.
    ///
    /// # Errors
    /// - Returns `ValidationError::Empty` when `title` is empty.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let now = Utc::now();
        Self::from_parts(title, content, Vec::new(), now, now)
    }

    /// Rebuilds a note from stored parts.
    ///
    /// Used by load/import paths where timestamps already exist. Duplicate
    /// tags are collapsed, first occurrence wins.
    pub fn from_parts(
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<Tag>,
        created_at: DateTime<Utc>,
        modified_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        validate_title(&title)?;
        let mut unique: Vec<Tag> = Vec::with_capacity(tags.len());
        for tag in tags {
            if !unique.contains(&tag) {
                unique.push(tag);
            }
        }
        Ok(Self {
            title,
            content: content.into(),
            tags: unique,
            created_at,
            modified_at,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Tags in the order they were added.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    /// Adds a tag unless an equal normalized tag is already present.
    ///
    /// Returns whether the tag was inserted. The modification time only moves
    /// on insertion.
    pub fn add_tag(&mut self, raw: &str) -> Result<bool, ValidationError> {
        let tag = Tag::parse(raw)?;
        if self.tags.contains(&tag) {
            return Ok(false);
        }
        self.tags.push(tag);
        self.touch();
        Ok(true)
    }

    /// Removes the tag equal to `value` lower-cased. `value` is not trimmed.
    ///
    /// Always refreshes the modification time, even when nothing matched.
    pub fn remove_tag(&mut self, value: &str) {
        let needle = value.to_lowercase();
        self.tags.retain(|tag| tag.as_str() != needle);
        self.touch();
    }

    /// Replaces the content and refreshes the modification time.
    pub fn update_content(&mut self, text: impl Into<String>) {
        self.content = text.into();
        self.touch();
    }

    pub(crate) fn has_tag(&self, normalized: &str) -> bool {
        self.tags.iter().any(|tag| tag.as_str() == normalized)
    }

    /// Case-insensitive substring match on title or content.
    ///
    /// `needle` must already be lower-cased.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }

    pub(crate) fn tag_key(&self) -> Vec<&str> {
        self.tags.iter().map(Tag::as_str).collect()
    }

    fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

impl Display for Note {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let preview: String = self.content.chars().take(PREVIEW_CHARS).collect();
        let ellipsis = if self.content.chars().count() > PREVIEW_CHARS {
            "..."
        } else {
            ""
        };
        write!(f, "{}: {preview}{ellipsis}", self.title)?;
        if !self.tags.is_empty() {
            let tags = self
                .tags
                .iter()
                .map(|tag| format!("#{tag}"))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, " | Tags: {tags}")?;
        }
        Ok(())
    }
}

//! The note record and the text helpers derived from its content.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title shown for a note whose first line is empty.
pub const FALLBACK_TITLE: &str = "New Note";

/// Preview shown when a note has no second non-blank line.
pub const EMPTY_PREVIEW: &str = "No additional text";

/// Represents a single note in our system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier for the note
    pub id: String,
    /// First line of the content; only ever written alongside `content`
    pub(crate) title: String,
    /// Free-form note text
    pub(crate) content: String,
    /// Folder the note currently lives in
    pub folder_id: String,
    /// When the note was created
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Last modification time
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_pinned: bool,
}

impl Note {
    /// Creates an empty, unpinned note in the given folder
    pub fn new(folder_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Note {
            id: generate_id("note", now),
            title: FALLBACK_TITLE.to_string(),
            content: String::new(),
            folder_id: folder_id.into(),
            created_at: now,
            updated_at: now,
            is_pinned: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replaces the content and recomputes the title from it.
    pub(crate) fn set_content(&mut self, content: String) {
        self.title = derive_title(&content);
        self.content = content;
    }

    /// Recomputes the title from the current content. Returns whether it changed.
    pub(crate) fn refresh_title(&mut self) -> bool {
        let title = derive_title(&self.content);
        if self.title == title {
            return false;
        }
        self.title = title;
        true
    }

    /// Second non-blank line of the content, used as a list subtitle.
    pub fn preview(&self) -> &str {
        self.content
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .nth(1)
            .unwrap_or(EMPTY_PREVIEW)
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Case-insensitive substring match against title or content.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }
}

/// The first line of `content`, or the fallback title when that line is empty.
pub fn derive_title(content: &str) -> String {
    match content.split('\n').next() {
        Some(line) if !line.is_empty() => line.to_string(),
        _ => FALLBACK_TITLE.to_string(),
    }
}

/// Builds an id of the form `<prefix>-<unix millis>-<9 hex chars>`.
pub(crate) fn generate_id(prefix: &str, now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", prefix, now.timestamp_millis(), &random[..9])
}

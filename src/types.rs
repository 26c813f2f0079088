//! Shared data structures for the folio application.
//!
//! This module contains the persisted state layout, the partial update used by
//! the store, operation outcomes, and the front end's subcommands.
use clap::Subcommand;
use serde::{Deserialize, Serialize};

use crate::{Folder, Note, NotesError};

/// A specialized Result type for folio operations.
pub type Result<T> = std::result::Result<T, NotesError>;

/// Id of the "All Notes" aggregate view.
pub const ALL_FOLDER_ID: &str = "all";
/// Id of the landing folder for new and restored notes.
pub const DEFAULT_FOLDER_ID: &str = "notes";
/// Id of the soft-delete holding folder.
pub const TRASH_FOLDER_ID: &str = "recently-deleted";

/// Everything that is mirrored to persistent storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredState {
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub folders: Vec<Folder>,
}

/// Fields of a note that callers may change. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteUpdate {
    pub content: Option<String>,
    pub folder_id: Option<String>,
    pub is_pinned: Option<bool>,
}

impl NoteUpdate {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn folder(folder_id: impl Into<String>) -> Self {
        Self {
            folder_id: Some(folder_id.into()),
            ..Self::default()
        }
    }

    pub fn pinned(is_pinned: bool) -> Self {
        Self {
            is_pinned: Some(is_pinned),
            ..Self::default()
        }
    }
}

/// What `delete_note` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The note was moved into the trash folder.
    MovedToTrash,
    /// The note was already in the trash and has been removed for good.
    Purged,
    /// No note has the given id.
    NotFound,
}

/// The filtered view split the way a note list presents it.
#[derive(Debug, Default)]
pub struct NoteSections<'a> {
    pub pinned: Vec<&'a Note>,
    pub others: Vec<&'a Note>,
}

/// Folders grouped for a sidebar.
#[derive(Debug, Default)]
pub struct FolderSections<'a> {
    /// System folders other than the trash, in stored order.
    pub system: Vec<&'a Folder>,
    /// User-created folders, in stored order.
    pub user: Vec<&'a Folder>,
    pub trash: Option<&'a Folder>,
}

/// Available subcommands for the folio front end
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new note
    New {
        /// Folder to create the note in (defaults to the landing folder)
        #[clap(short, long)]
        folder: Option<String>,

        /// Initial content; the first line becomes the title
        #[clap(short, long)]
        content: Option<String>,
    },

    /// Edit an existing note
    Edit {
        /// ID of the note to edit
        id: String,

        /// Replacement content
        #[clap(short, long)]
        content: Option<String>,

        /// Move the note to another folder
        #[clap(short, long)]
        folder: Option<String>,
    },

    /// List notes in a folder, pinned first
    List {
        /// Folder to list (defaults to all notes)
        #[clap(short, long)]
        folder: Option<String>,

        /// Case-insensitive text to look for in title or content
        #[clap(short, long)]
        search: Option<String>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// View a note by ID
    Show {
        /// ID of the note to view
        id: String,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Move a note to Recently Deleted, or remove it if it is already there
    Delete {
        /// ID of the note to delete
        id: String,
    },

    /// Move a note out of Recently Deleted
    Restore {
        /// ID of the note to restore
        id: String,
    },

    /// Pin or unpin a note
    Pin {
        /// ID of the note to toggle
        id: String,
    },

    /// List folders with their note counts
    Folders {
        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Create a folder
    CreateFolder {
        /// Display name of the folder
        name: String,

        /// Display glyph
        #[clap(short, long)]
        icon: Option<String>,
    },

    /// Delete a folder, moving its notes to the landing folder
    DeleteFolder {
        /// ID of the folder to delete
        id: String,
    },
}

//! Error types for the folio application.
//!
//! The note store itself treats unknown ids as silent no-ops, so most of these
//! variants surface from persistence, configuration, and the command-line
//! front end.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the folio application.
#[derive(Error, Debug)]
pub enum NotesError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Folder name was empty once trimmed.
    #[error("Invalid folder name: {name:?}")]
    InvalidFolderName { name: String },

    /// Note was not found when performing an operation.
    #[error("Note not found: {id}")]
    NoteNotFound { id: String },

    /// Folder was not found, or is a system folder the operation cannot touch.
    #[error("Folder not found: {id}")]
    FolderNotFound { id: String },

    /// Errors related to configuration.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },
}

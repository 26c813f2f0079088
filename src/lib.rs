//! Folder-based note-taking library
//!
//! This library keeps short text notes organized in folders, with pinning,
//! substring search, and a "Recently Deleted" folder for soft deletes. State is
//! held in a single `NoteStore` and mirrored to local storage after each change.

mod cli;
mod config;
mod errors;
mod folder;
mod note;
mod persistence;
mod store;
mod types;

// Re-export key components
pub use cli::*;
pub use config::*;
pub use errors::*;
pub use folder::*;
pub use note::*;
pub use persistence::*;
pub use store::*;
pub use types::*;

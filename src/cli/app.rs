//! CLI module for the folio application
//!
//! Each invocation opens the store once, applies a single command, and prints
//! the outcome. Saving happens inside the store.
use log::info;

use crate::{
    Commands, Config, DeleteOutcome, JsonFileStore, Note, NoteStore, NoteUpdate, NotesError,
    Result, ALL_FOLDER_ID,
};

/// CLI Application handler - processes CLI commands against a NoteStore
pub struct App {
    /// The note store, backed by the configured data file
    store: NoteStore<JsonFileStore>,

    /// Application configuration
    config: Config,
}

impl App {
    /// Open the store at the configured data file
    pub fn new(config: Config) -> Self {
        info!("Opening data file {}", config.data_file.display());
        let store = NoteStore::open(JsonFileStore::new(config.data_file.clone()));
        Self { store, config }
    }

    /// Run the CLI application with the given command
    pub fn run(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::New { folder, content } => self.create_note(folder, content)?,

            Commands::Edit {
                id,
                content,
                folder,
            } => self.edit_note(&id, content, folder)?,

            Commands::List {
                folder,
                search,
                json,
            } => self.list_notes(folder, search, json)?,

            Commands::Show { id, json } => self.show_note(&id, json)?,

            Commands::Delete { id } => match self.store.delete_note(&id) {
                DeleteOutcome::MovedToTrash => println!("Moved note {} to Recently Deleted", id),
                DeleteOutcome::Purged => println!("Permanently deleted note {}", id),
                DeleteOutcome::NotFound => return Err(NotesError::NoteNotFound { id }),
            },

            Commands::Restore { id } => {
                self.require_note(&id)?;
                if self.store.restore_note(&id) {
                    println!("Restored note {}", id);
                } else {
                    println!("Note {} is not in Recently Deleted", id);
                }
            }

            Commands::Pin { id } => match self.store.toggle_pin_note(&id) {
                Some(true) => println!("Pinned note {}", id),
                Some(false) => println!("Unpinned note {}", id),
                None => return Err(NotesError::NoteNotFound { id }),
            },

            Commands::Folders { json } => self.list_folders(json)?,

            Commands::CreateFolder { name, icon } => {
                let icon = icon.unwrap_or_else(|| self.config.default_folder_icon.clone());
                let folder = self.store.create_folder(&name, Some(&icon))?;
                println!("{}", folder.id);
            }

            Commands::DeleteFolder { id } => {
                if !self.store.delete_folder(&id) {
                    return Err(NotesError::FolderNotFound { id });
                }
                println!("Deleted folder {}", id);
            }
        }

        Ok(())
    }

    fn create_note(&mut self, folder: Option<String>, content: Option<String>) -> Result<()> {
        if let Some(folder_id) = &folder {
            self.require_folder(folder_id)?;
        }

        let note = self.store.create_note(folder.as_deref());
        if let Some(content) = content {
            self.store.update_note(&note.id, NoteUpdate::content(content));
        }

        println!("{}", note.id);
        Ok(())
    }

    fn edit_note(
        &mut self,
        id: &str,
        content: Option<String>,
        folder: Option<String>,
    ) -> Result<()> {
        self.require_note(id)?;
        if let Some(folder_id) = &folder {
            self.require_folder(folder_id)?;
        }

        let update = NoteUpdate {
            content,
            folder_id: folder,
            is_pinned: None,
        };
        if let Some(note) = self.store.update_note(id, update) {
            println!("Updated note {} ({})", note.id, note.title());
        }
        Ok(())
    }

    /// List notes in a folder, pinned first, then most recently updated
    fn list_notes(
        &mut self,
        folder: Option<String>,
        search: Option<String>,
        json: bool,
    ) -> Result<()> {
        let folder_id = folder.unwrap_or_else(|| ALL_FOLDER_ID.to_string());
        if self.store.folder(&folder_id).is_none() {
            return Err(NotesError::FolderNotFound { id: folder_id });
        }

        self.store.set_selected_folder(folder_id);
        self.store.set_search_query(search.unwrap_or_default());

        if json {
            let notes = self.store.filtered_notes();
            println!("{}", serde_json::to_string_pretty(&notes)?);
            return Ok(());
        }

        let sections = self.store.note_sections();
        if sections.pinned.is_empty() && sections.others.is_empty() {
            println!("No notes");
            return Ok(());
        }

        if !sections.pinned.is_empty() {
            println!("Pinned");
            for note in &sections.pinned {
                print_note_line(note);
            }
        }
        if !sections.others.is_empty() {
            if !sections.pinned.is_empty() {
                println!("Notes");
            }
            for note in &sections.others {
                print_note_line(note);
            }
        }
        Ok(())
    }

    fn show_note(&self, id: &str, json: bool) -> Result<()> {
        let note = self.require_note(id)?;

        if json {
            println!("{}", serde_json::to_string_pretty(note)?);
            return Ok(());
        }

        let folder = self
            .store
            .folder(&note.folder_id)
            .map(|f| f.name.as_str())
            .unwrap_or(note.folder_id.as_str());

        println!("{}", note.title());
        println!("Folder:  {}", folder);
        println!("Created: {}", note.created_at.format("%Y-%m-%d %H:%M:%S"));
        println!("Updated: {}", note.updated_at.format("%Y-%m-%d %H:%M:%S"));
        println!("{} words, {} characters", note.word_count(), note.char_count());
        if note.is_pinned {
            println!("Pinned");
        }
        println!();
        println!("{}", note.content());
        Ok(())
    }

    fn list_folders(&self, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(self.store.folders())?);
            return Ok(());
        }

        let sections = self.store.folder_sections();
        let rows = sections
            .system
            .iter()
            .chain(sections.user.iter())
            .chain(sections.trash.iter());
        for folder in rows {
            println!(
                "{} {} ({})  [{}]",
                folder.icon,
                folder.name,
                self.store.folder_note_count(&folder.id),
                folder.id
            );
        }
        Ok(())
    }

    fn require_note(&self, id: &str) -> Result<&Note> {
        self.store.note(id).ok_or_else(|| NotesError::NoteNotFound { id: id.to_string() })
    }

    fn require_folder(&self, id: &str) -> Result<()> {
        match self.store.folder(id) {
            Some(folder) if folder.id != ALL_FOLDER_ID => Ok(()),
            _ => Err(NotesError::FolderNotFound { id: id.to_string() }),
        }
    }
}

fn print_note_line(note: &Note) {
    let marker = if note.is_pinned { "*" } else { " " };
    println!("{} {}  {}  [{}]", marker, note.title(), note.preview(), note.id);
}

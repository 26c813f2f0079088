//! The note/folder state manager.
//!
//! `NoteStore` owns the canonical notes and folders, the current selection and
//! search text, and decides when the persistence collaborator is asked to save.
use std::collections::HashSet;

use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info, trace, warn};

use crate::{
    default_folders, is_reserved_folder_id, DeleteOutcome, Folder, FolderSections, Note,
    NoteSections, NoteUpdate, NotesError, Persistence, Result, StoredState, ALL_FOLDER_ID,
    DEFAULT_FOLDER_ICON, DEFAULT_FOLDER_ID, TRASH_FOLDER_ID,
};

/// Manages notes and folders and mirrors every change to persistence.
pub struct NoteStore<P: Persistence> {
    /// Where state is loaded from and saved to
    persistence: P,

    /// All notes, newest first in insertion order
    notes: Vec<Note>,

    /// All folders, trash always last
    folders: Vec<Folder>,

    selected_folder_id: String,
    selected_note_id: Option<String>,
    search_query: String,

    /// Last timestamp handed out, so mutations never share a time
    last_stamp: Option<DateTime<Utc>>,
}

impl<P: Persistence> NoteStore<P> {
    /// Creates a store and performs its single load.
    ///
    /// When nothing is stored yet (or the stored data is unreadable) the store
    /// starts with no notes and the three system folders. Nothing is saved
    /// until the first mutation.
    pub fn open(persistence: P) -> Self {
        let (notes, folders) = match persistence.load() {
            Some(state) => {
                info!(
                    "Loaded {} notes and {} folders",
                    state.notes.len(),
                    state.folders.len()
                );
                repair(state.notes, state.folders)
            }
            None => {
                info!("No stored state, starting with default folders");
                (Vec::new(), default_folders())
            }
        };

        let last_stamp = notes.iter().map(|note| note.updated_at).max();

        Self {
            persistence,
            notes,
            folders,
            selected_folder_id: ALL_FOLDER_ID.to_string(),
            selected_note_id: None,
            search_query: String::new(),
            last_stamp,
        }
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// All notes in stored order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|folder| folder.id == id)
    }

    pub fn selected_folder_id(&self) -> &str {
        &self.selected_folder_id
    }

    pub fn selected_note_id(&self) -> Option<&str> {
        self.selected_note_id.as_deref()
    }

    /// The selected note, if it still exists.
    pub fn selected_note(&self) -> Option<&Note> {
        self.selected_note_id.as_deref().and_then(|id| self.note(id))
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_selected_folder(&mut self, folder_id: impl Into<String>) {
        self.selected_folder_id = folder_id.into();
        trace!("Selected folder: {}", self.selected_folder_id);
    }

    pub fn set_selected_note(&mut self, note_id: Option<String>) {
        self.selected_note_id = note_id;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Creates an empty note at the front of the collection and selects it.
    ///
    /// Without an explicit folder the note goes into the selected folder; the
    /// "All Notes" and "Recently Deleted" views land it in the default folder.
    pub fn create_note(&mut self, folder_id: Option<&str>) -> Note {
        let explicit = folder_id.filter(|id| self.is_assignable(id));
        if let Some(id) = folder_id.filter(|_| explicit.is_none()) {
            warn!("Cannot create note in folder {}, using context instead", id);
        }

        let target = match explicit {
            Some(id) => id.to_string(),
            None => match self.selected_folder_id.as_str() {
                ALL_FOLDER_ID | TRASH_FOLDER_ID => DEFAULT_FOLDER_ID.to_string(),
                id if self.is_assignable(id) => id.to_string(),
                _ => DEFAULT_FOLDER_ID.to_string(),
            },
        };

        let now = self.stamp();
        let note = Note::new(target, now);
        self.notes.insert(0, note.clone());
        self.selected_note_id = Some(note.id.clone());

        info!("Created note {} in folder {}", note.id, note.folder_id);
        self.persist();
        note
    }

    /// Applies `update` to the note and refreshes its `updated_at`.
    ///
    /// The title is always recomputed from the content. A target folder that
    /// does not exist, or the "All Notes" view, leaves the folder unchanged.
    /// Returns `None` when no note has `id`.
    pub fn update_note(&mut self, id: &str, update: NoteUpdate) -> Option<&Note> {
        let index = self.index_of(id)?;

        let folder_id = update.folder_id.filter(|folder_id| {
            let ok = self.is_assignable(folder_id);
            if !ok {
                warn!("Ignoring move of note {} to unknown folder {}", id, folder_id);
            }
            ok
        });

        let now = self.stamp();
        let note = &mut self.notes[index];
        match update.content {
            Some(content) => note.set_content(content),
            None => {
                note.refresh_title();
            }
        }
        if let Some(folder_id) = folder_id {
            note.folder_id = folder_id;
        }
        if let Some(is_pinned) = update.is_pinned {
            note.is_pinned = is_pinned;
        }
        note.updated_at = now;

        debug!("Updated note {}", id);
        self.persist();
        self.notes.get(index)
    }

    /// Moves a note to the trash, or removes it for good if it is already there.
    pub fn delete_note(&mut self, id: &str) -> DeleteOutcome {
        let Some(index) = self.index_of(id) else {
            debug!("Delete ignored, note not found: {}", id);
            return DeleteOutcome::NotFound;
        };

        let outcome = if self.notes[index].folder_id == TRASH_FOLDER_ID {
            self.notes.remove(index);
            info!("Permanently deleted note {}", id);
            DeleteOutcome::Purged
        } else {
            let now = self.stamp();
            let note = &mut self.notes[index];
            note.folder_id = TRASH_FOLDER_ID.to_string();
            note.updated_at = now;
            info!("Moved note {} to Recently Deleted", id);
            DeleteOutcome::MovedToTrash
        };

        if self.selected_note_id.as_deref() == Some(id) {
            self.selected_note_id = None;
        }

        self.persist();
        outcome
    }

    /// Moves a trashed note back into the default folder.
    pub fn restore_note(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if self.notes[index].folder_id != TRASH_FOLDER_ID {
            debug!("Restore ignored, note {} is not in the trash", id);
            return false;
        }

        let now = self.stamp();
        let note = &mut self.notes[index];
        note.folder_id = DEFAULT_FOLDER_ID.to_string();
        note.updated_at = now;

        info!("Restored note {}", id);
        self.persist();
        true
    }

    /// Flips the pin flag. Returns the new value, or `None` for an unknown id.
    pub fn toggle_pin_note(&mut self, id: &str) -> Option<bool> {
        let index = self.index_of(id)?;

        let now = self.stamp();
        let note = &mut self.notes[index];
        note.is_pinned = !note.is_pinned;
        note.updated_at = now;
        let pinned = note.is_pinned;

        debug!("Note {} pinned: {}", id, pinned);
        self.persist();
        Some(pinned)
    }

    /// Adds a user folder just before "Recently Deleted".
    pub fn create_folder(&mut self, name: &str, icon: Option<&str>) -> Result<Folder> {
        let name = name.trim();
        if name.is_empty() {
            return Err(NotesError::InvalidFolderName {
                name: name.to_string(),
            });
        }

        let now = self.stamp();
        let folder = Folder::new(name, icon.unwrap_or(DEFAULT_FOLDER_ICON), now);

        // The trash is always last; repair() guarantees it is present.
        let at = self
            .folders
            .iter()
            .position(Folder::is_trash)
            .unwrap_or(self.folders.len());
        self.folders.insert(at, folder.clone());

        info!("Created folder {} ({})", folder.id, folder.name);
        self.persist();
        Ok(folder)
    }

    /// Deletes a user folder, moving its notes to the default folder first.
    ///
    /// System folders and unknown ids are left alone and yield `false`.
    pub fn delete_folder(&mut self, id: &str) -> bool {
        match self.folder(id) {
            Some(folder) if !folder.is_protected() => {}
            Some(_) => {
                warn!("Refusing to delete system folder {}", id);
                return false;
            }
            None => return false,
        }

        let now = self.stamp();
        let mut moved = 0;
        for note in self.notes.iter_mut().filter(|note| note.folder_id == id) {
            note.folder_id = DEFAULT_FOLDER_ID.to_string();
            note.updated_at = now;
            moved += 1;
        }
        self.folders.retain(|folder| folder.id != id);

        if self.selected_folder_id == id {
            self.selected_folder_id = ALL_FOLDER_ID.to_string();
        }

        info!("Deleted folder {}, moved {} notes to Notes", id, moved);
        self.persist();
        true
    }

    /// Notes for the selected folder and current search text.
    pub fn filtered_notes(&self) -> Vec<&Note> {
        self.notes_in_view(&self.selected_folder_id, &self.search_query)
    }

    /// Notes in `folder_id` matching `query`, pinned first, then most recently
    /// updated first.
    pub fn notes_in_view(&self, folder_id: &str, query: &str) -> Vec<&Note> {
        let needle = query.trim().to_lowercase();

        let mut view: Vec<&Note> = self
            .notes
            .iter()
            .filter(|note| match folder_id {
                ALL_FOLDER_ID => note.folder_id != TRASH_FOLDER_ID,
                id => note.folder_id == id,
            })
            .filter(|note| needle.is_empty() || note.matches(&needle))
            .collect();

        view.sort_by(|a, b| {
            b.is_pinned
                .cmp(&a.is_pinned)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
        });
        view
    }

    /// The filtered view split into pinned and other notes.
    pub fn note_sections(&self) -> NoteSections<'_> {
        let (pinned, others): (Vec<&Note>, Vec<&Note>) = self
            .filtered_notes()
            .into_iter()
            .partition(|note| note.is_pinned);
        NoteSections { pinned, others }
    }

    /// Folders grouped the way a sidebar lists them.
    pub fn folder_sections(&self) -> FolderSections<'_> {
        let mut sections = FolderSections::default();
        for folder in &self.folders {
            if folder.is_trash() {
                sections.trash = Some(folder);
            } else if folder.is_system {
                sections.system.push(folder);
            } else {
                sections.user.push(folder);
            }
        }
        sections
    }

    /// Number of notes shown for a folder; "All Notes" excludes the trash.
    pub fn folder_note_count(&self, folder_id: &str) -> usize {
        match folder_id {
            ALL_FOLDER_ID => self
                .notes
                .iter()
                .filter(|note| note.folder_id != TRASH_FOLDER_ID)
                .count(),
            id => self.notes.iter().filter(|note| note.folder_id == id).count(),
        }
    }

    /// Copy of everything that gets persisted.
    pub fn snapshot(&self) -> StoredState {
        StoredState {
            notes: self.notes.clone(),
            folders: self.folders.clone(),
        }
    }

    fn persist(&self) {
        self.persistence.save(&self.snapshot());
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }

    /// Whether a note may live in `folder_id`.
    fn is_assignable(&self, folder_id: &str) -> bool {
        folder_id != ALL_FOLDER_ID && self.folder(folder_id).is_some()
    }

    /// Current time at millisecond precision, strictly after the previous stamp.
    fn stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let now = DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + TimeDelta::milliseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }
}

/// Restores the folder and note invariants on freshly loaded data.
fn repair(mut notes: Vec<Note>, mut folders: Vec<Folder>) -> (Vec<Note>, Vec<Folder>) {
    let mut seen = HashSet::new();
    folders.retain(|folder| {
        let first = seen.insert(folder.id.clone());
        if !first {
            warn!("Dropping duplicate folder {}", folder.id);
        }
        first
    });

    for folder in folders.iter_mut() {
        if is_reserved_folder_id(&folder.id) && !folder.is_system {
            warn!("Folder {} is built in, marking it as a system folder", folder.id);
            folder.is_system = true;
        }
    }

    if folders.is_empty() {
        warn!("Stored folder list is empty, using default folders");
        folders = default_folders();
    }

    if !folders.iter().any(|f| f.id == DEFAULT_FOLDER_ID) {
        warn!("Stored folders lack the default folder, adding it");
        folders.insert(0, Folder::default_notes());
    }
    if !folders.iter().any(|f| f.id == ALL_FOLDER_ID) {
        warn!("Stored folders lack the All Notes view, adding it");
        folders.insert(0, Folder::all_notes());
    }

    let trash = match folders.iter().position(Folder::is_trash) {
        Some(index) => folders.remove(index),
        None => {
            warn!("Stored folders lack Recently Deleted, adding it");
            Folder::recently_deleted()
        }
    };
    folders.push(trash);

    for note in &mut notes {
        let known = note.folder_id != ALL_FOLDER_ID
            && folders.iter().any(|folder| folder.id == note.folder_id);
        if !known {
            warn!(
                "Note {} refers to missing folder {}, moving it to Notes",
                note.id, note.folder_id
            );
            note.folder_id = DEFAULT_FOLDER_ID.to_string();
        }

        if note.refresh_title() {
            warn!("Note {} had a stale title, recomputed it", note.id);
        }
    }

    (notes, folders)
}

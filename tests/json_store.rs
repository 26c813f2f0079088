use folio::{
    DeleteOutcome, JsonFileStore, NoteStore, NoteUpdate, Persistence, ALL_FOLDER_ID,
    DEFAULT_FOLDER_ID, TRASH_FOLDER_ID,
};
use tempfile::tempdir;

#[test]
fn state_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.json");

    let (kept, trashed, work_id) = {
        let mut store = NoteStore::open(JsonFileStore::new(&path));
        let work = store.create_folder("Work", Some("💼")).unwrap();
        let kept = store.create_note(Some(&work.id)).id;
        store.update_note(&kept, NoteUpdate::content("Standup\n10am"));
        store.toggle_pin_note(&kept);
        let trashed = store.create_note(None).id;
        assert_eq!(store.delete_note(&trashed), DeleteOutcome::MovedToTrash);
        (kept, trashed, work.id)
    };

    let store = NoteStore::open(JsonFileStore::new(&path));
    let note = store.note(&kept).unwrap();
    assert_eq!(note.title(), "Standup");
    assert_eq!(note.content(), "Standup\n10am");
    assert!(note.is_pinned);
    assert_eq!(note.folder_id, work_id);
    assert_eq!(store.note(&trashed).unwrap().folder_id, TRASH_FOLDER_ID);
    assert_eq!(store.folder_note_count(ALL_FOLDER_ID), 1);
    assert_eq!(store.folders().last().map(|f| f.id.as_str()), Some(TRASH_FOLDER_ID));
}

#[test]
fn reads_camel_case_documents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.json");
    std::fs::write(
        &path,
        r#"{
          "notes": [{
            "id": "note-1", "title": "Groceries", "content": "Groceries\nMilk, eggs",
            "folderId": "notes", "createdAt": 1700000000000, "updatedAt": 1700000000000,
            "isPinned": false
          }],
          "folders": [
            {"id": "all", "name": "All Notes", "icon": "📝", "isSystem": true},
            {"id": "notes", "name": "Notes", "icon": "📁", "isSystem": true},
            {"id": "recently-deleted", "name": "Recently Deleted", "icon": "🗑️", "isSystem": true}
          ]
        }"#,
    )
    .unwrap();

    let store = NoteStore::open(JsonFileStore::new(&path));
    assert_eq!(store.folder_note_count(DEFAULT_FOLDER_ID), 1);
    assert_eq!(store.notes_in_view(ALL_FOLDER_ID, "MILK").len(), 1);

    let raw = JsonFileStore::new(&path).load().unwrap();
    assert_eq!(raw.notes[0].updated_at.timestamp_millis(), 1_700_000_000_000);
}

//! Folder records and the built-in system folders.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::note::generate_id;
use crate::{ALL_FOLDER_ID, DEFAULT_FOLDER_ID, TRASH_FOLDER_ID};

/// Icon given to user folders created without one.
pub const DEFAULT_FOLDER_ICON: &str = "📁";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub icon: String,
    /// Built-in folders cannot be renamed or deleted
    #[serde(default)]
    pub is_system: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Folder {
    /// Creates a user folder with a fresh id.
    pub fn new(name: impl Into<String>, icon: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: generate_id("folder", now),
            name: name.into(),
            icon: icon.into(),
            is_system: false,
            color: None,
        }
    }

    fn system(id: &str, name: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            is_system: true,
            color: None,
        }
    }

    pub fn all_notes() -> Self {
        Self::system(ALL_FOLDER_ID, "All Notes", "📝")
    }

    pub fn default_notes() -> Self {
        Self::system(DEFAULT_FOLDER_ID, "Notes", DEFAULT_FOLDER_ICON)
    }

    pub fn recently_deleted() -> Self {
        Self::system(TRASH_FOLDER_ID, "Recently Deleted", "🗑️")
    }

    pub fn is_trash(&self) -> bool {
        self.id == TRASH_FOLDER_ID
    }

    /// System folders, and anything carrying a reserved id, cannot be deleted.
    pub fn is_protected(&self) -> bool {
        self.is_system || is_reserved_folder_id(&self.id)
    }
}

/// Whether `id` belongs to one of the built-in folders.
pub fn is_reserved_folder_id(id: &str) -> bool {
    matches!(id, ALL_FOLDER_ID | DEFAULT_FOLDER_ID | TRASH_FOLDER_ID)
}

/// The three system folders in display order, trash last.
pub fn default_folders() -> Vec<Folder> {
    vec![
        Folder::all_notes(),
        Folder::default_notes(),
        Folder::recently_deleted(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_folders_end_with_trash() {
        let folders = default_folders();
        let ids: Vec<_> = folders.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, [ALL_FOLDER_ID, DEFAULT_FOLDER_ID, TRASH_FOLDER_ID]);
        assert!(folders.iter().all(|f| f.is_system));
        assert!(folders[2].is_trash());
    }

    #[test]
    fn user_folder_is_not_system() {
        let folder = Folder::new("Work", "💼", Utc::now());
        assert!(folder.id.starts_with("folder-"));
        assert!(!folder.is_system);
        assert_eq!(folder.icon, "💼");
    }

    #[test]
    fn reserved_ids_are_protected_without_system_flag() {
        for mut folder in default_folders() {
            folder.is_system = false;
            assert!(folder.is_protected(), "{} should be protected", folder.id);
        }
        assert!(!Folder::new("Work", "💼", Utc::now()).is_protected());
    }

    #[test]
    fn color_is_optional_on_disk() {
        let json = r#"{"id":"f","name":"Work","icon":"💼","isSystem":false}"#;
        let folder: Folder = serde_json::from_str(json).unwrap();
        assert_eq!(folder.color, None);

        let out = serde_json::to_value(&folder).unwrap();
        assert!(out.get("color").is_none());
        assert_eq!(out["isSystem"], false);
    }
}

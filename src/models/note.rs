use std::path::{Path, PathBuf};

use super::{NoteId, TitleEntry};

/// A single zet: one directory holding one markdown document.
///
/// The title is derived from the document's first line and is only as fresh
/// as the last read. The path is derived from the repository root and the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    id: NoteId,
    title: String,
    path: PathBuf,
}

impl Note {
    /// Creates a note handle.
    pub fn new(id: NoteId, title: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            title: title.into(),
            path: path.into(),
        }
    }

    pub fn id(&self) -> &NoteId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replaces the cached title, e.g. after the document was edited.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Directory containing the note's document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Converts the note into its listing form.
    pub fn to_entry(&self) -> TitleEntry {
        TitleEntry::new(self.id.clone(), self.title.clone())
    }
}

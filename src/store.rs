//! Filesystem-backed note storage.
//!
//! A repository is a directory of note directories, each named by a
//! [`NoteId`] and holding a single `README.md`. All paths are joined onto the
//! repository root; the process working directory is never consulted.

use std::fs::{self, DirBuilder, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use crate::{Note, NoteId, ZetError, index};

/// File name of every note's document.
pub const README: &str = "README.md";

/// Sentinel token resolving to the most recently modified note.
pub const LAST: &str = "last";

/// Notes stored under a single repository root.
#[derive(Debug, Clone)]
pub struct NoteStore {
    root: PathBuf,
}

impl NoteStore {
    /// Opens the store rooted at `root`. The directory is not created.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Opens the store rooted at `root`, made absolute against the current
    /// directory.
    ///
    /// Child processes run with the root as their working directory, so
    /// paths handed to them must not be relative to the caller's directory.
    ///
    /// # Errors
    ///
    /// Returns [`ZetError::Io`] if the current directory cannot be read.
    pub fn open(root: &Path) -> Result<Self, ZetError> {
        let root = std::path::absolute(root).map_err(|e| ZetError::io(root, e))?;
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of the note with the given id.
    pub fn note_path(&self, id: &NoteId) -> PathBuf {
        self.root.join(id.as_str())
    }

    /// Path of the note's markdown document.
    pub fn readme_path(&self, id: &NoteId) -> PathBuf {
        readme_in(&self.note_path(id))
    }

    /// Creates the note directory, including missing parents.
    ///
    /// # Errors
    ///
    /// Returns [`ZetError::Io`] if the directory cannot be created, for
    /// example when a regular file already occupies the path.
    pub fn create_note(&self, id: &NoteId) -> Result<PathBuf, ZetError> {
        let path = self.note_path(id);
        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o755);
        }
        builder
            .create(&path)
            .map_err(|e| ZetError::io(&path, e))?;
        debug!(path = %path.display(), "created zet directory");
        Ok(path)
    }

    /// Writes the initial `# <title>` document into a freshly created note.
    ///
    /// Never overwrites: if a document already exists (two notes created in
    /// the same second) this fails with [`ZetError::NoteExists`].
    pub fn write_initial_document(&self, path: &Path, title: &str) -> Result<PathBuf, ZetError> {
        let readme = readme_in(path);
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o664);
        }
        let mut file = options.open(&readme).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => ZetError::NoteExists(readme.clone()),
            _ => ZetError::io(&readme, e),
        })?;
        file.write_all(format!("# {title}\n\n").as_bytes())
            .map_err(|e| ZetError::io(&readme, e))?;
        Ok(readme)
    }

    /// Enumerates every conforming note directory.
    ///
    /// Entries whose names are not identifiers (`.git`, stray folders) and
    /// plain files are skipped. Order is whatever the filesystem returns.
    pub fn list_notes(&self) -> Result<Vec<NoteId>, ZetError> {
        Ok(self
            .scan()?
            .into_iter()
            .map(|(id, _)| id)
            .collect())
    }

    /// Returns the note whose directory was modified most recently.
    ///
    /// When modification times are exactly equal the entry seen later in the
    /// scan wins, so the result under a true tie depends on enumeration order.
    ///
    /// # Errors
    ///
    /// Returns [`ZetError::NotFound`] if the repository has no notes.
    pub fn most_recent_note(&self) -> Result<NoteId, ZetError> {
        let mut newest: Option<(NoteId, SystemTime)> = None;
        for (id, path) in self.scan()? {
            let modified = fs::metadata(&path)
                .and_then(|m| m.modified())
                .map_err(|e| ZetError::io(&path, e))?;
            if newest.as_ref().is_none_or(|(_, t)| modified >= *t) {
                newest = Some((id, modified));
            }
        }
        newest
            .map(|(id, _)| id)
            .ok_or_else(|| ZetError::NotFound(format!("no zets in {}", self.root.display())))
    }

    /// Resolves a user-supplied token to a note id.
    ///
    /// `last` resolves to [`Self::most_recent_note`]; a conforming identifier
    /// is returned as-is without checking that the note exists.
    pub fn resolve_note(&self, token: &str) -> Result<NoteId, ZetError> {
        if token == LAST {
            return self.most_recent_note();
        }
        token.parse()
    }

    /// Loads a note handle with its current title.
    ///
    /// A missing or unreadable document yields an empty title.
    pub fn load(&self, id: &NoteId) -> Note {
        let path = self.note_path(id);
        let title = index::extract_title(&path);
        Note::new(id.clone(), title, path)
    }

    /// Reads the whole markdown document of a note.
    pub fn read_document(&self, id: &NoteId) -> Result<String, ZetError> {
        let readme = self.readme_path(id);
        fs::read_to_string(&readme).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ZetError::NotFound(format!("zet {id} has no {README}")),
            _ => ZetError::io(&readme, e),
        })
    }

    fn scan(&self) -> Result<Vec<(NoteId, PathBuf)>, ZetError> {
        let entries = fs::read_dir(&self.root).map_err(|e| ZetError::io(&self.root, e))?;
        let mut notes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ZetError::io(&self.root, e))?;
            let Some(id) = entry.file_name().to_str().and_then(NoteId::parse) else {
                continue;
            };
            let is_dir = entry
                .file_type()
                .map_err(|e| ZetError::io(entry.path(), e))?
                .is_dir();
            if is_dir {
                notes.push((id, entry.path()));
            }
        }
        Ok(notes)
    }
}

/// Path of the document inside a note directory.
pub fn readme_in(note_path: &Path) -> PathBuf {
    note_path.join(README)
}

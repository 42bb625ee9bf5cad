use serde::{Deserialize, Serialize};
use std::fmt;

use super::NoteId;

/// Transient `(id, title)` pair produced by scanning a note.
///
/// Lives only for one command invocation; listings print it as
/// `<id> <title>` or serialize it as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleEntry {
    pub id: NoteId,
    pub title: String,
}

impl TitleEntry {
    pub fn new(id: NoteId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

impl fmt::Display for TitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.title)
    }
}

/// A search result offered in an interactive pick list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub entry: TitleEntry,
}

impl Selection {
    /// Numbers entries from zero in discovery order.
    pub fn enumerate(entries: Vec<TitleEntry>) -> Vec<Selection> {
        entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| Selection { index, entry })
            .collect()
    }

    /// Finds the selection matching the user's reply.
    ///
    /// Returns `None` for a reply that is not a number or is out of range.
    pub fn pick<'a>(choices: &'a [Selection], reply: &str) -> Option<&'a Selection> {
        let index: usize = reply.trim().parse().ok()?;
        choices.iter().find(|s| s.index == index)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}) {}", self.index, self.entry)
    }
}

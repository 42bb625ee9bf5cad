//! Ephemeral title and tag index.
//!
//! Nothing here is cached: every command re-reads the documents it needs.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::store::{NoteStore, readme_in};
use crate::{NoteId, TitleEntry, ZetError};

/// Reads a note's title from the first line of its document.
///
/// Every `#` is removed and surrounding whitespace trimmed. A document that
/// cannot be opened or is empty has the empty title, which keeps listings
/// working while a note is half written.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use zet::index::extract_title;
///
/// let title = extract_title(Path::new("/home/me/zet/20220424000235"));
/// println!("{title}");
/// ```
pub fn extract_title(note_path: &Path) -> String {
    let readme = readme_in(note_path);
    let file = match File::open(&readme) {
        Ok(f) => f,
        Err(e) => {
            debug!(path = %readme.display(), error = %e, "no readable title");
            return String::new();
        }
    };

    let mut first = Vec::new();
    if let Err(e) = BufReader::new(file).read_until(b'\n', &mut first) {
        debug!(path = %readme.display(), error = %e, "failed to read title line");
        return String::new();
    }
    title_from_line(&String::from_utf8_lossy(&first))
}

fn title_from_line(line: &str) -> String {
    line.replace('#', "").trim().to_string()
}

/// Compiles the pattern for `tag`.
///
/// The tag text is matched literally, its last character may repeat, and the
/// match may sit anywhere in a line: `#go` matches `#go`, `#goo`, and `#golang`.
fn tag_pattern(tag: &str) -> Result<Regex, ZetError> {
    let pattern = format!("#{}+", regex::escape(tag));
    Regex::new(&pattern).map_err(|e| ZetError::Usage(format!("invalid tag {tag:?}: {e}")))
}

/// Returns true if any line of the note's document contains `#<tag>`.
///
/// An unreadable document contains no tags. Lines that are not valid UTF-8
/// are decoded lossily and still searched.
pub fn contains_tag(note_path: &Path, tag: &str) -> bool {
    tag_pattern(tag).is_ok_and(|pattern| matches_tag(note_path, &pattern))
}

fn matches_tag(note_path: &Path, pattern: &Regex) -> bool {
    let readme = readme_in(note_path);
    let file = match File::open(&readme) {
        Ok(f) => f,
        Err(e) => {
            debug!(path = %readme.display(), error = %e, "skipping unreadable zet");
            return false;
        }
    };

    BufReader::new(file)
        .split(b'\n')
        .map_while(|line| match line {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                debug!(path = %readme.display(), error = %e, "stopped reading zet");
                None
            }
        })
        .any(|bytes| pattern.is_match(&String::from_utf8_lossy(&bytes)))
}

/// Builds title entries for `ids`, preserving their order.
pub fn find_titles(store: &NoteStore, ids: &[NoteId]) -> Vec<TitleEntry> {
    ids.iter()
        .map(|id| TitleEntry::new(id.clone(), extract_title(&store.note_path(id))))
        .collect()
}

/// Filters entries whose title contains `query`, ignoring case.
///
/// Input order is preserved; there is no ranking.
pub fn search_titles(query: &str, entries: &[TitleEntry]) -> Vec<TitleEntry> {
    let query = query.to_lowercase();
    entries
        .iter()
        .filter(|e| e.title.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

/// Returns title entries for every note whose body carries the tag.
///
/// Enumeration order is preserved.
pub fn search_tags(
    query: &str,
    store: &NoteStore,
    ids: &[NoteId],
) -> Result<Vec<TitleEntry>, ZetError> {
    let pattern = tag_pattern(query)?;
    Ok(ids
        .iter()
        .filter_map(|id| {
            let path = store.note_path(id);
            matches_tag(&path, &pattern)
                .then(|| TitleEntry::new(id.clone(), extract_title(&path)))
        })
        .collect())
}

mod ids;
mod note;
mod title_entry;

pub use ids::{MIN_ID_DIGITS, NoteId};
pub use note::Note;
pub use title_entry::{Selection, TitleEntry};

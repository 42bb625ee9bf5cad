use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::ZetError;

/// Minimum number of digits in a note identifier.
pub const MIN_ID_DIGITS: usize = 14;

/// Unique identifier for a note, also its directory name.
///
/// An identifier is an "isosec": the UTC creation time formatted as
/// `YYYYMMDDHHMMSS`. Any string of at least 14 ASCII digits is accepted
/// when parsing so longer, hand-made identifiers keep working.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteId(String);

impl NoteId {
    /// Returns true if `candidate` matches `^[0-9]{14,}$`.
    pub fn is_valid(candidate: &str) -> bool {
        candidate.len() >= MIN_ID_DIGITS && candidate.bytes().all(|b| b.is_ascii_digit())
    }

    /// Parses an identifier, returning `None` for non-conforming input.
    pub fn parse(candidate: &str) -> Option<Self> {
        Self::is_valid(candidate).then(|| Self(candidate.to_string()))
    }

    /// Creates an identifier from the current UTC wall-clock time.
    ///
    /// Two calls within the same second return equal identifiers.
    pub fn now() -> Result<Self, ZetError> {
        Self::from_datetime(OffsetDateTime::now_utc())
    }

    /// Creates an identifier for the given instant, converted to UTC.
    ///
    /// # Examples
    ///
    /// ```
    /// use time::macros::datetime;
    /// use zet::NoteId;
    ///
    /// let id = NoteId::from_datetime(datetime!(2022-04-24 0:02:35 UTC)).unwrap();
    /// assert_eq!(id.as_str(), "20220424000235");
    /// ```
    pub fn from_datetime(at: OffsetDateTime) -> Result<Self, ZetError> {
        let format = format_description!("[year][month][day][hour][minute][second]");
        let formatted = at.to_offset(time::UtcOffset::UTC).format(format)?;
        Ok(Self(formatted))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NoteId {
    type Err = ZetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ZetError::InvalidReference(s.to_string()))
    }
}

impl TryFrom<String> for NoteId {
    type Error = ZetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NoteId> for String {
    fn from(id: NoteId) -> Self {
        id.0
    }
}

impl AsRef<str> for NoteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

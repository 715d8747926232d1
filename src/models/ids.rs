use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a note.
///
/// Derived from the creation time in milliseconds since the Unix epoch.
/// Serialized as a bare JSON number so stored documents stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(i64);

impl NoteId {
    /// Creates a new note ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the underlying ID value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_id_serializes_as_raw_integer() {
        let id = NoteId::new(1_700_000_000_123);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "1700000000123");

        let deserialized: NoteId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn note_id_parses_from_command_line_text() {
        assert_eq!("42".parse::<NoteId>().unwrap(), NoteId::new(42));
        assert_eq!(" 7 ".parse::<NoteId>().unwrap(), NoteId::new(7));
        assert!("abc".parse::<NoteId>().is_err());
    }

    #[test]
    fn note_ids_order_by_value() {
        assert!(NoteId::new(1) < NoteId::new(2));
    }
}

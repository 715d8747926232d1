use serde::{Deserialize, Serialize};

use super::NoteId;

/// A note with its content and free-form tags.
///
/// Tags are stored exactly as given: no validation, deduplication or
/// normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    id: NoteId,
    content: String,
    #[serde(default)]
    tags: Vec<String>,
}

impl Note {
    /// Returns the note's identifier.
    pub fn id(&self) -> NoteId {
        self.id
    }

    /// Returns the note's content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the note's tags in insertion order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// The whole persisted collection, written as a single JSON object.
///
/// ```json
/// {"notes": [{"id": 1, "content": "text", "tags": ["a"]}]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesDocument {
    pub notes: Vec<Note>,
}

impl NotesDocument {
    /// Creates a document holding the given notes.
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }
}

/// Builder for constructing `Note` instances.
///
/// # Examples
///
/// ```
/// use notejar::{NoteBuilder, NoteId};
///
/// let note = NoteBuilder::new()
///     .id(NoteId::new(1))
///     .content("My first note")
///     .build();
///
/// assert_eq!(note.id(), NoteId::new(1));
/// assert_eq!(note.content(), "My first note");
/// assert!(note.tags().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct NoteBuilder {
    id: Option<NoteId>,
    content: Option<String>,
    tags: Option<Vec<String>>,
}

impl NoteBuilder {
    /// Creates a new `NoteBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the note ID.
    pub fn id(mut self, id: NoteId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the note content.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the tags.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Builds the `Note`, using an empty tag list if none was set.
    ///
    /// # Panics
    ///
    /// Panics if `id` or `content` have not been set.
    pub fn build(self) -> Note {
        Note {
            id: self.id.expect("id is required"),
            content: self.content.expect("content is required"),
            tags: self.tags.unwrap_or_default(),
        }
    }
}

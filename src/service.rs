use std::sync::atomic::{AtomicI64, Ordering};

use time::OffsetDateTime;
use tracing::info;

use crate::error::Result;
use crate::models::{Note, NoteBuilder, NoteId, NotesDocument};
use crate::Database;

/// Last id handed out by [`next_note_id`] in this process.
static LAST_NOTE_ID: AtomicI64 = AtomicI64::new(0);

/// Generates a note id from the current time in milliseconds.
///
/// Ids are strictly increasing within a process: when the clock has not moved
/// past the previous id, the previous id plus one is used instead. Separate
/// processes writing in the same millisecond can still collide.
pub fn next_note_id() -> NoteId {
    let now_ms = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
    let previous = LAST_NOTE_ID
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now_ms.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    NoteId::new(now_ms.max(previous + 1))
}

/// Service layer providing note management operations.
///
/// NoteService owns a Database instance and implements the create, list,
/// filter and delete operations on top of it. Every operation is a full
/// load (and, when mutating, a full save) of the notes file.
///
/// # Examples
///
/// ```
/// use notejar::{Database, NoteService};
///
/// # fn main() -> anyhow::Result<()> {
/// let dir = tempfile::tempdir()?;
/// let db = Database::open(dir.path().join("db.json"))?;
/// let service = NoteService::new(db);
///
/// let note = service.create_note("My first note", vec!["demo".to_string()])?;
/// assert_eq!(service.list_notes()?, vec![note]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NoteService {
    db: Database,
}

impl NoteService {
    /// Creates a new NoteService with the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Creates a new note with the given content and tags.
    ///
    /// The note gets a fresh time-derived id and is appended to the end of
    /// the stored collection. Content and tags are stored verbatim.
    pub fn create_note(&self, content: &str, tags: Vec<String>) -> Result<Note> {
        let note = NoteBuilder::new()
            .id(next_note_id())
            .content(content)
            .tags(tags)
            .build();

        let note = self.db.append(note)?;
        info!(id = %note.id(), tags = note.tags().len(), "note created");
        Ok(note)
    }

    /// Returns every stored note in insertion order.
    pub fn list_notes(&self) -> Result<Vec<Note>> {
        Ok(self.db.load()?.notes)
    }

    /// Retrieves the first note with the given id.
    ///
    /// Returns `None` if no note exists with the given ID. This is not
    /// considered an error condition.
    pub fn get_note(&self, id: NoteId) -> Result<Option<Note>> {
        Ok(self.list_notes()?.into_iter().find(|note| note.id() == id))
    }

    /// Returns notes whose content contains `filter`, ignoring case.
    ///
    /// Matches keep their stored order. An empty filter matches every note.
    pub fn find_notes(&self, filter: &str) -> Result<Vec<Note>> {
        let needle = filter.to_lowercase();
        Ok(self
            .list_notes()?
            .into_iter()
            .filter(|note| note.content().to_lowercase().contains(&needle))
            .collect())
    }

    /// Removes the note with the given id.
    ///
    /// Returns `Some(id)` if a note was removed, `None` if no note had that
    /// id. Nothing is written in the `None` case.
    pub fn remove_note(&self, id: NoteId) -> Result<Option<NoteId>> {
        let notes = self.list_notes()?;
        if !notes.iter().any(|note| note.id() == id) {
            return Ok(None);
        }

        let remaining: Vec<Note> = notes.into_iter().filter(|note| note.id() != id).collect();
        self.db.save(&NotesDocument::new(remaining))?;
        info!(%id, "note removed");
        Ok(Some(id))
    }

    /// Replaces the stored collection with an empty one.
    pub fn remove_all_notes(&self) -> Result<()> {
        self.db.save(&NotesDocument::default())?;
        info!("all notes removed");
        Ok(())
    }
}

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::models::{Note, NotesDocument};

/// Accessor for the JSON file holding every note.
///
/// Every call reads or writes the whole document. There is no caching and no
/// locking: two processes mutating the same file can lose each other's writes.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Binds to a notes file without touching the filesystem.
    ///
    /// `load` on a path that does not exist fails with `StoreError::NotFound`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens the notes file at the given path.
    ///
    /// Creates the parent directory and an empty document if the file does
    /// not exist. An existing file is left as is, even if it is corrupt.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let db = Self::at(path);
        if !db.path.exists() {
            if let Some(parent) = db.parent_dir() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            debug!(path = %db.path.display(), "initializing empty notes file");
            db.save(&NotesDocument::default())?;
        }
        Ok(db)
    }

    /// Returns the path of the notes file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the whole notes document.
    pub fn load(&self) -> Result<NotesDocument> {
        let raw = fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                StoreError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        let document: NotesDocument =
            serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), notes = document.notes.len(), "loaded notes");
        Ok(document)
    }

    /// Overwrites the notes file with `document`.
    ///
    /// The JSON is written to a temporary file in the same directory and then
    /// renamed over the target, so readers never observe a half-written file.
    /// An existing file keeps its permissions.
    pub fn save(&self, document: &NotesDocument) -> Result<()> {
        let mut json = serde_json::to_string_pretty(document).map_err(StoreError::Serialize)?;
        json.push('\n');

        let dir = self.parent_dir().unwrap_or_else(|| Path::new("."));
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(json.as_bytes()).map_err(io_err)?;
        if let Ok(metadata) = fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(io_err)?;
        }
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| StoreError::Persist {
            path: self.path.clone(),
            source: e.error,
        })?;

        debug!(path = %self.path.display(), notes = document.notes.len(), "saved notes");
        Ok(())
    }

    /// Loads the document, pushes `note` onto it and saves it back.
    ///
    /// Returns the inserted note.
    pub fn append(&self, note: Note) -> Result<Note> {
        let mut document = self.load()?;
        document.notes.push(note.clone());
        self.save(&document)?;
        Ok(note)
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }
}

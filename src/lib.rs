pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod service;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use error::StoreError;
pub use models::{Note, NoteBuilder, NoteId, NotesDocument};
pub use service::NoteService;

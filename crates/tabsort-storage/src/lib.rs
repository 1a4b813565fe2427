//! TabSort Storage Layer
//!
//! SQLite persistence for the organizer's settings: the last label input and
//! the chosen classification backend.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;

//! ChatRelay Storage - Low-level storage abstraction layer
//!
//! This crate provides the persistence layer for ChatRelay, using redb as the
//! embedded database. It exposes byte-level APIs so the core crate owns the
//! record shapes and their serialization.
//!
//! # Tables
//!
//! - `users` - User records keyed by phone number

pub mod paths;
pub mod time_utils;
pub mod user;

use anyhow::Result;
use redb::Database;
use std::sync::Arc;

pub use user::{InsertOutcome, UserStorage};

/// Central storage manager that initializes all storage subsystems
pub struct Storage {
    db: Arc<Database>,
    pub users: UserStorage,
}

impl Storage {
    /// Create a new storage instance at the given path.
    ///
    /// This will create the database file if it doesn't exist and initialize
    /// all required tables.
    pub fn new(path: &str) -> Result<Self> {
        let db = Arc::new(Database::create(path)?);

        let users = UserStorage::new(db.clone())?;

        Ok(Self { db, users })
    }

    /// Get a reference to the underlying database
    pub fn get_db(&self) -> Arc<Database> {
        self.db.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_storage_opens_and_creates_tables() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let storage = Storage::new(db_path.to_str().unwrap()).unwrap();

        assert_eq!(storage.users.count().unwrap(), 0);
    }

    #[test]
    fn test_storage_reopens_existing_database() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");

        {
            let storage = Storage::new(db_path.to_str().unwrap()).unwrap();
            storage.users.put_raw("+1555", b"record").unwrap();
        }

        let storage = Storage::new(db_path.to_str().unwrap()).unwrap();
        assert_eq!(storage.users.get_raw("+1555").unwrap().unwrap(), b"record");
    }
}

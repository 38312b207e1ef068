//! User record storage - byte-level API for user persistence.

use anyhow::Result;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::sync::Arc;

const USERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Outcome of [`UserStorage::insert_raw_if_absent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The key was free and the record was written.
    Inserted,
    /// The key was already taken; carries the stored bytes.
    Existing(Vec<u8>),
}

/// Low-level user storage keyed by phone number, with byte-level API
#[derive(Debug, Clone)]
pub struct UserStorage {
    db: Arc<Database>,
}

impl UserStorage {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(USERS_TABLE)?;
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Store raw record data, overwriting any existing entry
    pub fn put_raw(&self, phone_number: &str, data: &[u8]) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(USERS_TABLE)?;
            table.insert(phone_number, data)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get raw record data by phone number
    pub fn get_raw(&self, phone_number: &str) -> Result<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS_TABLE)?;

        if let Some(data) = table.get(phone_number)? {
            Ok(Some(data.value().to_vec()))
        } else {
            Ok(None)
        }
    }

    /// Store raw record data unless the key is already taken.
    ///
    /// The check and the write share one write transaction, and redb allows
    /// only one write transaction at a time, so two concurrent callers cannot
    /// both observe a free key. The loser gets [`InsertOutcome::Existing`]
    /// with the winner's bytes.
    pub fn insert_raw_if_absent(&self, phone_number: &str, data: &[u8]) -> Result<InsertOutcome> {
        let write_txn = self.db.begin_write()?;
        let outcome = {
            let mut table = write_txn.open_table(USERS_TABLE)?;
            let existing = table.get(phone_number)?.map(|v| v.value().to_vec());
            match existing {
                Some(bytes) => InsertOutcome::Existing(bytes),
                None => {
                    table.insert(phone_number, data)?;
                    InsertOutcome::Inserted
                }
            }
        };
        write_txn.commit()?;
        Ok(outcome)
    }

    /// Check if a record exists for the phone number
    pub fn exists(&self, phone_number: &str) -> Result<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS_TABLE)?;
        Ok(table.get(phone_number)?.is_some())
    }

    /// Number of stored records
    pub fn count(&self) -> Result<usize> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS_TABLE)?;
        Ok(table.len()? as usize)
    }
}

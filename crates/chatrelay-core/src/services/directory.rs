//! User directory service
//!
//! Maps a phone number to its user record, creating one on first contact.
//! The check-then-insert runs inside a single storage write transaction, so
//! concurrent first contacts for the same number collapse to one record.

use crate::error::DirectoryError;
use crate::models::{StoredUser, UserRecord};
use chatrelay_storage::{InsertOutcome, Storage};
use std::sync::Arc;
use tracing::{debug, info};

/// Lookup-or-create directory over the `users` table.
pub struct UserDirectory {
    storage: Arc<Storage>,
}

impl UserDirectory {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Return the record for `phone_number`, creating it on first contact.
    ///
    /// At most one write per call, only on a miss. `created_at` is captured
    /// at the time of the miss, not of the eventual write. Never updates or
    /// deletes existing records.
    pub async fn get_or_create(&self, phone_number: &str) -> Result<UserRecord, DirectoryError> {
        if let Some(bytes) = self
            .storage
            .users
            .get_raw(phone_number)
            .map_err(DirectoryError::from_store)?
        {
            let stored: StoredUser =
                serde_json::from_slice(&bytes).map_err(DirectoryError::decode)?;
            debug!(phone = %phone_number, "User record found");
            return Ok(stored.into_record());
        }

        let fresh = StoredUser::new(phone_number);
        let bytes = serde_json::to_vec(&fresh).map_err(|err| {
            DirectoryError::StoreOperationFailed(
                anyhow::Error::new(err).context("failed to encode user record"),
            )
        })?;

        match self
            .storage
            .users
            .insert_raw_if_absent(phone_number, &bytes)
            .map_err(DirectoryError::from_store)?
        {
            InsertOutcome::Inserted => {
                info!(phone = %phone_number, "Created user record on first contact");
                Ok(fresh.into_record())
            }
            // A concurrent request won the insert between our read and
            // write; return the winner's record.
            InsertOutcome::Existing(existing) => {
                let stored: StoredUser =
                    serde_json::from_slice(&existing).map_err(DirectoryError::decode)?;
                debug!(phone = %phone_number, "Lost first-contact race, returning existing record");
                Ok(stored.into_record())
            }
        }
    }
}

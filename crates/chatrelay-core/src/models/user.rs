//! User record shapes: the persisted form and the canonical transport form.

use chatrelay_storage::time_utils;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// User record as serialized into the `users` table.
///
/// The `id` is a store-internal identifier and must never appear in a
/// response or outbound payload; conversion to [`UserRecord`] strips it.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StoredUser {
    pub id: String,
    pub phone_number: String,
    /// Epoch milliseconds, set once at creation.
    pub created_at: i64,
    /// Free-form fields that may accumulate over the record's lifetime.
    /// Preserved through round-trips untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoredUser {
    /// Build a fresh record for a first contact. Captures `created_at` at
    /// call time, before the eventual write.
    pub fn new(phone_number: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            phone_number: phone_number.into(),
            created_at: time_utils::now_ms(),
            extra: Map::new(),
        }
    }

    /// Canonicalize into the transport shape: drop the store-internal id and
    /// render the timestamp as RFC 3339.
    pub fn into_record(self) -> UserRecord {
        UserRecord {
            phone_number: self.phone_number,
            created_at: format_created_at(self.created_at),
            extra: self.extra,
        }
    }
}

/// Canonical transport shape returned by the directory and embedded as
/// `user_data` in the outbound agent payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub phone_number: String,
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn format_created_at(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub mod user;

pub use user::{StoredUser, UserRecord};

//! Storage abstraction and implementations for Weightwise.
//!
//! This crate provides the observation/goal store trait with a JSON file
//! implementation and, behind the `sqlite` feature, an SQLite one.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
#[cfg(feature = "sqlite")]
pub mod sqlite_storage;

pub use trait_::{Storage, StorageError, Result};
pub use json_storage::JsonStorage;
#[cfg(feature = "sqlite")]
pub use sqlite_storage::SqliteStorage;

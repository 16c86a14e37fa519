//! Durable key-value storage.
//!
//! Uses `rusqlite` (bundled `SQLite`) to hold small JSON documents
//! such as the persisted watchlist under fixed keys.

mod connection;
/// Key-value slot operations.
pub mod kv;
mod migrations;

#[allow(clippy::module_name_repetitions)]
pub use connection::{open_db, open_in_memory};
pub use kv::KeyValueStorage;
pub use rusqlite::Connection;

//! Core logic for watchbox.
//!
//! - [`watchlist`]: the persisted watchlist, written through on every mutation.
//! - [`detail`]: merges five catalog lookups into one [`detail::MovieDetail`].
//! - [`search`]: full search and the debounced suggestion pipeline.
//! - [`feed`]: the eight-shelf home feed.
//!
//! Failures surface as [`CoreError`] values and as [`Notice`]s on a
//! channel the UI layer subscribes to.

/// Credential validation and client construction.
pub mod credentials;
/// Movie detail aggregation.
pub mod detail;
mod error;
/// Home feed shelves.
pub mod feed;
mod notice;
/// Search and suggestions.
pub mod search;
/// Persisted watchlist.
pub mod watchlist;

#[cfg(test)]
mod mock;

pub use error::CoreError;
pub use notice::{Notice, NoticeLevel, Notices};

//! Persisted watchlist.
//!
//! The list lives in memory and in one durable key-value slot. Every
//! mutation writes the full list through to the slot before it is applied
//! in memory, so both always agree.

use std::collections::HashSet;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use watchbox_api::tmdb::Movie;
use watchbox_db::KeyValueStorage;

use crate::{CoreError, Notices};

/// Default storage key for the watchlist slot.
pub const DEFAULT_STORAGE_KEY: &str = "movieWatchlist";

/// Version tag written with the payload.
const PAYLOAD_VERSION: u32 = 1;

/// Serialized form written to storage.
#[derive(Serialize)]
struct PayloadRef<'a> {
    version: u32,
    movies: &'a [Movie],
}

/// Accepted stored forms: the versioned envelope, or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredPayload {
    Versioned { version: u32, movies: Vec<Movie> },
    Legacy(Vec<Movie>),
}

/// Result of [`WatchlistStore::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The movie was appended and persisted.
    Added,
    /// A movie with the same ID is already present; nothing changed.
    Duplicate,
}

/// Result of [`WatchlistStore::remove`].
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveOutcome {
    /// The movie was removed and the list persisted.
    Removed(Movie),
    /// No movie with that ID; nothing changed.
    NotFound,
}

/// The watchlist, backed by a durable key-value slot.
///
/// Mutations take `&mut self`, so overlapping add/remove calls are
/// serialized by the borrow checker; share the store behind a mutex when
/// several tasks need it.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct WatchlistStore<S> {
    storage: S,
    key: String,
    movies: Vec<Movie>,
    notices: Notices,
}

impl<S: KeyValueStorage> WatchlistStore<S> {
    /// Opens the store and loads the persisted list.
    pub fn open(storage: S, key: impl Into<String>, notices: Notices) -> Self {
        let mut store = Self {
            storage,
            key: key.into(),
            movies: Vec::new(),
            notices,
        };
        store.movies = store.load();
        store
    }

    /// Reads the persisted list.
    ///
    /// Returns an empty list when the slot is absent, unreadable, or holds
    /// an unparsable or unknown-version payload. Duplicate IDs in a stored
    /// payload are dropped, keeping the first occurrence.
    #[must_use]
    pub fn load(&self) -> Vec<Movie> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %format!("{err:#}"), "failed to read watchlist");
                return Vec::new();
            }
        };

        let movies = match serde_json::from_str::<StoredPayload>(&raw) {
            Ok(StoredPayload::Versioned { version, movies }) if version == PAYLOAD_VERSION => movies,
            Ok(StoredPayload::Versioned { version, .. }) => {
                tracing::warn!(key = %self.key, version, "unsupported watchlist version");
                return Vec::new();
            }
            Ok(StoredPayload::Legacy(movies)) => movies,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "failed to parse watchlist");
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        movies.into_iter().filter(|m| seen.insert(m.id)).collect()
    }

    /// Serializes `movies` and writes them to the slot in one write.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Persistence`] if serialization or the write fails.
    pub fn persist(&self, movies: &[Movie]) -> Result<(), CoreError> {
        let payload = PayloadRef {
            version: PAYLOAD_VERSION,
            movies,
        };
        let json = serde_json::to_string(&payload)
            .context("failed to serialize watchlist")
            .map_err(CoreError::Persistence)?;
        self.storage
            .set(&self.key, &json)
            .map_err(CoreError::Persistence)
    }

    /// Appends `movie` unless one with the same ID is already present.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Persistence`] if the write fails; the movie is
    /// not added in that case.
    pub fn add(&mut self, movie: Movie) -> Result<AddOutcome, CoreError> {
        if self.contains(movie.id) {
            self.notices.info("Movie already in watchlist");
            return Ok(AddOutcome::Duplicate);
        }

        let message = format!("{} added to watchlist", movie.title);
        self.movies.push(movie);
        if let Err(err) = self.persist(&self.movies) {
            self.movies.pop();
            tracing::warn!(error = %err, "failed to save watchlist");
            self.notices.error("Failed to save to watchlist");
            return Err(err);
        }

        self.notices.info(message);
        Ok(AddOutcome::Added)
    }

    /// Removes the movie with `movie_id`, if present.
    ///
    /// Callers confirm with the user before calling this.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Persistence`] if the write fails; the movie is
    /// kept in that case.
    pub fn remove(&mut self, movie_id: u64) -> Result<RemoveOutcome, CoreError> {
        let Some(index) = self.position(movie_id) else {
            return Ok(RemoveOutcome::NotFound);
        };

        let removed = self.movies.remove(index);
        if let Err(err) = self.persist(&self.movies) {
            self.movies.insert(index, removed);
            tracing::warn!(error = %err, "failed to save watchlist");
            self.notices.error("Failed to save to watchlist");
            return Err(err);
        }

        self.notices.info("Movie removed from watchlist");
        Ok(RemoveOutcome::Removed(removed))
    }

    /// Returns `true` if a movie with `movie_id` is in the list.
    #[must_use]
    pub fn contains(&self, movie_id: u64) -> bool {
        self.position(movie_id).is_some()
    }

    /// Looks up a movie by ID.
    #[must_use]
    pub fn find(&self, movie_id: u64) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == movie_id)
    }

    /// Returns the list in insertion order.
    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Number of movies in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Returns `true` if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    fn position(&self, movie_id: u64) -> Option<usize> {
        self.movies.iter().position(|m| m.id == movie_id)
    }
}

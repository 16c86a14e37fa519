//! Error taxonomy surfaced to the UI layer.

/// Errors returned by core operations.
///
/// None of these are fatal; every failure is recoverable by retrying.
/// A duplicate watchlist insertion is not an error and is reported as
/// [`crate::watchlist::AddOutcome::Duplicate`] instead.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum CoreError {
    /// Missing or placeholder API credential, or unusable catalog settings.
    #[error("TMDB API key is not configured: {0}")]
    Configuration(String),

    /// Transport failure or non-2xx response.
    #[error("network request failed: {0:#}")]
    Network(#[source] anyhow::Error),

    /// Durable write failure. The in-memory watchlist is unchanged.
    #[error("failed to persist watchlist: {0:#}")]
    Persistence(#[source] anyhow::Error),

    /// One of the detail lookups failed; no partial result is returned.
    #[error("failed to load details for movie {movie_id}: {source:#}")]
    Aggregation {
        /// Movie whose details were requested.
        movie_id: u64,
        /// Underlying lookup failure.
        #[source]
        source: anyhow::Error,
    },
}

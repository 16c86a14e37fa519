//! Free-text search and debounced suggestions.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::instrument;
use watchbox_api::tmdb::{Movie, SearchMovieParams, TmdbApi};

use crate::{CoreError, Notices};

/// Minimum query length, in characters, before suggestions are fetched.
pub const SUGGESTION_MIN_CHARS: usize = 2;
/// Maximum suggestions published per query.
pub const SUGGESTION_LIMIT: usize = 5;
/// Quiet interval before a suggestion fetch fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Label shown when a suggestion has no release year.
const UNKNOWN_YEAR: &str = "N/A";

/// A compact projection of a search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSuggestion {
    /// TMDB movie ID.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Release year, if known.
    pub year: Option<i32>,
}

impl SearchSuggestion {
    /// Returns the year as text, or "N/A".
    #[must_use]
    pub fn year_label(&self) -> String {
        self.year
            .map_or_else(|| String::from(UNKNOWN_YEAR), |y| y.to_string())
    }
}

impl From<&Movie> for SearchSuggestion {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            year: movie.release_year(),
        }
    }
}

/// Returns `true` if `query` is long enough to fetch suggestions for.
#[must_use]
pub fn is_suggestible(query: &str) -> bool {
    query.trim().chars().count() >= SUGGESTION_MIN_CHARS
}

/// Search entry point with a debounced suggestion pipeline.
///
/// Suggestions are published on a watch channel; each call to
/// [`SearchService::suggest`] aborts the previously scheduled fetch, so only
/// the latest query within the debounce window reaches the catalog.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchService<A> {
    api: Arc<A>,
    notices: Notices,
    debounce: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
    suggestions: Arc<watch::Sender<Vec<SearchSuggestion>>>,
}

impl<A: TmdbApi + Sync + 'static> SearchService<A> {
    /// Creates a service with the default debounce interval.
    pub fn new(api: Arc<A>, notices: Notices) -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self {
            api,
            notices,
            debounce: DEFAULT_DEBOUNCE,
            pending: Mutex::new(None),
            suggestions: Arc::new(tx),
        }
    }

    /// Sets the debounce interval.
    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Subscribes to the suggestion list.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<SearchSuggestion>> {
        self.suggestions.subscribe()
    }

    /// Returns the current suggestion list.
    #[must_use]
    pub fn current(&self) -> Vec<SearchSuggestion> {
        self.suggestions.borrow().clone()
    }

    /// Schedules a suggestion fetch for `query`.
    ///
    /// Any fetch scheduled earlier is aborted, including one already in
    /// flight. Queries shorter than [`SUGGESTION_MIN_CHARS`] characters or
    /// made only of whitespace clear the suggestions instead.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn suggest(&self, query: &str) {
        self.cancel_pending();

        if !is_suggestible(query) {
            self.clear_suggestions();
            return;
        }

        let api = Arc::clone(&self.api);
        let tx = Arc::clone(&self.suggestions);
        let notices = self.notices.clone();
        let debounce = self.debounce;
        let query = String::from(query.trim());

        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            fetch_suggestions(&*api, &tx, &notices, query).await;
        });
        *self.lock_pending() = Some(handle);
    }

    /// Aborts any scheduled suggestion fetch and clears the list.
    pub fn cancel_suggestions(&self) {
        self.cancel_pending();
        self.clear_suggestions();
    }

    /// Runs a full search immediately.
    ///
    /// Returns `Ok(None)` without issuing a request for blank input. Pending
    /// suggestions are cancelled and cleared.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Network`] if the request fails.
    #[instrument(skip_all)]
    pub async fn search(&self, query: &str) -> Result<Option<Vec<Movie>>, CoreError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }
        self.cancel_suggestions();

        match self.api.search_movie(&SearchMovieParams::new(query)).await {
            Ok(response) => {
                tracing::debug!(query, results = response.results.len(), "search complete");
                Ok(Some(response.results))
            }
            Err(err) => {
                tracing::warn!(query, error = %format!("{err:#}"), "search failed");
                self.notices
                    .error("Failed to search movies. Please try again.");
                Err(CoreError::Network(err))
            }
        }
    }

    fn cancel_pending(&self) {
        if let Some(handle) = self.lock_pending().take() {
            handle.abort();
        }
    }

    fn clear_suggestions(&self) {
        self.suggestions.send_if_modified(|current| {
            let changed = !current.is_empty();
            current.clear();
            changed
        });
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A> Drop for SearchService<A> {
    fn drop(&mut self) {
        let pending = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}

#[instrument(skip_all)]
async fn fetch_suggestions<A: TmdbApi>(
    api: &A,
    tx: &watch::Sender<Vec<SearchSuggestion>>,
    notices: &Notices,
    query: String,
) {
    match api.search_movie(&SearchMovieParams::new(query.as_str())).await {
        Ok(response) => {
            let suggestions: Vec<SearchSuggestion> = response
                .results
                .iter()
                .take(SUGGESTION_LIMIT)
                .map(SearchSuggestion::from)
                .collect();
            tracing::debug!(%query, count = suggestions.len(), "suggestions updated");
            tx.send_replace(suggestions);
        }
        Err(err) => {
            tracing::warn!(%query, error = %format!("{err:#}"), "failed to fetch suggestions");
            notices.error("Failed to fetch suggestions");
        }
    }
}

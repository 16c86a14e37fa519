//! Home feed: eight independently loaded movie shelves.

use std::sync::{Arc, Mutex, PoisonError};

use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::instrument;
use watchbox_api::tmdb::{
    GENRE_ACTION, GENRE_COMEDY, GENRE_HORROR, Movie, MovieListKind, TmdbApi,
};

use crate::Notices;

/// One shelf of the home feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShelfKind {
    /// Trending today.
    Trending,
    /// Now playing in theaters.
    NowPlaying,
    /// Top rated.
    TopRated,
    /// Popular.
    Popular,
    /// Upcoming releases.
    Upcoming,
    /// Action genre.
    Action,
    /// Comedy genre.
    Comedy,
    /// Horror genre.
    Horror,
}

impl ShelfKind {
    /// All shelves in display order.
    pub const ALL: [Self; 8] = [
        Self::Trending,
        Self::NowPlaying,
        Self::TopRated,
        Self::Popular,
        Self::Upcoming,
        Self::Action,
        Self::Comedy,
        Self::Horror,
    ];

    /// Display title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Trending => "Trending Today",
            Self::NowPlaying => "Now Playing in Theaters",
            Self::TopRated => "Top Rated Movies",
            Self::Popular => "Popular Movies",
            Self::Upcoming => "Coming Soon",
            Self::Action => "Action Movies",
            Self::Comedy => "Comedy Movies",
            Self::Horror => "Horror Movies",
        }
    }

    /// Catalog list backing this shelf.
    #[must_use]
    pub const fn list(self) -> MovieListKind {
        match self {
            Self::Trending => MovieListKind::TrendingDay,
            Self::NowPlaying => MovieListKind::NowPlaying,
            Self::TopRated => MovieListKind::TopRated,
            Self::Popular => MovieListKind::Popular,
            Self::Upcoming => MovieListKind::Upcoming,
            Self::Action => MovieListKind::Genre(GENRE_ACTION),
            Self::Comedy => MovieListKind::Genre(GENRE_COMEDY),
            Self::Horror => MovieListKind::Genre(GENRE_HORROR),
        }
    }
}

/// A loaded shelf.
#[derive(Debug, Clone, PartialEq)]
pub struct Shelf {
    /// Which shelf this is.
    pub kind: ShelfKind,
    /// Movies, in catalog order.
    pub movies: Vec<Movie>,
    /// `true` when the last load of this shelf failed and `movies` holds
    /// the previous contents.
    pub stale: bool,
}

/// All shelves of the home feed, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeFeed {
    /// Shelves.
    pub shelves: Vec<Shelf>,
}

impl HomeFeed {
    /// A feed with every shelf empty.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            shelves: ShelfKind::ALL
                .iter()
                .map(|&kind| Shelf {
                    kind,
                    movies: Vec::new(),
                    stale: false,
                })
                .collect(),
        }
    }

    /// Looks up a shelf.
    #[must_use]
    pub fn shelf(&self, kind: ShelfKind) -> Option<&Shelf> {
        self.shelves.iter().find(|s| s.kind == kind)
    }

    fn apply(&mut self, outcomes: Vec<(ShelfKind, anyhow::Result<Vec<Movie>>)>, notices: &Notices) {
        for (kind, outcome) in outcomes {
            let Some(shelf) = self.shelves.iter_mut().find(|s| s.kind == kind) else {
                continue;
            };
            match outcome {
                Ok(movies) => {
                    shelf.movies = movies;
                    shelf.stale = false;
                }
                Err(err) => {
                    tracing::warn!(
                        shelf = kind.title(),
                        error = %format!("{err:#}"),
                        "failed to load shelf"
                    );
                    shelf.stale = true;
                    notices.error(format!("Failed to load {}", kind.title()));
                }
            }
        }
    }
}

/// Loads the home feed and publishes it on a watch channel.
///
/// At most one load is in flight; starting a new one aborts the previous.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct HomeFeedLoader<A> {
    api: Arc<A>,
    notices: Notices,
    state: Arc<watch::Sender<HomeFeed>>,
    inflight: Mutex<Option<AbortHandle>>,
}

impl<A: TmdbApi + Sync + 'static> HomeFeedLoader<A> {
    /// Creates a loader with every shelf empty.
    pub fn new(api: Arc<A>, notices: Notices) -> Self {
        let (tx, _) = watch::channel(HomeFeed::empty());
        Self {
            api,
            notices,
            state: Arc::new(tx),
            inflight: Mutex::new(None),
        }
    }

    /// Subscribes to feed updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HomeFeed> {
        self.state.subscribe()
    }

    /// Returns the last published feed.
    #[must_use]
    pub fn current(&self) -> HomeFeed {
        self.state.borrow().clone()
    }

    /// Starts a load in the background, aborting any load still in flight.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn refresh(&self) -> JoinHandle<HomeFeed> {
        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let notices = self.notices.clone();

        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = inflight.take() {
            tracing::debug!("superseding in-flight home feed load");
            previous.abort();
        }

        let handle = tokio::spawn(async move {
            let outcomes = fetch_shelves(&*api).await;
            state.send_modify(|feed| feed.apply(outcomes, &notices));
            state.borrow().clone()
        });
        *inflight = Some(handle.abort_handle());
        handle
    }

    /// Loads every shelf and returns the resulting feed.
    ///
    /// If this load is superseded by a newer [`HomeFeedLoader::refresh`],
    /// the feed as last published is returned.
    pub async fn load(&self) -> HomeFeed {
        match self.refresh().await {
            Ok(feed) => feed,
            Err(err) => {
                if !err.is_cancelled() {
                    tracing::warn!(error = %err, "home feed load panicked");
                }
                self.current()
            }
        }
    }
}

impl<A> Drop for HomeFeedLoader<A> {
    fn drop(&mut self) {
        let inflight = self
            .inflight
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = inflight.take() {
            handle.abort();
        }
    }
}

#[instrument(skip_all)]
async fn fetch_shelves<A: TmdbApi>(api: &A) -> Vec<(ShelfKind, anyhow::Result<Vec<Movie>>)> {
    let fetches = ShelfKind::ALL.iter().map(|&kind| async move {
        let outcome = api.movie_list(kind.list()).await.map(|r| r.results);
        (kind, outcome)
    });
    join_all(fetches).await
}

//! Fixture-backed catalog used by unit tests.
#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use anyhow::{Result, bail};
use watchbox_api::tmdb::{
    Credits, MovieDetails, MovieListKind, MovieListResponse, ReviewsResponse, SearchMovieParams,
    TmdbApi, VideosResponse,
};

/// Mock API that serves the Inception fixtures.
///
/// A `None` section makes the matching lookup fail.
pub struct MockTmdbApi {
    pub details: Option<MovieDetails>,
    pub credits: Option<Credits>,
    pub videos: Option<VideosResponse>,
    pub similar: Option<MovieListResponse>,
    pub reviews: Option<ReviewsResponse>,
    pub search: Option<MovieListResponse>,
    pub failing_lists: Mutex<HashSet<MovieListKind>>,
    pub search_queries: Mutex<Vec<String>>,
    pub list_calls: AtomicU32,
    pub delay: Duration,
}

impl MockTmdbApi {
    pub fn inception() -> Self {
        Self {
            details: Some(parse(include_str!(
                "../../../fixtures/tmdb/movie_details_27205.json"
            ))),
            credits: Some(parse(include_str!(
                "../../../fixtures/tmdb/movie_credits_27205.json"
            ))),
            videos: Some(parse(include_str!(
                "../../../fixtures/tmdb/movie_videos_27205.json"
            ))),
            similar: Some(parse(include_str!(
                "../../../fixtures/tmdb/movie_similar_27205.json"
            ))),
            reviews: Some(parse(include_str!(
                "../../../fixtures/tmdb/movie_reviews_27205.json"
            ))),
            search: Some(parse(include_str!(
                "../../../fixtures/tmdb/search_movie_inception.json"
            ))),
            failing_lists: Mutex::new(HashSet::new()),
            search_queries: Mutex::new(Vec::new()),
            list_calls: AtomicU32::new(0),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fail_list(&self, kind: MovieListKind) {
        self.failing_lists.lock().unwrap().insert(kind);
    }

    pub fn recover_list(&self, kind: MovieListKind) {
        self.failing_lists.lock().unwrap().remove(&kind);
    }

    pub fn search_queries(&self) -> Vec<String> {
        self.search_queries.lock().unwrap().clone()
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(json: &str) -> T {
    serde_json::from_str(json).unwrap()
}

fn section<T: Clone>(value: Option<&T>, name: &str) -> Result<T> {
    match value {
        Some(v) => Ok(v.clone()),
        None => bail!("TMDB API error (HTTP 500): {name} unavailable"),
    }
}

impl TmdbApi for MockTmdbApi {
    async fn movie_details(&self, _movie_id: u64) -> Result<MovieDetails> {
        self.pause().await;
        section(self.details.as_ref(), "details")
    }

    async fn movie_credits(&self, _movie_id: u64) -> Result<Credits> {
        self.pause().await;
        section(self.credits.as_ref(), "credits")
    }

    async fn movie_videos(&self, _movie_id: u64) -> Result<VideosResponse> {
        self.pause().await;
        section(self.videos.as_ref(), "videos")
    }

    async fn movie_similar(&self, _movie_id: u64) -> Result<MovieListResponse> {
        self.pause().await;
        section(self.similar.as_ref(), "similar")
    }

    async fn movie_reviews(&self, _movie_id: u64) -> Result<ReviewsResponse> {
        self.pause().await;
        section(self.reviews.as_ref(), "reviews")
    }

    async fn search_movie(&self, params: &SearchMovieParams) -> Result<MovieListResponse> {
        self.search_queries
            .lock()
            .unwrap()
            .push(params.query.clone());
        self.pause().await;
        section(self.search.as_ref(), "search")
    }

    async fn movie_list(&self, kind: MovieListKind) -> Result<MovieListResponse> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        let failing = self.failing_lists.lock().unwrap().contains(&kind);
        if failing {
            bail!("TMDB API error (HTTP 503): {} unavailable", kind.path());
        }
        section(self.similar.as_ref(), kind.path())
    }
}

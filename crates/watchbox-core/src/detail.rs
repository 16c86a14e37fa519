//! Movie detail aggregation.
//!
//! Issues the five detail lookups concurrently and merges them into one
//! [`MovieDetail`] after all of them settle.

use std::fmt;
use std::sync::Arc;

use tracing::instrument;
use watchbox_api::tmdb::{
    CastMember, Credits, CrewMember, Movie, MovieDetails, MovieListResponse, Review,
    ReviewsResponse, TmdbApi, Video, VideosResponse,
};

use crate::{CoreError, Notices};

/// Maximum cast members kept.
pub const CAST_LIMIT: usize = 10;
/// Maximum similar titles kept.
pub const SIMILAR_LIMIT: usize = 6;
/// Maximum reviews kept.
pub const REVIEW_LIMIT: usize = 3;
/// Maximum writers kept.
pub const WRITER_LIMIT: usize = 3;
/// Maximum production companies kept.
pub const COMPANY_LIMIT: usize = 3;

const TRAILER_TYPE: &str = "Trailer";
const DIRECTOR_JOB: &str = "Director";
const WRITER_JOBS: [&str; 2] = ["Writer", "Screenplay"];

/// How ancillary lookup failures are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetailPolicy {
    /// Any failed lookup fails the whole aggregate.
    #[default]
    Strict,
    /// Only the primary lookup is required; failed sections are left empty
    /// and listed in [`MovieDetail::missing`].
    Lenient,
}

/// An ancillary section of the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSection {
    /// Cast and crew.
    Credits,
    /// Trailers and other videos.
    Videos,
    /// Similar titles.
    Similar,
    /// User reviews.
    Reviews,
}

impl fmt::Display for DetailSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Credits => "credits",
            Self::Videos => "videos",
            Self::Similar => "similar",
            Self::Reviews => "reviews",
        };
        f.write_str(name)
    }
}

/// Consolidated detail record for one movie.
///
/// Built fresh on every request and never cached.
#[derive(Debug, Clone)]
pub struct MovieDetail {
    /// Primary details, with production companies capped.
    pub details: MovieDetails,
    /// Billed cast, in source order.
    pub cast: Vec<CastMember>,
    /// Director, if credited.
    pub director: Option<CrewMember>,
    /// Writers and screenwriters, in source order.
    pub writers: Vec<CrewMember>,
    /// Preferred trailer, if any YouTube video exists.
    pub trailer: Option<Video>,
    /// Related titles.
    pub similar: Vec<Movie>,
    /// User reviews.
    pub reviews: Vec<Review>,
    /// Sections that failed under [`DetailPolicy::Lenient`].
    pub missing: Vec<DetailSection>,
}

impl MovieDetail {
    /// Returns the watchlist record for this movie.
    #[must_use]
    pub fn summary(&self) -> Movie {
        self.details.summary()
    }
}

/// Picks the trailer: the first YouTube "Trailer", else the first YouTube
/// video of any type.
#[must_use]
pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|v| v.is_youtube() && v.video_type == TRAILER_TYPE)
        .or_else(|| videos.iter().find(|v| v.is_youtube()))
}

/// Picks the first crew member whose job is exactly "Director".
#[must_use]
pub fn select_director(crew: &[CrewMember]) -> Option<&CrewMember> {
    crew.iter().find(|c| c.job == DIRECTOR_JOB)
}

/// Picks up to [`WRITER_LIMIT`] writers and screenwriters in source order.
#[must_use]
pub fn select_writers(crew: &[CrewMember]) -> Vec<CrewMember> {
    crew.iter()
        .filter(|c| WRITER_JOBS.contains(&c.job.as_str()))
        .take(WRITER_LIMIT)
        .cloned()
        .collect()
}

fn capped<T>(mut items: Vec<T>, limit: usize) -> Vec<T> {
    items.truncate(limit);
    items
}

/// Merges the five lookup results and applies the selection rules.
#[must_use]
pub fn assemble(
    mut details: MovieDetails,
    credits: Credits,
    videos: VideosResponse,
    similar: MovieListResponse,
    reviews: ReviewsResponse,
) -> MovieDetail {
    details.production_companies.truncate(COMPANY_LIMIT);

    MovieDetail {
        director: select_director(&credits.crew).cloned(),
        writers: select_writers(&credits.crew),
        trailer: select_trailer(&videos.results).cloned(),
        cast: capped(credits.cast, CAST_LIMIT),
        similar: capped(similar.results, SIMILAR_LIMIT),
        reviews: capped(reviews.results, REVIEW_LIMIT),
        details,
        missing: Vec::new(),
    }
}

/// Fetches and merges movie details.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct MovieDetailAggregator<A> {
    api: Arc<A>,
    policy: DetailPolicy,
    notices: Notices,
}

impl<A: TmdbApi> MovieDetailAggregator<A> {
    /// Creates an aggregator with the strict policy.
    pub fn new(api: Arc<A>, notices: Notices) -> Self {
        Self {
            api,
            policy: DetailPolicy::Strict,
            notices,
        }
    }

    /// Sets the failure policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: DetailPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetches the five detail sections concurrently and merges them.
    ///
    /// No retry is attempted; callers re-invoke on failure.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Aggregation`] if the primary lookup fails, or
    /// any lookup fails under [`DetailPolicy::Strict`].
    #[instrument(skip_all, fields(movie_id = movie_id))]
    pub async fn fetch_details(&self, movie_id: u64) -> Result<MovieDetail, CoreError> {
        let api = &*self.api;
        let (details, credits, videos, similar, reviews) = tokio::join!(
            api.movie_details(movie_id),
            api.movie_credits(movie_id),
            api.movie_videos(movie_id),
            api.movie_similar(movie_id),
            api.movie_reviews(movie_id),
        );

        let result = match self.policy {
            DetailPolicy::Strict => all_sections(details, credits, videos, similar, reviews),
            DetailPolicy::Lenient => details.map(|details| {
                let mut missing = Vec::new();
                let credits = section_or_default(credits, DetailSection::Credits, &mut missing);
                let videos = section_or_default(videos, DetailSection::Videos, &mut missing);
                let similar = section_or_default(similar, DetailSection::Similar, &mut missing);
                let reviews = section_or_default(reviews, DetailSection::Reviews, &mut missing);
                let mut detail = assemble(details, credits, videos, similar, reviews);
                detail.missing = missing;
                detail
            }),
        };

        match result {
            Ok(detail) => {
                tracing::debug!(
                    title = %detail.details.title,
                    cast = detail.cast.len(),
                    missing = detail.missing.len(),
                    "aggregated movie details"
                );
                Ok(detail)
            }
            Err(source) => {
                tracing::warn!(error = %format!("{source:#}"), "failed to load movie details");
                self.notices.error("Failed to load movie details");
                Err(CoreError::Aggregation { movie_id, source })
            }
        }
    }
}

fn all_sections(
    details: anyhow::Result<MovieDetails>,
    credits: anyhow::Result<Credits>,
    videos: anyhow::Result<VideosResponse>,
    similar: anyhow::Result<MovieListResponse>,
    reviews: anyhow::Result<ReviewsResponse>,
) -> anyhow::Result<MovieDetail> {
    Ok(assemble(details?, credits?, videos?, similar?, reviews?))
}

fn section_or_default<T: Default>(
    result: anyhow::Result<T>,
    section: DetailSection,
    missing: &mut Vec<DetailSection>,
) -> T {
    result.unwrap_or_else(|err| {
        tracing::warn!(%section, error = %format!("{err:#}"), "detail section unavailable");
        missing.push(section);
        T::default()
    })
}

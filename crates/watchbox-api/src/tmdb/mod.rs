//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints
//! and retrieves movie details, credits, videos, reviews, and lists.

mod api;
mod client;
mod image;
mod params;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_BASE_URL, TmdbClient, TmdbClientBuilder};
pub use image::{DEFAULT_IMAGE_BASE_URL, image_url};
pub use params::{GENRE_ACTION, GENRE_COMEDY, GENRE_HORROR, MovieListKind, SearchMovieParams};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    AuthorDetails, CastMember, Credits, CrewMember, Genre, Movie, MovieDetails,
    MovieListResponse, ProductionCompany, ProductionCountry, Review, ReviewsResponse,
    SpokenLanguage, Video, VideosResponse, YOUTUBE_SITE,
};

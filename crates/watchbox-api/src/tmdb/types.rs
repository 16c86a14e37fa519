//! TMDB API response types.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Treats JSON `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Treats an empty or blank string as `None`.
///
/// TMDB returns `""` instead of `null` for unknown release dates.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Extracts the year from a `YYYY-MM-DD` date string.
fn year_of(date: Option<&str>) -> Option<i32> {
    date.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(|d| d.year())
}

// --- Movie summary ---

/// A movie summary as returned by list, search, and similar endpoints.
///
/// This is also the record persisted in the watchlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Release date (YYYY-MM-DD).
    #[serde(default, deserialize_with = "blank_as_none")]
    pub release_date: Option<String>,
    /// Poster image path relative to the image base URL.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Overview text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    /// Vote average (0-10).
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
}

impl Movie {
    /// Returns the release year, if the release date is known and valid.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        year_of(self.release_date.as_deref())
    }
}

/// Paged movie list from `search/movie`, `movie/{id}/similar`,
/// the curated list endpoints, and `discover/movie`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieListResponse {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Results. Missing or `null` lists decode as empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Movie>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

// --- Movie details ---

/// Response from `movie/{movie_id}` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Original title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_title: String,
    /// Tagline.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub tagline: Option<String>,
    /// Release date (YYYY-MM-DD).
    #[serde(default, deserialize_with = "blank_as_none")]
    pub release_date: Option<String>,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Overview text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    /// Vote average.
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Budget in USD (0 when unknown).
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget: u64,
    /// Revenue in USD (0 when unknown).
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue: u64,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Release status (e.g., "Released", "Post Production").
    #[serde(default)]
    pub status: Option<String>,
    /// IMDb ID.
    #[serde(default)]
    pub imdb_id: Option<String>,
    /// Homepage URL.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub homepage: Option<String>,
    /// Genres.
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    /// Spoken languages.
    #[serde(default, deserialize_with = "null_as_default")]
    pub spoken_languages: Vec<SpokenLanguage>,
    /// Production countries.
    #[serde(default, deserialize_with = "null_as_default")]
    pub production_countries: Vec<ProductionCountry>,
    /// Production companies.
    #[serde(default, deserialize_with = "null_as_default")]
    pub production_companies: Vec<ProductionCompany>,
}

impl MovieDetails {
    /// Projects the details onto a movie summary.
    #[must_use]
    pub fn summary(&self) -> Movie {
        Movie {
            id: self.id,
            title: self.title.clone(),
            release_date: self.release_date.clone(),
            poster_path: self.poster_path.clone(),
            overview: self.overview.clone(),
            vote_average: self.vote_average,
        }
    }

    /// Returns the release year, if known.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        year_of(self.release_date.as_deref())
    }
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Spoken language entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpokenLanguage {
    /// ISO 639-1 code.
    pub iso_639_1: String,
    /// English name.
    #[serde(default)]
    pub english_name: String,
    /// Native name.
    #[serde(default)]
    pub name: String,
}

/// Production country entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductionCountry {
    /// ISO 3166-1 code.
    pub iso_3166_1: String,
    /// Country name.
    pub name: String,
}

/// Production company entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductionCompany {
    /// Company ID.
    pub id: u64,
    /// Company name.
    pub name: String,
    /// Logo image path.
    #[serde(default)]
    pub logo_path: Option<String>,
    /// Origin country (ISO 3166-1).
    #[serde(default, deserialize_with = "null_as_default")]
    pub origin_country: String,
}

// --- Credits ---

/// Response from `movie/{movie_id}/credits` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    /// Cast in billing order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub cast: Vec<CastMember>,
    /// Crew members.
    #[serde(default, deserialize_with = "null_as_default")]
    pub crew: Vec<CrewMember>,
}

/// A single cast credit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CastMember {
    /// Person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Character played.
    #[serde(default, deserialize_with = "null_as_default")]
    pub character: String,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
    /// Billing order.
    #[serde(default)]
    pub order: u32,
}

/// A single crew credit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CrewMember {
    /// Person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Job title (e.g., "Director", "Screenplay").
    #[serde(default, deserialize_with = "null_as_default")]
    pub job: String,
    /// Department (e.g., "Directing", "Writing").
    #[serde(default, deserialize_with = "null_as_default")]
    pub department: String,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
}

// --- Videos ---

/// Response from `movie/{movie_id}/videos` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideosResponse {
    /// Video entries.
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Video>,
}

/// Hosting site name for YouTube videos.
pub const YOUTUBE_SITE: &str = "YouTube";

/// A video attached to a movie (trailer, teaser, featurette, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Video {
    /// Video ID.
    #[serde(default)]
    pub id: String,
    /// Site-specific video key.
    pub key: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Hosting site (e.g., "YouTube", "Vimeo").
    #[serde(default)]
    pub site: String,
    /// Video type (e.g., "Trailer", "Teaser", "Featurette").
    #[serde(rename = "type", default)]
    pub video_type: String,
    /// Official flag.
    #[serde(default)]
    pub official: bool,
}

impl Video {
    /// Returns `true` if the video is hosted on YouTube.
    #[must_use]
    pub fn is_youtube(&self) -> bool {
        self.site == YOUTUBE_SITE
    }

    /// Builds an autoplaying YouTube embed URL, or `None` for other hosts.
    #[must_use]
    pub fn youtube_embed_url(&self) -> Option<String> {
        self.is_youtube().then(|| {
            format!(
                "https://www.youtube.com/embed/{}?autoplay=1&rel=0&modestbranding=1",
                self.key
            )
        })
    }
}

// --- Reviews ---

/// Response from `movie/{movie_id}/reviews` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewsResponse {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Review entries.
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Review>,
}

/// A user review.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Review {
    /// Review ID.
    #[serde(default)]
    pub id: String,
    /// Author display name.
    pub author: String,
    /// Author metadata, including the optional rating.
    #[serde(default)]
    pub author_details: AuthorDetails,
    /// Review body.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Creation timestamp (ISO 8601).
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Review {
    /// Returns the author's rating (0-10), if given.
    #[must_use]
    pub const fn rating(&self) -> Option<f64> {
        self.author_details.rating
    }
}

/// Review author metadata.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AuthorDetails {
    /// Username.
    #[serde(default)]
    pub username: Option<String>,
    /// Rating given by the author.
    #[serde(default)]
    pub rating: Option<f64>,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    pub success: bool,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_movie_blank_release_date_is_none() {
        // Arrange
        let json = r#"{"id":1,"title":"Untitled","release_date":"","poster_path":null,"overview":null}"#;

        // Act
        let movie: Movie = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(movie.release_date, None);
        assert_eq!(movie.overview, "");
        assert_eq!(movie.release_year(), None);
    }

    #[test]
    fn test_movie_release_year() {
        // Arrange
        let json = r#"{"id":27205,"title":"Inception","release_date":"2010-07-15","vote_average":8.4}"#;

        // Act
        let movie: Movie = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(movie.release_year(), Some(2010));
    }

    #[test]
    fn test_movie_malformed_release_date_has_no_year() {
        // Arrange
        let json = r#"{"id":3,"title":"Odd","release_date":"sometime"}"#;

        // Act
        let movie: Movie = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(movie.release_date.as_deref(), Some("sometime"));
        assert_eq!(movie.release_year(), None);
    }

    #[test]
    fn test_movie_list_missing_results_defaults_empty() {
        // Arrange
        let json = r#"{"status_code":34,"status_message":"The resource you requested could not be found."}"#;

        // Act
        let response: MovieListResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_video_youtube_embed_url() {
        // Arrange
        let json = r#"{"key":"YoHD9XEInc0","site":"YouTube","type":"Trailer","name":"Official Trailer"}"#;

        // Act
        let video: Video = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(video.video_type, "Trailer");
        assert_eq!(
            video.youtube_embed_url().as_deref(),
            Some("https://www.youtube.com/embed/YoHD9XEInc0?autoplay=1&rel=0&modestbranding=1")
        );
    }

    #[test]
    fn test_video_other_site_has_no_embed_url() {
        // Arrange
        let json = r#"{"key":"12345","site":"Vimeo","type":"Trailer"}"#;

        // Act
        let video: Video = serde_json::from_str(json).unwrap();

        // Assert
        assert!(video.youtube_embed_url().is_none());
    }

    #[test]
    fn test_review_rating_from_author_details() {
        // Arrange
        let json = r#"{"id":"r1","author":"critic","author_details":{"username":"critic","rating":7.0},"content":"Good."}"#;

        // Act
        let review: Review = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(review.rating(), Some(7.0));
    }

    #[test]
    fn test_review_without_rating() {
        // Arrange
        let json = r#"{"id":"r2","author":"anon","author_details":{"rating":null},"content":"Hmm."}"#;

        // Act
        let review: Review = serde_json::from_str(json).unwrap();

        // Assert
        assert!(review.rating().is_none());
    }

    #[test]
    fn test_movie_serialize_roundtrip_keeps_fields() {
        // Arrange
        let movie = Movie {
            id: 603,
            title: String::from("The Matrix"),
            release_date: Some(String::from("1999-03-30")),
            poster_path: Some(String::from("/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg")),
            overview: String::from("Set in the 22nd century..."),
            vote_average: 8.2,
        };

        // Act
        let json = serde_json::to_string(&movie).unwrap();
        let parsed: Movie = serde_json::from_str(&json).unwrap();

        // Assert
        assert_eq!(parsed, movie);
    }
}

//! Request parameters for TMDB endpoints.

/// Parameters for `search/movie` endpoint.
#[derive(Debug, Clone)]
pub struct SearchMovieParams {
    /// Search query (required).
    pub query: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Filter by primary release year.
    pub primary_release_year: Option<u32>,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchMovieParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            primary_release_year: None,
            include_adult: false,
        }
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the primary release year filter.
    #[must_use]
    pub const fn year(mut self, year: u32) -> Self {
        self.primary_release_year = Some(year);
        self
    }

    /// Builds the query string pairs.
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("query", self.query.clone()),
            ("page", self.page.to_string()),
            ("include_adult", self.include_adult.to_string()),
        ];
        if let Some(year) = self.primary_release_year {
            query.push(("primary_release_year", year.to_string()));
        }
        query
    }
}

/// Genre ID for Action.
pub const GENRE_ACTION: u32 = 28;
/// Genre ID for Comedy.
pub const GENRE_COMEDY: u32 = 35;
/// Genre ID for Horror.
pub const GENRE_HORROR: u32 = 27;

/// A curated or genre-filtered movie list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovieListKind {
    /// `trending/movie/day`.
    TrendingDay,
    /// `movie/top_rated`.
    TopRated,
    /// `movie/popular`.
    Popular,
    /// `movie/upcoming`.
    Upcoming,
    /// `movie/now_playing`.
    NowPlaying,
    /// `discover/movie` filtered by genre, sorted by popularity.
    Genre(u32),
}

impl MovieListKind {
    /// Returns the endpoint path relative to the API base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::TrendingDay => "trending/movie/day",
            Self::TopRated => "movie/top_rated",
            Self::Popular => "movie/popular",
            Self::Upcoming => "movie/upcoming",
            Self::NowPlaying => "movie/now_playing",
            Self::Genre(_) => "discover/movie",
        }
    }

    /// Builds the endpoint-specific query string pairs.
    pub(crate) fn to_query(self) -> Vec<(&'static str, String)> {
        match self {
            Self::Genre(genre_id) => vec![
                ("with_genres", genre_id.to_string()),
                ("sort_by", String::from("popularity.desc")),
            ],
            _ => Vec::new(),
        }
    }
}

//! API client library for watchbox.
//!
//! Provides a client for the TMDB movie catalog API.

/// TMDB API client.
pub mod tmdb;

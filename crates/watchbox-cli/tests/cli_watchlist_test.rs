#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(dir: &std::path::Path, base_url: &str) {
    let config = format!("[tmdb]\napi_key = \"test-key\"\nbase_url = \"{base_url}/3/\"\n");
    std::fs::write(dir.join("config.toml"), config).unwrap();
}

#[test]
fn test_help_lists_commands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("watchbox");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("watchlist"))
        .stdout(predicate::str::contains("suggest"))
        .stdout(predicate::str::contains("details"));
}

#[test]
fn test_watchlist_list_empty() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("watchbox");
    cmd.args(["watchlist", "list", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Your watchlist is empty"));
}

#[test]
fn test_watchlist_remove_missing_is_noop() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("watchbox");
    cmd.args(["watchlist", "remove", "--id", "42", "--yes", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("not in your watchlist"));
}

#[test]
fn test_watchlist_remove_missing_id_arg() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("watchbox");
    cmd.args(["watchlist", "remove"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--id"));
}

#[test]
fn test_search_without_api_key_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("watchbox");
    cmd.env_remove("TMDB_API_KEY")
        .args(["search", "--query", "Inception", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key is not configured"));
}

#[test]
fn test_details_with_placeholder_key_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("watchbox");
    cmd.env("TMDB_API_KEY", "YOUR_API_KEY_HERE")
        .args(["details", "--id", "27205", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("placeholder"));
}

#[test]
fn test_suggest_short_query_issues_no_request() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("watchbox");
    cmd.env("TMDB_API_KEY", "test-key")
        .args(["suggest", "--query", "a", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("at least 2 characters"));
}

#[test]
fn test_init_writes_placeholder_config_once() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act
    let mut first = cargo_bin_cmd!("watchbox");
    first.args(["init", "--dir"]).arg(dir.path()).assert().success();
    let mut second = cargo_bin_cmd!("watchbox");
    let assert = second.args(["init", "--dir"]).arg(dir.path()).assert();

    // Assert
    assert
        .success()
        .stdout(predicate::str::contains("Config already exists"));
    let content = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(content.contains("YOUR_API_KEY_HERE"));
    assert!(content.contains("movieWatchlist"));
}

#[tokio::test]
async fn test_watchlist_add_then_list_and_remove() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/27205"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
            "../../../fixtures/tmdb/movie_details_27205.json"
        )))
        .expect(2)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server.uri());

    // Act
    let mut add = cargo_bin_cmd!("watchbox");
    add.env_remove("TMDB_API_KEY")
        .args(["watchlist", "add", "--id", "27205", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Inception added to watchlist"));
    let mut again = cargo_bin_cmd!("watchbox");
    again
        .env_remove("TMDB_API_KEY")
        .args(["watchlist", "add", "--id", "27205", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Movie already in watchlist"));

    // Assert
    let mut list = cargo_bin_cmd!("watchbox");
    list.args(["watchlist", "list", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Inception (2010)"));
    let mut remove = cargo_bin_cmd!("watchbox");
    remove
        .args(["watchlist", "remove", "--id", "27205", "--yes", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Movie removed from watchlist"));
}

#[tokio::test]
async fn test_search_against_mock_catalog() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .and(query_param("query", "Inception"))
        .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
            "../../../fixtures/tmdb/search_movie_inception.json"
        )))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server.uri());

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("watchbox");
    cmd.env_remove("TMDB_API_KEY")
        .args(["search", "--query", "Inception", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 6 movies"));
}

async fn seed_watchlist(dir: &std::path::Path) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/movie/27205"))
        .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
            "../../../fixtures/tmdb/movie_details_27205.json"
        )))
        .mount(&server)
        .await;
    write_config(dir, &server.uri());
    let mut add = cargo_bin_cmd!("watchbox");
    add.env_remove("TMDB_API_KEY")
        .args(["watchlist", "add", "--id", "27205", "--dir"])
        .arg(dir)
        .assert()
        .success();
    server
}

#[tokio::test]
async fn test_watchlist_remove_declined_keeps_movie() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let _server = seed_watchlist(dir.path()).await;

    // Act
    let mut remove = cargo_bin_cmd!("watchbox");
    remove
        .args(["watchlist", "remove", "--id", "27205", "--dir"])
        .arg(dir.path())
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."));

    // Assert
    let mut list = cargo_bin_cmd!("watchbox");
    list.args(["watchlist", "list", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Inception (2010)"));
}

#[tokio::test]
async fn test_watchlist_remove_without_terminal_needs_yes_flag() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let _server = seed_watchlist(dir.path()).await;

    // Act
    let mut remove = cargo_bin_cmd!("watchbox");
    remove
        .args(["watchlist", "remove", "--id", "27205", "--dir"])
        .arg(dir.path())
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("pass --yes"))
        .stdout(predicate::str::contains("Cancelled."));

    // Assert
    let mut list = cargo_bin_cmd!("watchbox");
    list.args(["watchlist", "list", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Inception (2010)"));
}

#[tokio::test]
async fn test_suggest_failure_is_reported() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server.uri());

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("watchbox");
    cmd.env_remove("TMDB_API_KEY")
        .args(["suggest", "--query", "Inception", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed to fetch suggestions"))
        .stdout(predicate::str::contains("No suggestions."));
}

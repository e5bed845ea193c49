// ============================================================================
// iTunes Search API client
// ============================================================================
// Endpoint: https://itunes.apple.com/search
// No API key required; responses are plain JSON. Each result object may carry
// an `artworkUrl100` field pointing at 100x100 cover art, which is all this
// app cares about.
// ============================================================================

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

pub const SEARCH_ENDPOINT: &str = "https://itunes.apple.com/search";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default, rename = "artworkUrl100")]
    artwork_url: Option<String>,
}

impl SearchResponse {
    /// Artwork urls in response order; entries with a missing or null
    /// `artworkUrl100` are skipped.
    pub fn artwork_urls(self) -> Vec<String> {
        self.results
            .into_iter()
            .filter_map(|r| r.artwork_url)
            .collect()
    }
}

/// Build the search URL with proper parameters.
pub fn build_search_url(term: &str, limit: u32, media: &str) -> String {
    format!(
        "{SEARCH_ENDPOINT}?term={}&limit={limit}&media={media}",
        urlencoding::encode(term)
    )
}

pub fn http_client(timeout: Duration) -> Result<Client, FetchError> {
    Ok(Client::builder()
        .timeout(timeout)
        .user_agent(concat!("tunewall/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Runs one keyword search and returns the candidate artwork urls. The list
/// may still contain duplicates; the pool dedups it.
pub fn search_artwork_urls(
    client: &Client,
    term: &str,
    limit: u32,
    media: &str,
) -> Result<Vec<String>, FetchError> {
    let url = build_search_url(term, limit, media);
    log::debug!("GET {url}");
    let response: SearchResponse = client.get(&url).send()?.error_for_status()?.json()?;
    Ok(response.artwork_urls())
}

/// Downloads one artwork image as raw bytes.
pub fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let bytes = client.get(url).send()?.error_for_status()?.bytes()?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_encodes_term_and_appends_parameters() {
        assert_eq!(
            build_search_url("daft punk", 150, "music"),
            "https://itunes.apple.com/search?term=daft%20punk&limit=150&media=music"
        );
        assert_eq!(
            build_search_url("AC/DC", 25, "music"),
            "https://itunes.apple.com/search?term=AC%2FDC&limit=25&media=music"
        );
    }

    #[test]
    fn parser_skips_null_and_absent_artwork_fields() {
        let json = r#"{
            "resultCount": 4,
            "results": [
                {"artworkUrl100": "https://img/1.jpg", "trackName": "one"},
                {"artworkUrl100": null},
                {"wrapperType": "track"},
                {"artworkUrl100": "https://img/2.jpg"}
            ]
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.artwork_urls(),
            vec!["https://img/1.jpg".to_string(), "https://img/2.jpg".to_string()]
        );
    }

    #[test]
    fn parser_tolerates_empty_result_sets() {
        let response: SearchResponse = serde_json::from_str(r#"{"resultCount":0,"results":[]}"#).unwrap();
        assert!(response.artwork_urls().is_empty());

        // some error payloads omit the array entirely
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.artwork_urls().is_empty());
    }
}

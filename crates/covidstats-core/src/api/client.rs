//! API client for the virus tracker global stats feed.
//!
//! This module provides the `StatsClient` struct, which issues the single
//! GET request the app needs and turns the body into typed records.

use reqwest::Client;
use tracing::{debug, warn};

use crate::models::{GlobalStats, GlobalStatsResponse};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Global stats endpoint of the free tracker API
pub const GLOBAL_STATS_URL: &str = "https://thevirustracker.com/free-api?global=stats";

/// API client for the global stats feed.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct StatsClient {
    client: Client,
    url: String,
}

impl StatsClient {
    /// Create a client for the public endpoint
    pub fn new() -> Result<Self, ApiError> {
        Self::with_url(GLOBAL_STATS_URL)
    }

    /// Create a client for a different endpoint (mirrors, tests)
    pub fn with_url(url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Fetch the global stats records.
    ///
    /// One request, no retry. A body that is not valid JSON for the
    /// response shape yields `ApiError::Decode`; a valid body without a
    /// `results` array yields `ApiError::MissingResults`.
    pub async fn fetch(&self) -> Result<Vec<GlobalStats>, ApiError> {
        debug!(url = %self.url, "Fetching global stats");

        let response = self.client.get(&self.url).send().await.map_err(|e| {
            warn!(url = %self.url, error = %e, "Global stats request failed");
            ApiError::Network(e)
        })?;

        let response = Self::check_response(response).await?;
        let body = response.bytes().await?;

        let stats = Self::decode(&body)?;
        debug!(count = stats.len(), "Global stats decoded");
        Ok(stats)
    }

    /// Decode a response body into stat records.
    pub fn decode(body: &[u8]) -> Result<Vec<GlobalStats>, ApiError> {
        let parsed: GlobalStatsResponse = serde_json::from_slice(body)?;
        if let Some(ref stat) = parsed.stat {
            debug!(stat = %stat, "Stats response status");
        }
        parsed.results.ok_or(ApiError::MissingResults)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response on a loopback port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}/free-api?global=stats", addr)
    }

    #[test]
    fn test_decode_results() {
        let stats = StatsClient::decode(
            br#"{"results":[{"total_cases":10,"total_deaths":1}],"stat":"ok"}"#,
        )
        .unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].total_cases, Some(10));
        assert_eq!(stats[0].total_recovered, None);
    }

    #[test]
    fn test_decode_malformed_body() {
        let err = StatsClient::decode(b"<html>maintenance</html>").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_decode_missing_results() {
        let err = StatsClient::decode(br#"{"stat":"error"}"#).unwrap_err();
        assert!(matches!(err, ApiError::MissingResults));
    }

    #[test]
    fn test_decode_empty_results() {
        let stats = StatsClient::decode(br#"{"results":[]}"#).unwrap();
        assert!(stats.is_empty());
    }

    #[test]
    fn test_default_url() {
        let client = StatsClient::new().unwrap();
        assert_eq!(client.url(), GLOBAL_STATS_URL);
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let url = serve_once(
            "200 OK",
            r#"{"results":[{"total_cases":5,"total_deaths":2,"total_recovered":1,"total_unresolved":null}],"stat":"ok"}"#,
        )
        .await;

        let client = StatsClient::with_url(url).unwrap();
        let stats = client.fetch().await.unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].cases(), 5);
        assert_eq!(stats[0].unresolved(), 0);
    }

    #[tokio::test]
    async fn test_fetch_malformed_json_is_recoverable() {
        let url = serve_once("200 OK", r#"{"results": [ {"total_cases": 1"#).await;

        let client = StatsClient::with_url(url).unwrap();
        let err = client.fetch().await.unwrap_err();
        assert!(err.is_decode());
    }

    #[tokio::test]
    async fn test_fetch_server_error_status() {
        let url = serve_once("503 Service Unavailable", "down for maintenance").await;

        let client = StatsClient::with_url(url).unwrap();
        let err = client.fetch().await.unwrap_err();
        assert!(matches!(err, ApiError::ServerError(ref body) if body == "down for maintenance"));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Bind then drop to get a port nothing is listening on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = StatsClient::with_url(format!("http://{}/", addr)).unwrap();
        let err = client.fetch().await.unwrap_err();
        assert!(err.is_transport());
    }
}

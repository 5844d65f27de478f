//! Metadata Document Fetching
//!
//! Turns a `tokenURI` into an [`AgentDocument`]. Every failure along the way (bad URI,
//! transport error, non-2xx status, unparsable body, schema mismatch) becomes a partial
//! document rather than an error, so each resolved entry always yields exactly one record.

pub mod http;

use crate::agent::domain::{is_http_url, validate, AgentDocument, PartialAgent};
use crate::error::FetchError;
use async_trait::async_trait;
use tracing::{debug, warn};

pub use http::{HttpDocumentSource, HttpSourceConfig};

/// Raw response of a JSON GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpDocument {
    pub status: u16,
    pub status_text: String,
    pub body: Vec<u8>,
}

impl HttpDocument {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of off-chain metadata documents.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// GET `url` with `Accept: application/json`.
    ///
    /// Non-2xx responses are returned as `Ok` with their status; `Err` is for requests that
    /// produced no response.
    async fn get_json(&self, url: &str) -> Result<HttpDocument, FetchError>;
}

/// Rewrite `ipfs://` URIs onto an HTTP gateway when one is configured.
pub fn normalize_token_uri(uri: &str, ipfs_gateway: Option<&str>) -> String {
    let uri = uri.trim();
    match (uri.strip_prefix("ipfs://"), ipfs_gateway) {
        (Some(path), Some(gateway)) => {
            let path = path.strip_prefix("ipfs/").unwrap_or(path);
            format!("{}/ipfs/{}", gateway.trim_end_matches('/'), path)
        }
        _ => uri.to_string(),
    }
}

/// Fetch and validate the document behind `uri`.
///
/// URIs that are not http(s) are rejected without touching the network.
pub async fn fetch_document(source: &dyn DocumentSource, uri: &str) -> AgentDocument {
    if !is_http_url(uri) {
        warn!(uri, "Skipping non-http tokenURI");
        return PartialAgent::from_error(format!("Invalid tokenURI: {}", uri)).into();
    }

    let response = match source.get_json(uri).await {
        Ok(response) => response,
        Err(e) => {
            warn!(uri, error = %e, "Metadata fetch failed");
            return PartialAgent::from_error(format!("Fetch error: {}", e)).into();
        }
    };

    if !response.is_success() {
        warn!(uri, status = response.status, "Metadata fetch returned non-success status");
        let status = if response.status_text.is_empty() {
            response.status.to_string()
        } else {
            format!("{} {}", response.status, response.status_text)
        };
        return PartialAgent::from_error(format!("Failed to fetch tokenURI ({})", status)).into();
    }

    let raw: serde_json::Value = match serde_json::from_slice(&response.body) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(uri, error = %e, "Metadata document is not valid JSON");
            return PartialAgent::from_error(format!("Invalid JSON: {}", e)).into();
        }
    };

    let document = validate(&raw);
    if let Some(error) = document.error() {
        debug!(uri, error, "Metadata document failed strict validation");
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::domain::REGISTRATION_TYPE;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    #[derive(Default)]
    struct StaticSource {
        responses: HashMap<String, Result<HttpDocument, FetchError>>,
        requested: Mutex<Vec<String>>,
    }

    impl StaticSource {
        fn with(mut self, url: &str, response: Result<HttpDocument, FetchError>) -> Self {
            self.responses.insert(url.to_string(), response);
            self
        }
    }

    #[async_trait]
    impl DocumentSource for StaticSource {
        async fn get_json(&self, url: &str) -> Result<HttpDocument, FetchError> {
            self.requested.lock().push(url.to_string());
            self.responses
                .get(url)
                .cloned()
                .unwrap_or_else(|| Err(FetchError::Transport("connection refused".to_string())))
        }
    }

    fn ok(body: &str) -> Result<HttpDocument, FetchError> {
        Ok(HttpDocument {
            status: 200,
            status_text: "OK".to_string(),
            body: body.as_bytes().to_vec(),
        })
    }

    #[tokio::test]
    async fn test_invalid_uri_skips_network() {
        let source = StaticSource::default();
        let doc = fetch_document(&source, "ipfs://bafy/agent.json").await;
        assert_eq!(doc.error(), Some("Invalid tokenURI: ipfs://bafy/agent.json"));
        assert!(source.requested.lock().is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_message() {
        let source = StaticSource::default().with("https://a/1", Err(FetchError::Timeout));
        let doc = fetch_document(&source, "https://a/1").await;
        assert_eq!(doc.error(), Some("Fetch error: timeout"));
    }

    #[tokio::test]
    async fn test_non_success_status_message() {
        let source = StaticSource::default().with(
            "https://a/1",
            Ok(HttpDocument {
                status: 404,
                status_text: "Not Found".to_string(),
                body: Vec::new(),
            }),
        );
        let doc = fetch_document(&source, "https://a/1").await;
        assert_eq!(doc.error(), Some("Failed to fetch tokenURI (404 Not Found)"));
    }

    #[tokio::test]
    async fn test_status_without_reason_message() {
        let source = StaticSource::default().with(
            "https://a/1",
            Ok(HttpDocument {
                status: 599,
                status_text: String::new(),
                body: Vec::new(),
            }),
        );
        let doc = fetch_document(&source, "https://a/1").await;
        assert_eq!(doc.error(), Some("Failed to fetch tokenURI (599)"));
    }

    #[tokio::test]
    async fn test_unparsable_body_is_partial() {
        let source = StaticSource::default().with("https://a/1", ok("<html>"));
        let doc = fetch_document(&source, "https://a/1").await;
        let partial = doc.as_partial().expect("partial");
        assert!(partial.error().starts_with("Invalid JSON"));
        assert!(partial.is_error_only());
    }

    #[tokio::test]
    async fn test_valid_body_is_full() {
        let body = serde_json::json!({
            "type": REGISTRATION_TYPE,
            "name": "Atlas",
            "description": "Maps",
            "image": "https://example.com/atlas.png",
            "endpoints": []
        })
        .to_string();
        let source = StaticSource::default().with("https://a/1", ok(&body));
        let doc = fetch_document(&source, "https://a/1").await;
        assert!(doc.is_full());
        assert_eq!(doc.name(), Some("Atlas"));
    }

    #[test]
    fn test_normalize_token_uri() {
        assert_eq!(
            normalize_token_uri("ipfs://bafy/agent.json", Some("https://gw.example/")),
            "https://gw.example/ipfs/bafy/agent.json"
        );
        assert_eq!(
            normalize_token_uri("ipfs://ipfs/bafy", Some("https://gw.example")),
            "https://gw.example/ipfs/bafy"
        );
        assert_eq!(
            normalize_token_uri("ipfs://bafy/agent.json", None),
            "ipfs://bafy/agent.json"
        );
        assert_eq!(
            normalize_token_uri(" https://a/b ", Some("https://gw.example")),
            "https://a/b"
        );
    }
}

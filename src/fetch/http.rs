//! reqwest-backed [`DocumentSource`].

use super::{DocumentSource, HttpDocument};
use crate::error::{FetchError, ResolverError};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;

/// Limits applied to every outbound metadata request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSourceConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    /// Responses larger than this fail with [`FetchError::BodyTooLarge`]
    pub max_response_bytes: usize,
    pub user_agent: String,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_response_bytes: 1024 * 1024,
            user_agent: format!("registry-resolver/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Fetches metadata documents over HTTP(S).
pub struct HttpDocumentSource {
    client: Client,
    max_response_bytes: usize,
}

impl HttpDocumentSource {
    pub fn new(config: &HttpSourceConfig) -> Result<Self, ResolverError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ResolverError::HttpClient(e.to_string()))?;
        Ok(Self {
            client,
            max_response_bytes: config.max_response_bytes,
        })
    }
}

fn transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(err.to_string())
    }
}

/// Reason phrase sent by the server, else the canonical one for the status code.
fn reason_phrase(response: &reqwest::Response) -> String {
    match response.extensions().get::<hyper::ext::ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
    }
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn get_json(&self, url: &str) -> Result<HttpDocument, FetchError> {
        let mut response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let status_text = reason_phrase(&response);
        let limit = self.max_response_bytes;
        if response
            .content_length()
            .is_some_and(|length| length > limit as u64)
        {
            return Err(FetchError::BodyTooLarge { limit });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(transport_error)? {
            if body.len() + chunk.len() > limit {
                return Err(FetchError::BodyTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(HttpDocument {
            status: status.as_u16(),
            status_text,
            body,
        })
    }
}

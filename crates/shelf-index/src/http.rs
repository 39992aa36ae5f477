//! Client for a hosted vector index speaking the REST query protocol.
//!
//! `POST {url}/query` with the JSON [`QueryRequest`] as body and an optional
//! bearer token. A successful response is the envelope
//! `{ "result": [QueryMatch, ...] }`. Plain HTTP only; put a TLS-terminating
//! proxy in front of remote indexes.

use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{header, Method, Request, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use serde::Deserialize;
use shelf_core::config::IndexConfig;
use shelf_core::{QueryMatch, QueryRequest, Result, SearchError};

use crate::VectorIndex;

#[derive(Deserialize)]
struct QueryEnvelope {
    result: Vec<QueryMatch>,
}

/// [`VectorIndex`] backed by a remote index over HTTP.
#[derive(Clone)]
pub struct HttpIndex {
    client: Client<HttpConnector, Full<Bytes>>,
    query_uri: Uri,
    token: Option<String>,
    timeout: Duration,
}

impl HttpIndex {
    pub fn new(config: &IndexConfig) -> anyhow::Result<Self> {
        let query_uri: Uri = format!("{}/query", config.url.trim_end_matches('/')).parse()?;
        anyhow::ensure!(
            query_uri.scheme_str() == Some("http"),
            "index url must use http://, got {}",
            config.url
        );

        Ok(Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
            query_uri,
            token: (!config.token.is_empty()).then(|| config.token.clone()),
            timeout: Duration::from_millis(config.timeout_ms),
        })
    }

    pub fn query_uri(&self) -> &Uri {
        &self.query_uri
    }

    async fn send(&self, request: &QueryRequest) -> Result<Vec<QueryMatch>> {
        let body = serde_json::to_vec(request)
            .map_err(|e| SearchError::upstream(format!("encoding request: {e}")))?;

        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(self.query_uri.clone())
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = &self.token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = builder
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| SearchError::upstream(format!("building request: {e}")))?;

        let resp = self
            .client
            .request(req)
            .await
            .map_err(|e| SearchError::upstream(format!("sending request: {e}")))?;

        let status = resp.status();
        let bytes = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| SearchError::upstream(format!("reading response: {e}")))?
            .to_bytes();

        if !status.is_success() {
            return Err(SearchError::UpstreamQueryFailure {
                status: Some(status.as_u16()),
                message: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        let envelope: QueryEnvelope = serde_json::from_slice(&bytes).map_err(|e| {
            SearchError::UpstreamQueryFailure {
                status: Some(status.as_u16()),
                message: format!("decoding response: {e}"),
            }
        })?;
        Ok(envelope.result)
    }
}

#[async_trait::async_trait]
impl VectorIndex for HttpIndex {
    async fn query(&self, request: &QueryRequest) -> Result<Vec<QueryMatch>> {
        let result = match tokio::time::timeout(self.timeout, self.send(request)).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::upstream(format!(
                "no response within {}ms",
                self.timeout.as_millis()
            ))),
        };

        match &result {
            Ok(hits) => tracing::debug!(uri = %self.query_uri, hits = hits.len(), "index query"),
            Err(e) => tracing::warn!(uri = %self.query_uri, error = %e, "index query failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> IndexConfig {
        IndexConfig {
            url: url.to_string(),
            ..IndexConfig::default()
        }
    }

    #[test]
    fn query_uri_appends_path() {
        let index = HttpIndex::new(&config("http://127.0.0.1:8080/")).unwrap();
        assert_eq!(index.query_uri().to_string(), "http://127.0.0.1:8080/query");
        assert!(index.token.is_none());
    }

    #[test]
    fn token_is_kept_when_configured() {
        let index = HttpIndex::new(&IndexConfig {
            token: "secret".to_string(),
            ..config("http://localhost:9000")
        })
        .unwrap();
        assert_eq!(index.token.as_deref(), Some("secret"));
    }

    #[test]
    fn non_http_urls_are_rejected() {
        assert!(HttpIndex::new(&config("https://index.example.com")).is_err());
        assert!(HttpIndex::new(&config("not a url")).is_err());
    }
}

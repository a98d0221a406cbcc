//! HTTP clients for the search and analysis providers.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Instant;
use tracing::{debug, warn};

use super::config::{AnalysisConfig, SearchConfig};
use super::models::{Credential, SearchRequest, SearchResponse};
use super::protocols::{AnalysisProvider, SearchProvider};
use crate::document::AnalysisDocument;
use crate::errors::{ProviderError, ProviderKind};

fn build_client(
    timeout: Option<std::time::Duration>,
    provider: ProviderKind,
) -> Result<Client, ProviderError> {
    let mut builder = Client::builder().user_agent(concat!("siteprobe/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| ProviderError::transport(provider, e.to_string()))
}

/// Search provider client (Serper-compatible).
#[derive(Debug, Clone)]
pub struct SerperClient {
    http: Client,
    config: SearchConfig,
}

impl SerperClient {
    /// Creates a client.
    pub fn new(config: SearchConfig) -> Result<Self, ProviderError> {
        let http = build_client(config.timeout(), ProviderKind::Search)?;
        Ok(Self { http, config })
    }

    /// Gets the configuration.
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

#[async_trait]
impl SearchProvider for SerperClient {
    async fn search(
        &self,
        query: &str,
        api_key: &Credential,
    ) -> Result<SearchResponse, ProviderError> {
        let started = Instant::now();
        let response = self
            .http
            .post(&self.config.endpoint)
            .header(self.config.api_key_header.as_str(), api_key.expose())
            .json(&SearchRequest { q: query })
            .send()
            .await
            .map_err(|e| ProviderError::transport(ProviderKind::Search, e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), query, "Search provider returned an error");
            return Err(ProviderError::status(ProviderKind::Search, status.as_u16()));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::transport(ProviderKind::Search, e.to_string()))?;

        debug!(
            query,
            organic = parsed.organic.len(),
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Search completed"
        );
        Ok(parsed)
    }
}

/// Content analysis client (Diffbot Analyze-compatible).
#[derive(Debug, Clone)]
pub struct DiffbotClient {
    http: Client,
    config: AnalysisConfig,
}

impl DiffbotClient {
    /// Creates a client.
    pub fn new(config: AnalysisConfig) -> Result<Self, ProviderError> {
        let http = build_client(config.timeout(), ProviderKind::Analysis)?;
        Ok(Self { http, config })
    }

    /// Gets the configuration.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}

#[async_trait]
impl AnalysisProvider for DiffbotClient {
    async fn analyze(
        &self,
        url: &str,
        token: &Credential,
    ) -> Result<AnalysisDocument, ProviderError> {
        let started = Instant::now();
        let response = self
            .http
            .get(&self.config.endpoint)
            .query(&[("url", url), ("token", token.expose())])
            .send()
            .await
            .map_err(|e| ProviderError::transport(ProviderKind::Analysis, e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), url, "Analysis provider returned an error");
            return Err(ProviderError::status(ProviderKind::Analysis, status.as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::transport(ProviderKind::Analysis, e.to_string()))?;

        debug!(
            url,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Analysis completed"
        );
        Ok(AnalysisDocument::new(url, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_serper_client_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/search")
            .match_header("x-api-key", "k-123")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"q": "site:example.com rust"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"organic": [{"link": "https://example.com/a"}, {"link": "https://example.com/b"}]}"#)
            .create_async()
            .await;

        let client =
            SerperClient::new(SearchConfig::new().with_endpoint(format!("{}/search", server.url())))
                .unwrap();
        let response = client
            .search("site:example.com rust", &Credential::new("k-123"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            response.top_links(5),
            vec!["https://example.com/a", "https://example.com/b"]
        );
    }

    #[tokio::test]
    async fn test_serper_client_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/search")
            .with_status(403)
            .with_body(r#"{"message": "Unauthorized"}"#)
            .create_async()
            .await;

        let client =
            SerperClient::new(SearchConfig::new().with_endpoint(format!("{}/search", server.url())))
                .unwrap();
        let err = client
            .search("q", &Credential::new("bad"))
            .await
            .unwrap_err();

        assert_eq!(err, ProviderError::status(ProviderKind::Search, 403));
    }

    #[tokio::test]
    async fn test_serper_client_invalid_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/search")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client =
            SerperClient::new(SearchConfig::new().with_endpoint(format!("{}/search", server.url())))
                .unwrap();
        let err = client.search("q", &Credential::new("k")).await.unwrap_err();
        assert_eq!(err.provider, ProviderKind::Search);
        assert!(err.status.is_none());
    }

    #[tokio::test]
    async fn test_diffbot_client_sends_query_params() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v3/analyze")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("url".into(), "https://example.com/page?id=1".into()),
                Matcher::UrlEncoded("token".into(), "tok".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"type": "article", "objects": [{"title": "Hello"}]}"#)
            .create_async()
            .await;

        let client = DiffbotClient::new(
            AnalysisConfig::new().with_endpoint(format!("{}/v3/analyze", server.url())),
        )
        .unwrap();
        let doc = client
            .analyze("https://example.com/page?id=1", &Credential::new("tok"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(doc.url, "https://example.com/page?id=1");
        assert_eq!(doc.collection("objects").map(<[_]>::len), Some(1));
    }

    #[tokio::test]
    async fn test_diffbot_client_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v3/analyze")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = DiffbotClient::new(
            AnalysisConfig::new().with_endpoint(format!("{}/v3/analyze", server.url())),
        )
        .unwrap();
        let err = client
            .analyze("https://example.com", &Credential::new("tok"))
            .await
            .unwrap_err();
        assert_eq!(err, ProviderError::status(ProviderKind::Analysis, 500));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let client = DiffbotClient::new(
            AnalysisConfig::new().with_endpoint("http://127.0.0.1:9/v3/analyze"),
        )
        .unwrap();
        let err = client
            .analyze("https://example.com", &Credential::new("tok"))
            .await
            .unwrap_err();
        assert!(err.status.is_none());
        assert!(err.message.is_some());
    }
}

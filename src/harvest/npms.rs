//! npms.io registry client.

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

use crate::config::HarvestConfig;
use crate::harvest::cursor::PaginationCursor;
use crate::model::{PackageDetail, SearchResponse, SearchResult};
use crate::traits::{RegistryClient, RegistryError};

pub const DEFAULT_REGISTRY_URL: &str = "https://api.npms.io/v2";

/// HTTP client for the npms.io search and package endpoints.
pub struct NpmsClient {
    client: Client,
    base_url: String,
}

impl NpmsClient {
    /// Builds a client against `base_url` (e.g. `https://api.npms.io/v2`).
    ///
    /// Without a timeout a stalled registry stalls the harvest.
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, RegistryError> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RegistryError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &HarvestConfig) -> Result<Self, RegistryError> {
        Self::new(
            &config.registry_url,
            &config.user_agent,
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }

    /// Per-package URL; scoped names such as `@babel/core` are percent-encoded.
    pub fn package_url(&self, name: &str) -> String {
        format!("{}/package/{}", self.base_url, urlencoding::encode(name))
    }

    async fn checked(response: Response) -> Result<Response, RegistryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RegistryError::Status {
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        })
    }
}

fn transport_error(e: reqwest::Error) -> RegistryError {
    if e.is_timeout() {
        RegistryError::Transport(format!("timed out: {e}"))
    } else {
        RegistryError::Transport(e.to_string())
    }
}

#[async_trait]
impl RegistryClient for NpmsClient {
    async fn search(
        &self,
        query: &str,
        cursor: &PaginationCursor,
    ) -> Result<Vec<SearchResult>, RegistryError> {
        debug!(
            offset = cursor.offset(),
            size = cursor.page_size(),
            "Searching registry"
        );

        let response = self
            .client
            .get(self.search_url())
            .query(&[
                ("q", query.to_string()),
                ("size", cursor.page_size().to_string()),
                ("from", cursor.offset().to_string()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let page: SearchResponse = Self::checked(response)
            .await?
            .json()
            .await
            .map_err(|e| RegistryError::Decode(e.to_string()))?;

        Ok(page.results)
    }

    async fn package(&self, name: &str) -> Result<PackageDetail, RegistryError> {
        let response = self
            .client
            .get(self.package_url(name))
            .send()
            .await
            .map_err(transport_error)?;

        Self::checked(response)
            .await?
            .json()
            .await
            .map_err(|e| RegistryError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> NpmsClient {
        NpmsClient::new(&format!("{}/v2/", server.url()), "repo-harvester-test", None).unwrap()
    }

    #[test]
    fn test_package_url_encodes_scoped_names() {
        let client = NpmsClient::new(DEFAULT_REGISTRY_URL, "ua", None).unwrap();
        assert_eq!(
            client.package_url("@babel/core"),
            "https://api.npms.io/v2/package/%40babel%2Fcore"
        );
        assert_eq!(
            client.package_url("lodash"),
            "https://api.npms.io/v2/package/lodash"
        );
        assert_eq!(client.search_url(), "https://api.npms.io/v2/search");
    }

    #[tokio::test]
    async fn test_search_sends_cursor_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "not:deprecated".into()),
                Matcher::UrlEncoded("size".into(), "50".into()),
                Matcher::UrlEncoded("from".into(), "100".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"total":1,"results":[{"package":{"name":"express"}}]}"#)
            .expect(1)
            .create_async()
            .await;

        let mut cursor = PaginationCursor::new(50);
        cursor.advance();
        cursor.advance();

        let results = client_for(&server)
            .search("not:deprecated", &cursor)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name(), "express");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/search")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let err = client_for(&server)
            .search("q", &PaginationCursor::new(10))
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_search_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"results": "nope"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .search("q", &PaginationCursor::new(10))
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::Decode(_)));
    }

    #[tokio::test]
    async fn test_package_detail_and_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/package/react")
            .with_status(200)
            .with_body(
                r#"{"collected":{"metadata":{"name":"react","repository":{"type":"git","url":"git+https://github.com/facebook/react.git"}}}}"#,
            )
            .create_async()
            .await;
        server
            .mock("GET", "/v2/package/ghost")
            .with_status(404)
            .with_body(r#"{"code":"NOT_FOUND"}"#)
            .create_async()
            .await;

        let client = client_for(&server);

        let detail = client.package("react").await.unwrap();
        assert_eq!(
            detail.repository().map(|r| r.url.as_str()),
            Some("git+https://github.com/facebook/react.git")
        );

        let err = client.package("ghost").await.unwrap_err();
        assert!(matches!(err, RegistryError::Status { status: 404, .. }));
    }
}

//! `WebcastClient` - Webcast API client implementation.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalWebcastApi;
use super::cache::{QueryCache, fingerprint};
use super::endpoint::{DEFAULT_API_DOMAIN, Endpoint, build_url, redact_key};
use super::options::QueryOptions;
use super::response::WebcastResponse;

/// Default User-Agent.
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Webcast API client.
///
/// Parsed documents are memoized per request URL for the lifetime of the
/// client, so repeating a call with identical arguments returns the same
/// document without another request.
#[allow(clippy::module_name_repetitions)]
pub struct WebcastClient {
    /// HTTP client.
    http_client: Client,
    /// API domain without trailing slash.
    domain: String,
    /// Project API key.
    api_key: String,
    /// Parsed document memo.
    cache: Mutex<QueryCache>,
    /// Verbose reporting of swallowed conditions.
    debug: AtomicBool,
}

impl fmt::Debug for WebcastClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebcastClient")
            .field("domain", &self.domain)
            .field("api_key", &"***")
            .field("debug", &self.debug.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Builder for `WebcastClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct WebcastClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
}

impl WebcastClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
        }
    }

    /// Overrides the API domain (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the project API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (default: crate name and version).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or is blank.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<WebcastClient> {
        let api_key = self.api_key.context("api_key is required")?;
        if api_key.trim().is_empty() {
            bail!("api_key must not be empty");
        }

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_API_DOMAIN);
            result.context("invalid default base URL")?
        };
        let domain = String::from(base_url.as_str().trim_end_matches('/'));

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| String::from(DEFAULT_USER_AGENT));

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .build()
            .context("failed to build HTTP client")?;

        Ok(WebcastClient {
            http_client,
            domain,
            api_key,
            cache: Mutex::new(QueryCache::new()),
            debug: AtomicBool::new(false),
        })
    }
}

impl WebcastClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> WebcastClientBuilder {
        WebcastClientBuilder::new()
    }

    /// Creates a client for the default API domain.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_key` is blank or the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Enables or disables verbose reporting.
    ///
    /// When enabled, unparseable markup and HTTP error statuses are logged
    /// at `WARN` with details instead of `DEBUG`.
    pub fn debug(&self, display: bool) {
        self.debug.store(display, Ordering::Relaxed);
    }

    /// Returns whether verbose reporting is enabled.
    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    /// Returns the full request URL for an endpoint, including the API key.
    #[must_use]
    pub fn url_for(&self, endpoint: &Endpoint, options: Option<&QueryOptions>) -> String {
        build_url(&self.domain, endpoint, &self.api_key, options)
    }

    /// Number of documents held in the query cache.
    pub async fn cached_entries(&self) -> usize {
        self.cache.lock().await.len()
    }

    /// Drops every cached document.
    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    /// Calls an endpoint by value.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    pub async fn call(
        &self,
        endpoint: Endpoint,
        options: Option<&QueryOptions>,
    ) -> Result<WebcastResponse> {
        self.fetch(&endpoint, options).await
    }

    /// Serves from the cache, or performs the GET and classifies the body.
    ///
    /// Only parsed documents are cached. The HTTP status does not affect
    /// classification.
    #[instrument(skip_all, fields(endpoint = endpoint.name()))]
    async fn fetch(
        &self,
        endpoint: &Endpoint,
        options: Option<&QueryOptions>,
    ) -> Result<WebcastResponse> {
        let url = self.url_for(endpoint, options);

        if let Some(doc) = self.cache.lock().await.get(&url) {
            tracing::debug!(fingerprint = %fingerprint(&url), "Cache hit");
            return Ok(WebcastResponse::Document(doc));
        }

        tracing::debug!(url = %redact_key(&url), "Webcast API request");

        let path = endpoint.path();
        let send_result = self.http_client.get(&url).send().await;
        let response = send_result
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("request failed: {path}"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("failed to read response body: {path}"))?;

        tracing::debug!(%status, body_len = body.len(), "Response body received");

        if !status.is_success() {
            if self.is_debug() {
                tracing::warn!(%status, %path, "Webcast API returned an error status");
            } else {
                tracing::debug!(%status, %path, "Webcast API returned an error status");
            }
        }

        let response = WebcastResponse::classify(body);
        match &response {
            WebcastResponse::Document(doc) => {
                self.cache.lock().await.put(&url, Arc::clone(doc));
            }
            WebcastResponse::Malformed { body, error } => {
                let preview: String = body.chars().take(200).collect();
                if self.is_debug() {
                    tracing::warn!(%error, %preview, "Response looked like XML but failed to parse");
                } else {
                    tracing::debug!(%error, "Response looked like XML but failed to parse");
                }
            }
            WebcastResponse::Text(_) => {}
        }

        Ok(response)
    }
}

impl LocalWebcastApi for WebcastClient {
    #[instrument(skip_all)]
    async fn medias(&self, options: Option<&QueryOptions>) -> Result<WebcastResponse> {
        self.fetch(&Endpoint::Medias, options).await
    }

    #[instrument(skip_all)]
    async fn medias_count(&self) -> Result<WebcastResponse> {
        self.fetch(&Endpoint::MediasCount, None).await
    }

    #[instrument(skip_all)]
    async fn medias_ratings(&self, options: Option<&QueryOptions>) -> Result<WebcastResponse> {
        self.fetch(&Endpoint::MediasRatings, options).await
    }

    #[instrument(skip_all)]
    async fn medias_views(&self, options: Option<&QueryOptions>) -> Result<WebcastResponse> {
        self.fetch(&Endpoint::MediasViews, options).await
    }

    #[instrument(skip_all)]
    async fn media_by_id(
        &self,
        media_id: &str,
        filter: Option<&QueryOptions>,
    ) -> Result<WebcastResponse> {
        let endpoint = Endpoint::MediaById {
            media_id: String::from(media_id),
        };
        self.fetch(&endpoint, filter).await
    }

    #[instrument(skip_all)]
    async fn media_urls_by_file_id(&self, media_file_id: &str) -> Result<WebcastResponse> {
        let endpoint = Endpoint::MediaUrlsByFileId {
            media_file_id: String::from(media_file_id),
        };
        self.fetch(&endpoint, None).await
    }

    #[instrument(skip_all)]
    async fn media_views_by_file_id(
        &self,
        media_file_id: &str,
        options: &QueryOptions,
    ) -> Result<WebcastResponse> {
        let endpoint = Endpoint::MediaViewsByFileId {
            media_file_id: String::from(media_file_id),
        };
        self.fetch(&endpoint, Some(options)).await
    }

    #[instrument(skip_all)]
    async fn media_rating_by_id(
        &self,
        media_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<WebcastResponse> {
        let endpoint = Endpoint::MediaRatingById {
            media_id: String::from(media_id),
        };
        self.fetch(&endpoint, options).await
    }

    #[instrument(skip_all)]
    async fn media_related_by_id(
        &self,
        media_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<WebcastResponse> {
        let endpoint = Endpoint::MediaRelatedById {
            media_id: String::from(media_id),
        };
        self.fetch(&endpoint, options).await
    }

    #[instrument(skip_all)]
    async fn media_thumbs_by_id(
        &self,
        media_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<WebcastResponse> {
        let endpoint = Endpoint::MediaThumbsById {
            media_id: String::from(media_id),
        };
        self.fetch(&endpoint, options).await
    }

    #[instrument(skip_all)]
    async fn media_views_by_id(&self, media_id: &str) -> Result<WebcastResponse> {
        let endpoint = Endpoint::MediaViewsById {
            media_id: String::from(media_id),
        };
        self.fetch(&endpoint, None).await
    }

    #[instrument(skip_all)]
    async fn media_urls_by_id_and_output_name(
        &self,
        media_id: &str,
        output_name: &str,
    ) -> Result<WebcastResponse> {
        let endpoint = Endpoint::MediaUrlsByIdAndOutputName {
            media_id: String::from(media_id),
            output_name: String::from(output_name),
        };
        self.fetch(&endpoint, None).await
    }

    #[instrument(skip_all)]
    async fn media_views_by_id_and_output_name(
        &self,
        media_id: &str,
        output_name: &str,
        options: &QueryOptions,
    ) -> Result<WebcastResponse> {
        let endpoint = Endpoint::MediaViewsByIdAndOutputName {
            media_id: String::from(media_id),
            output_name: String::from(output_name),
        };
        self.fetch(&endpoint, Some(options)).await
    }

    #[instrument(skip_all)]
    async fn channels(&self, options: Option<&QueryOptions>) -> Result<WebcastResponse> {
        self.fetch(&Endpoint::Channels, options).await
    }

    #[instrument(skip_all)]
    async fn channels_count(&self) -> Result<WebcastResponse> {
        self.fetch(&Endpoint::ChannelsCount, None).await
    }

    #[instrument(skip_all)]
    async fn channel_by_id(
        &self,
        channel_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<WebcastResponse> {
        let endpoint = Endpoint::ChannelById {
            channel_id: String::from(channel_id),
        };
        self.fetch(&endpoint, options).await
    }

    #[instrument(skip_all)]
    async fn outputs(&self) -> Result<WebcastResponse> {
        self.fetch(&Endpoint::Outputs, None).await
    }

    #[instrument(skip_all)]
    async fn report_detail_traffic(&self) -> Result<WebcastResponse> {
        self.fetch(&Endpoint::ReportDetailTraffic, None).await
    }

    #[instrument(skip_all)]
    async fn report_detail_medias(&self) -> Result<WebcastResponse> {
        self.fetch(&Endpoint::ReportDetailMedias, None).await
    }

    #[instrument(skip_all)]
    async fn report_detail_views(&self) -> Result<WebcastResponse> {
        self.fetch(&Endpoint::ReportDetailViews, None).await
    }

    #[instrument(skip_all)]
    async fn report_detail_storage(&self) -> Result<WebcastResponse> {
        self.fetch(&Endpoint::ReportDetailStorage, None).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use tracing::Level;
    use tracing_mock::{expect, subscriber};
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const COUNT_XML: &str = "<result><count>5</count></result>";

    fn client_for(server: &MockServer) -> WebcastClient {
        WebcastClient::builder()
            .base_url(server.uri().parse().unwrap())
            .api_key("K")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_api_key() {
        // Arrange & Act
        let result = WebcastClient::builder().build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api_key is required")
        );
    }

    #[test]
    fn test_builder_rejects_empty_api_key() {
        // Arrange & Act
        let result = WebcastClient::new("");

        // Assert
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api_key must not be empty")
        );
    }

    #[test]
    fn test_builder_rejects_blank_api_key() {
        // Arrange & Act
        let result = WebcastClient::new("   ");

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_new_with_key_succeeds() {
        // Arrange & Act
        let client = WebcastClient::new("abc").unwrap();

        // Assert
        assert_eq!(
            client.url_for(&Endpoint::Outputs, None),
            "http://fast.api.liquidplatform.com/2.0/outputs/?key=abc"
        );
    }

    #[test]
    fn test_custom_base_url_trailing_slash_is_dropped() {
        // Arrange
        let custom_url = Url::parse("http://localhost:8080/").unwrap();

        // Act
        let client = WebcastClient::builder()
            .base_url(custom_url)
            .api_key("K")
            .build()
            .unwrap();

        // Assert
        assert_eq!(
            client.url_for(&Endpoint::ChannelsCount, None),
            "http://localhost:8080/2.0/channels/count/?key=K"
        );
    }

    #[test]
    fn test_debug_output_hides_api_key() {
        // Arrange
        let client = WebcastClient::new("very-secret").unwrap();

        // Act
        let rendered = format!("{client:?}");

        // Assert
        assert!(!rendered.contains("very-secret"));
    }

    #[test]
    fn test_debug_toggle() {
        // Arrange
        let client = WebcastClient::new("K").unwrap();

        // Act
        client.debug(true);

        // Assert
        assert!(client.is_debug());
        client.debug(false);
        assert!(!client.is_debug());
    }

    #[tokio::test]
    async fn test_medias_count_parses_document() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2.0/medias/count/"))
            .and(query_param("key", "K"))
            .respond_with(ResponseTemplate::new(200).set_body_string(COUNT_XML))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let response = client.medias_count().await.unwrap();

        // Assert
        let doc = response.as_document().unwrap();
        assert_eq!(doc.find(&["count"]).unwrap().text(), "5");
    }

    #[tokio::test]
    async fn test_identical_calls_hit_cache() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2.0/medias/views/"))
            .and(query_param("first", "0"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_string(COUNT_XML))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server);
        let options = QueryOptions::new().with("first", 0).with("limit", 10);

        // Act
        let first = client.medias_views(Some(&options)).await.unwrap();
        let second = client.medias_views(Some(&options)).await.unwrap();

        // Assert (mock expect(1) verifies a single request)
        assert!(std::ptr::eq(
            first.as_document().unwrap(),
            second.as_document().unwrap()
        ));
        assert_eq!(client.cached_entries().await, 1);
    }

    #[tokio::test]
    async fn test_option_order_changes_fingerprint() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2.0/medias/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(COUNT_XML))
            .expect(2)
            .mount(&server)
            .await;
        let client = client_for(&server);
        let a = QueryOptions::new().with("first", 0).with("limit", 10);
        let b = QueryOptions::new().with("limit", 10).with("first", 0);

        // Act
        client.medias(Some(&a)).await.unwrap();
        client.medias(Some(&b)).await.unwrap();

        // Assert
        assert_eq!(client.cached_entries().await, 2);
    }

    #[tokio::test]
    async fn test_text_response_is_not_cached() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2.0/channels/count/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("5"))
            .expect(2)
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let first = client.channels_count().await.unwrap();
        let second = client.channels_count().await.unwrap();

        // Assert
        assert_eq!(first.as_text(), Some("5"));
        assert_eq!(second.as_text(), Some("5"));
        assert_eq!(client.cached_entries().await, 0);
    }

    #[tokio::test]
    async fn test_empty_body_is_text() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2.0/outputs/"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let response = client.outputs().await.unwrap();

        // Assert
        assert_eq!(response.as_text(), Some(""));
    }

    #[tokio::test]
    async fn test_empty_document_is_fetched_again() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2.0/medias/ratings/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<ratings/>"))
            .expect(2)
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        client.medias_ratings(None).await.unwrap();
        let second = client.medias_ratings(None).await.unwrap();

        // Assert
        assert!(second.as_document().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_markup_is_swallowed_and_not_cached() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2.0/medias/m1/thumbs/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<thumbs><thumb></thumbs>"))
            .expect(2)
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let first = client.media_thumbs_by_id("m1", None).await.unwrap();
        let second = client.media_thumbs_by_id("m1", None).await.unwrap();

        // Assert
        assert!(first.is_malformed());
        assert_eq!(second.legacy_text(), Some(""));
    }

    #[tokio::test]
    async fn test_error_status_body_is_classified_by_shape() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2.0/channels/c9/"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string("<error><message>not found</message></error>"),
            )
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let response = client.channel_by_id("c9", None).await.unwrap();

        // Assert
        let doc = response.as_document().unwrap();
        assert_eq!(doc.name, "error");
        assert_eq!(doc.child("message").unwrap().text(), "not found");
    }

    #[tokio::test]
    async fn test_media_by_id_without_filter_sends_only_key() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2.0/medias/abc123/"))
            .and(query_param("key", "K"))
            .and(query_param_is_missing("filter"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"<Media id="abc123"/>"#))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let response = client.media_by_id("abc123", None).await.unwrap();

        // Assert
        assert_eq!(
            response.as_document().unwrap().attribute("id"),
            Some("abc123")
        );
    }

    #[tokio::test]
    async fn test_media_by_id_with_filter() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2.0/medias/abc123/"))
            .and(query_param("filter", "id;title"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<Media><id>abc123</id><title>Intro</title></Media>",
            ))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server);
        let filter = QueryOptions::new().with("filter", "id;title");

        // Act
        let response = client.media_by_id("abc123", Some(&filter)).await.unwrap();

        // Assert
        assert_eq!(
            response.as_document().unwrap().child("title").unwrap().text(),
            "Intro"
        );
    }

    #[tokio::test]
    async fn test_views_by_id_and_output_name_sends_quarter() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2.0/medias/m1/views/mp4/"))
            .and(query_param("key", "K"))
            .and(query_param("quarter", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server);
        let options = QueryOptions::new().with("quarter", 1);

        // Act
        let response = client
            .media_views_by_id_and_output_name("m1", "mp4", &options)
            .await
            .unwrap();

        // Assert
        assert_eq!(response.as_text(), Some("OK"));
    }

    #[tokio::test]
    async fn test_every_endpoint_hits_its_path() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("key", "K"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<ok>1</ok>"))
            .mount(&server)
            .await;
        let client = client_for(&server);
        let opts = QueryOptions::new().with("quarter", 2);

        // Act
        client.medias(None).await.unwrap();
        client.medias_count().await.unwrap();
        client.medias_ratings(None).await.unwrap();
        client.medias_views(None).await.unwrap();
        client.media_by_id("m", None).await.unwrap();
        client.media_urls_by_file_id("f").await.unwrap();
        client.media_views_by_file_id("f", &opts).await.unwrap();
        client.media_rating_by_id("m", None).await.unwrap();
        client.media_related_by_id("m", None).await.unwrap();
        client.media_thumbs_by_id("m", None).await.unwrap();
        client.media_views_by_id("m").await.unwrap();
        client.media_urls_by_id_and_output_name("m", "hd").await.unwrap();
        client
            .media_views_by_id_and_output_name("m", "hd", &opts)
            .await
            .unwrap();
        client.channels(None).await.unwrap();
        client.channels_count().await.unwrap();
        client.channel_by_id("c", None).await.unwrap();
        client.outputs().await.unwrap();
        client.report_detail_traffic().await.unwrap();
        client.report_detail_medias().await.unwrap();
        client.report_detail_views().await.unwrap();
        client.report_detail_storage().await.unwrap();

        // Assert
        let requests = server.received_requests().await.unwrap();
        let paths: Vec<&str> = requests.iter().map(|r| r.url.path()).collect();
        assert_eq!(
            paths,
            vec![
                "/2.0/medias/",
                "/2.0/medias/count/",
                "/2.0/medias/ratings/",
                "/2.0/medias/views/",
                "/2.0/medias/m/",
                "/2.0/medias/urls/f/",
                "/2.0/medias/views/f/",
                "/2.0/medias/m/rating/",
                "/2.0/medias/m/related/",
                "/2.0/medias/m/thumbs/",
                "/2.0/medias/m/views/",
                "/2.0/medias/urls/m/hd/",
                "/2.0/medias/m/views/hd/",
                "/2.0/channels/",
                "/2.0/channels/count/",
                "/2.0/channels/c/",
                "/2.0/outputs/",
                "/2.0/report/detail/traffic/",
                "/2.0/report/detail/medias/",
                "/2.0/report/detail/views/",
                "/2.0/report/detail/storage/",
            ]
        );
        assert_eq!(client.cached_entries().await, 21);
    }

    #[tokio::test]
    async fn test_call_by_endpoint_value() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2.0/report/detail/storage/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<storage><gb>12</gb></storage>"))
            .expect(1)
            .mount(&server)
            .await;
        let client = client_for(&server);

        // Act
        let response = client.call(Endpoint::ReportDetailStorage, None).await.unwrap();

        // Assert
        assert_eq!(response.as_document().unwrap().find(&["gb"]).unwrap().text(), "12");
    }

    #[tokio::test]
    async fn test_transport_error_is_reported_without_key() {
        // Arrange: nothing listens on port 1
        let client = WebcastClient::builder()
            .base_url(Url::parse("http://127.0.0.1:1").unwrap())
            .api_key("very-secret")
            .build()
            .unwrap();

        // Act
        let result = client.outputs().await;

        // Assert
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("request failed: /outputs/"));
        assert!(!message.contains("very-secret"));
        assert_eq!(client.cached_entries().await, 0);
    }

    #[tokio::test]
    async fn test_debug_mode_warns_on_malformed_markup() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<a><b></a>"))
            .mount(&server)
            .await;
        let client = client_for(&server);
        client.debug(true);

        let (mock, handle) = subscriber::mock()
            .with_filter(|meta| *meta.level() == Level::WARN)
            .event(expect::event().at_level(Level::WARN))
            .only()
            .run_with_handle();
        let _guard = tracing::subscriber::set_default(mock);

        // Act
        let response = client.outputs().await.unwrap();

        // Assert
        assert!(response.is_malformed());
        handle.assert_finished();
    }

    #[tokio::test]
    async fn test_quiet_mode_does_not_warn_on_malformed_markup() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<a><b></a>"))
            .mount(&server)
            .await;
        let client = client_for(&server);

        let (mock, handle) = subscriber::mock()
            .with_filter(|meta| *meta.level() == Level::WARN)
            .only()
            .run_with_handle();
        let _guard = tracing::subscriber::set_default(mock);

        // Act
        let response = client.outputs().await.unwrap();

        // Assert
        assert!(response.is_malformed());
        handle.assert_finished();
    }

    const fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_client_is_send_and_sync() {
        assert_send_sync::<WebcastClient>();
    }

    #[tokio::test]
    async fn test_shared_client_across_tasks() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2.0/medias/"))
            .and(query_param("key", "K"))
            .respond_with(ResponseTemplate::new(200).set_body_string(COUNT_XML))
            .mount(&server)
            .await;
        let client = Arc::new(client_for(&server));

        // Act
        let mut handles = Vec::new();
        for i in 0..8_u32 {
            let client = Arc::clone(&client);
            handles.push(tokio::spawn(async move {
                let options = QueryOptions::new().with("first", i % 2);
                client.medias(Some(&options)).await
            }));
        }
        let mut responses = Vec::new();
        for handle in handles {
            responses.push(handle.await.unwrap().unwrap());
        }

        // Assert
        assert_eq!(responses.len(), 8);
        assert!(responses.iter().all(|r| r.as_document().is_some()));
        assert_eq!(client.cached_entries().await, 2);
    }
}

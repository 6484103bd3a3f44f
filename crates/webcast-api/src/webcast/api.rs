//! `WebcastApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::options::QueryOptions;
use super::response::WebcastResponse;

/// Webcast API trait.
///
/// One method per remote operation. Results are passed through untouched.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
///
/// Every method returns an error only when the request itself cannot be
/// completed (connection failure, unreadable body). HTTP error statuses and
/// unparseable markup are reported through [`WebcastResponse`].
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(WebcastApi: Send)]
pub trait LocalWebcastApi {
    /// Lists the project's medias (up to 50 per call; page with `first`/`limit`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn medias(&self, options: Option<&QueryOptions>) -> Result<WebcastResponse>;

    /// Returns the number of medias in the project.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn medias_count(&self) -> Result<WebcastResponse>;

    /// Lists `RatingSummary` objects for medias voted since `lastModified`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn medias_ratings(&self, options: Option<&QueryOptions>) -> Result<WebcastResponse>;

    /// Lists view counts for medias viewed since `lastModified`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn medias_views(&self, options: Option<&QueryOptions>) -> Result<WebcastResponse>;

    /// Fetches one media. `filter` restricts the returned fields
    /// (`filter=field1;field2`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn media_by_id(
        &self,
        media_id: &str,
        filter: Option<&QueryOptions>,
    ) -> Result<WebcastResponse>;

    /// Returns the URLs of a media file.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn media_urls_by_file_id(&self, media_file_id: &str) -> Result<WebcastResponse>;

    /// Registers a view on a media file (`quarter` carries the watched share).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn media_views_by_file_id(
        &self,
        media_file_id: &str,
        options: &QueryOptions,
    ) -> Result<WebcastResponse>;

    /// Returns the `RatingSummary` of a media.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn media_rating_by_id(
        &self,
        media_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<WebcastResponse>;

    /// Lists medias related to a media, by relevance.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn media_related_by_id(
        &self,
        media_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<WebcastResponse>;

    /// Lists the thumbnails of a media.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn media_thumbs_by_id(
        &self,
        media_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<WebcastResponse>;

    /// Returns the total views of a media across all its files.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn media_views_by_id(&self, media_id: &str) -> Result<WebcastResponse>;

    /// Returns the URLs of the media file with the given output name.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn media_urls_by_id_and_output_name(
        &self,
        media_id: &str,
        output_name: &str,
    ) -> Result<WebcastResponse>;

    /// Registers a view on the media file with the given output name.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn media_views_by_id_and_output_name(
        &self,
        media_id: &str,
        output_name: &str,
        options: &QueryOptions,
    ) -> Result<WebcastResponse>;

    /// Lists the project's channels.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn channels(&self, options: Option<&QueryOptions>) -> Result<WebcastResponse>;

    /// Returns the number of channels.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn channels_count(&self) -> Result<WebcastResponse>;

    /// Fetches one channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn channel_by_id(
        &self,
        channel_id: &str,
        options: Option<&QueryOptions>,
    ) -> Result<WebcastResponse>;

    /// Lists the project's outputs (encoding profiles).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn outputs(&self) -> Result<WebcastResponse>;

    /// Traffic usage report.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn report_detail_traffic(&self) -> Result<WebcastResponse>;

    /// Media usage report.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn report_detail_medias(&self) -> Result<WebcastResponse>;

    /// Views report.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn report_detail_views(&self) -> Result<WebcastResponse>;

    /// Storage usage report.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails.
    async fn report_detail_storage(&self) -> Result<WebcastResponse>;
}

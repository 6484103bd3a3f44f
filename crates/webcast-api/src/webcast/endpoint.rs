//! Webcast API endpoints and request URL construction.

use super::options::QueryOptions;

/// Default API domain.
pub const DEFAULT_API_DOMAIN: &str = "http://fast.api.liquidplatform.com";

/// API version path segment.
pub const API_VERSION: &str = "2.0";

/// A remote Webcast operation and its path identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `/medias/`
    Medias,
    /// `/medias/count/`
    MediasCount,
    /// `/medias/ratings/`
    MediasRatings,
    /// `/medias/views/`
    MediasViews,
    /// `/medias/{media_id}/`
    MediaById {
        /// Media identifier.
        media_id: String,
    },
    /// `/medias/urls/{media_file_id}/`
    MediaUrlsByFileId {
        /// Media file identifier.
        media_file_id: String,
    },
    /// `/medias/views/{media_file_id}/`
    MediaViewsByFileId {
        /// Media file identifier.
        media_file_id: String,
    },
    /// `/medias/{media_id}/rating/`
    MediaRatingById {
        /// Media identifier.
        media_id: String,
    },
    /// `/medias/{media_id}/related/`
    MediaRelatedById {
        /// Media identifier.
        media_id: String,
    },
    /// `/medias/{media_id}/thumbs/`
    MediaThumbsById {
        /// Media identifier.
        media_id: String,
    },
    /// `/medias/{media_id}/views/`
    MediaViewsById {
        /// Media identifier.
        media_id: String,
    },
    /// `/medias/urls/{media_id}/{output_name}/`
    MediaUrlsByIdAndOutputName {
        /// Media identifier.
        media_id: String,
        /// Output (encoding profile) name.
        output_name: String,
    },
    /// `/medias/{media_id}/views/{output_name}/`
    MediaViewsByIdAndOutputName {
        /// Media identifier.
        media_id: String,
        /// Output (encoding profile) name.
        output_name: String,
    },
    /// `/channels/`
    Channels,
    /// `/channels/count/`
    ChannelsCount,
    /// `/channels/{channel_id}/`
    ChannelById {
        /// Channel identifier.
        channel_id: String,
    },
    /// `/outputs/`
    Outputs,
    /// `/report/detail/traffic/`
    ReportDetailTraffic,
    /// `/report/detail/medias/`
    ReportDetailMedias,
    /// `/report/detail/views/`
    ReportDetailViews,
    /// `/report/detail/storage/`
    ReportDetailStorage,
}

impl Endpoint {
    /// Short operation name used in logs and error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Medias => "medias",
            Self::MediasCount => "medias_count",
            Self::MediasRatings => "medias_ratings",
            Self::MediasViews => "medias_views",
            Self::MediaById { .. } => "media_by_id",
            Self::MediaUrlsByFileId { .. } => "media_urls_by_file_id",
            Self::MediaViewsByFileId { .. } => "media_views_by_file_id",
            Self::MediaRatingById { .. } => "media_rating_by_id",
            Self::MediaRelatedById { .. } => "media_related_by_id",
            Self::MediaThumbsById { .. } => "media_thumbs_by_id",
            Self::MediaViewsById { .. } => "media_views_by_id",
            Self::MediaUrlsByIdAndOutputName { .. } => "media_urls_by_id_and_output_name",
            Self::MediaViewsByIdAndOutputName { .. } => "media_views_by_id_and_output_name",
            Self::Channels => "channels",
            Self::ChannelsCount => "channels_count",
            Self::ChannelById { .. } => "channel_by_id",
            Self::Outputs => "outputs",
            Self::ReportDetailTraffic => "report_detail_traffic",
            Self::ReportDetailMedias => "report_detail_medias",
            Self::ReportDetailViews => "report_detail_views",
            Self::ReportDetailStorage => "report_detail_storage",
        }
    }

    /// Path below the version segment, with leading and trailing slash.
    ///
    /// Identifiers are inserted verbatim.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Medias => String::from("/medias/"),
            Self::MediasCount => String::from("/medias/count/"),
            Self::MediasRatings => String::from("/medias/ratings/"),
            Self::MediasViews => String::from("/medias/views/"),
            Self::MediaById { media_id } => format!("/medias/{media_id}/"),
            Self::MediaUrlsByFileId { media_file_id } => format!("/medias/urls/{media_file_id}/"),
            Self::MediaViewsByFileId { media_file_id } => {
                format!("/medias/views/{media_file_id}/")
            }
            Self::MediaRatingById { media_id } => format!("/medias/{media_id}/rating/"),
            Self::MediaRelatedById { media_id } => format!("/medias/{media_id}/related/"),
            Self::MediaThumbsById { media_id } => format!("/medias/{media_id}/thumbs/"),
            Self::MediaViewsById { media_id } => format!("/medias/{media_id}/views/"),
            Self::MediaUrlsByIdAndOutputName {
                media_id,
                output_name,
            } => format!("/medias/urls/{media_id}/{output_name}/"),
            Self::MediaViewsByIdAndOutputName {
                media_id,
                output_name,
            } => format!("/medias/{media_id}/views/{output_name}/"),
            Self::Channels => String::from("/channels/"),
            Self::ChannelsCount => String::from("/channels/count/"),
            Self::ChannelById { channel_id } => format!("/channels/{channel_id}/"),
            Self::Outputs => String::from("/outputs/"),
            Self::ReportDetailTraffic => String::from("/report/detail/traffic/"),
            Self::ReportDetailMedias => String::from("/report/detail/medias/"),
            Self::ReportDetailViews => String::from("/report/detail/views/"),
            Self::ReportDetailStorage => String::from("/report/detail/storage/"),
        }
    }
}

/// Builds `{domain}/{version}{path}?key={api_key}[&k=v...]`.
///
/// `domain` must not end with a slash.
#[must_use]
pub fn build_url(
    domain: &str,
    endpoint: &Endpoint,
    api_key: &str,
    options: Option<&QueryOptions>,
) -> String {
    let suffix = options.map(QueryOptions::to_query_suffix).unwrap_or_default();
    format!(
        "{domain}/{API_VERSION}{}?key={api_key}{suffix}",
        endpoint.path()
    )
}

/// Replaces the value of the `key` query parameter so a URL can be logged.
#[must_use]
pub fn redact_key(url: &str) -> String {
    let Some(start) = url.find("?key=") else {
        return String::from(url);
    };
    let value_start = start.saturating_add("?key=".len());
    let rest = url.get(value_start..).unwrap_or_default();
    let value_end = rest.find('&').unwrap_or_else(|| rest.len());
    let head = url.get(..value_start).unwrap_or_default();
    let tail = rest.get(value_end..).unwrap_or_default();
    format!("{head}***{tail}")
}

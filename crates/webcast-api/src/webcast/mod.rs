//! Webcast (Liquid Platform 2.0) API client module.
//!
//! Builds key-authenticated GET requests for media, channel, output and
//! report endpoints, classifies each body as XML document or raw text,
//! and memoizes parsed documents per request URL.

mod api;
mod cache;
mod client;
mod endpoint;
mod options;
mod response;
mod xml;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalWebcastApi, WebcastApi};
pub use cache::{QueryCache, fingerprint};
#[allow(clippy::module_name_repetitions)]
pub use client::{WebcastClient, WebcastClientBuilder};
pub use endpoint::{API_VERSION, DEFAULT_API_DOMAIN, Endpoint, build_url, redact_key};
pub use options::QueryOptions;
#[allow(clippy::module_name_repetitions)]
pub use response::WebcastResponse;
pub use xml::XmlElement;

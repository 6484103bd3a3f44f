//! API client library for the Webcast media platform.
//!
//! Provides a client for the Liquid Platform REST API, version 2.0.

/// Webcast API client.
pub mod webcast;

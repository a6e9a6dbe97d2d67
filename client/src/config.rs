//! Immutable client configuration.
//!
//! # Design
//! `OpaConfiguration` is a plain value: base URL, preferred HTTP version,
//! and the header set applied to every outbound request. It is created once
//! (usually by [`crate::client::OpaClientBuilder`]), never mutated, and held
//! by the rest client for the lifetime of the `OpaClient` built from it.
//! Each constructor computes all three fields from its own inputs; none
//! delegates to another, so adding a field later cannot be silently lost on
//! one construction path.
//!
//! Headers live in a `BTreeMap` so equality and the `Debug` representation
//! are deterministic regardless of insertion order.

use std::collections::BTreeMap;

use url::Url;

use crate::error::OpaClientError;

/// Preferred HTTP protocol version for talking to the OPA server.
///
/// This is a preference, not a guarantee: the bundled [`crate::http::UreqTransport`]
/// speaks HTTP/1.1 only, while a custom [`crate::http::HttpTransport`] is free
/// to honor `Http2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVersion {
    Http11,
    Http2,
}

impl HttpVersion {
    /// Derive the preferred version from an endpoint's URL scheme:
    /// `https` selects HTTP/2, any other scheme selects HTTP/1.1.
    ///
    /// Fails if `url` is not parseable as an absolute URL.
    pub fn for_endpoint(url: &str) -> Result<Self, OpaClientError> {
        let parsed = Url::parse(url).map_err(|source| OpaClientError::InvalidEndpoint {
            url: url.to_string(),
            source,
        })?;
        if parsed.scheme() == "https" {
            Ok(HttpVersion::Http2)
        } else {
            Ok(HttpVersion::Http11)
        }
    }
}

impl std::fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpVersion::Http11 => write!(f, "HTTP/1.1"),
            HttpVersion::Http2 => write!(f, "HTTP/2"),
        }
    }
}

/// All configuration needed to set up an [`crate::OpaClient`].
///
/// Immutable once constructed; safe to share across threads without
/// synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaConfiguration {
    url: String,
    http_version: HttpVersion,
    headers: BTreeMap<String, String>,
}

impl OpaConfiguration {
    /// Configuration for `url` (base URL of the OPA server including scheme
    /// and port, e.g. `http://localhost:8181`) with the HTTP version derived
    /// from the URL scheme and no extra headers.
    pub fn new(url: &str) -> Result<Self, OpaClientError> {
        Ok(Self {
            url: url.to_string(),
            http_version: HttpVersion::for_endpoint(url)?,
            headers: BTreeMap::new(),
        })
    }

    /// Configuration with an explicit HTTP version and no extra headers.
    /// No scheme derivation is attempted, so this never fails.
    pub fn with_version(url: &str, http_version: HttpVersion) -> Self {
        Self {
            url: url.to_string(),
            http_version,
            headers: BTreeMap::new(),
        }
    }

    /// Configuration with an explicit HTTP version and a header set applied
    /// to every request sent by the client.
    pub fn with_headers(
        url: &str,
        http_version: HttpVersion,
        headers: BTreeMap<String, String>,
    ) -> Self {
        Self {
            url: url.to_string(),
            http_version,
            headers,
        }
    }

    /// Base URL of the OPA server.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// HTTP version preference configured for the client.
    pub fn http_version(&self) -> HttpVersion {
        self.http_version
    }

    /// Headers added to every request, keyed by header name.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }
}

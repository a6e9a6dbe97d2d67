//! Error types for the OPA client.
//!
//! # Design
//! One enum covers the whole crate. Configuration and builder preconditions
//! get dedicated variants because they are raised before any I/O happens;
//! `Query` and `Upload` carry the raw status and body from the server so
//! callers can inspect the OPA error document. The facade never wraps or
//! translates — whatever a capability client produces is what the caller
//! sees.

use thiserror::Error;

/// Errors returned by the OPA client and its builder.
#[derive(Debug, Error)]
pub enum OpaClientError {
    /// The endpoint URL could not be parsed, so the HTTP version could not
    /// be derived from its scheme.
    #[error("invalid OPA endpoint '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A header was added with an empty name.
    #[error("header name cannot be empty")]
    EmptyHeaderName,

    /// A header was added with an empty value.
    #[error("header '{name}' cannot have an empty value")]
    EmptyHeaderValue { name: String },

    /// `build()` was called without an endpoint ever having been configured.
    #[error("build() called without an OPA endpoint configured")]
    MissingConfiguration,

    /// The HTTP transport failed before a response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The query endpoint returned a non-200 status.
    #[error("query for document failed with HTTP {status}: {body}")]
    Query { status: u16, body: String },

    /// A data or policy upload returned an unexpected status.
    #[error("upload failed with HTTP {status}: {body}")]
    Upload { status: u16, body: String },

    /// The request payload could not be encoded by the codec.
    #[error("failed to encode request payload: {0}")]
    Encode(String),

    /// The response payload could not be decoded into the expected type.
    #[error("failed to decode response payload: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_error_includes_status_and_body() {
        let err = OpaClientError::Query {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "query for document failed with HTTP 500: boom"
        );
    }

    #[test]
    fn invalid_endpoint_exposes_parse_error_as_source() {
        let source = url::Url::parse("no scheme").unwrap_err();
        let err = OpaClientError::InvalidEndpoint {
            url: "no scheme".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}

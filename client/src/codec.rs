//! Pluggable JSON codec.
//!
//! # Design
//! The codec deals in `serde_json::Value` at the trait boundary so it stays
//! object-safe; typed decoding (`R: DeserializeOwned`, including `Vec<T>`,
//! maps, and `Option<T>`) is layered on top by the rest client via
//! `serde_json::from_value`. Callers who need custom wire handling (say,
//! a tolerant parser or canonical output) swap the codec at build time with
//! [`crate::client::OpaClientBuilder::codec`]; everyone else gets
//! [`JsonCodec`].

use serde_json::Value;

use crate::error::OpaClientError;

/// Encodes request payloads and decodes response bodies.
pub trait Codec: Send + Sync {
    /// Serialize a JSON document into a request body.
    fn encode(&self, value: &Value) -> Result<String, OpaClientError>;

    /// Parse a response body into a JSON document.
    fn decode(&self, body: &str) -> Result<Value, OpaClientError>;
}

/// Default codec backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, value: &Value) -> Result<String, OpaClientError> {
        serde_json::to_string(value).map_err(|e| OpaClientError::Encode(e.to_string()))
    }

    fn decode(&self, body: &str) -> Result<Value, OpaClientError> {
        serde_json::from_str(body).map_err(|e| OpaClientError::Decode(e.to_string()))
    }
}

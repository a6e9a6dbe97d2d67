//! Uploading data documents to OPA.
//!
//! # Design
//! `PUT /v1/data/{path}` creates the document or overwrites whatever is
//! already stored at that path; OPA answers 204 with no body. Content is a
//! `serde_json::Value` so callers hand over any JSON document without an
//! intermediate serialization step.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::error::OpaClientError;
use crate::http::{HttpMethod, HttpRequest};
use crate::rest::OpaRestClient;

/// A data document stored under `path` on the OPA server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpaDocument {
    pub path: String,
    pub content: Value,
}

impl OpaDocument {
    pub fn new(path: &str, content: Value) -> Self {
        Self {
            path: path.trim_matches('/').to_string(),
            content,
        }
    }
}

/// Data-document capability of the OPA server.
pub trait OpaDataApi {
    /// Create the document at its path, replacing any existing one.
    fn create_or_overwrite_document(&self, document: &OpaDocument)
        -> Result<(), OpaClientError>;
}

/// Capability client for the data API.
pub struct OpaDataClient {
    rest: Arc<OpaRestClient>,
}

impl OpaDataClient {
    pub fn new(rest: Arc<OpaRestClient>) -> Self {
        Self { rest }
    }
}

impl OpaDataApi for OpaDataClient {
    fn create_or_overwrite_document(
        &self,
        document: &OpaDocument,
    ) -> Result<(), OpaClientError> {
        let url = self.rest.url_for(&["v1", "data", &document.path]);
        let body = self.rest.encode(&document.content)?;

        let response = self.rest.send(HttpRequest {
            method: HttpMethod::Put,
            url,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })?;

        if response.status != 204 {
            return Err(OpaClientError::Upload {
                status: response.status,
                body: response.body,
            });
        }
        Ok(())
    }
}

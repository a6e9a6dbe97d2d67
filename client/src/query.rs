//! Querying OPA for policy decisions.
//!
//! # Design
//! A query is a `POST /v1/data/{path}` with the caller's input wrapped in
//! an `{"input": ...}` envelope. OPA answers with `{"result": ...}` and
//! omits `result` entirely when the decision is undefined; the client maps
//! an absent result to JSON null so callers can model possibly-undefined
//! decisions as `Option<T>`. The expected result shape is just the type
//! parameter — `R` can be a struct, `Vec<T>`, a map, or `Option<T>` with no
//! manual deserialization at the call site.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::OpaClientError;
use crate::http::{HttpMethod, HttpRequest};
use crate::rest::OpaRestClient;

/// A request to evaluate the document at `path` against `input`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryForDocumentRequest {
    pub path: String,
    pub input: Value,
}

impl QueryForDocumentRequest {
    /// `path` addresses the document to query, slash-separated
    /// (e.g. `example/allow`); `input` becomes the query's input document.
    pub fn new(path: &str, input: Value) -> Self {
        Self {
            path: path.trim_matches('/').to_string(),
            input,
        }
    }
}

/// Query capability of the OPA server.
pub trait OpaQueryApi {
    /// Evaluate the document addressed by the request and decode the
    /// decision into `R`.
    fn query_for_document<R: DeserializeOwned>(
        &self,
        request: &QueryForDocumentRequest,
    ) -> Result<R, OpaClientError>;
}

/// Capability client for the query API.
pub struct OpaQueryClient {
    rest: Arc<OpaRestClient>,
}

impl OpaQueryClient {
    pub fn new(rest: Arc<OpaRestClient>) -> Self {
        Self { rest }
    }
}

impl OpaQueryApi for OpaQueryClient {
    fn query_for_document<R: DeserializeOwned>(
        &self,
        request: &QueryForDocumentRequest,
    ) -> Result<R, OpaClientError> {
        let url = self.rest.url_for(&["v1", "data", &request.path]);
        let body = self.rest.encode(&json!({ "input": request.input }))?;

        let response = self.rest.send(HttpRequest {
            method: HttpMethod::Post,
            url,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })?;

        if response.status != 200 {
            return Err(OpaClientError::Query {
                status: response.status,
                body: response.body,
            });
        }

        let document = self.rest.decode(&response.body)?;
        // OPA omits `result` when the decision is undefined.
        let result = match document {
            Value::Object(mut fields) => fields.remove("result").unwrap_or(Value::Null),
            _ => Value::Null,
        };
        self.rest.coerce(result)
    }
}

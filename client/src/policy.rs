//! Uploading policies to OPA.
//!
//! # Design
//! `PUT /v1/policies/{id}` with the raw Rego source as `text/plain`. The
//! policy body bypasses the codec entirely — it is not JSON. OPA answers
//! 200 with an empty result object.

use std::sync::Arc;

use crate::error::OpaClientError;
use crate::http::{HttpMethod, HttpRequest};
use crate::rest::OpaRestClient;

/// A named Rego policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaPolicy {
    pub id: String,
    pub content: String,
}

impl OpaPolicy {
    /// `id` names the policy on the server; `content` is Rego source text.
    pub fn new(id: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            content: content.to_string(),
        }
    }
}

/// Policy capability of the OPA server.
pub trait OpaPolicyApi {
    /// Upload the policy under its id, replacing any existing version.
    fn create_or_update_policy(&self, policy: &OpaPolicy) -> Result<(), OpaClientError>;
}

/// Capability client for the policy API.
pub struct OpaPolicyClient {
    rest: Arc<OpaRestClient>,
}

impl OpaPolicyClient {
    pub fn new(rest: Arc<OpaRestClient>) -> Self {
        Self { rest }
    }
}

impl OpaPolicyApi for OpaPolicyClient {
    fn create_or_update_policy(&self, policy: &OpaPolicy) -> Result<(), OpaClientError> {
        let url = self.rest.url_for(&["v1", "policies", &policy.id]);

        let response = self.rest.send(HttpRequest {
            method: HttpMethod::Put,
            url,
            headers: vec![("content-type".to_string(), "text/plain".to_string())],
            body: Some(policy.content.clone()),
        })?;

        if response.status != 200 {
            return Err(OpaClientError::Upload {
                status: response.status,
                body: response.body,
            });
        }
        Ok(())
    }
}

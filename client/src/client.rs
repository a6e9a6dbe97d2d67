//! The `OpaClient` facade and its builder.
//!
//! # Design
//! `OpaClient` composes the three capability clients behind the three
//! capability traits and forwards every call unchanged; it holds no state
//! of its own beyond the delegates and the `Arc` they share. The builder is
//! the one place where resources are constructed: `build()` materializes
//! the transport, resolves the codec, and wires everything — there is no
//! half-built client.
//!
//! Headers may be added before or after the endpoint is set. Whenever the
//! header set changes after a configuration has been materialized, the
//! configuration is rebuilt with the merged set, so call order between
//! `configuration()` and `header()`/`headers()` never affects the result.
//!
//! Builder methods take `&mut self` and fallible ones return
//! `Result<&mut Self, _>` (the `std::process::Command` style), so a
//! rejected argument leaves the accumulated state untouched. The builder is
//! single-owner and not meant for concurrent mutation; the built client is
//! safe to share across threads.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::codec::{Codec, JsonCodec};
use crate::config::{HttpVersion, OpaConfiguration};
use crate::data::{OpaDataApi, OpaDataClient, OpaDocument};
use crate::error::OpaClientError;
use crate::http::UreqTransport;
use crate::policy::{OpaPolicy, OpaPolicyApi, OpaPolicyClient};
use crate::query::{OpaQueryApi, OpaQueryClient, QueryForDocumentRequest};
use crate::rest::OpaRestClient;

/// Client for the OPA REST API, composing the query, data, and policy
/// capabilities.
pub struct OpaClient {
    query: OpaQueryClient,
    data: OpaDataClient,
    policy: OpaPolicyClient,
    rest: Arc<OpaRestClient>,
}

impl OpaClient {
    /// Builder for an [`OpaClient`].
    pub fn builder() -> OpaClientBuilder {
        OpaClientBuilder::default()
    }

    /// Wire a client directly from an existing rest client. Useful when the
    /// transport or codec is custom-built; most callers want [`builder`].
    ///
    /// [`builder`]: OpaClient::builder
    pub fn from_rest_client(rest: Arc<OpaRestClient>) -> Self {
        Self {
            query: OpaQueryClient::new(Arc::clone(&rest)),
            data: OpaDataClient::new(Arc::clone(&rest)),
            policy: OpaPolicyClient::new(Arc::clone(&rest)),
            rest,
        }
    }

    /// The configuration this client was built from.
    pub fn configuration(&self) -> &OpaConfiguration {
        self.rest.configuration()
    }
}

impl std::fmt::Debug for OpaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpaClient")
            .field("configuration", self.rest.configuration())
            .finish_non_exhaustive()
    }
}

impl OpaQueryApi for OpaClient {
    fn query_for_document<R: DeserializeOwned>(
        &self,
        request: &QueryForDocumentRequest,
    ) -> Result<R, OpaClientError> {
        self.query.query_for_document(request)
    }
}

impl OpaDataApi for OpaClient {
    fn create_or_overwrite_document(
        &self,
        document: &OpaDocument,
    ) -> Result<(), OpaClientError> {
        self.data.create_or_overwrite_document(document)
    }
}

impl OpaPolicyApi for OpaClient {
    fn create_or_update_policy(&self, policy: &OpaPolicy) -> Result<(), OpaClientError> {
        self.policy.create_or_update_policy(policy)
    }
}

/// Accumulates configuration for an [`OpaClient`]; consumed by [`build`].
///
/// [`build`]: OpaClientBuilder::build
#[derive(Default)]
pub struct OpaClientBuilder {
    configuration: Option<OpaConfiguration>,
    headers: BTreeMap<String, String>,
    codec: Option<Box<dyn Codec>>,
}

impl std::fmt::Debug for OpaClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpaClientBuilder")
            .field("configuration", &self.configuration)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl OpaClientBuilder {
    /// Set the OPA endpoint (URL including scheme and port). The HTTP
    /// version preference is derived from the scheme: `https` selects
    /// HTTP/2, anything else HTTP/1.1. Headers accumulated so far are
    /// carried into the new configuration; any previously set endpoint is
    /// replaced.
    pub fn configuration(&mut self, url: &str) -> Result<&mut Self, OpaClientError> {
        let http_version = HttpVersion::for_endpoint(url)?;
        self.configuration = Some(OpaConfiguration::with_headers(
            url,
            http_version,
            self.headers.clone(),
        ));
        Ok(self)
    }

    /// Override the codec used for request and response bodies. Without an
    /// override, `build()` uses [`JsonCodec`].
    pub fn codec(&mut self, codec: Box<dyn Codec>) -> &mut Self {
        self.codec = Some(codec);
        self
    }

    /// Add a header sent with every request. Later writes win per name.
    /// Fails on an empty name or value without touching accumulated state.
    pub fn header(&mut self, name: &str, value: &str) -> Result<&mut Self, OpaClientError> {
        if name.is_empty() {
            return Err(OpaClientError::EmptyHeaderName);
        }
        if value.is_empty() {
            return Err(OpaClientError::EmptyHeaderValue {
                name: name.to_string(),
            });
        }
        self.headers.insert(name.to_string(), value.to_string());
        self.rebuild_configuration();
        Ok(self)
    }

    /// Add several headers at once. The whole map is validated before any
    /// entry is merged, so a bad entry leaves accumulated state untouched.
    /// An empty map is a no-op.
    pub fn headers(
        &mut self,
        headers: &BTreeMap<String, String>,
    ) -> Result<&mut Self, OpaClientError> {
        for (name, value) in headers {
            if name.is_empty() {
                return Err(OpaClientError::EmptyHeaderName);
            }
            if value.is_empty() {
                return Err(OpaClientError::EmptyHeaderValue { name: name.clone() });
            }
        }
        self.headers
            .extend(headers.iter().map(|(n, v)| (n.clone(), v.clone())));
        self.rebuild_configuration();
        Ok(self)
    }

    /// Construct the client: materialize the transport, resolve the codec,
    /// and wire the capability clients around the shared rest client.
    ///
    /// Fails with [`OpaClientError::MissingConfiguration`] if no endpoint
    /// was ever set. The builder is consumed — a second `build()` fails the
    /// same way.
    pub fn build(&mut self) -> Result<OpaClient, OpaClientError> {
        let configuration = self
            .configuration
            .take()
            .ok_or(OpaClientError::MissingConfiguration)?;
        let codec = self
            .codec
            .take()
            .unwrap_or_else(|| Box::new(JsonCodec));
        let transport = Box::new(UreqTransport::new());
        let rest = Arc::new(OpaRestClient::new(configuration, transport, codec));
        Ok(OpaClient::from_rest_client(rest))
    }

    /// An already materialized configuration must pick up header changes,
    /// so earlier `configuration()` calls are not invalidated by later
    /// header additions.
    fn rebuild_configuration(&mut self) {
        if let Some(config) = self.configuration.take() {
            self.configuration = Some(OpaConfiguration::with_headers(
                config.url(),
                config.http_version(),
                self.headers.clone(),
            ));
        }
    }
}

//! Shared REST plumbing for the capability clients.
//!
//! # Design
//! `OpaRestClient` is the transport handle: it bundles the immutable
//! [`OpaConfiguration`], the injectable [`HttpTransport`], and the
//! [`Codec`]. The three capability clients share one instance through an
//! `Arc` and use it for everything that is common to their requests —
//! joining `/v1/...` paths onto the base URL, stamping the configured
//! headers onto every outbound request, and typed decoding through the
//! codec. It knows nothing about the OPA API itself.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::codec::Codec;
use crate::config::OpaConfiguration;
use crate::error::OpaClientError;
use crate::http::{HttpRequest, HttpResponse, HttpTransport};

/// Bundles configuration, transport, and codec for shared use by the
/// capability clients.
pub struct OpaRestClient {
    configuration: OpaConfiguration,
    transport: Box<dyn HttpTransport>,
    codec: Box<dyn Codec>,
}

impl OpaRestClient {
    pub fn new(
        configuration: OpaConfiguration,
        transport: Box<dyn HttpTransport>,
        codec: Box<dyn Codec>,
    ) -> Self {
        Self {
            configuration,
            transport,
            codec,
        }
    }

    /// The configuration this client was built from.
    pub fn configuration(&self) -> &OpaConfiguration {
        &self.configuration
    }

    /// Join path segments onto the base URL. Segments may themselves
    /// contain `/` (OPA document paths do).
    pub(crate) fn url_for(&self, segments: &[&str]) -> String {
        let base = self.configuration.url().trim_end_matches('/');
        format!("{base}/{}", segments.join("/"))
    }

    /// Apply the configured headers and execute the request. Headers already
    /// present on the request win over configured ones.
    pub(crate) fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, OpaClientError> {
        for (name, value) in self.configuration.headers() {
            let already_set = request
                .headers
                .iter()
                .any(|(n, _)| n.eq_ignore_ascii_case(name));
            if !already_set {
                request.headers.push((name.clone(), value.clone()));
            }
        }
        tracing::debug!(method = ?request.method, url = %request.url, "sending request to OPA");
        let response = self.transport.execute(request)?;
        tracing::debug!(status = response.status, "received response from OPA");
        Ok(response)
    }

    pub(crate) fn encode(&self, value: &Value) -> Result<String, OpaClientError> {
        self.codec.encode(value)
    }

    pub(crate) fn decode(&self, body: &str) -> Result<Value, OpaClientError> {
        self.codec.decode(body)
    }

    /// Decode a JSON document into a caller-chosen type.
    pub(crate) fn coerce<R: DeserializeOwned>(&self, value: Value) -> Result<R, OpaClientError> {
        serde_json::from_value(value).map_err(|e| OpaClientError::Decode(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Stub transport shared by the unit tests in this crate.

    use std::sync::{Arc, Mutex};

    use crate::codec::JsonCodec;

    use super::*;

    /// Requests recorded by a [`StubTransport`], in call order.
    pub(crate) type Seen = Arc<Mutex<Vec<HttpRequest>>>;

    /// Records every request and answers each with the same canned response.
    pub(crate) struct StubTransport {
        seen: Arc<Mutex<Vec<HttpRequest>>>,
        status: u16,
        body: String,
    }

    impl StubTransport {
        pub(crate) fn new(status: u16, body: &str) -> (Self, Seen) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            let transport = Self {
                seen: Arc::clone(&seen),
                status,
                body: body.to_string(),
            };
            (transport, seen)
        }
    }

    impl HttpTransport for StubTransport {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, OpaClientError> {
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    /// A rest client over a stub transport, plus the handle to the requests
    /// it has seen.
    pub(crate) fn stub_rest_client(
        configuration: OpaConfiguration,
        status: u16,
        body: &str,
    ) -> (Arc<OpaRestClient>, Seen) {
        let (transport, seen) = StubTransport::new(status, body);
        let rest = OpaRestClient::new(configuration, Box::new(transport), Box::new(JsonCodec));
        (Arc::new(rest), seen)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::config::HttpVersion;
    use crate::http::HttpMethod;

    use super::testing::stub_rest_client;
    use super::*;

    fn config_with_header(name: &str, value: &str) -> OpaConfiguration {
        let mut headers = BTreeMap::new();
        headers.insert(name.to_string(), value.to_string());
        OpaConfiguration::with_headers("http://localhost:8181", HttpVersion::Http11, headers)
    }

    #[test]
    fn url_for_joins_segments_onto_base() {
        let (rest, _) = stub_rest_client(
            OpaConfiguration::new("http://localhost:8181").unwrap(),
            200,
            "{}",
        );
        assert_eq!(
            rest.url_for(&["v1", "data", "example/allow"]),
            "http://localhost:8181/v1/data/example/allow"
        );
    }

    #[test]
    fn url_for_strips_trailing_slash_from_base() {
        let (rest, _) = stub_rest_client(
            OpaConfiguration::new("http://localhost:8181/").unwrap(),
            200,
            "{}",
        );
        assert_eq!(
            rest.url_for(&["v1", "policies", "authz"]),
            "http://localhost:8181/v1/policies/authz"
        );
    }

    #[test]
    fn configured_headers_are_applied_to_every_request() {
        let (rest, seen) = stub_rest_client(config_with_header("X-Tenant", "acme"), 200, "{}");
        rest.send(HttpRequest {
            method: HttpMethod::Get,
            url: "http://localhost:8181/v1/data/x".to_string(),
            headers: Vec::new(),
            body: None,
        })
        .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen[0].headers,
            vec![("X-Tenant".to_string(), "acme".to_string())]
        );
    }

    #[test]
    fn request_headers_win_over_configured_headers() {
        let (rest, seen) = stub_rest_client(config_with_header("content-type", "text/csv"), 200, "{}");
        rest.send(HttpRequest {
            method: HttpMethod::Post,
            url: "http://localhost:8181/v1/data/x".to_string(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some("{}".to_string()),
        })
        .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen[0].headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn coerce_decodes_generic_shapes() {
        let (rest, _) = stub_rest_client(
            OpaConfiguration::new("http://localhost:8181").unwrap(),
            200,
            "{}",
        );
        let values: Vec<u32> = rest.coerce(serde_json::json!([1, 2, 3])).unwrap();
        assert_eq!(values, vec![1, 2, 3]);

        let err = rest
            .coerce::<Vec<u32>>(serde_json::json!("nope"))
            .unwrap_err();
        assert!(matches!(err, OpaClientError::Decode(_)));
    }
}

//! HTTP transport abstraction.
//!
//! # Design
//! Requests and responses are plain data so the transport is a single
//! injectable seam: [`HttpTransport`] executes an [`HttpRequest`] and returns
//! an [`HttpResponse`], nothing more. Status interpretation belongs to the
//! capability clients, which is why [`UreqTransport`] disables ureq's
//! status-code-as-error behavior — 4xx/5xx responses come back as data.
//!
//! Implementations must be `Send + Sync`; the transport is shared read-only
//! by all capability clients of one `OpaClient`.

use crate::error::OpaClientError;

/// HTTP method for a request to the OPA server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Executes HTTP requests on behalf of the client.
///
/// The bundled implementation is [`UreqTransport`]; supply your own to route
/// requests through a different HTTP stack. Implementations must be safe for
/// concurrent use — the `OpaClient` facade makes no effort to serialize
/// calls.
pub trait HttpTransport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, OpaClientError>;
}

/// Blocking transport over a shared [`ureq::Agent`].
///
/// Speaks HTTP/1.1 regardless of the configured
/// [`crate::config::HttpVersion`] preference; the preference is there for
/// transports that can honor it.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, OpaClientError> {
        let result = match (request.method, request.body) {
            (HttpMethod::Get, _) => {
                let mut call = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    call = call.header(name, value);
                }
                call.call()
            }
            (HttpMethod::Post, body) => {
                let mut call = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    call = call.header(name, value);
                }
                match body {
                    Some(body) => call.send(body.as_bytes()),
                    None => call.send_empty(),
                }
            }
            (HttpMethod::Put, body) => {
                let mut call = self.agent.put(&request.url);
                for (name, value) in &request.headers {
                    call = call.header(name, value);
                }
                match body {
                    Some(body) => call.send(body.as_bytes()),
                    None => call.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| OpaClientError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| OpaClientError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

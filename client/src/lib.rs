//! Synchronous client for the Open Policy Agent (OPA) REST API.
//!
//! # Overview
//! One facade, three capabilities: query for policy decisions, upload data
//! documents, upload policies. Each capability lives behind its own trait
//! ([`OpaQueryApi`], [`OpaDataApi`], [`OpaPolicyApi`]) and is implemented by
//! a small client over a shared rest handle; [`OpaClient`] implements all
//! three by pure forwarding.
//!
//! # Design
//! - [`OpaConfiguration`] is an immutable value built once and shared
//!   read-only; [`OpaClient::builder`] accumulates endpoint, headers, and an
//!   optional codec, then wires everything at `build()`.
//! - The HTTP transport is an injectable trait ([`HttpTransport`]) taking
//!   requests as plain data; [`UreqTransport`] is the bundled blocking
//!   implementation.
//! - Query results decode into any `DeserializeOwned` type — a struct,
//!   `Vec<T>`, a map, or `Option<T>` for decisions that may be undefined.
//!
//! ```no_run
//! use opa_client::{OpaClient, OpaQueryApi, QueryForDocumentRequest};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), opa_client::OpaClientError> {
//! let client = OpaClient::builder()
//!     .configuration("http://localhost:8181")?
//!     .header("Authorization", "Bearer token")?
//!     .build()?;
//!
//! let request = QueryForDocumentRequest::new("example/allow", json!({"user": "alice"}));
//! let allowed: bool = client.query_for_document(&request)?;
//! # let _ = allowed;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod data;
pub mod error;
pub mod http;
pub mod policy;
pub mod query;
pub mod rest;

pub use client::{OpaClient, OpaClientBuilder};
pub use codec::{Codec, JsonCodec};
pub use config::{HttpVersion, OpaConfiguration};
pub use data::{OpaDataApi, OpaDataClient, OpaDocument};
pub use error::OpaClientError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, UreqTransport};
pub use policy::{OpaPolicy, OpaPolicyApi, OpaPolicyClient};
pub use query::{OpaQueryApi, OpaQueryClient, QueryForDocumentRequest};
pub use rest::OpaRestClient;

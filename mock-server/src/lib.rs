//! Mock OPA server implementing the slice of the REST API the client uses.
//!
//! Documents and policies land in an in-memory store; queries answer with
//! the stored document wrapped in OPA's `{"result": ...}` envelope, with
//! `result` omitted when the path is undefined. No Rego evaluation happens
//! here — the mock only mirrors the wire contract.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// In-memory store behind the mock API.
#[derive(Debug, Default)]
pub struct OpaStore {
    pub documents: HashMap<String, Value>,
    pub policies: HashMap<String, String>,
}

pub type Db = Arc<RwLock<OpaStore>>;

/// Query request body: `{"input": ...}`, input optional.
#[derive(Deserialize)]
pub struct QueryBody {
    #[serde(default)]
    pub input: Option<Value>,
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(OpaStore::default()));
    Router::new()
        .route(
            "/v1/data/{*path}",
            get(get_document).post(query_document).put(put_document),
        )
        .route("/v1/policies/{id}", get(get_policy).put(put_policy))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// `result` is omitted when the document is undefined, matching OPA.
fn result_envelope(document: Option<&Value>) -> Value {
    match document {
        Some(document) => json!({ "result": document }),
        None => json!({}),
    }
}

async fn put_document(
    State(db): State<Db>,
    Path(path): Path<String>,
    Json(content): Json<Value>,
) -> StatusCode {
    db.write().await.documents.insert(path, content);
    StatusCode::NO_CONTENT
}

async fn get_document(State(db): State<Db>, Path(path): Path<String>) -> Json<Value> {
    let store = db.read().await;
    Json(result_envelope(store.documents.get(&path)))
}

async fn query_document(
    State(db): State<Db>,
    Path(path): Path<String>,
    Json(_body): Json<QueryBody>,
) -> Json<Value> {
    let store = db.read().await;
    Json(result_envelope(store.documents.get(&path)))
}

async fn put_policy(
    State(db): State<Db>,
    Path(id): Path<String>,
    body: String,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if body.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"code": "invalid_parameter", "message": "empty policy"})),
        ));
    }
    db.write().await.policies.insert(id, body);
    Ok(Json(json!({})))
}

async fn get_policy(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    store
        .policies
        .get(&id)
        .map(|raw| Json(json!({"result": {"id": id, "raw": raw}})))
        .ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_wraps_defined_documents() {
        let doc = json!({"allow": true});
        assert_eq!(
            result_envelope(Some(&doc)),
            json!({"result": {"allow": true}})
        );
    }

    #[test]
    fn envelope_omits_result_for_undefined_documents() {
        assert_eq!(result_envelope(None), json!({}));
    }

    #[test]
    fn query_body_input_is_optional() {
        let body: QueryBody = serde_json::from_str("{}").unwrap();
        assert!(body.input.is_none());

        let body: QueryBody = serde_json::from_str(r#"{"input":{"user":"alice"}}"#).unwrap();
        assert_eq!(body.input, Some(json!({"user": "alice"})));
    }
}

// SPDX-License-Identifier: MIT

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::store::SharedStore;
use crate::txn::{Request, RunOptions, TxnError};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub options: RunOptions,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/transactions", post(create_transaction))
        .route("/api/keys", get(list_keys))
        .route("/api/keys/{key}", get(get_key))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(port: u16, state: AppState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    log::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_keys(State(state): State<AppState>) -> Json<Value> {
    Json(state.store.snapshot().await)
}

async fn get_key(State(state): State<AppState>, Path(key): Path<String>) -> Json<Value> {
    let value = state.store.value(&key).await;
    Json(json!({ "key": key, "value": value.to_json() }))
}

#[tracing::instrument(skip_all, fields(conditions, commands))]
async fn create_transaction(State(state): State<AppState>, body: String) -> (StatusCode, Json<Value>) {
    let payload: Value = match serde_json::from_str(&body) {
        Ok(payload) => payload,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Invalid JSON: {}", e) })),
            )
        }
    };

    let request = match Request::from_value(payload) {
        Ok(request) => request,
        Err(e) => return error_response(e),
    };

    let span = tracing::Span::current();
    span.record("conditions", request.conditions.len());
    span.record("commands", request.commands.len());

    match state.store.transaction(&request, state.options).await {
        Ok(outcome) => (StatusCode::OK, Json(json!({ "result": outcome }))),
        Err(e) => error_response(e),
    }
}

fn error_response(err: TxnError) -> (StatusCode, Json<Value>) {
    let status = if err.is_user_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::CONFLICT
    };
    log::warn!("Transaction failed ({}): {}", status, err);
    (status, Json(json!({ "error": err.to_string() })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app_with(store: MemoryStore) -> (Router, SharedStore) {
        let shared = SharedStore::new(store);
        let app = router(AppState {
            store: shared.clone(),
            options: RunOptions::default(),
        });
        (app, shared)
    }

    async fn post_raw(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
        let req = HttpRequest::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let req = HttpRequest::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app_with(MemoryStore::new());
        let (status, body) = get_json(app, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_committed_transaction() {
        let (app, shared) = app_with(MemoryStore::new());
        let body = json!({"if": [], "exec": [["set", "foo", "aaa"]]}).to_string();

        let (status, json) = post_raw(app, "/api/transactions", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["result"], 1);
        assert_eq!(shared.value("foo").await, crate::txn::Value::text("aaa"));
    }

    #[tokio::test]
    async fn test_rejected_transaction() {
        let (app, _) = app_with(MemoryStore::new());
        let body = json!({"if": [["x", ["get", "foo"]]], "exec": [["set", "foo", "x"]]}).to_string();

        let (status, json) = post_raw(app, "/api/transactions", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["result"], 0);
    }

    #[tokio::test]
    async fn test_invalid_operator_is_unprocessable() {
        let (app, _) = app_with(MemoryStore::new());
        let body = json!({"if": [["OK", "%%", ["set", "foo", "bbb"]]], "exec": []}).to_string();

        let (status, json) = post_raw(app, "/api/transactions", body).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json["error"]
            .as_str()
            .unwrap()
            .contains(r#"invalid operator "%%""#));
    }

    #[tokio::test]
    async fn test_store_error_is_conflict() {
        let mut store = MemoryStore::new();
        store.insert_str("foo", "text");
        let (app, _) = app_with(store);
        let body = json!({"exec": [["sadd", "foo", "x"]]}).to_string();

        let (status, json) = post_raw(app, "/api/transactions", body).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(json["error"].as_str().unwrap().starts_with("WRONGTYPE"));
    }

    #[tokio::test]
    async fn test_unparseable_body() {
        let (app, _) = app_with(MemoryStore::new());
        let (status, _) = post_raw(app, "/api/transactions", "{not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_key() {
        let mut store = MemoryStore::new();
        store.insert_set("s", ["b", "a"]);
        let (app, _) = app_with(store);

        let (status, json) = get_json(app.clone(), "/api/keys/s").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["value"], json!(["a", "b"]));

        let (_, json) = get_json(app, "/api/keys/missing").await;
        assert_eq!(json["value"], Value::Null);
    }
}

//! Common test utilities

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;

use starfinance::{api, Stores};

/// Build the application over a fresh in-memory backend.
pub fn app() -> Router {
    api::create_router().with_state(Stores::in_memory())
}

/// JSON request builder.
pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

/// Collect a response body into bytes.
pub async fn body_bytes(response: Response) -> axum::body::Bytes {
    response.into_body().collect().await.expect("body").to_bytes()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("json body")
}

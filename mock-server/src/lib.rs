use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, Query},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What `/users/{id}` saw: the decoded path segment and query pairs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserEcho {
    pub id: String,
    pub query: Vec<(String, String)>,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", post(echo).put(echo).patch(echo).delete(echo))
        .route("/headers", get(headers))
        .route("/users/{id}", get(user))
        .route("/status/{code}", get(status))
        .route("/slow/{ms}", get(slow))
        .route("/redirect/{hops}", get(redirect))
        .route("/see-other", post(see_other))
        .route("/method", any(method))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Returns the request body unchanged, with the request's content type.
async fn echo(headers: HeaderMap, body: Bytes) -> Response {
    let mut response = body.into_response();
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));
    response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    response
}

/// Request headers as `name -> [values]`, names lowercased.
async fn headers(headers: HeaderMap) -> Json<BTreeMap<String, Vec<String>>> {
    let mut out: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in &headers {
        out.entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    Json(out)
}

async fn user(Path(id): Path<String>, Query(query): Query<Vec<(String, String)>>) -> Json<UserEcho> {
    tracing::debug!(%id, ?query, "user lookup");
    Json(UserEcho { id, query })
}

async fn status(Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, format!("status {code}")).into_response(),
        Err(_) => (StatusCode::BAD_REQUEST, "invalid status code").into_response(),
    }
}

/// Waits `ms` milliseconds before answering.
async fn slow(Path(ms): Path<u64>) -> &'static str {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    "done"
}

/// Redirects `hops` times before answering 200.
async fn redirect(Path(hops): Path<u32>) -> Response {
    if hops == 0 {
        return (StatusCode::OK, "arrived").into_response();
    }
    let location = format!("/redirect/{}", hops - 1);
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

async fn see_other() -> Response {
    (StatusCode::SEE_OTHER, [(header::LOCATION, "/method")]).into_response()
}

async fn method(method: Method) -> String {
    method.to_string()
}

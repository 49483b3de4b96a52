use std::collections::BTreeMap;

use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, UserEcho};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- echo ---

#[tokio::test]
async fn echo_returns_body_and_content_type() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/echo")
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(r#"{"a":1}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "application/json");
    assert_eq!(&body_bytes(resp).await[..], br#"{"a":1}"#);
}

#[tokio::test]
async fn echo_without_content_type_is_octet_stream() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/echo")
                .body("raw".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "application/octet-stream");
    assert_eq!(&body_bytes(resp).await[..], b"raw");
}

#[tokio::test]
async fn echo_accepts_delete_with_body() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/echo")
                .body("gone".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&body_bytes(resp).await[..], b"gone");
}

#[tokio::test]
async fn echo_rejects_get() {
    let resp = app().oneshot(get("/echo")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// --- headers ---

#[tokio::test]
async fn headers_groups_repeated_names() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/headers")
                .header("X-Tag", "a")
                .header("x-tag", "b")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers: BTreeMap<String, Vec<String>> = body_json(resp).await;
    assert_eq!(headers["x-tag"], vec!["a".to_string(), "b".to_string()]);
}

// --- users ---

#[tokio::test]
async fn user_decodes_path_and_query() {
    let resp = app()
        .oneshot(get("/users/a%20b?filter=x&filter=y"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: UserEcho = body_json(resp).await;
    assert_eq!(echo.id, "a b");
    assert_eq!(
        echo.query,
        vec![
            ("filter".to_string(), "x".to_string()),
            ("filter".to_string(), "y".to_string()),
        ]
    );
}

// --- status ---

#[tokio::test]
async fn status_returns_requested_code() {
    let resp = app().oneshot(get("/status/418")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(&body_bytes(resp).await[..], b"status 418");
}

#[tokio::test]
async fn status_rejects_out_of_range_code() {
    let resp = app().oneshot(get("/status/42")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- slow ---

#[tokio::test]
async fn slow_answers_after_delay() {
    let resp = app().oneshot(get("/slow/5")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&body_bytes(resp).await[..], b"done");
}

// --- redirects ---

#[tokio::test]
async fn redirect_counts_down() {
    let resp = app().oneshot(get("/redirect/2")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[http::header::LOCATION], "/redirect/1");

    let resp = app().oneshot(get("/redirect/0")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&body_bytes(resp).await[..], b"arrived");
}

#[tokio::test]
async fn see_other_points_at_method() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/see-other")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[http::header::LOCATION], "/method");
}

#[tokio::test]
async fn method_reports_verb() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/method")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(&body_bytes(resp).await[..], b"DELETE");
}

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;
use symquery_server::routes::{app, AppConfig};
use tower::ServiceExt;

fn service() -> Router {
    app(AppConfig {
        budget: Duration::from_secs(5),
    })
}

async fn post_solve(body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/solve")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = service().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn index_serves_the_entry_page() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = service().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("<title>symquery</title>"));
}

#[tokio::test]
async fn numeric_query_round_trips() {
    let (status, body) = post_solve(json!({"query": "2+2"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "ok": true,
            "input": "2+2",
            "mode": "auto",
            "result": {"type": "numeric", "value": "4"},
        }),
    );
}

#[tokio::test]
async fn equation_query() {
    let (status, body) = post_solve(json!({"query": "x^2-4=0"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "equation");
    assert_eq!(
        body["result"][0]["solutions"],
        json!([{"x": "-2"}, {"x": "2"}]),
    );
}

#[tokio::test]
async fn empty_query_is_a_client_error() {
    let (status, body) = post_solve(json!({"query": "   "})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], json!(false));
}

#[tokio::test]
async fn missing_query_field_is_a_client_error() {
    let (status, body) = post_solve(json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], json!(false));
}

#[tokio::test]
async fn unparseable_query_is_unprocessable() {
    let (status, body) = post_solve(json!({"query": "what is love"})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["ok"], json!(false));
    assert!(body["error"].is_string());
}

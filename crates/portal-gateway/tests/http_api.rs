use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use portal_core::{Codec, HashidsCodec, ShortCode, StorageError, UrlRecord};
use portal_gateway::{App, AppState};
use portal_shortener::error::Result as ShortenerResult;
use portal_shortener::{Shortener, ShortenerError, ShortenerService};
use portal_storage::InMemoryRepository;
use serde_json::Value;
use tower::ServiceExt;

const PREFIX: &str = "http://portal.test/";

fn app() -> Router {
    let service = ShortenerService::new(
        InMemoryRepository::new(),
        HashidsCodec::unsalted().unwrap(),
    );
    App::router(AppState::new(Arc::new(service), PREFIX))
}

/// A shortener whose backing store is down.
struct BrokenShortener;

#[async_trait]
impl Shortener for BrokenShortener {
    async fn shorten(&self, _url: &str) -> ShortenerResult<ShortCode> {
        Err(ShortenerError::Storage(StorageError::Unavailable(
            "connection refused by 10.0.0.7:5432".to_string(),
        )))
    }

    async fn expand(&self, _code: &str) -> ShortenerResult<UrlRecord> {
        Err(ShortenerError::Storage(StorageError::Timeout(
            "pool timed out".to_string(),
        )))
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn encode_form(url: &str) -> Request<Body> {
    let body = format!("url={}", url.replace(':', "%3A").replace('/', "%2F"));
    Request::builder()
        .method("POST")
        .uri("/url")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn encode_query(url: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/url?url={url}"))
        .body(Body::empty())
        .unwrap()
}

fn encode_multipart(url: &str) -> Request<Body> {
    let boundary = "portal-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"note\"\r\n\r\n\
         ignored\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"url\"\r\n\r\n\
         {url}\r\n\
         --{boundary}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/url")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn decode(identifier: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(format!("/url/{identifier}"))
        .body(Body::empty())
        .unwrap()
}

fn shorten_url(body: &Value) -> &str {
    body["shorten_url"].as_str().expect("shorten_url is a string")
}

#[tokio::test]
async fn encode_new_url_returns_prefixed_identifier() {
    let app = app();

    let (status, body) = send(&app, encode_form("http://example.com")).await;

    assert_eq!(status, StatusCode::OK);
    let expected = HashidsCodec::unsalted().unwrap().encode(1).to_url(PREFIX);
    assert_eq!(shorten_url(&body), expected);
}

#[tokio::test]
async fn encode_reads_url_from_query_string() {
    let app = app();

    let (status, body) = send(&app, encode_query("http://example.com/meow")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(shorten_url(&body).starts_with(PREFIX));
}

#[tokio::test]
async fn encode_reads_url_from_multipart_form() {
    let app = app();

    let (status, body) = send(&app, encode_multipart("http://example.com")).await;

    assert_eq!(status, StatusCode::OK);
    let expected = HashidsCodec::unsalted().unwrap().encode(1).to_url(PREFIX);
    assert_eq!(shorten_url(&body), expected);
}

#[tokio::test]
async fn encode_same_url_twice_returns_same_identifier() {
    let app = app();

    let (_, first) = send(&app, encode_form("http://example.com")).await;
    let (_, second) = send(&app, encode_query("http://example.com")).await;

    assert_eq!(shorten_url(&first), shorten_url(&second));
}

#[tokio::test]
async fn encode_invalid_url_is_bad_request() {
    let app = app();

    let (status, body) = send(&app, encode_form("not-a-url")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Your url <not-a-url> is invalid");
}

#[tokio::test]
async fn encode_without_url_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/url")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Your url <> is invalid");
}

#[tokio::test]
async fn decode_returns_original_url() {
    let app = app();

    let (_, encoded) = send(&app, encode_form("http://youtube.com:8080/meow")).await;
    let identifier = shorten_url(&encoded).strip_prefix(PREFIX).unwrap();

    let (status, body) = send(&app, decode(identifier)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "http://youtube.com:8080/meow");
}

#[tokio::test]
async fn decode_unknown_identifier_is_not_found() {
    let app = app();

    let (status, body) = send(&app, decode("zzzzz")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "URL <zzzzz> is not found");
}

#[tokio::test]
async fn decode_identifier_of_unissued_id_is_not_found() {
    let app = app();
    send(&app, encode_form("http://example.com")).await;

    let unissued = HashidsCodec::unsalted().unwrap().encode(2);
    let (status, body) = send(&app, decode(unissued.as_str())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains(unissued.as_str()));
}

#[tokio::test]
async fn decode_identifier_beyond_id_range_is_not_found() {
    let app = app();

    let (status, body) = send(&app, decode("F8DPD5m0NpRvV")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "URL <F8DPD5m0NpRvV> is not found");
}

#[tokio::test]
async fn decode_undecodable_path_is_json_bad_request() {
    let app = app();

    let (status, body) = send(&app, decode("%FF")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn unknown_routes_and_methods_answer_with_json() {
    let app = app();

    let request = Request::builder()
        .uri("/nowhere")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "no route for /nowhere");

    let request = Request::builder()
        .method("GET")
        .uri("/url")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["message"], "method not allowed");
}

#[tokio::test]
async fn storage_failures_are_internal_errors_without_detail() {
    let app = App::router(AppState::new(Arc::new(BrokenShortener), PREFIX));

    let (status, body) = send(&app, encode_form("http://example.com")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "internal server error");

    let (status, body) = send(&app, decode("jR")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "internal server error");
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

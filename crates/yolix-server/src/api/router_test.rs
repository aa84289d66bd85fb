use super::*;
use axum::body::{to_bytes, Body};
use axum::http::Request as HttpRequest;
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=vid1";

fn test_state(youtube_uri: &str, analysis_uri: &str) -> AppState {
    let youtube = YoutubeClient::with_base_url("yt-key", 5, youtube_uri)
        .expect("youtube client")
        .with_page_delay_ms(0);
    let analysis = AnalysisClient::with_endpoint(
        "or-key",
        "test/model",
        5,
        &format!("{analysis_uri}/chat/completions"),
    )
    .expect("analysis client");
    AppState {
        youtube: Arc::new(youtube),
        analysis: Arc::new(analysis),
        cache: Arc::new(CommentCache::new()),
    }
}

fn test_app(server: &MockServer) -> Router {
    build_app(
        test_state(&server.uri(), &server.uri()),
        RateLimitState::per_minute(1_000),
    )
}

fn post_json(uri: &str, body: &Value) -> HttpRequest<Body> {
    HttpRequest::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json parse")
}

async fn mount_video(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "vid1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "snippet": {
                    "title": "Demo video",
                    "thumbnails": { "medium": { "url": "https://i.ytimg.com/vi/vid1/mqdefault.jpg" } }
                }
            }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("videoId", "vid1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {
                    "snippet": {
                        "topLevelComment": { "snippet": {
                            "authorDisplayName": "ana",
                            "textDisplay": "He said \"hi\"",
                            "publishedAt": "2024-03-05T08:09:10Z",
                            "likeCount": 4
                        }},
                        "totalReplyCount": 1
                    }
                },
                {
                    "snippet": {
                        "topLevelComment": { "snippet": {
                            "authorDisplayName": "ana",
                            "textDisplay": "second",
                            "publishedAt": "2024-04-01T00:00:00Z",
                            "likeCount": 0
                        }},
                        "totalReplyCount": 0
                    }
                }
            ],
            "pageInfo": { "totalResults": 7, "resultsPerPage": 100 }
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_completion(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn completion(content: &str) -> Value {
    json!({ "choices": [{ "message": { "content": content } }] })
}

#[tokio::test]
async fn health_returns_ok_with_request_id() {
    let server = MockServer::start().await;
    let response = test_app(&server)
        .oneshot(
            HttpRequest::builder()
                .uri("/api/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn incoming_request_id_is_echoed() {
    let server = MockServer::start().await;
    let response = test_app(&server)
        .oneshot(
            HttpRequest::builder()
                .uri("/api/health")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(
        response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("req-123")
    );
}

#[tokio::test]
async fn comments_without_url_is_bad_request() {
    let server = MockServer::start().await;
    let response = test_app(&server)
        .oneshot(post_json("/api/comments", &json!({})))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "URL is required");
}

#[tokio::test]
async fn comments_with_short_link_is_bad_request() {
    let server = MockServer::start().await;
    let response = test_app(&server)
        .oneshot(post_json(
            "/api/comments",
            &json!({ "url": "https://youtu.be/vid1" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid YouTube URL");
}

#[tokio::test]
async fn malformed_json_body_uses_error_envelope() {
    let server = MockServer::start().await;
    let response = test_app(&server)
        .oneshot(
            HttpRequest::builder()
                .method("POST")
                .uri("/api/comments")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);
}

#[tokio::test]
async fn comments_returns_collection_and_details() {
    let server = MockServer::start().await;
    mount_video(&server).await;

    let response = test_app(&server)
        .oneshot(post_json("/api/comments", &json!({ "url": WATCH_URL })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["totalComments"], 7);
    assert_eq!(json["comments"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["comments"][0]["author"], "ana");
    assert_eq!(json["comments"][0]["likes"], 4);
    assert_eq!(json["comments"][0]["replies"], 1);
    assert_eq!(json["videoDetails"]["title"], "Demo video");
    assert_eq!(
        json["videoDetails"]["thumbnail"],
        "https://i.ytimg.com/vi/vid1/mqdefault.jpg"
    );
}

#[tokio::test]
async fn repeated_requests_reuse_cached_collection() {
    let server = MockServer::start().await;
    // `mount_video` expects exactly one commentThreads call.
    mount_video(&server).await;
    let app = test_app(&server);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_json("/api/comments", &json!({ "url": WATCH_URL })))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn missing_video_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let response = test_app(&server)
        .oneshot(post_json("/api/comments", &json!({ "url": WATCH_URL })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Video not found or is private");
}

#[tokio::test]
async fn upstream_status_is_preserved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "quotaExceeded" }
        })))
        .mount(&server)
        .await;

    let response = test_app(&server)
        .oneshot(post_json("/api/comments", &json!({ "url": WATCH_URL })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "quotaExceeded");
}

#[tokio::test]
async fn export_returns_csv_attachment() {
    let server = MockServer::start().await;
    mount_video(&server).await;

    let response = test_app(&server)
        .oneshot(post_json("/api/comments/export", &json!({ "url": WATCH_URL })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/csv"));
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"youtube-comments-"));
    assert!(disposition.ends_with(".csv\""));

    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let csv = String::from_utf8(bytes.to_vec()).expect("utf-8");
    assert!(csv.starts_with('\u{feff}'));
    assert!(csv.contains(r#""He said ""hi""""#));
}

#[tokio::test]
async fn stats_reports_authors_and_months() {
    let server = MockServer::start().await;
    mount_video(&server).await;

    let response = test_app(&server)
        .oneshot(post_json("/api/comments/stats", &json!({ "url": WATCH_URL })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["topAuthors"][0], json!({ "author": "ana", "count": 2 }));
    assert_eq!(json["monthly"][0]["month"], "2024-03");
    assert_eq!(json["monthly"][1]["month"], "2024-04");
}

#[tokio::test]
async fn analysis_with_inline_comments_succeeds() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        ResponseTemplate::new(200).set_body_json(completion(
            r#"{"keywords":[{"word":"hi","relevance":40}]}"#,
        )),
    )
    .await;

    let response = test_app(&server)
        .oneshot(post_json(
            "/api/analysis",
            &json!({ "intent": "keywords", "comments": ["hi there"] }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["intent"], "keywords");
    assert_eq!(json["result"]["keywords"][0]["word"], "hi");
}

#[tokio::test]
async fn analysis_by_url_uses_collected_comments() {
    let server = MockServer::start().await;
    mount_video(&server).await;
    mount_completion(
        &server,
        ResponseTemplate::new(200).set_body_json(completion(
            r#"{"detectedLanguage":"English","english":"Friendly greetings"}"#,
        )),
    )
    .await;

    let response = test_app(&server)
        .oneshot(post_json(
            "/api/analysis",
            &json!({ "intent": "summary", "url": WATCH_URL }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["result"]["english"], "Friendly greetings");
    assert_eq!(json["result"]["translated"], "Friendly greetings");
}

#[tokio::test]
async fn analysis_without_input_is_bad_request() {
    let server = MockServer::start().await;
    let response = test_app(&server)
        .oneshot(post_json("/api/analysis", &json!({ "intent": "topics" })))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analysis_unknown_intent_is_bad_request() {
    let server = MockServer::start().await;
    let response = test_app(&server)
        .oneshot(post_json(
            "/api/analysis",
            &json!({ "intent": "poetry", "comments": ["x"] }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);
}

#[tokio::test]
async fn analysis_rate_limit_maps_to_429() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "error": { "code": 429, "message": "Rate limit exceeded" },
            "choices": [{ "message": { "content": "{}" } }]
        })),
    )
    .await;

    let response = test_app(&server)
        .oneshot(post_json(
            "/api/analysis",
            &json!({ "intent": "keywords", "comments": ["x"] }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn analysis_malformed_reply_maps_to_502() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        ResponseTemplate::new(200).set_body_json(completion("Sorry, I cannot do that.")),
    )
    .await;

    let response = test_app(&server)
        .oneshot(post_json(
            "/api/analysis",
            &json!({ "intent": "combined", "comments": ["x"] }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["success"], false);
}

#[tokio::test]
async fn inbound_rate_limit_rejects_excess_requests() {
    let server = MockServer::start().await;
    let app = build_app(
        test_state(&server.uri(), &server.uri()),
        RateLimitState::new(1, Duration::from_secs(60)),
    );

    let first = app
        .clone()
        .oneshot(post_json("/api/comments", &json!({})))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::BAD_REQUEST);

    let second = app
        .clone()
        .oneshot(post_json("/api/comments", &json!({})))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(second.headers().contains_key(header::RETRY_AFTER));
    assert_eq!(
        body_json(second).await["error"],
        crate::middleware::SERVER_RATE_LIMIT_MESSAGE
    );

    let health = app
        .oneshot(
            HttpRequest::builder()
                .uri("/api/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(health.status(), StatusCode::OK, "health is not rate limited");
}

#[tokio::test]
async fn provider_429_is_distinguishable_from_inbound_429() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": 429, "message": "Provider quota exhausted" }
        })),
    )
    .await;
    let app = build_app(
        test_state(&server.uri(), &server.uri()),
        RateLimitState::new(1, Duration::from_secs(60)),
    );
    let body = json!({ "intent": "keywords", "comments": ["x"] });

    let provider = app
        .clone()
        .oneshot(post_json("/api/analysis", &body))
        .await
        .expect("response");
    assert_eq!(provider.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(!provider.headers().contains_key(header::RETRY_AFTER));
    let provider_error = body_json(provider).await["error"].clone();

    let inbound = app
        .oneshot(post_json("/api/analysis", &body))
        .await
        .expect("response");
    assert_eq!(inbound.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(inbound.headers().contains_key(header::RETRY_AFTER));
    let inbound_error = body_json(inbound).await["error"].clone();

    assert_eq!(inbound_error, crate::middleware::SERVER_RATE_LIMIT_MESSAGE);
    assert_ne!(provider_error, inbound_error);
    assert!(provider_error
        .as_str()
        .is_some_and(|e| e.contains("Provider quota exhausted")));
}

#[tokio::test]
async fn zero_rate_limit_admits_every_request() {
    let server = MockServer::start().await;
    let app = build_app(
        test_state(&server.uri(), &server.uri()),
        RateLimitState::per_minute(0),
    );

    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(post_json("/api/comments", &json!({})))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[test]
fn upstream_status_falls_back_for_non_error_codes() {
    assert_eq!(
        upstream_status(200, StatusCode::INTERNAL_SERVER_ERROR),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        upstream_status(404, StatusCode::INTERNAL_SERVER_ERROR),
        StatusCode::NOT_FOUND
    );
}

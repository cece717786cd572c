use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::ConnectInfo;
use axum::http::{Method, Request, StatusCode, header};
use content_service::build_router;
use content_service::config::Config;
use content_service::logger::{LogLevel, Logger};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn words(count: usize) -> String {
    vec!["lorem"; count].join(" ")
}

fn content_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("newer.mdx"),
        format!(
            "---\ntitle: \"X\"\ndescription: Fresh\ndate: \"2024-01-01\"\ntags: [rust, axum]\n---\n{}",
            words(400)
        ),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("older.md"),
        "---\ntitle: Older\ndate: 2023-06-01\ntags: notes\n---\nshort body",
    )
    .unwrap();
    dir
}

fn router(dir: &Path) -> Router {
    let config = Config {
        port: 0,
        content_dir: dir.to_path_buf(),
        site_url: "https://example.com".to_string(),
        allowed_origins: vec!["http://client.test".to_string()],
        allow_all_origins: false,
    };
    let logger = Logger::new("content-test").with_level(LogLevel::Error);
    build_router(Arc::new(config), logger).unwrap()
}

async fn get(router: &Router, uri: &str) -> axum::response::Response {
    let mut request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    add_connect_info(&mut request);
    router.clone().oneshot(request).await.unwrap()
}

fn add_connect_info(request: &mut Request<Body>) {
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));
}

async fn body_bytes(body: Body) -> Bytes {
    body.collect().await.unwrap().to_bytes()
}

async fn body_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}

#[tokio::test]
async fn lists_posts_newest_first_with_reading_time() {
    let dir = content_dir();
    let router = router(dir.path());

    let response = get(&router, "/posts").await;
    assert_eq!(response.status(), StatusCode::OK);
    let posts = body_json(response.into_body()).await;
    let posts = posts.as_array().unwrap();
    assert_eq!(posts.len(), 2);

    assert_eq!(posts[0]["slug"], "newer");
    assert_eq!(posts[0]["title"], "X");
    assert_eq!(posts[0]["readTime"], "2 min");
    assert_eq!(posts[0]["readMinutes"], 2);
    assert_eq!(posts[0]["tags"], serde_json::json!(["rust", "axum"]));
    assert!(posts[0].get("content").is_none());

    assert_eq!(posts[1]["slug"], "older");
    assert_eq!(posts[1]["tags"], serde_json::json!(["notes"]));
}

#[tokio::test]
async fn single_post_includes_body_and_html() {
    let dir = content_dir();
    let router = router(dir.path());

    let response = get(&router, "/posts/older").await;
    assert_eq!(response.status(), StatusCode::OK);
    let post = body_json(response.into_body()).await;
    assert_eq!(post["title"], "Older");
    assert_eq!(post["content"], "short body");
    assert_eq!(post["html"], "<p>short body</p>\n");
}

#[tokio::test]
async fn missing_post_is_a_json_404() {
    let dir = content_dir();
    let router = router(dir.path());

    for uri in ["/posts/missing-slug", "/posts/..%2Folder"] {
        let response = get(&router, uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response.into_body()).await;
        assert_eq!(body["message"], "Post not found");
    }
}

#[tokio::test]
async fn missing_directory_serves_empty_lists() {
    let dir = tempfile::tempdir().unwrap();
    let router = router(&dir.path().join("nope"));

    let posts = body_json(get(&router, "/posts").await.into_body()).await;
    assert_eq!(posts, serde_json::json!([]));
    let slugs = body_json(get(&router, "/slugs").await.into_body()).await;
    assert_eq!(slugs, serde_json::json!([]));
}

#[tokio::test]
async fn slugs_and_sitemap_cover_every_post() {
    let dir = content_dir();
    let router = router(dir.path());

    let slugs = body_json(get(&router, "/slugs").await.into_body()).await;
    assert_eq!(slugs, serde_json::json!(["newer", "older"]));

    let response = get(&router, "/sitemap.xml").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("application/xml")
    );
    let xml = String::from_utf8(body_bytes(response.into_body()).await.to_vec()).unwrap();
    assert!(xml.contains("<loc>https://example.com/blog/newer</loc>"));
    assert!(xml.contains("<loc>https://example.com/blog/older</loc>"));
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let dir = content_dir();
    let router = router(dir.path());

    let mut request = Request::builder()
        .uri("/healthz")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    add_connect_info(&mut request);
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-42");
    assert_eq!(response.headers()["x-frame-options"], "SAMEORIGIN");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");

    let response = get(&router, "/nowhere").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(!response.headers()["x-request-id"].is_empty());
}

#[tokio::test]
async fn cors_allows_only_configured_origins() {
    let dir = content_dir();
    let router = router(dir.path());

    let mut request = Request::builder()
        .uri("/posts")
        .header(header::ORIGIN, "http://client.test")
        .body(Body::empty())
        .unwrap();
    add_connect_info(&mut request);
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://client.test"
    );

    let mut request = Request::builder()
        .uri("/posts")
        .header(header::ORIGIN, "http://evil.test")
        .body(Body::empty())
        .unwrap();
    add_connect_info(&mut request);
    let response = router.clone().oneshot(request).await.unwrap();
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

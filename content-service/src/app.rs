use anyhow::anyhow;
use axum::body::Body;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::{HeaderValue, Method, Request, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use time::OffsetDateTime;
use tower_governor::GovernorLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::SmartIpKeyExtractor;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;
use crate::headers::{apply_security_headers, resolve_client_ip, resolve_request_id, set_request_id};
use crate::logger::Logger;
use crate::posts::{ContentError, ContentStore};
use crate::sitemap::build_sitemap;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub logger: Logger,
    pub store: ContentStore,
}

pub fn build_router(config: Arc<Config>, logger: Logger) -> anyhow::Result<Router> {
    let state = Arc::new(AppState {
        store: ContentStore::new(config.content_dir.clone()).with_logger(logger.clone()),
        config,
        logger,
    });

    let governor_config = GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(30)
        .key_extractor(SmartIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limiter config"))?;

    let cors = build_cors(&state.config);

    Ok(Router::new()
        .route("/healthz", get(handle_healthz))
        .route("/posts", get(handle_list_posts))
        .route("/posts/{slug}", get(handle_get_post))
        .route("/slugs", get(handle_list_slugs))
        .route("/sitemap.xml", get(handle_sitemap))
        .fallback(handle_not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            request_context_middleware,
        ))
        .layer(GovernorLayer::new(governor_config))
        .layer(cors)
        .with_state(state))
}

async fn request_context_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let request_id = resolve_request_id(request.headers());
    let origin = request
        .headers()
        .get("origin")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());
    let client_ip = resolve_client_ip(
        request.headers(),
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| &info.0),
    );
    let method = request.method().to_string();
    let raw_url = request.uri().to_string();

    let started_at = Instant::now();
    state.logger.info(
        "request.received",
        json!({
            "requestId": request_id,
            "method": method,
            "rawUrl": raw_url,
            "origin": origin,
            "clientIp": client_ip,
        }),
    );

    let mut response = next.run(request).await;
    set_request_id(response.headers_mut(), &request_id);
    apply_security_headers(response.headers_mut());

    let duration_ms = started_at.elapsed().as_secs_f64() * 1000.0;
    state.logger.info(
        "request.completed",
        json!({
            "requestId": request_id,
            "method": method,
            "rawUrl": raw_url,
            "statusCode": response.status().as_u16(),
            "durationMs": duration_ms,
            "origin": origin,
            "clientIp": client_ip,
        }),
    );

    response
}

fn build_cors(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods([Method::GET, Method::HEAD, Method::OPTIONS]);
    if config.allow_all_origins {
        return cors.allow_origin(Any);
    }
    let allowed: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();
    cors.allow_origin(AllowOrigin::list(allowed))
}

async fn handle_healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

async fn handle_list_posts(State(state): State<Arc<AppState>>) -> Response {
    match state.store.list_all().await {
        Ok(posts) => {
            state
                .logger
                .debug("posts.listed", json!({ "count": posts.len() }));
            Json(posts).into_response()
        }
        Err(error) => content_error_response(&state.logger, &error),
    }
}

async fn handle_get_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    match state.store.get_by_slug(&slug).await {
        Ok(post) => Json(post).into_response(),
        Err(error) => content_error_response(&state.logger, &error),
    }
}

async fn handle_list_slugs(State(state): State<Arc<AppState>>) -> Response {
    match state.store.list_slugs().await {
        Ok(slugs) => Json(slugs).into_response(),
        Err(error) => content_error_response(&state.logger, &error),
    }
}

async fn handle_sitemap(State(state): State<Arc<AppState>>) -> Response {
    match state.store.list_all().await {
        Ok(posts) => {
            let xml = build_sitemap(&state.config.site_url, &posts, OffsetDateTime::now_utc());
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
                xml,
            )
                .into_response()
        }
        Err(error) => content_error_response(&state.logger, &error),
    }
}

async fn handle_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Not Found" })),
    )
}

fn content_error_response(logger: &Logger, error: &ContentError) -> Response {
    match error {
        ContentError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Post not found" })),
        )
            .into_response(),
        ContentError::Io { .. } => {
            logger.error("posts.read_failed", json!({ "error": error.to_string() }));
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Failed to read posts" })),
            )
                .into_response()
        }
    }
}

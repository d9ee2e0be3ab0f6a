//! REST API and HTML pages over [`ProfileLens`].
//!
//! JSON lookups always answer 200 with a `success` flag; only malformed
//! requests get a 4xx.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Form, Query, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::Instrument;

use profile_lens::{
    looks_like_url, resolve_target, LensError, LensResult, LookupResponse, Platform,
};

use crate::render;
use crate::service::ProfileLens;

/// Pasted page sources are far larger than axum's 2 MB default.
const MANUAL_BODY_LIMIT: usize = 16 * 1024 * 1024;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub url: Option<String>,
    pub platform: Option<String>,
}

impl LookupQuery {
    /// A missing URL wins over every other problem with the request.
    fn url_is_blank(&self) -> bool {
        self.url.as_deref().map_or(true, |u| u.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct ManualRequest {
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub url: String,
}

/// Build the application router.
pub fn router(lens: Arc<ProfileLens>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/extract", get(api_extract))
        .route(
            "/api/extract/manual",
            post(api_extract_manual).layer(DefaultBodyLimit::max(MANUAL_BODY_LIMIT)),
        )
        .route("/profile", get(profile_page))
        .route(
            "/profile/manual",
            post(profile_manual_page).layer(DefaultBodyLimit::max(MANUAL_BODY_LIMIT)),
        )
        .layer(middleware::from_fn(request_span))
        .layer(cors)
        .with_state(lens)
}

/// Serve the router on `addr` until Ctrl+C.
pub async fn start(addr: &str, lens: Arc<ProfileLens>) -> anyhow::Result<()> {
    let app = router(lens);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("ProfileLens listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    tracing::info!("Shutting down");
}

/// Tag every request with a fresh id, both in the log span and on the
/// response.
async fn request_span(request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!(
        "request",
        %request_id,
        method = %request.method(),
        path = %request.uri().path()
    );

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Empty means "detect from the URL", as sent by the index form.
fn parse_platform(raw: Option<&str>) -> LensResult<Option<Platform>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(p) => p.parse().map(Some),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn index() -> Html<String> {
    Html(render::index_page())
}

async fn api_extract(
    State(lens): State<Arc<ProfileLens>>,
    Query(query): Query<LookupQuery>,
) -> Response {
    if query.url_is_blank() {
        return Json(LookupResponse::failed(&LensError::MissingUrl)).into_response();
    }
    let platform = match parse_platform(query.platform.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(LookupResponse::failed(&e))).into_response();
        }
    };

    Json(lens.respond(query.url.as_deref(), platform).await).into_response()
}

async fn api_extract_manual(
    State(lens): State<Arc<ProfileLens>>,
    Json(req): Json<ManualRequest>,
) -> Json<LookupResponse> {
    Json(lens.respond_manual(&req.html, &req.url))
}

async fn profile_page(
    State(lens): State<Arc<ProfileLens>>,
    Query(query): Query<LookupQuery>,
) -> Response {
    if query.url_is_blank() {
        let page = render::result_page(&LookupResponse::failed(&LensError::MissingUrl), "");
        return Html(page).into_response();
    }
    let platform = match parse_platform(query.platform.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            let page = render::result_page(&LookupResponse::failed(&e), "");
            return (StatusCode::BAD_REQUEST, Html(page)).into_response();
        }
    };

    let input = query.url.as_deref().unwrap_or("").trim();
    if !input.is_empty() && !looks_like_url(input) && platform.is_none() {
        return Html(render::platform_choice_page(input)).into_response();
    }

    let attempted = resolve_target(input, platform).unwrap_or_else(|_| input.to_string());
    let resp = lens.respond(Some(input), platform).await;
    Html(render::result_page(&resp, &attempted)).into_response()
}

async fn profile_manual_page(
    State(lens): State<Arc<ProfileLens>>,
    Form(req): Form<ManualRequest>,
) -> Html<String> {
    let resp = lens.respond_manual(&req.html, &req.url);
    Html(render::result_page(&resp, req.url.trim()))
}

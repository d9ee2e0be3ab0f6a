//! End-to-end tests of the HTTP API against a mocked upstream platform.

use std::sync::Arc;

use assert_json_diff::{assert_json_eq, assert_json_include};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use profile_lens_server::rest::router;
use profile_lens_server::{LensConfig, ProfileLens};

const INSTAGRAM_PAGE: &str = include_str!("../../profile-lens/tests/fixtures/instagram_profile.html");
const LOGIN_WALL: &str = include_str!("../../profile-lens/tests/fixtures/login_wall.html");

fn app() -> Router {
    let lens = ProfileLens::from_config(&LensConfig::default()).unwrap();
    router(Arc::new(lens))
}

fn encode(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace(':', "%3A")
        .replace('/', "%2F")
        .replace('?', "%3F")
        .replace('&', "%26")
        .replace('=', "%3D")
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let resp = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn get_json(app: Router, uri: &str) -> Value {
    let (status, body) = get(app, uri).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_str(&body).unwrap()
}

#[tokio::test]
async fn test_missing_url_error_shape() {
    for uri in ["/api/extract", "/api/extract?url=", "/api/extract?platform=instagram"] {
        let body = get_json(app(), uri).await;
        assert_json_eq!(body, json!({ "success": false, "error": "No URL provided" }));
    }
}

#[tokio::test]
async fn test_instagram_lookup_end_to_end() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/instagram.com/johndoe"))
        .respond_with(ResponseTemplate::new(200).set_body_string(INSTAGRAM_PAGE))
        .expect(1)
        .mount(&upstream)
        .await;

    let target = format!("{}/instagram.com/johndoe", upstream.uri());
    let body = get_json(app(), &format!("/api/extract?url={}", encode(&target))).await;

    assert_json_include!(
        actual: body,
        expected: json!({
            "success": true,
            "platform": "instagram",
            "id": "123456789",
            "username": "johndoe",
            "name": "John Doe",
            "profilePhoto": "https://scontent.cdninstagram.example/v/t51/johndoe.jpg",
            "links": {
                "profile": "https://www.instagram.com/johndoe",
                "threads": "https://www.threads.com/@johndoe",
                "wayback": "https://web.archive.org/web/https://www.instagram.com/johndoe"
            }
        })
    );
}

#[tokio::test]
async fn test_forbidden_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&upstream)
        .await;

    let target = format!("{}/jane.roe", upstream.uri());
    let body = get_json(app(), &format!("/api/extract?url={}", encode(&target))).await;
    assert_json_eq!(
        body,
        json!({ "success": false, "error": "Platform returned 403" })
    );
}

#[tokio::test]
async fn test_page_without_id() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_WALL))
        .mount(&upstream)
        .await;

    let target = format!("{}/jane.roe", upstream.uri());
    let body = get_json(app(), &format!("/api/extract?url={}", encode(&target))).await;
    assert_json_eq!(body, json!({ "success": false, "error": "ID not found" }));
}

#[tokio::test]
async fn test_unreachable_upstream() {
    // Bind then release a port so nothing is listening on it.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let target = format!("http://127.0.0.1:{port}/jane.roe");

    let body = get_json(app(), &format!("/api/extract?url={}", encode(&target))).await;
    assert_json_eq!(
        body,
        json!({ "success": false, "error": "Failed to fetch profile" })
    );
}

#[tokio::test]
async fn test_manual_json_route() {
    let req = Request::post("/api/extract/manual")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "html": INSTAGRAM_PAGE,
                "url": "https://www.instagram.com/johndoe"
            })
            .to_string(),
        ))
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(
        &axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap(),
    )
    .unwrap();

    assert_json_include!(
        actual: body,
        expected: json!({
            "success": true,
            "platform": "instagram",
            "id": "123456789",
            "username": "johndoe"
        })
    );
}

#[tokio::test]
async fn test_manual_form_renders_card() {
    let html = r#"<meta property="og:title" content="<b>Jane</b>"> fb://profile/100004567891234"#;
    let form = format!(
        "url={}&html={}",
        encode("https://www.facebook.com/jane"),
        encode(html)
            .replace(' ', "+")
            .replace('<', "%3C")
            .replace('>', "%3E")
            .replace('"', "%22")
    );
    let req = Request::post("/profile/manual")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = String::from_utf8(
        axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec(),
    )
    .unwrap();

    assert!(page.contains("Facebook ID"));
    assert!(page.contains("100004567891234"));
    assert!(page.contains("&lt;b&gt;Jane&lt;/b&gt;"));
    assert!(page.contains("marketplace/profile/100004567891234"));
}

#[tokio::test]
async fn test_profile_page_failure_offers_manual_fallback() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&upstream)
        .await;

    let target = format!("{}/jane.roe", upstream.uri());
    let (status, page) = get(app(), &format!("/profile?url={}", encode(&target))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Platform returned 403"));
    assert!(page.contains(&format!("view-source:{target}")));
    assert!(page.contains(r#"action="/profile/manual""#));
}

#[tokio::test]
async fn test_health_and_index() {
    let body = get_json(app(), "/health").await;
    assert_eq!(body["status"], "ok");

    let (status, page) = get(app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("<form"));
}

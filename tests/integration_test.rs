//! Integration tests for the security checker
//!
//! These drive the axum router end to end with `tower::ServiceExt::oneshot`,
//! so no listener or external service is needed.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use security_checker::{
    clock::FixedClock,
    config::Config,
    guard::{FilterKind, RequestGuard},
    server::build_router,
};
use std::sync::Arc;
use tower::ServiceExt;

const NOW: i64 = 1_700_000_000_000;

/// Helper to build a router from a pipeline order
fn router_with(kinds: Vec<FilterKind>) -> Router {
    let mut config = Config::default_config();
    config.pipeline = kinds;
    let guard = Arc::new(RequestGuard::with_clock(
        config.guard.clone(),
        Arc::new(FixedClock(NOW)),
    ));
    let pipeline = config
        .build_pipeline_with_guard(guard)
        .expect("Failed to build pipeline");
    build_router(Arc::new(pipeline))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_redirect_rewrites_path() {
    let app = router_with(vec![FilterKind::RedirectPaths]);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/shopback/resource/products/?sort=desc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["path"], "/shopback/static/assets/products/?sort=desc");
}

#[tokio::test]
async fn test_redirect_skips_post() {
    let app = router_with(vec![FilterKind::RedirectPaths]);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/shopback/resource/products")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["path"], "/shopback/resource/products");
}

#[tokio::test]
async fn test_rejection_is_serialized() {
    let app = router_with(vec![FilterKind::CheckCookies]);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/shopback/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["name"], "BadRequestError");
    assert_eq!(
        body["error"]["message"],
        "should contain cookies when requesting this endpoint"
    );
    assert!(body["error"]["stacktrace"].is_string());
}

#[tokio::test]
async fn test_cookie_header_is_parsed() {
    let app = router_with(vec![FilterKind::CheckCookies]);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/shopback/me")
                .header("Cookie", "authentication=95567eda10aa4f64b48bf49e1139a766")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_from_header_added() {
    let app = router_with(vec![FilterKind::CheckDomain, FilterKind::AddFromHeader]);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/shopback/api/any_path")
                .header("Host", "www.shopback.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("from").and_then(|v| v.to_str().ok()),
        Some("hello@shopback.com")
    );
}

#[tokio::test]
async fn test_first_rejection_wins() {
    let app = router_with(vec![FilterKind::CheckDomain, FilterKind::AddFromHeader]);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/shopback/api/any_path")
                .header("Host", "www.shopback.hk")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get("from").is_none());
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "domain name should be matched as expected");
}

#[tokio::test]
async fn test_write_pipeline() {
    let app = router_with(vec![
        FilterKind::TrimQueryString,
        FilterKind::CheckShopbackAgent,
        FilterKind::CheckJsonContentType,
        FilterKind::CheckTimestamp,
    ]);

    let request = || {
        Request::builder()
            .method("PUT")
            .uri("/shopback/api/any_path?hello=world")
            .header("X-SHOPBACK-AGENT", "bcd1c25e10994db9a1c7ac90756058b7")
            .header("Content-Type", "application/json")
    };

    let response = app
        .clone()
        .oneshot(
            request()
                .header("X-SHOPBACK-TIMESTAMP", NOW.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["path"], "/shopback/api/any_path");

    let stale = app
        .oneshot(
            request()
                .header("X-SHOPBACK-TIMESTAMP", (NOW - 120_000).to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(stale.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_agent_on_delete() {
    let app = router_with(vec![FilterKind::CheckAgentOnDelete]);

    let allowed = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/shopback/api/items/1")
                .header("X-SHOPBACK-AGENT", "AGENT_1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);

    let wrong_agent = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/shopback/api/items/1")
                .header("X-SHOPBACK-AGENT", "AGENT_2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(wrong_agent.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_bypasses_filters() {
    let app = router_with(vec![FilterKind::CheckAgentOnDelete]);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

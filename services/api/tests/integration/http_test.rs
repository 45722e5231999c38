use axum::http::StatusCode;
use axum::http::{HeaderName, HeaderValue, header};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::Value;

use adoptly_api::config::{CloudinaryConfig, SmtpConfig};
use adoptly_api::infra::cloudinary::CloudinarySigner;
use adoptly_api::infra::mailer::SmtpMailer;
use adoptly_api::router::build_router;
use adoptly_api::state::AppState;
use adoptly_testing::auth::TestSession;

use crate::helpers::TEST_JWT_SECRET;

/// Router over a disconnected database: only requests rejected before any
/// query can succeed.
fn server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        cookie_secure: false,
        frontend_url: "http://localhost:5173".into(),
        upload_dir: std::env::temp_dir(),
        mailer: SmtpMailer::new(&SmtpConfig {
            host: "localhost".into(),
            port: 587,
            user: "user".into(),
            pass: "pass".into(),
            from: "noreply@example.com".into(),
        })
        .unwrap(),
        cloudinary: CloudinarySigner::new(&CloudinaryConfig {
            cloud_name: "demo".into(),
            api_key: "key".into(),
            api_secret: "secret".into(),
        }),
    };
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn should_report_healthy() {
    let server = server();
    assert_eq!(server.get("/healthz").await.status_code(), StatusCode::OK);
    assert_eq!(server.get("/readyz").await.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn should_greet_on_api_root() {
    let response = server().get("/api/v1").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Adoptly API is up and running!");
}

#[tokio::test]
async fn should_return_json_404_for_unknown_route() {
    let response = server().get("/api/v1/nope").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["kind"], "ROUTE_NOT_FOUND");
    assert_eq!(body["message"], "not found - /api/v1/nope");
}

#[tokio::test]
async fn should_reject_protected_route_without_token() {
    let response = server().get("/api/v1/users/me").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["kind"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn should_reject_garbage_cookie() {
    let response = server()
        .get("/api/v1/users/me")
        .add_header(header::COOKIE, HeaderValue::from_static("token=not-a-jwt"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_token_signed_with_other_secret() {
    let session = TestSession::adopter("some-other-secret");
    let (name, value): (HeaderName, HeaderValue) = session.cookie();
    let response = server()
        .get("/api/v1/applications/mine")
        .add_header(name, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_require_auth_for_upload_signature() {
    let response = server().post("/api/v1/upload/sign").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_clear_cookie_on_logout() {
    let response = server().post("/api/v1/auth/logout").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let cookie = response.header(header::SET_COOKIE);
    let cookie = cookie.to_str().unwrap();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn should_reject_malformed_register_body() {
    let response = server()
        .post("/api/v1/auth/register")
        .add_header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .bytes("{not json".into())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "VALIDATION");
}

#[tokio::test]
async fn should_reject_unknown_species_before_querying() {
    let response = server().get("/api/v1/pets?species=dragon").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

use axum::http::{HeaderName, HeaderValue, StatusCode, header::AUTHORIZATION};
use axum_test::TestServer;
use bytes::Bytes;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use soundcave_api::infra::storage::LocalObjectStore;
use soundcave_api::router::{RouterOptions, build_router};
use soundcave_api::state::AppState;
use soundcave_domain::id::UserId;
use soundcave_domain::user::Role;
use soundcave_testing::auth::{MockAuth, test_keys};

use crate::helpers::test_hasher;

/// Server without a database. Every case here is decided before a query runs.
fn server_with(options: RouterOptions) -> TestServer {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        jwt: test_keys(),
        hasher: test_hasher(),
        object_store: LocalObjectStore::new(
            std::env::temp_dir().join("soundcave-router-test"),
            "/assets",
        ),
    };
    TestServer::new(build_router(state, options)).unwrap()
}

fn server() -> TestServer {
    server_with(RouterOptions::default())
}

fn auth_value(raw: &str) -> HeaderValue {
    HeaderValue::from_str(raw).unwrap()
}

fn bearer(id: i64, role: Role) -> HeaderValue {
    auth_value(&MockAuth::new(id, role).bearer())
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_live_but_not_ready_without_database() {
    let server = server();
    assert_eq!(server.get("/healthz").await.status_code(), StatusCode::OK);
    assert_eq!(
        server.get("/readyz").await.status_code(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn should_attach_request_id_to_responses() {
    let response = server().get("/healthz").await;
    let id = response.header("x-request-id");
    assert!(!id.is_empty());

    let response = server()
        .get("/healthz")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("caller-supplied"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "caller-supplied");
}

// ── Guard ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_missing_credential() {
    let response = server().get("/api/profile").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["kind"], "MISSING_CREDENTIAL");
}

#[tokio::test]
async fn should_reject_malformed_credential() {
    for raw in ["Token abc", "Bearer", "Bearer "] {
        let response = server()
            .get("/api/profile")
            .add_header(AUTHORIZATION, auth_value(raw))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED, "{raw}");
        assert_eq!(
            response.json::<Value>()["kind"],
            "MALFORMED_CREDENTIAL",
            "{raw}"
        );
    }
}

#[tokio::test]
async fn should_reject_expired_and_forged_credentials() {
    let expired = test_keys()
        .issue_at(UserId(42), "user42@example.com", Role::User, 1_000)
        .unwrap();
    let response = server()
        .get("/api/profile")
        .add_header(AUTHORIZATION, auth_value(&format!("Bearer {}", expired.token)))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["kind"], "INVALID_CREDENTIAL");

    let response = server()
        .get("/api/profile")
        .add_header(AUTHORIZATION, auth_value("Bearer not.a.jwt"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["kind"], "INVALID_CREDENTIAL");
}

#[tokio::test]
async fn should_require_admin_for_user_management() {
    let server = server();
    let response = server
        .post("/api/users")
        .add_header(AUTHORIZATION, bearer(42, Role::User))
        .json(&json!({
            "full_name": "Someone",
            "email": "someone@example.com",
            "password": "cave-pass",
            "role": "label",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["kind"], "FORBIDDEN");

    let response = server
        .delete("/api/users/5")
        .add_header(AUTHORIZATION, bearer(42, Role::Label))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = server
        .post("/api/artists")
        .add_header(AUTHORIZATION, bearer(42, Role::Premium))
        .json(&json!({ "name": "X", "bio": "Y", "email": "x@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_require_admin_to_edit_or_delete_artists() {
    let server = server();
    let response = server
        .put("/api/artists/3")
        .add_header(AUTHORIZATION, bearer(42, Role::Label))
        .json(&json!({ "name": "Renamed" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["kind"], "FORBIDDEN");

    let response = server
        .delete("/api/artists/3")
        .add_header(AUTHORIZATION, bearer(42, Role::User))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = server.delete("/api/artists/3").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// ── Follow ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_forbid_follow_for_non_user_roles() {
    let server = server();
    let response = server
        .post("/api/users/follow")
        .add_header(AUTHORIZATION, bearer(42, Role::Premium))
        .json(&json!({ "target_user_id": 7 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["kind"], "FORBIDDEN");

    let response = server
        .post("/api/artists/3/unfollow")
        .add_header(AUTHORIZATION, bearer(42, Role::Admin))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_require_target_user_id() {
    let server = server();
    for body in [json!({}), json!({ "target_user_id": 0 }), json!({ "target_user_id": -3 })] {
        let response = server
            .post("/api/users/unfollow")
            .add_header(AUTHORIZATION, bearer(42, Role::User))
            .json(&body)
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response.json::<Value>()["kind"], "INVALID_INPUT");
    }
}

#[tokio::test]
async fn should_reject_self_follow_over_http() {
    let response = server()
        .post("/api/users/follow")
        .add_header(AUTHORIZATION, bearer(42, Role::User))
        .json(&json!({ "target_user_id": 42 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["kind"], "SELF_FOLLOW");
}

// ── Profile image ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_non_image_upload_over_http() {
    let response = server()
        .put("/api/profile/image")
        .add_header(AUTHORIZATION, bearer(42, Role::User))
        .content_type("text/plain")
        .bytes(Bytes::from_static(b"hello"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(response.json::<Value>()["kind"], "UNSUPPORTED_MEDIA_TYPE");
}

#[tokio::test]
async fn should_reject_upload_over_size_limit() {
    let server = server_with(RouterOptions {
        max_upload_bytes: 16,
        ..RouterOptions::default()
    });
    let response = server
        .put("/api/profile/image")
        .add_header(AUTHORIZATION, bearer(42, Role::User))
        .content_type("image/png")
        .bytes(Bytes::from(vec![0u8; 64]))
        .await;
    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
}

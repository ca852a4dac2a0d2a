//! End-to-end auth flow tests against the router
//!
//! Covers the full register/login/change-password lifecycle and the
//! role gate on protected image routes, using an in-memory SQLite
//! store and oneshot requests.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use pictor_api::{AppState, create_router};
use pictor_auth::JwtManager;
use pictor_db::Database;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    jwt: Arc<JwtManager>,
}

async fn test_app() -> TestApp {
    let db = Database::new_in_memory().await.unwrap();
    let jwt = Arc::new(JwtManager::new("test-secret", 30));
    let router = create_router(AppState::new(db, jwt.clone()));
    TestApp { router, jwt }
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register(app: &TestApp, username: &str, email: &str, password: &str, role: Option<&str>) -> axum::response::Response {
    let mut body = json!({
        "username": username,
        "email": email,
        "password": password,
    });
    if let Some(role) = role {
        body["role"] = json!(role);
    }
    app.router
        .clone()
        .oneshot(request("POST", "/api/auth/register", None, Some(body)))
        .await
        .unwrap()
}

async fn login(app: &TestApp, username: &str, password: &str) -> axum::response::Response {
    app.router
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": username, "password": password})),
        ))
        .await
        .unwrap()
}

async fn login_token(app: &TestApp, username: &str, password: &str) -> String {
    let response = login(app, username, password).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_then_login() {
    let app = test_app().await;

    let response = register(&app, "alice", "a@x.com", "password1", None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], "user");
    assert!(body.get("password_hash").is_none());

    let response = login(&app, "alice", "password1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["expires_in"], 30 * 60);

    // The issued token decodes back to the same identity claims
    let claims = app.jwt.validate_token(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.role, "user");
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let app = test_app().await;
    register(&app, "alice", "a@x.com", "password1", None).await;

    // Same email, different username
    let response = register(&app, "bob", "a@x.com", "password1", None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Same username, different email
    let response = register(&app, "alice", "b@x.com", "password1", None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Only the original identity exists: its credentials still log in
    let response = login(&app, "alice", "password1").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_failure_modes() {
    let app = test_app().await;
    register(&app, "alice", "a@x.com", "password1", None).await;

    let response = login(&app, "alice", "wrong-pass").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = login(&app, "nobody", "password1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Usernames that could never have been registered still report
    // not-found rather than a validation error
    let response = login(&app, "no such user!", "password1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_change_password() {
    let app = test_app().await;
    register(&app, "alice", "a@x.com", "password1", None).await;
    let token = login_token(&app, "alice", "password1").await;

    // Wrong old password leaves the stored hash untouched
    let response = app
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/change-password",
            Some(&token),
            Some(json!({"old_password": "wrong-pass", "new_password": "newpass99"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(login(&app, "alice", "password1").await.status(), StatusCode::OK);

    // Correct old password replaces it
    let response = app
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/api/auth/change-password",
            Some(&token),
            Some(json!({"old_password": "password1", "new_password": "newpass99"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(login(&app, "alice", "password1").await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(login(&app, "alice", "newpass99").await.status(), StatusCode::OK);

    // Tokens issued before the change remain valid until expiry
    let response = app
        .router
        .clone()
        .oneshot(request("GET", "/api/images", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_gate_rejects_unauthenticated_requests() {
    let app = test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(request("GET", "/api/images", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .router
        .clone()
        .oneshot(request("GET", "/api/images", Some("garbage"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_role_gate_on_delete() {
    let app = test_app().await;
    register(&app, "alice", "a@x.com", "password1", None).await;
    register(&app, "root", "root@x.com", "password1", Some("admin")).await;

    let user_token = login_token(&app, "alice", "password1").await;
    let admin_token = login_token(&app, "root", "password1").await;

    // Alice records an image; the record carries her id
    let response = app
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/api/images",
            Some(&user_token),
            Some(json!({
                "url": "https://cdn.example/img-1.jpg",
                "public_id": "img-1",
                "photo_name": "graduation",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    let image_id = body["id"].as_i64().unwrap();
    assert!(body["uploaded_by"].as_i64().unwrap() > 0);

    // A plain user cannot delete
    let response = app
        .router
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/images/{}", image_id),
            Some(&user_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // An admin can
    let response = app
        .router
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/images/{}", image_id),
            Some(&admin_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Deleting again is a 404, not a silent success
    let response = app
        .router
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/images/{}", image_id),
            Some(&admin_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rename_photo() {
    let app = test_app().await;
    register(&app, "alice", "a@x.com", "password1", None).await;
    let token = login_token(&app, "alice", "password1").await;

    let response = app
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/api/images",
            Some(&token),
            Some(json!({
                "url": "https://cdn.example/img-2.jpg",
                "public_id": "img-2",
                "photo_name": "old-name",
            })),
        ))
        .await
        .unwrap();
    let image_id = json_body(response).await["id"].as_i64().unwrap();

    let response = app
        .router
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/api/images/{}/name", image_id),
            Some(&token),
            Some(json!({"photo_name": "new-name"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["photo_name"], "new-name");
}

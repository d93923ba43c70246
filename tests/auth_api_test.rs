mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use recruitment_portal::test_support::test_app;
use serde_json::json;
use tower::ServiceExt;

use common::{admin_token, get, post, read, register, send};

#[tokio::test]
async fn register_then_login_returns_role_and_token() {
    let app = test_app().await;

    let (user_id, token) = register(&app.router, "a@x.com", "applicant").await;
    assert!(!token.is_empty());

    let (status, body) = post(
        &app.router,
        "/api/auth/login",
        json!({ "email": "a@x.com", "password": "secret1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert_eq!(body["user"]["role"], "applicant");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn registration_rules() {
    let app = test_app().await;

    // role defaults to applicant
    let (status, body) = post(
        &app.router,
        "/api/auth/register",
        json!({ "email": "default@x.com", "password": "secret1" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "applicant");

    let (status, body) = post(
        &app.router,
        "/api/auth/register",
        json!({ "email": "default@x.com", "password": "secret1" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User already exists");

    // admin and unknown roles fall back to applicant
    for (email, role) in [("boss@x.com", "admin"), ("m@x.com", "manager")] {
        let (status, body) = post(
            &app.router,
            "/api/auth/register",
            json!({ "email": email, "password": "secret1", "role": role }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["role"], "applicant");
    }

    let (status, body) = post(
        &app.router,
        "/api/auth/register",
        json!({ "email": "short@x.com", "password": "abc" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) =
        post(&app.router, "/api/auth/register", json!({ "email": "x@x.com" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email and password are required");
}

#[tokio::test]
async fn wrong_credentials_are_unauthorized() {
    let app = test_app().await;
    register(&app.router, "a@x.com", "recruiter").await;

    for (email, password) in [("a@x.com", "wrong-pass"), ("nobody@x.com", "secret1")] {
        let (status, body) = post(
            &app.router,
            "/api/auth/login",
            json!({ "email": email, "password": password }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid email or password");
    }
}

#[tokio::test]
async fn banned_user_cannot_login() {
    let app = test_app().await;
    let (user_id, _) = register(&app.router, "a@x.com", "applicant").await;
    let admin = admin_token(&app.router).await;

    let (status, body) = send(
        &app.router,
        Method::PUT,
        &format!("/api/admin/users/{}/ban", user_id),
        Some(&admin),
        Some(json!({ "banned": true, "reason": "Spam" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User banned successfully");
    assert_eq!(body["user"]["banReason"], "Spam");

    // the password is irrelevant once banned
    for password in ["secret1", "wrong-pass"] {
        let (status, body) = post(
            &app.router,
            "/api/auth/login",
            json!({ "email": "a@x.com", "password": password }),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Your account has been banned. Reason: Spam");
        assert!(body.get("user").is_none());
    }

    let (status, _) = send(
        &app.router,
        Method::PUT,
        &format!("/api/admin/users/{}/ban", user_id),
        Some(&admin),
        Some(json!({ "banned": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = post(
        &app.router,
        "/api/auth/login",
        json!({ "email": "a@x.com", "password": "secret1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_and_unknown_routes() {
    let app = test_app().await;

    let (status, body) = get(&app.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = get(&app.router, "/api/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "message": "Route not found" }));
}

#[tokio::test]
async fn malformed_requests_get_the_failure_envelope() {
    let app = test_app().await;

    let (status, body) = get(&app.router, "/api/jobs/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("UUID"));

    let (status, body) = post(
        &app.router,
        "/api/applications",
        json!({ "jobId": "abc", "userId": "def" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, body) = read(app.router.clone().oneshot(request).await.unwrap()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

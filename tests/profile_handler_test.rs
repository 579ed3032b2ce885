mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::seeded_app;
use edusoft_backend::repository::seed::{DEMO_PASSWORD, DEMO_SUPERVISOR_EMAIL, DEMO_USER_EMAIL};

#[tokio::test]
async fn test_get_seeded_user_profile() {
    let app = seeded_app().await;
    let (token, _) = app.login("/api/auth/user/login", DEMO_USER_EMAIL, DEMO_PASSWORD).await;

    let (status, body) = app.get("/api/users/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Test User");
    assert_eq!(body["email"], DEMO_USER_EMAIL);
    assert_eq!(body["profile"]["language"], "English");
    assert_eq!(body["profile"]["level"], "Intermediate");
    assert_eq!(body["profile"]["interests"], json!(["Reading", "Writing"]));
}

#[tokio::test]
async fn test_update_user_profile_merges_keys() {
    let app = seeded_app().await;
    let (token, _) = app.login("/api/auth/user/login", DEMO_USER_EMAIL, DEMO_PASSWORD).await;

    let (status, body) = app
        .request(
            "PUT",
            "/api/users/profile",
            Some(json!({ "name": "Renamed User", "profile": { "level": "Advanced", "goal": "C1" } })),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed User");
    assert_eq!(body["profile"]["level"], "Advanced");
    assert_eq!(body["profile"]["goal"], "C1");
    // untouched keys survive
    assert_eq!(body["profile"]["language"], "English");

    let (_, body) = app.get("/api/users/profile", Some(&token)).await;
    assert_eq!(body["name"], "Renamed User");
    assert_eq!(body["profile"]["level"], "Advanced");
}

#[tokio::test]
async fn test_supervisor_profile_keeps_known_attributes() {
    let app = seeded_app().await;
    let (token, _) = app.login("/api/auth/supervisor/login", DEMO_SUPERVISOR_EMAIL, DEMO_PASSWORD).await;

    let (status, body) = app.get("/api/users/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "supervisor");
    assert_eq!(body["profile"]["department"], "Education");

    let (status, body) = app
        .request(
            "PUT",
            "/api/users/profile",
            Some(json!({ "profile": { "specialization": "Linguistics", "shoeSize": 42 } })),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["specialization"], "Linguistics");
    assert_eq!(body["profile"]["department"], "Education");
    assert!(body["profile"].get("shoeSize").is_none());
}

#[tokio::test]
async fn test_profile_requires_token() {
    let app = seeded_app().await;
    let (status, body) = app.get("/api/users/profile", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "No token provided");

    let (status, _) = app
        .request("PUT", "/api/users/profile", Some(json!({ "name": "x" })), Some("not-a-token"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

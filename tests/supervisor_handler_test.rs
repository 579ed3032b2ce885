mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{seeded_app, test_app};
use edusoft_backend::config::Environment;
use edusoft_backend::repository::seed::{DEMO_PASSWORD, DEMO_SUPERVISOR_EMAIL, DEMO_USER_EMAIL};

#[tokio::test]
async fn test_dashboard_for_seeded_supervisor() {
    let app = seeded_app().await;
    let (token, _) = app.login("/api/auth/supervisor/login", DEMO_SUPERVISOR_EMAIL, DEMO_PASSWORD).await;

    let (status, body) = app.get("/api/supervisors/dashboard", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["supervisor"]["name"], "Test Supervisor");
    assert_eq!(body["supervisor"]["department"], "Education");
    assert_eq!(body["supervisor"]["specialization"], "Language Learning");
    assert_eq!(body["stats"]["totalStudents"], 3);
    assert_eq!(body["stats"]["averageProgress"], 70);

    let emails: Vec<&str> = body["students"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["email"].as_str().unwrap())
        .collect();
    assert_eq!(
        emails,
        vec!["student1@example.com", "student2@example.com", "student3@example.com"]
    );
}

#[tokio::test]
async fn test_students_list() {
    let app = seeded_app().await;
    let (token, _) = app.login("/api/auth/supervisor/login", DEMO_SUPERVISOR_EMAIL, DEMO_PASSWORD).await;

    let (status, body) = app.get("/api/supervisors/students", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let students = body.as_array().unwrap();
    assert_eq!(students.len(), 3);
    assert_eq!(students[0]["name"], "Student One");
    assert_eq!(students[0]["progress"], 75.0);
}

#[tokio::test]
async fn test_new_supervisor_has_empty_dashboard() {
    let app = test_app(Environment::Test).await;
    let (status, _) = app
        .post(
            "/api/auth/supervisor/signup",
            json!({ "fullName": "Grace", "email": "grace@example.com", "password": "secret123" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let token = app.emails.confirmation_token("grace@example.com");
    app.get(&format!("/api/auth/supervisor/confirm-email/{}", token), None).await;
    let (access, _) = app.login("/api/auth/supervisor/login", "grace@example.com", "secret123").await;

    let (status, body) = app.get("/api/supervisors/dashboard", Some(&access)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["totalStudents"], 0);
    assert_eq!(body["stats"]["averageProgress"], 0);
    assert_eq!(body["students"], json!([]));
}

#[tokio::test]
async fn test_students_cannot_open_supervisor_routes() {
    let app = seeded_app().await;
    let (token, _) = app.login("/api/auth/user/login", DEMO_USER_EMAIL, DEMO_PASSWORD).await;

    let (status, body) = app.get("/api/supervisors/dashboard", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Access denied. Supervisor role required.");

    let (status, _) = app.get("/api/supervisors/students", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

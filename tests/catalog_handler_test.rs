mod common;

use axum::http::StatusCode;

use common::test_app;
use edusoft_backend::config::Environment;

#[tokio::test]
async fn test_health() {
    let app = test_app(Environment::Test).await;
    let (status, body) = app.get("/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "Server is running");
}

#[tokio::test]
async fn test_recommendations_search() {
    let app = test_app(Environment::Test).await;

    let (status, all) = app.get("/api/catalog/recommendations", None).await;
    assert_eq!(status, StatusCode::OK);
    let all = all.as_array().unwrap().len();
    assert!(all > 1);

    let (status, body) = app.get("/api/catalog/recommendations?q=ADAPTABILITY", None).await;
    assert_eq!(status, StatusCode::OK);
    let hits = body.as_array().unwrap();
    assert!(!hits.is_empty() && hits.len() < all);
    assert_eq!(hits[0]["category"], "Adaptability and Flexibility");
    assert!(hits[0]["courses"].as_array().unwrap().iter().all(|c| c["link"].is_string()));

    let (_, body) = app.get("/api/catalog/recommendations?q=zzzz-nothing", None).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_assessments() {
    let app = test_app(Environment::Test).await;

    let (status, body) = app.get("/api/catalog/assessments", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["slug"], "puzzle-game");

    let (status, body) = app.get("/api/catalog/assessments/puzzle-game", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["durationMinutes"], 30);
    assert_eq!(body["itemCount"], 20);
    assert_eq!(body["startPath"], "/assessment/puzzle-game/start");

    let (status, body) = app.get("/api/catalog/assessments/chess", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Unknown assessment: chess");
}

#[tokio::test]
async fn test_constants() {
    let app = test_app(Environment::Test).await;
    let (status, body) = app.get("/api/catalog/constants", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cefrLevels"].as_array().unwrap().len(), 6);
    assert_eq!(body["assessmentTypes"][0], "writing");
    assert_eq!(body["languages"], serde_json::json!(["english", "french"]));
}

#[tokio::test]
async fn test_unknown_routes() {
    let app = test_app(Environment::Test).await;

    let (status, body) = app.get("/api/lessons/42", None).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["error"], "Not Implemented");
    assert_eq!(body["path"], "/api/lessons/42");

    let (status, body) = app.get("/favicon.ico", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["path"], "/favicon.ico");
}

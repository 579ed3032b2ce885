#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt; // for .oneshot()

use edusoft_backend::app::{create_router, AppServices};
use edusoft_backend::config::{AccountTokenConfig, Environment, JwtConfig};
use edusoft_backend::repository::{seed::seed_demo_data, Repositories};
use edusoft_backend::util::email::{EmailError, EmailSender};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").with_test_writer().try_init();
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub kind: &'static str,
    pub to: String,
    pub url: String,
}

/// Keeps every outgoing mail so tests can follow the emailed links.
#[derive(Debug, Clone, Default)]
pub struct RecordingEmailSender {
    pub sent: Arc<Mutex<Vec<SentEmail>>>,
}

impl RecordingEmailSender {
    fn record(&self, kind: &'static str, to: &str, url: &str) {
        self.sent.lock().unwrap().push(SentEmail { kind, to: to.to_string(), url: url.to_string() });
    }

    pub fn last_url(&self, kind: &str, to: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|m| m.kind == kind && m.to == to)
            .map(|m| m.url.clone())
    }

    /// Token at the end of the most recent confirmation link sent to `to`
    pub fn confirmation_token(&self, to: &str) -> String {
        let url = self.last_url("confirmation", to).expect("no confirmation email recorded");
        url.rsplit('/').next().unwrap().to_string()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send_confirmation_email(&self, to: &str, _name: &str, confirmation_url: &str) -> Result<(), EmailError> {
        self.record("confirmation", to, confirmation_url);
        Ok(())
    }

    async fn send_password_reset_email(&self, to: &str, _name: &str, reset_url: &str) -> Result<(), EmailError> {
        self.record("reset", to, reset_url);
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub services: AppServices,
    pub repos: Repositories,
    pub emails: RecordingEmailSender,
}

pub async fn test_app(environment: Environment) -> TestApp {
    init_tracing();
    let repos = Repositories::in_memory();
    let emails = RecordingEmailSender::default();
    let services = AppServices::new(
        repos.clone(),
        JwtConfig::default(),
        Arc::new(emails.clone()),
        AccountTokenConfig::default(),
        environment,
    );
    TestApp { router: create_router(&services), services, repos, emails }
}

/// Test app with the demo accounts already inserted
pub async fn seeded_app() -> TestApp {
    let app = test_app(Environment::Test).await;
    seed_demo_data(app.repos.users.as_ref(), app.repos.supervisors.as_ref())
        .await
        .expect("seeding failed");
    app
}

impl TestApp {
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let body_bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap(); // 1 MB limit
        let json = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into()))
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", uri, None, token).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body), None).await
    }

    /// Logs in through `path` and returns (access, refresh) tokens.
    pub async fn login(&self, path: &str, email: &str, password: &str) -> (String, String) {
        let (status, body) = self
            .post(path, serde_json::json!({ "email": email, "password": password }))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        (
            body["token"].as_str().expect("token missing").to_string(),
            body["refreshToken"].as_str().expect("refreshToken missing").to_string(),
        )
    }
}

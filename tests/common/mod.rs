use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use assessment_intake::auth::password;
use assessment_intake::config::{AdminConfig, Config};
use assessment_intake::store::{seed, MemoryStore, SubmissionStore};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "password123";

/// A running test server backed by its own in-memory store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<dyn SubmissionStore>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Login and return the response body + status.
    pub async fn login(&self, username: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("login request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Login as the configured admin, return the access token.
    pub async fn admin_token(&self) -> String {
        let (body, status) = self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Submit an assessment request as JSON, return (body, status).
    pub async fn submit_json(&self, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/assessment"))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit an assessment request as multipart form data.
    pub async fn submit_multipart(&self, form: reqwest::multipart::Form) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/assessment"))
            .multipart(form)
            .send()
            .await
            .expect("submit multipart failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// List submissions with an admin token, return (body, status).
    pub async fn list(&self, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url("/api/assessment"))
            .bearer_auth(token)
            .send()
            .await
            .expect("list request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

/// The payload used throughout the assessment tests.
pub fn valid_payload() -> Value {
    json!({
        "firstName": "John",
        "lastName": "Doe",
        "email": "john@example.com",
        "country": "USA",
        "website": "https://j.com",
        "visaCategories": { "O-1": true, "EB-1A": false, "EB-2-NIW": false, "unknown": false },
    })
}

pub async fn spawn_app() -> TestApp {
    spawn_with(false).await
}

pub async fn spawn_seeded_app() -> TestApp {
    spawn_with(true).await
}

async fn spawn_with(seed_demo: bool) -> TestApp {
    let store: Arc<dyn SubmissionStore> = Arc::new(MemoryStore::new());
    if seed_demo {
        seed::seed_demo(store.as_ref()).await.unwrap();
    }
    spawn_with_store(store, seed_demo).await
}

/// Spawn the app over a caller-provided store.
pub async fn spawn_with_store(store: Arc<dyn SubmissionStore>, seed_demo: bool) -> TestApp {
    let config = Config {
        jwt_secret: "test-jwt-secret-that-is-long-enough".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 1024 * 1024,
        max_upload_size: 32 * 1024 * 1024,
        log_level: "warn".to_string(),
        seed_demo,
        admin: AdminConfig {
            username: ADMIN_USERNAME.to_string(),
            password_hash: password::hash(ADMIN_PASSWORD).unwrap(),
        },
    };

    let app = assessment_intake::build_app(config, store.clone());

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        store,
    }
}

//! Common test utilities for E2E tests

pub mod placeholder;

use placeboard::{AppState, config, service::MergePolicy};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;

pub use placeholder::FakePlaceholder;

pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub remote: FakePlaceholder,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance with the default merge policy
    pub async fn new() -> Self {
        Self::with_policy(MergePolicy::RemoteWins).await
    }

    /// Create a new test server instance
    pub async fn with_policy(merge_policy: MergePolicy) -> Self {
        // Create temporary directory for the local store
        let temp_dir = TempDir::new().unwrap();
        let store_path = temp_dir.path().join("store.json");

        // Start the fake placeholder API
        let remote = FakePlaceholder::start().await;

        // Create test configuration
        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                domain: "test.example.com".to_string(),
                protocol: "http".to_string(),
            },
            remote: config::RemoteConfig {
                base_url: remote.base_url.clone(),
                timeout_seconds: 5,
                user_agent: "Placeboard-Test/0.1.0".to_string(),
            },
            store: config::StoreConfig {
                path: Some(store_path),
            },
            auth: config::AuthConfig {
                session_secret: "test-secret-key-32-bytes-long!!!".to_string(),
                session_max_age: 604800,
            },
            dashboard: config::DashboardConfig {
                preview_count: 4,
                sentinel_id: 1,
                merge_policy,
            },
            pagination: config::PaginationConfig {
                posts: 10,
                albums: 12,
                photos: 12,
                comments: 10,
                users: 10,
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        // Create HTTP client; redirects are inspected by the tests
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        // Build router
        let app = placeboard::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait a bit for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self {
            addr: addr_str,
            state,
            remote,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Register a local account
    pub async fn sign_up(&self, username: &str) -> reqwest::Response {
        self.client
            .post(self.url("/signup"))
            .json(&json!({
                "name": format!("{username} Tester"),
                "username": username,
                "email": format!("{username}@example.com"),
                "password": TEST_PASSWORD,
            }))
            .send()
            .await
            .unwrap()
    }

    /// Log in and return the session token
    pub async fn log_in(&self, username: &str) -> String {
        let response = self
            .client
            .post(self.url("/login"))
            .json(&json!({ "username": username, "password": TEST_PASSWORD }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let body: Value = response.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    /// Sign up and log in, returning the session token
    pub async fn create_logged_in_user(&self, username: &str) -> String {
        let response = self.sign_up(username).await;
        assert_eq!(response.status(), 201);
        self.log_in(username).await
    }

    /// GET with the session token as bearer
    pub async fn get_authed(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
    }

    /// Create a local post through the API
    pub async fn create_post(&self, token: &str, title: &str, body: &str) -> Value {
        let response = self
            .client
            .post(self.url("/posts/create"))
            .bearer_auth(token)
            .json(&json!({ "title": title, "body": body }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
        response.json().await.unwrap()
    }
}

/// Ids of the records in a JSON array
pub fn ids(records: &Value) -> Vec<u64> {
    records
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["id"].as_u64().unwrap())
        .collect()
}

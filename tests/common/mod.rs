//! Common test utilities for E2E tests
//!
//! Starts every service on an ephemeral port with its own database, wired
//! together through their real HTTP clients.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;

use murmur::{ServiceKind, config};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const TOKEN_HEADER: &str = "X-API-TOKEN";

/// Five running services sharing one temporary data directory
pub struct TestCluster {
    urls: HashMap<ServiceKind, String>,
    pub client: reqwest::Client,
    pub _temp_dir: TempDir,
}

impl TestCluster {
    /// Start all five services
    pub async fn start() -> Self {
        Self::start_without(&[]).await
    }

    /// Start the cluster but leave `missing` services unreachable: their
    /// base URLs point at a port nothing listens on.
    pub async fn start_without(missing: &[ServiceKind]) -> Self {
        let temp_dir = TempDir::new().unwrap();

        let mut listeners = Vec::new();
        let mut urls = HashMap::new();
        for kind in ServiceKind::ALL {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            urls.insert(kind, format!("http://{}", addr));
            if missing.contains(&kind) {
                // Dropping the listener frees the port again.
                drop(listener);
            } else {
                listeners.push((kind, listener));
            }
        }

        let config = test_config(temp_dir.path().to_path_buf(), &urls);
        let http = murmur::http_client().unwrap();

        for (kind, listener) in listeners {
            let router = murmur::build_router(kind, &config, http.clone())
                .await
                .unwrap();
            tokio::spawn(async move {
                murmur::serve(kind, listener, router).await.unwrap();
            });
        }

        // Wait a bit for the servers to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        Self {
            urls,
            client,
            _temp_dir: temp_dir,
        }
    }

    /// Full URL of `path` on one service
    pub fn url(&self, kind: ServiceKind, path: &str) -> String {
        format!("{}{}", self.urls[&kind], path)
    }

    /// Register a user with a default profile
    pub async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url(ServiceKind::Identity, "/api/users"))
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": password,
                "name": username,
            }))
            .send()
            .await
            .unwrap()
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url(ServiceKind::Identity, "/api/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap()
    }

    /// Register and log in; returns (user id, token)
    pub async fn sign_up(&self, username: &str) -> (String, String) {
        let password = "correct horse battery staple";
        assert_eq!(self.register(username, password).await.status(), StatusCode::OK);

        let login: Value = self.login(username, password).await.json().await.unwrap();
        let token = login["data"]["token"].as_str().unwrap().to_string();

        let me: Value = self
            .client
            .get(self.url(ServiceKind::Identity, "/api/users/me"))
            .header(TOKEN_HEADER, &token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let user_id = me["data"].as_str().unwrap().to_string();

        (user_id, token)
    }

    /// Create a post and return its id
    pub async fn create_post(&self, token: &str, content: &str) -> String {
        let response = self
            .client
            .post(self.url(ServiceKind::Posts, "/api/posts"))
            .header(TOKEN_HEADER, token)
            .json(&json!({ "content": content }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = response.json().await.unwrap();
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Create a comment and return its id
    pub async fn create_comment(&self, token: &str, post_id: &str, comment: &str) -> String {
        let response = self
            .client
            .post(self.url(
                ServiceKind::Comments,
                &format!("/api/posts/{}/comments", post_id),
            ))
            .header(TOKEN_HEADER, token)
            .json(&json!({ "comment": comment }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = response.json().await.unwrap();
        body["data"]["id"].as_str().unwrap().to_string()
    }
}

fn endpoint(urls: &HashMap<ServiceKind, String>, kind: ServiceKind) -> config::EndpointConfig {
    let base_url = urls[&kind].clone();
    let port = base_url
        .rsplit(':')
        .next()
        .and_then(|port| port.parse().ok())
        .unwrap();
    config::EndpointConfig { port, base_url }
}

fn test_config(dir: PathBuf, urls: &HashMap<ServiceKind, String>) -> config::AppConfig {
    config::AppConfig {
        server: config::ServerConfig {
            host: "127.0.0.1".to_string(),
        },
        services: config::ServicesConfig {
            enabled: ServiceKind::ALL.to_vec(),
            identity: endpoint(urls, ServiceKind::Identity),
            posts: endpoint(urls, ServiceKind::Posts),
            comments: endpoint(urls, ServiceKind::Comments),
            likes: endpoint(urls, ServiceKind::Likes),
            follows: endpoint(urls, ServiceKind::Follows),
        },
        database: config::DatabaseConfig { dir },
        client: config::ClientConfig { timeout_ms: 2000 },
        auth: config::AuthConfig {
            token_ttl_days: 30,
            token_header: TOKEN_HEADER.to_string(),
        },
        logging: config::LoggingConfig {
            level: "info".to_string(),
            format: "pretty".to_string(),
        },
    }
}

//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use nebula_config::Settings;
use nebula_engine::nebula_storage::SYNC_PATH;
use nebula_types::{AppState, Category, Link, Secret};
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PASSWORD: &str = "correct horse";

/// Two small categories with distinct link ids.
pub fn sample_state() -> AppState {
    AppState {
        categories: vec![
            Category::new("c1", "Work").with_icon("Briefcase").with_links(vec![
                Link::new("l1", "GitHub", "https://github.com").with_description("Code hosting"),
                Link::new("l2", "Linear", "https://linear.app"),
                Link::new("l3", "Notion", "https://notion.so").with_icon("FileText"),
            ]),
            Category::new("c2", "Fun").with_links(vec![Link::new(
                "f1",
                "Bilibili",
                "https://bilibili.com",
            )]),
        ],
        background_image: Some("https://img.example/bg.jpg".into()),
        logo_text: "My Nav".into(),
        logo_image: None,
    }
}

/// Settings pointing at `server` (or local-only) with the cache under `cache_dir`.
pub fn settings(server: Option<&MockServer>, cache_dir: &Path) -> Settings {
    Settings {
        secret: Secret::new(PASSWORD),
        remote_url: server.map(MockServer::uri),
        debounce: Duration::from_millis(50),
        max_retries: 0,
        cache_dir: cache_dir.to_path_buf(),
    }
}

pub async fn mount_document(server: &MockServer, state: &AppState) {
    Mock::given(method("GET"))
        .and(path(SYNC_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(state))
        .mount(server)
        .await;
}

pub async fn mount_status(server: &MockServer, verb: &str, status: u16) {
    Mock::given(method(verb))
        .and(path(SYNC_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Bodies of every POST the server has received, in order.
pub async fn posted_documents(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.method.as_str() == "POST")
        .map(|request| serde_json::from_slice(&request.body).expect("posted body is JSON"))
        .collect()
}

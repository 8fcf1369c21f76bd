#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;

use potluck::app::{router, AppState};
use potluck::catalog::Catalog;
use potluck::db::memory::MemoryStore;
use potluck::storage::client::{MemoryStorageClient, StorageClient};

const CATALOG_FIXTURE: &str = include_str!("../fixtures/catalog.xml");

/// The full API router wired to in-memory collaborators.
///
/// The store is exposed so tests can inspect what the API wrote.
pub struct TestEnv {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub storage: Arc<dyn StorageClient>,
}

impl TestEnv {
    pub fn start() -> Self {
        let store = Arc::new(MemoryStore::new());
        let storage: Arc<dyn StorageClient> = Arc::new(MemoryStorageClient::new());
        let catalog = Catalog::from_xml(CATALOG_FIXTURE).expect("Fixture catalog should parse");

        let state = AppState::in_memory(store.clone(), storage.clone(), catalog);

        Self {
            router: router(state, true),
            store,
            storage,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .save_cookies()
            .expect_success_by_default()
            .try_build(self.router.clone())
            .expect("Failed to build TestServer")
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .save_cookies()
            .try_build(self.router.clone())
            .expect("Failed to build TestServer")
    }
}

/// Helper: sign in as one of the demo accounts.
pub async fn login(server: &axum_test::TestServer, username: &str) {
    server
        .post("/api/auth/login")
        .json(&serde_json::json!({
            "username": username,
            "password": username
        }))
        .expect_success()
        .await;
}

/// Helper: create a board post and return its id.
pub async fn create_post(server: &axum_test::TestServer, title: &str, content: &str) -> String {
    let response = server
        .post("/api/v1/posts")
        .json(&serde_json::json!({ "title": title, "content": content }))
        .expect_success()
        .await;

    let body: serde_json::Value = response.json();
    body["id"].as_str().expect("Post should have an id").to_string()
}

/// Helper: submit a community recipe and return its id.
pub async fn create_recipe(server: &axum_test::TestServer, title: &str) -> String {
    let response = server
        .post("/api/v1/recipes")
        .json(&serde_json::json!({
            "title": title,
            "description": "Weeknight dinner",
            "category": { "method": "stir-fry", "ingredient": "vegetable" },
            "ingredients": [{ "name": "cabbage", "quantity": "1/4", "unit": "head" }],
            "steps": [{ "description": "Shred the cabbage." }, { "description": "Stir-fry hot." }],
            "images": { "main-image": "/api/v1/image/1_cabbage.png" }
        }))
        .expect_success()
        .await;

    let body: serde_json::Value = response.json();
    body["id"].as_str().expect("Recipe should have an id").to_string()
}

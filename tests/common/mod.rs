// tests/common/mod.rs

use std::sync::Arc;

use escape_plan::{
    config::Config, glossary::SynonymTable, progress::LearnerLocks, routes, state::AppState,
    utils::jwt::sign_jwt,
};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

pub const TEST_SECRET: &str = "test_secret_for_integration_tests";

pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
    pub client: reqwest::Client,
}

/// Spawns the app on a random port backed by a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    // One connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        synonyms_path: None,
    };

    let state = AppState {
        pool: pool.clone(),
        config,
        synonyms: Arc::new(SynonymTable::default()),
        learner_locks: LearnerLocks::new(),
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        pool,
        client: reqwest::Client::new(),
    }
}

pub fn admin_token() -> String {
    sign_jwt("admin", "admin", TEST_SECRET, 600).unwrap()
}

/// Token for a fresh, unique learner.
pub fn learner_token() -> (String, String) {
    let learner = format!("l_{}", &uuid::Uuid::new_v4().to_string()[..8]);
    let token = sign_jwt(&learner, "learner", TEST_SECRET, 600).unwrap();
    (learner, token)
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// POSTs as admin and returns the created id.
    pub async fn admin_create(&self, path: &str, body: serde_json::Value) -> i64 {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(admin_token())
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201, "creating {} failed", path);

        let created: serde_json::Value = response.json().await.unwrap();
        created["id"].as_i64().expect("id missing")
    }

    pub async fn create_term(&self, term: &str, definition: &str) -> i64 {
        self.admin_create(
            "/api/admin/glossary",
            serde_json::json!({
                "term": term,
                "definition": definition,
                "category": "Tax Terms",
                "related_terms": []
            }),
        )
        .await
    }

    pub async fn create_course(&self) -> i64 {
        self.admin_create(
            "/api/admin/courses",
            serde_json::json!({
                "course_type": "w2",
                "title": "W-2 Escape Plan",
                "description": "Strategies for W-2 earners",
                "thumbnail_url": "https://images.example.com/w2.png",
                "is_free": false,
                "estimated_hours": 4
            }),
        )
        .await
    }

    pub async fn create_lesson(&self, course_id: i64, order_index: i64, content: &str) -> i64 {
        self.admin_create(
            &format!("/api/admin/courses/{}/lessons", course_id),
            serde_json::json!({
                "title": format!("Lesson {}", order_index),
                "description": "Lesson description",
                "content": content,
                "duration_minutes": 30,
                "order_index": order_index
            }),
        )
        .await
    }
}

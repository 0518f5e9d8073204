// src/config.rs

use dotenvy::dotenv;
use std::env;

/// XP awarded the first time a learner opens a glossary term in a lesson.
pub const GLOSSARY_VIEW_XP: u64 = 5;

/// Points a quiz question is worth when none are given at creation.
pub const DEFAULT_QUESTION_POINTS: i64 = 10;

/// Storage name of the persisted glossary XP total.
pub const XP_STORAGE_KEY: &str = "glossaryXP";

/// Storage name of the persisted JSON array of credited interaction keys.
pub const CREDITED_KEYS_STORAGE_KEY: &str = "viewedGlossaryTerms";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub rust_log: String,
    pub bind_addr: String,
    /// Optional JSON file replacing the built-in synonym table.
    pub synonyms_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let synonyms_path = env::var("GLOSSARY_SYNONYMS_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty());

        Self {
            database_url,
            jwt_secret,
            rust_log,
            bind_addr,
            synonyms_path,
        }
    }
}

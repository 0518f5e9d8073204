use std::sync::Arc;

use crate::config::Config;
use crate::glossary::SynonymTable;
use crate::progress::LearnerLocks;
use axum::extract::FromRef;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub synonyms: Arc<SynonymTable>,
    pub learner_locks: LearnerLocks,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<SynonymTable> {
    fn from_ref(state: &AppState) -> Self {
        state.synonyms.clone()
    }
}

impl FromRef<AppState> for LearnerLocks {
    fn from_ref(state: &AppState) -> Self {
        state.learner_locks.clone()
    }
}

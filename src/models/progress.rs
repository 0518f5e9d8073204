// src/models/progress.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

/// Body of a glossary-view credit request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreditViewRequest {
    pub term_id: i64,
    pub course_id: i64,
    #[validate(range(min = 1))]
    pub lesson_index: i64,
}

/// Result of a glossary-view credit request.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreditViewResponse {
    pub xp: u64,
    pub awarded: bool,
    pub credited_count: usize,
}

/// Represents the 'lesson_completions' table, scoped to one learner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LessonCompletion {
    pub course_id: i64,
    pub lesson_index: i64,
    pub completed: bool,
    pub score: Option<i64>,

    /// Set the first time the lesson is marked completed.
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Body for recording a learner's state on one lesson.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordLessonRequest {
    pub course_id: i64,
    #[validate(range(min = 1))]
    pub lesson_index: i64,
    #[serde(default)]
    pub completed: bool,
    #[validate(range(min = 0))]
    pub score: Option<i64>,
}

/// Query parameters for listing lesson completions.
#[derive(Debug, Deserialize)]
pub struct LessonCompletionParams {
    pub course_id: Option<i64>,
}

// src/handlers/progress.rs

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::progress::{
        CreditViewRequest, CreditViewResponse, LessonCompletion, LessonCompletionParams,
        RecordLessonRequest,
    },
    progress::{LearnerLocks, ProgressTracker, SqliteStore},
    utils::jwt::Claims,
};

/// Current learner's glossary XP and credited interactions.
pub async fn get_progress(
    State(pool): State<SqlitePool>,
    State(locks): State<LearnerLocks>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let _guard = locks.lock(&claims.sub).await;
    let tracker = ProgressTracker::load(SqliteStore::new(pool, claims.sub)).await;
    Ok(Json(tracker.into_state()))
}

/// Credits the first view of a glossary term within a lesson.
///
/// Repeat views of the same term in the same lesson return `awarded: false`.
pub async fn credit_glossary_view(
    State(pool): State<SqlitePool>,
    State(locks): State<LearnerLocks>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreditViewRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    sqlx::query_scalar::<_, i64>("SELECT id FROM glossary_terms WHERE id = ?")
        .bind(req.term_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Glossary term not found".to_string()))?;

    sqlx::query_scalar::<_, i64>("SELECT id FROM lessons WHERE course_id = ? AND order_index = ?")
        .bind(req.course_id)
        .bind(req.lesson_index)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Lesson not found".to_string()))?;

    // Held until the ledger is saved
    let _guard = locks.lock(&claims.sub).await;
    let mut tracker = ProgressTracker::load(SqliteStore::new(pool, claims.sub.clone())).await;
    let credit = tracker
        .credit_glossary_view(req.term_id, req.course_id, req.lesson_index)
        .await;

    if credit.awarded {
        tracing::info!(
            "Learner {} earned glossary XP (total {})",
            claims.sub,
            credit.state.xp
        );
    }

    Ok(Json(CreditViewResponse {
        xp: credit.state.xp,
        awarded: credit.awarded,
        credited_count: credit.state.credited_keys.len(),
    }))
}

/// Records whether the learner finished a lesson, and their score.
///
/// Re-recording overwrites `completed` and `score`; `completed_at` keeps the
/// first completion time and is cleared when the lesson is un-completed.
pub async fn record_lesson_completion(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RecordLessonRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    sqlx::query_scalar::<_, i64>("SELECT id FROM lessons WHERE course_id = ? AND order_index = ?")
        .bind(req.course_id)
        .bind(req.lesson_index)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Lesson not found".to_string()))?;

    let completed_at = req.completed.then(chrono::Utc::now);

    let record = sqlx::query_as::<_, LessonCompletion>(
        r#"
        INSERT INTO lesson_completions (learner_id, course_id, lesson_index, completed, score, completed_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(learner_id, course_id, lesson_index) DO UPDATE SET
            completed = excluded.completed,
            score = excluded.score,
            completed_at = CASE
                WHEN excluded.completed THEN COALESCE(lesson_completions.completed_at, excluded.completed_at)
                ELSE NULL
            END
        RETURNING course_id, lesson_index, completed, score, completed_at
        "#,
    )
    .bind(&claims.sub)
    .bind(req.course_id)
    .bind(req.lesson_index)
    .bind(req.completed)
    .bind(req.score)
    .bind(completed_at)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to record lesson completion: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(record))
}

/// Current learner's lesson records, optionally for one course.
pub async fn list_lesson_completions(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<LessonCompletionParams>,
) -> Result<impl IntoResponse, AppError> {
    let records = sqlx::query_as::<_, LessonCompletion>(
        r#"
        SELECT course_id, lesson_index, completed, score, completed_at
        FROM lesson_completions
        WHERE learner_id = ?1 AND (?2 IS NULL OR course_id = ?2)
        ORDER BY course_id, lesson_index
        "#,
    )
    .bind(&claims.sub)
    .bind(params.course_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(records))
}

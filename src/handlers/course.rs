// src/handlers/course.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    glossary::{SynonymTable, annotate_with},
    handlers::glossary::fetch_terms,
    models::course::{Course, CourseListParams, CourseSummary, Lesson, LessonView},
};

const SUMMARY_COLUMNS: &str = r#"
    SELECT
        c.id, c.course_type, c.title, c.description, c.thumbnail_url,
        c.is_free, c.estimated_hours,
        (SELECT COUNT(*) FROM lessons l WHERE l.course_id = c.id) AS total_lessons,
        c.created_at
    FROM courses c
"#;

async fn fetch_summary(pool: &SqlitePool, id: i64) -> Result<CourseSummary, AppError> {
    sqlx::query_as::<_, CourseSummary>(&format!("{} WHERE c.id = ?", SUMMARY_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Course not found".to_string()))
}

async fn fetch_lessons(pool: &SqlitePool, course_id: i64) -> Result<Vec<Lesson>, AppError> {
    let lessons = sqlx::query_as::<_, Lesson>(
        r#"
        SELECT id, course_id, title, description, content, video_url, duration_minutes, order_index
        FROM lessons
        WHERE course_id = ?
        ORDER BY order_index
        "#,
    )
    .bind(course_id)
    .fetch_all(pool)
    .await?;

    Ok(lessons)
}

/// Lists course summaries, optionally filtered by course type.
pub async fn list_courses(
    State(pool): State<SqlitePool>,
    Query(params): Query<CourseListParams>,
) -> Result<impl IntoResponse, AppError> {
    let courses = sqlx::query_as::<_, CourseSummary>(&format!(
        "{} WHERE (?1 IS NULL OR c.course_type = ?1) ORDER BY c.id",
        SUMMARY_COLUMNS
    ))
    .bind(params.course_type)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list courses: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(courses))
}

/// Retrieves a course with all of its lessons.
pub async fn get_course(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let summary = fetch_summary(&pool, id).await?;
    let lessons = fetch_lessons(&pool, id).await?;

    Ok(Json(Course { summary, lessons }))
}

/// Lists a course's lessons in order.
pub async fn list_lessons(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    fetch_summary(&pool, id).await?;
    let lessons = fetch_lessons(&pool, id).await?;
    Ok(Json(lessons))
}

/// Retrieves one lesson with its glossary terms annotated.
pub async fn get_lesson(
    State(pool): State<SqlitePool>,
    State(synonyms): State<Arc<SynonymTable>>,
    Path((course_id, order_index)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let lesson = sqlx::query_as::<_, Lesson>(
        r#"
        SELECT id, course_id, title, description, content, video_url, duration_minutes, order_index
        FROM lessons
        WHERE course_id = ? AND order_index = ?
        "#,
    )
    .bind(course_id)
    .bind(order_index)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Lesson not found".to_string()))?;

    let terms = fetch_terms(&pool).await?;
    let annotated = annotate_with(&lesson.content, &terms, &synonyms);

    Ok(Json(LessonView { lesson, annotated }))
}

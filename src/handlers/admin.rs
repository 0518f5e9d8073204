// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{SqlitePool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    config::DEFAULT_QUESTION_POINTS,
    error::{AppError, is_unique_violation},
    models::{
        course::{CreateCourseRequest, CreateLessonRequest},
        glossary::CreateTermRequest,
        quiz::CreateQuestionRequest,
        tool::CreateToolRequest,
    },
    utils::html::clean_html,
};

/// Creates a glossary term.
/// Admin only. Names are unique ignoring case.
pub async fn create_term(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateTermRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let term = payload.term.trim().to_string();
    let definition = clean_html(&payload.definition);

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO glossary_terms (term, definition, category, related_terms)
        VALUES (?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&term)
    .bind(definition)
    .bind(&payload.category)
    .bind(SqlJson(&payload.related_terms))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!("Glossary term '{}' already exists", term))
        } else {
            tracing::error!("Failed to create glossary term: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    tracing::info!("Glossary term '{}' created with id {}", term, id);
    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// Deletes a glossary term by ID.
/// Admin only. Credited keys already referencing it are left in place.
pub async fn delete_term(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM glossary_terms WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Glossary term not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Creates a course without lessons.
/// Admin only.
pub async fn create_course(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO courses (course_type, title, description, thumbnail_url, is_free, estimated_hours)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&payload.course_type)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.thumbnail_url)
    .bind(payload.is_free)
    .bind(payload.estimated_hours)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create course: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// Adds a lesson to a course.
/// Admin only. Each order index may appear once per course.
pub async fn create_lesson(
    State(pool): State<SqlitePool>,
    Path(course_id): Path<i64>,
    Json(payload): Json<CreateLessonRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    sqlx::query_scalar::<_, i64>("SELECT id FROM courses WHERE id = ?")
        .bind(course_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Course not found".to_string()))?;

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO lessons (course_id, title, description, content, video_url, duration_minutes, order_index)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(course_id)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(&payload.content)
    .bind(&payload.video_url)
    .bind(payload.duration_minutes)
    .bind(payload.order_index)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!(
                "Lesson {} already exists in course {}",
                payload.order_index, course_id
            ))
        } else {
            tracing::error!("Failed to create lesson: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// Creates a quiz question for a course lesson.
/// Admin only.
pub async fn create_question(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    sqlx::query_scalar::<_, i64>("SELECT id FROM courses WHERE id = ?")
        .bind(payload.course_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Course not found".to_string()))?;

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO quiz_questions
            (course_id, module_id, question, question_type, options, correct_answer, explanation, points)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(payload.course_id)
    .bind(payload.module_id)
    .bind(&payload.question)
    .bind(&payload.question_type)
    .bind(SqlJson(&payload.options))
    .bind(&payload.correct_answer)
    .bind(&payload.explanation)
    .bind(payload.points.unwrap_or(DEFAULT_QUESTION_POINTS))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create quiz question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// Adds a tool to the catalog.
/// Admin only.
pub async fn create_tool(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateToolRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO tools (name, description, tool_type, icon, is_free, config)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(&payload.tool_type)
    .bind(&payload.icon)
    .bind(payload.is_free)
    .bind(SqlJson(&payload.config))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create tool: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    tracing::info!("Tool '{}' created with id {}", payload.name, id);
    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

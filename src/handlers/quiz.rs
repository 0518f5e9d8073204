// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::quiz::{QuizListParams, QuizQuestion, SubmitAnswerParams, SubmitAnswerResponse},
    quiz::record_quiz_answer,
};

/// Lists a course's quiz questions, optionally only those of one lesson.
pub async fn list_course_quiz(
    State(pool): State<SqlitePool>,
    Path(course_id): Path<i64>,
    Query(params): Query<QuizListParams>,
) -> Result<impl IntoResponse, AppError> {
    let questions = sqlx::query_as::<_, QuizQuestion>(
        r#"
        SELECT id, course_id, module_id, question, question_type, options,
               correct_answer, explanation, points
        FROM quiz_questions
        WHERE course_id = ?1 AND (?2 IS NULL OR module_id = ?2)
        ORDER BY id
        "#,
    )
    .bind(course_id)
    .bind(params.module_id)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch quiz questions: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(questions))
}

/// Grades a single answer.
///
/// Comparison ignores case; the learner's XP ledger is not touched.
pub async fn submit_answer(
    State(pool): State<SqlitePool>,
    Query(params): Query<SubmitAnswerParams>,
) -> Result<impl IntoResponse, AppError> {
    let question = sqlx::query_as::<_, QuizQuestion>(
        r#"
        SELECT id, course_id, module_id, question, question_type, options,
               correct_answer, explanation, points
        FROM quiz_questions
        WHERE id = ? AND course_id = ?
        "#,
    )
    .bind(params.question_id)
    .bind(params.course_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Question not found".to_string()))?;

    let result = record_quiz_answer(
        &question.question,
        &params.answer.to_lowercase(),
        &question.correct_answer.to_lowercase(),
        question.points,
        &question.explanation,
    );

    Ok(Json(SubmitAnswerResponse {
        correct: result.correct,
        points: result.points,
        explanation: result.explanation,
    }))
}

// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

/// Represents the 'quiz_questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: i64,

    pub course_id: i64,

    /// Order index of the lesson this question belongs to.
    pub module_id: i64,

    pub question: String,

    /// 'multiple_choice', 'true_false' or 'scenario'.
    pub question_type: String,

    /// Stored as a JSON array in the database.
    pub options: Json<Vec<String>>,

    pub correct_answer: String,

    pub explanation: String,

    /// Points awarded for a correct answer.
    pub points: i64,
}

/// Query parameters for listing a course's quiz.
#[derive(Debug, Deserialize)]
pub struct QuizListParams {
    pub module_id: Option<i64>,
}

/// Query parameters of a single answer submission.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerParams {
    pub course_id: i64,
    pub question_id: i64,
    pub answer: String,
}

/// Server-side grading returned for one submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAnswerResponse {
    pub correct: bool,
    pub points: i64,
    pub explanation: String,
}

/// DTO for creating a new quiz question.
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = validate_answer_in_options))]
pub struct CreateQuestionRequest {
    pub course_id: i64,
    #[validate(range(min = 0))]
    pub module_id: i64,
    #[validate(length(min = 1, max = 1000))]
    pub question: String,
    #[validate(custom(function = validate_question_type))]
    pub question_type: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    #[validate(length(min = 1, max = 500))]
    pub correct_answer: String,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub explanation: String,
    #[validate(range(min = 0, max = 1000))]
    pub points: Option<i64>,
}

const QUESTION_TYPES: &[&str] = &["multiple_choice", "true_false", "scenario"];

fn validate_question_type(kind: &str) -> Result<(), validator::ValidationError> {
    if !QUESTION_TYPES.contains(&kind) {
        return Err(validator::ValidationError::new("unknown_question_type"));
    }
    Ok(())
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    for opt in options {
        if opt.is_empty() {
            return Err(validator::ValidationError::new("option_empty"));
        }
        if opt.len() > 500 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}

fn validate_answer_in_options(
    req: &CreateQuestionRequest,
) -> Result<(), validator::ValidationError> {
    if !req.options.is_empty() && !req.options.contains(&req.correct_answer) {
        return Err(validator::ValidationError::new("answer_not_in_options"));
    }
    Ok(())
}

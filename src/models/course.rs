// src/models/course.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use url::Url;
use validator::Validate;

use crate::glossary::AnnotatedContent;

/// Represents the 'courses' table, with the lesson count joined in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseSummary {
    pub id: i64,

    /// 'primer', 'w2' or 'business'.
    pub course_type: String,

    pub title: String,

    pub description: String,

    pub thumbnail_url: String,

    pub is_free: bool,

    pub estimated_hours: i64,

    pub total_lessons: i64,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Represents the 'lessons' table in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: String,

    /// Lesson body. Glossary terms are written as `**Term**`.
    pub content: String,

    pub video_url: Option<String>,
    pub duration_minutes: i64,

    /// 1-based position inside the course; also the quiz module id.
    pub order_index: i64,
}

/// A course with its lessons.
#[derive(Debug, Serialize, Deserialize)]
pub struct Course {
    #[serde(flatten)]
    pub summary: CourseSummary,
    pub lessons: Vec<Lesson>,
}

/// A lesson ready for display, with glossary markers resolved.
#[derive(Debug, Serialize)]
pub struct LessonView {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub annotated: AnnotatedContent,
}

/// Query parameters for listing courses.
#[derive(Debug, Deserialize)]
pub struct CourseListParams {
    pub course_type: Option<String>,
}

/// DTO for creating a new course.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(custom(function = validate_course_type))]
    pub course_type: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    #[validate(length(min = 1, max = 500), custom(function = validate_url_string))]
    pub thumbnail_url: String,
    #[serde(default)]
    pub is_free: bool,
    #[validate(range(min = 0, max = 1000))]
    pub estimated_hours: i64,
}

/// DTO for adding a lesson to a course.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLessonRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    #[validate(length(min = 1, max = 200000))]
    pub content: String,
    #[validate(length(max = 500), custom(function = validate_url_string))]
    pub video_url: Option<String>,
    #[validate(range(min = 0, max = 1000))]
    pub duration_minutes: i64,
    #[validate(range(min = 1))]
    pub order_index: i64,
}

const COURSE_TYPES: &[&str] = &["primer", "w2", "business"];

fn validate_course_type(kind: &str) -> Result<(), validator::ValidationError> {
    if !COURSE_TYPES.contains(&kind) {
        return Err(validator::ValidationError::new("unknown_course_type"));
    }
    Ok(())
}

/// Validates that a string is a correctly formatted URL.
fn validate_url_string(url: &str) -> Result<(), validator::ValidationError> {
    if Url::parse(url).is_err() {
        return Err(validator::ValidationError::new("invalid_url"));
    }
    Ok(())
}

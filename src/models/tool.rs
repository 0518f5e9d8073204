// src/models/tool.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

/// Represents the 'tools' table in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tool {
    pub id: i64,
    pub name: String,
    pub description: String,

    /// 'calculator', 'form_generator' or 'planner'.
    #[serde(rename = "type")]
    pub tool_type: String,

    /// Icon name understood by the front end.
    pub icon: String,

    pub is_free: bool,

    /// Free-form settings, e.g. `{"fields": ["income", "deductions"]}`.
    pub config: Json<serde_json::Value>,
}

/// Query parameters for listing tools.
#[derive(Debug, Deserialize)]
pub struct ToolListParams {
    #[serde(rename = "type")]
    pub tool_type: Option<String>,
}

/// DTO for creating a tool.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateToolRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    #[serde(rename = "type")]
    #[validate(custom(function = validate_tool_type))]
    pub tool_type: String,
    #[validate(length(min = 1, max = 50))]
    pub icon: String,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

const TOOL_TYPES: &[&str] = &["calculator", "form_generator", "planner"];

fn validate_tool_type(kind: &str) -> Result<(), validator::ValidationError> {
    if !TOOL_TYPES.contains(&kind) {
        return Err(validator::ValidationError::new("unknown_tool_type"));
    }
    Ok(())
}

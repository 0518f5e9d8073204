// src/handlers/tool.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::tool::{Tool, ToolListParams},
};

/// Lists tools, optionally only those of one type.
pub async fn list_tools(
    State(pool): State<SqlitePool>,
    Query(params): Query<ToolListParams>,
) -> Result<impl IntoResponse, AppError> {
    let tools = sqlx::query_as::<_, Tool>(
        r#"
        SELECT id, name, description, tool_type, icon, is_free, config
        FROM tools
        WHERE ?1 IS NULL OR tool_type = ?1
        ORDER BY id
        "#,
    )
    .bind(params.tool_type)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list tools: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(tools))
}

pub async fn get_tool(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let tool = sqlx::query_as::<_, Tool>(
        "SELECT id, name, description, tool_type, icon, is_free, config FROM tools WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Tool not found".to_string()))?;

    Ok(Json(tool))
}

// src/handlers/glossary.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    glossary::{self, SynonymTable, annotate_with, render},
    models::glossary::{AnnotateRequest, GlossaryTerm, SearchParams},
};

/// Loads the whole glossary in id order.
///
/// Alias building depends on term order, so every caller sees the same one.
pub async fn fetch_terms(pool: &SqlitePool) -> Result<Vec<GlossaryTerm>, AppError> {
    sqlx::query_as::<_, GlossaryTerm>(
        r#"
        SELECT id, term, definition, category, related_terms
        FROM glossary_terms
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch glossary terms: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })
}

/// Lists every glossary term.
pub async fn list_terms(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let terms = fetch_terms(&pool).await?;
    Ok(Json(terms))
}

/// Case-insensitive search over term names and definitions.
pub async fn search_terms(
    State(pool): State<SqlitePool>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let terms = fetch_terms(&pool).await?;
    let found: Vec<GlossaryTerm> = glossary::search(&terms, &params.q)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(found))
}

/// Annotates arbitrary text against the current glossary.
///
/// Returns both the structured spans and an escaped HTML rendering.
pub async fn annotate_content(
    State(pool): State<SqlitePool>,
    State(synonyms): State<Arc<SynonymTable>>,
    Json(payload): Json<AnnotateRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let terms = fetch_terms(&pool).await?;
    let annotated = annotate_with(&payload.content, &terms, &synonyms);
    let html = render::to_html(&annotated);

    Ok(Json(serde_json::json!({
        "spans": annotated.spans,
        "html": html,
    })))
}

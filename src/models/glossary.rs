// src/models/glossary.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

/// Represents the 'glossary_terms' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GlossaryTerm {
    pub id: i64,

    /// Display name, e.g. "REPS". Unique after lower-casing.
    pub term: String,

    pub definition: String,

    /// Grouping shown in the glossary page (e.g. "Tax Terms").
    pub category: String,

    /// Names of other glossary terms worth reading next.
    /// Stored as a JSON array in the database.
    pub related_terms: Json<Vec<String>>,
}

impl GlossaryTerm {
    /// Lower-cased term, the identity used for uniqueness and marker tracking.
    pub fn normalized(&self) -> String {
        self.term.to_lowercase()
    }
}

/// DTO for creating a new glossary term.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTermRequest {
    #[validate(length(min = 1, max = 100))]
    pub term: String,
    #[validate(length(min = 1, max = 5000))]
    pub definition: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[serde(default)]
    #[validate(custom(function = validate_related_terms))]
    pub related_terms: Vec<String>,
}

/// Query parameters for glossary search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

/// Body for annotating free text against the glossary.
#[derive(Debug, Deserialize, Validate)]
pub struct AnnotateRequest {
    #[validate(length(max = 200000))]
    pub content: String,
}

fn validate_related_terms(related: &[String]) -> Result<(), validator::ValidationError> {
    for name in related {
        if name.trim().is_empty() {
            return Err(validator::ValidationError::new("related_term_empty"));
        }
        if name.len() > 100 {
            return Err(validator::ValidationError::new("related_term_too_long"));
        }
    }
    Ok(())
}

// src/glossary/mod.rs

//! Glossary term detection inside lesson content.

pub mod alias;
pub mod annotator;
pub mod render;

pub use alias::{AliasTable, SynonymEntry, SynonymTable};
pub use annotator::{Activation, AnnotatedContent, Span, anchor_id, annotate, annotate_with};

use crate::models::glossary::GlossaryTerm;

/// Finds a term by exact name, ignoring case.
pub fn lookup<'a>(terms: &'a [GlossaryTerm], name: &str) -> Option<&'a GlossaryTerm> {
    let needle = name.to_lowercase();
    terms.iter().find(|t| t.normalized() == needle)
}

/// Terms whose name or definition contains `query`, ignoring case.
/// An empty query matches everything.
pub fn search<'a>(terms: &'a [GlossaryTerm], query: &str) -> Vec<&'a GlossaryTerm> {
    let needle = query.trim().to_lowercase();
    terms
        .iter()
        .filter(|t| {
            needle.is_empty()
                || t.normalized().contains(&needle)
                || t.definition.to_lowercase().contains(&needle)
        })
        .collect()
}

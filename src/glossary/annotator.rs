// src/glossary/annotator.rs

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::alias::{AliasTable, SynonymTable};
use crate::models::glossary::GlossaryTerm;

/// One piece of annotated lesson content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Span {
    /// Content outside any glossary marker, kept verbatim.
    Text { text: String },

    /// First occurrence of a term. Opens the definition when activated.
    Primary {
        term_id: i64,
        term: String,
        anchor: String,
        text: String,
    },

    /// Later occurrence of a term already marked. Points back at the primary.
    Repeat {
        term_id: i64,
        anchor: String,
        text: String,
    },
}

/// What the view layer should do when a marker is activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Activation {
    OpenDefinition { term_id: i64 },
    ScrollTo { anchor: String },
}

impl Activation {
    /// Only opening a definition from its primary marker earns XP.
    pub fn is_creditable(&self) -> bool {
        matches!(self, Activation::OpenDefinition { .. })
    }
}

impl Span {
    pub fn activate(&self) -> Option<Activation> {
        match self {
            Span::Text { .. } => None,
            Span::Primary { term_id, .. } => Some(Activation::OpenDefinition { term_id: *term_id }),
            Span::Repeat { anchor, .. } => Some(Activation::ScrollTo {
                anchor: anchor.clone(),
            }),
        }
    }

    /// The text as written in the source, without bold markup.
    pub fn text(&self) -> &str {
        match self {
            Span::Text { text } | Span::Primary { text, .. } | Span::Repeat { text, .. } => text,
        }
    }
}

/// Result of one annotation pass. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedContent {
    pub spans: Vec<Span>,
}

impl AnnotatedContent {
    /// Canonical names of the terms that received a primary marker, in order.
    pub fn primary_terms(&self) -> Vec<&str> {
        self.spans
            .iter()
            .filter_map(|s| match s {
                Span::Primary { term, .. } => Some(term.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn markers(&self) -> impl Iterator<Item = &Span> {
        self.spans.iter().filter(|s| !matches!(s, Span::Text { .. }))
    }

    /// Content with every marker reduced to its plain text.
    pub fn to_plain_text(&self) -> String {
        self.spans.iter().map(Span::text).collect()
    }

    /// Rebuilds the input content, restoring bold markup around markers.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            match span {
                Span::Text { text } => out.push_str(text),
                Span::Primary { text, .. } | Span::Repeat { text, .. } => {
                    out.push_str("**");
                    out.push_str(text);
                    out.push_str("**");
                }
            }
        }
        out
    }
}

/// Anchor id shared by a term's primary marker and its repeats.
pub fn anchor_id(term: &str) -> String {
    let slug: Vec<String> = term
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();
    format!("glossary-{}", slug.join("-"))
}

fn bold_pattern(alias: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(r"\*\*{}\*\*", regex::escape(alias)))
        .case_insensitive(true)
        .build()
}

/// Intermediate piece: plain text still open to matching, or a matched term.
enum Piece<'a> {
    Text(String),
    Hit { term: &'a GlossaryTerm, text: String },
}

fn split_text<'a>(text: String, pattern: &Regex, term: &'a GlossaryTerm, out: &mut Vec<Piece<'a>>) {
    let mut last = 0;
    for m in pattern.find_iter(&text) {
        if m.start() > last {
            out.push(Piece::Text(text[last..m.start()].to_string()));
        }
        out.push(Piece::Hit {
            term,
            text: text[m.start() + 2..m.end() - 2].to_string(),
        });
        last = m.end();
    }
    if last == 0 {
        out.push(Piece::Text(text));
    } else if last < text.len() {
        out.push(Piece::Text(text[last..].to_string()));
    }
}

/// Annotates `content` with the built-in synonym table.
pub fn annotate(content: &str, terms: &[GlossaryTerm]) -> AnnotatedContent {
    annotate_with(content, terms, &SynonymTable::default())
}

/// Turns every bold-wrapped glossary alias in `content` into a marker.
///
/// Aliases are tried in alias-table order and only ever scan text that no
/// earlier alias has claimed. Markers are then numbered by position: the
/// first occurrence of a canonical term is primary, the rest are repeats.
pub fn annotate_with(
    content: &str,
    terms: &[GlossaryTerm],
    synonyms: &SynonymTable,
) -> AnnotatedContent {
    let table = AliasTable::build(terms, synonyms);
    let mut pieces = vec![Piece::Text(content.to_string())];

    for (alias, term) in table.iter() {
        let pattern = match bold_pattern(alias) {
            Ok(re) => re,
            Err(e) => {
                tracing::warn!("Skipping glossary alias {:?}: {}", alias, e);
                continue;
            }
        };

        let hit = pieces
            .iter()
            .any(|p| matches!(p, Piece::Text(t) if pattern.is_match(t)));
        if !hit {
            continue;
        }

        let mut next = Vec::with_capacity(pieces.len() + 2);
        for piece in pieces {
            match piece {
                Piece::Text(text) => split_text(text, &pattern, term, &mut next),
                other => next.push(other),
            }
        }
        pieces = next;
    }

    let mut seen: HashSet<String> = HashSet::new();
    let spans = pieces
        .into_iter()
        .map(|piece| match piece {
            Piece::Text(text) => Span::Text { text },
            Piece::Hit { term, text } => {
                let anchor = anchor_id(&term.term);
                if seen.insert(term.normalized()) {
                    Span::Primary {
                        term_id: term.id,
                        term: term.term.clone(),
                        anchor,
                        text,
                    }
                } else {
                    Span::Repeat {
                        term_id: term.id,
                        anchor,
                        text,
                    }
                }
            }
        })
        .collect();

    AnnotatedContent { spans }
}

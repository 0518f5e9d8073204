// src/glossary/render.rs

use super::annotator::{AnnotatedContent, Span};
use crate::utils::html::escape_text;

/// Renders annotated content as HTML for clients that inject markup.
///
/// Primary markers show the canonical term and carry the anchor id; repeat
/// markers keep the surface text and reference the anchor through
/// `data-anchor`. Every piece of text is escaped.
pub fn to_html(content: &AnnotatedContent) -> String {
    let mut html = String::new();
    for span in &content.spans {
        match span {
            Span::Text { text } => html.push_str(&escape_text(text)),
            Span::Primary {
                term_id,
                term,
                anchor,
                ..
            } => {
                html.push_str(&format!(
                    r#"<span id="{}" class="glossary-term" data-term="{}" data-term-id="{}" title="Click to view definition">{}</span>"#,
                    escape_text(anchor),
                    escape_text(term),
                    term_id,
                    escape_text(term),
                ));
            }
            Span::Repeat { anchor, text, .. } => {
                html.push_str(&format!(
                    r#"<span class="glossary-repeat" data-anchor="{}" title="Jump to first occurrence">{}</span>"#,
                    escape_text(anchor),
                    escape_text(text),
                ));
            }
        }
    }
    html
}

use ammonia;

/// Clean HTML content using the ammonia library.
///
/// Whitelist-based: safe tags (like <b>, <p>) survive, dangerous tags
/// (like <script>, <iframe>) and attributes (like onclick) are stripped.
/// Used on glossary definitions before they are stored.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

/// Escapes arbitrary text so it can be placed in element content or a
/// quoted attribute value without being interpreted as markup.
pub fn escape_text(input: &str) -> String {
    ammonia::clean_text(input)
}

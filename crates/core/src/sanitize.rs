//! Free-text sanitization and injection detection.
//!
//! [`sanitize_text`] strips markup that could execute in a browser while
//! leaving ordinary text, punctuation and every Unicode character outside
//! the ASCII control range untouched. [`contains_sql_injection`] flags classic injection
//! payloads in identifier-like fields. Queries are always parameterised;
//! the detector only rejects hostile input before it reaches the database.

use std::sync::LazyLock;

use regex::Regex;

/// `<script>` / `<style>` elements including their content.
static EXECUTABLE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").expect("valid regex")
});

static HTML_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

/// An opening, closing or self-closing tag. Requires a letter right after
/// `<` (or `</`) so comparisons like `a < b` survive.
static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?[A-Za-z][A-Za-z0-9:-]*(?:\s[^<>]*)?/?>").expect("valid regex")
});

static DANGEROUS_SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:javascript|vbscript)\s*:|\bdata\s*:\s*text/html").expect("valid regex")
});

static SQL_INJECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?is)",
        r"'\s*(?:or|and)\s+'?[\w]+'?\s*=\s*'?[\w]+",
        r"|\bunion\b(?:\s+all)?\s+select\b",
        r"|;\s*(?:drop|delete|insert|update|alter|truncate|create|grant|exec)\b",
        r"|\b(?:drop|truncate)\s+table\b",
        r"|'\s*--",
        r"|/\*.*?\*/",
        r"|\bpg_sleep\s*\(",
    ))
    .expect("valid regex")
});

/// Remove executable markup and control characters from user text.
///
/// Steps, in order: drop `<script>`/`<style>` blocks with their content,
/// drop HTML comments and remaining tags, neutralise `javascript:`,
/// `vbscript:` and `data:text/html` schemes, drop ASCII control characters other
/// than `\n`, `\r` and `\t`, then trim.
pub fn sanitize_text(input: &str) -> String {
    let without_blocks = EXECUTABLE_BLOCK_RE.replace_all(input, "");
    let without_comments = HTML_COMMENT_RE.replace_all(&without_blocks, "");
    let without_tags = HTML_TAG_RE.replace_all(&without_comments, "");
    let without_schemes = DANGEROUS_SCHEME_RE.replace_all(&without_tags, "");

    without_schemes
        .chars()
        .filter(|c| !c.is_ascii_control() || matches!(c, '\n' | '\r' | '\t'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Whether `input` looks like an SQL injection payload.
pub fn contains_sql_injection(input: &str) -> bool {
    SQL_INJECTION_RE.is_match(input)
}

/// Whether `input` carries markup that [`sanitize_text`] would remove.
pub fn contains_markup(input: &str) -> bool {
    EXECUTABLE_BLOCK_RE.is_match(input)
        || HTML_COMMENT_RE.is_match(input)
        || HTML_TAG_RE.is_match(input)
        || DANGEROUS_SCHEME_RE.is_match(input)
}

/// In-place sanitization for request DTOs.
///
/// Implemented by every create/update payload that carries free text.
/// Handlers call it before validation so a field consisting only of
/// markup is reported as blank.
pub trait Sanitize {
    fn sanitize(&mut self);
}

/// Sanitize a required text field.
pub fn sanitize_field(value: &mut String) {
    *value = sanitize_text(value);
}

/// Sanitize an optional text field.
pub fn sanitize_optional(value: &mut Option<String>) {
    if let Some(v) = value.as_mut() {
        sanitize_field(v);
    }
}

/// Trim an optional identifier field without touching its content.
pub fn trim_optional(value: &mut Option<String>) {
    if let Some(v) = value.as_mut() {
        *v = v.trim().to_string();
    }
}

//! Low-level escaping primitives.
//!
//! These back both the template formatter and the comparison generators:
//!
//! - [`escape_text`] is the generic SQL-string escaper (quotes, backslash, NUL)
//! - [`escape_identifier`] doubles embedded backticks and wraps the result
//! - [`escape_like`] neutralizes `LIKE` metacharacters inside a pattern value
//! - [`sanitize_key`] restricts field names to a safe character set

/// Backslash-escape a string literal: `'`, `"`, `\`, and NUL.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\'' | '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\0' => out.push_str("\\0"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape the body of an identifier by doubling embedded backticks.
///
/// Identifiers are never string-quoted; this is the only escaping they get.
pub fn escape_identifier_body(s: &str) -> String {
    s.replace('`', "``")
}

/// Render a backtick-quoted identifier.
pub fn escape_identifier(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('`');
    out.push_str(&escape_identifier_body(s));
    out.push('`');
    out
}

/// Escape `LIKE` metacharacters (`_`, `%`, `\`) so a value matches literally
/// inside a pattern.
pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '_' | '%' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Strip a field name down to letters, digits, underscore, and hyphen.
pub fn sanitize_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_escapes_quotes_and_backslash() {
        assert_eq!(escape_text("a'b"), "a\\'b");
        assert_eq!(escape_text(r#"a"b"#), "a\\\"b");
        assert_eq!(escape_text(r"a\b"), r"a\\b");
        assert_eq!(escape_text("a\0b"), "a\\0b");
        assert_eq!(escape_text("plain"), "plain");
    }

    #[test]
    fn identifier_doubles_backticks_only() {
        assert_eq!(escape_identifier("col"), "`col`");
        assert_eq!(escape_identifier("we`ird"), "`we``ird`");
        // No string escaping inside identifiers.
        assert_eq!(escape_identifier("a'b"), "`a'b`");
    }

    #[test]
    fn like_escapes_metacharacters() {
        assert_eq!(escape_like("50%_off"), r"50\%\_off");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
    }

    #[test]
    fn keys_drop_unsafe_characters() {
        assert_eq!(sanitize_key("user_id"), "user_id");
        assert_eq!(sanitize_key("user-id"), "user-id");
        assert_eq!(sanitize_key("id; DROP TABLE"), "idDROPTABLE");
        assert_eq!(sanitize_key("a.b"), "ab");
    }
}

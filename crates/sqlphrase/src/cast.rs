//! Cast-keyword classification for `CAST(value AS <keyword>)` wrapping.
//!
//! Candidates come either from a caller-supplied type hint or from a value's
//! runtime kind name. Classification is total: anything outside the grammar
//! falls back to [`CastType::Char`], and `CHAR` values are never CAST-wrapped
//! (they are already quoted strings).

use std::fmt;
use std::sync::OnceLock;

use tracing::debug;

/// Canonical SQL cast keywords.
///
/// `INTEGER` and `NUMERIC` normalize to `SIGNED`; `DOUBLE` normalizes to
/// `DECIMAL`. The remaining keywords map to themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastType {
    Binary,
    Char,
    Date,
    Datetime,
    Signed,
    Unsigned,
    Time,
    Decimal,
}

/// Accepted candidate grammar, matched against the uppercased input.
fn grammar() -> &'static regex::Regex {
    static GRAMMAR: OnceLock<regex::Regex> = OnceLock::new();
    GRAMMAR.get_or_init(|| {
        regex::Regex::new(
            r"^(?:BINARY|CHAR|DATE|DATETIME|SIGNED|UNSIGNED|TIME|DOUBLE|INTEGER|NUMERIC(?:\([0-9]+(?:,[0-9]+)?\))?|DECIMAL(?:\([0-9]+(?:,[0-9]+)?\))?)$",
        )
        .expect("invalid built-in cast grammar")
    })
}

impl CastType {
    /// Classify a candidate keyword, falling back to `CHAR` for anything
    /// outside the grammar.
    pub fn parse(candidate: &str) -> Self {
        let upper = candidate.trim().to_ascii_uppercase();
        if !grammar().is_match(&upper) {
            debug!(candidate, "unknown cast keyword, falling back to CHAR");
            return CastType::Char;
        }
        match upper.as_str() {
            "BINARY" => CastType::Binary,
            "CHAR" => CastType::Char,
            "DATE" => CastType::Date,
            "DATETIME" => CastType::Datetime,
            "SIGNED" | "INTEGER" => CastType::Signed,
            "UNSIGNED" => CastType::Unsigned,
            "TIME" => CastType::Time,
            "DOUBLE" => CastType::Decimal,
            s if s.starts_with("NUMERIC") => CastType::Signed,
            s if s.starts_with("DECIMAL") => CastType::Decimal,
            _ => CastType::Char,
        }
    }

    /// The SQL keyword this type renders as.
    pub fn keyword(&self) -> &'static str {
        match self {
            CastType::Binary => "BINARY",
            CastType::Char => "CHAR",
            CastType::Date => "DATE",
            CastType::Datetime => "DATETIME",
            CastType::Signed => "SIGNED",
            CastType::Unsigned => "UNSIGNED",
            CastType::Time => "TIME",
            CastType::Decimal => "DECIMAL",
        }
    }

    /// Whether a literal of this type should be wrapped in `CAST(.. AS ..)`.
    ///
    /// `CHAR` is skipped: the escaped literal is already a quoted string.
    pub fn wraps_cast(&self) -> bool {
        !matches!(self, CastType::Char)
    }
}

impl fmt::Display for CastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_map_to_themselves() {
        for kw in ["BINARY", "CHAR", "DATE", "DATETIME", "SIGNED", "UNSIGNED", "TIME"] {
            assert_eq!(CastType::parse(kw).keyword(), kw);
        }
    }

    #[test]
    fn documented_normalizations() {
        assert_eq!(CastType::parse("INTEGER"), CastType::Signed);
        assert_eq!(CastType::parse("NUMERIC"), CastType::Signed);
        assert_eq!(CastType::parse("DOUBLE"), CastType::Decimal);
        assert_eq!(CastType::parse("DECIMAL"), CastType::Decimal);
    }

    #[test]
    fn precision_and_scale_are_accepted() {
        assert_eq!(CastType::parse("NUMERIC(10)"), CastType::Signed);
        assert_eq!(CastType::parse("NUMERIC(10,2)"), CastType::Signed);
        assert_eq!(CastType::parse("DECIMAL(8,3)"), CastType::Decimal);
    }

    #[test]
    fn out_of_grammar_falls_back_to_char() {
        assert_eq!(CastType::parse("VARCHAR"), CastType::Char);
        assert_eq!(CastType::parse("string"), CastType::Char);
        assert_eq!(CastType::parse(""), CastType::Char);
        assert_eq!(CastType::parse("DECIMAL(10,2,3)"), CastType::Char);
        assert_eq!(CastType::parse("NUMERIC()"), CastType::Char);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(CastType::parse("signed"), CastType::Signed);
        assert_eq!(CastType::parse("DateTime"), CastType::Datetime);
    }

    #[test]
    fn classification_is_idempotent() {
        for kw in [
            "BINARY", "CHAR", "DATE", "DATETIME", "SIGNED", "UNSIGNED", "TIME", "DOUBLE",
            "INTEGER", "NUMERIC", "DECIMAL",
        ] {
            let first = CastType::parse(kw);
            assert_eq!(CastType::parse(first.keyword()), first);
        }
    }

    #[test]
    fn char_skips_cast_wrapping() {
        assert!(!CastType::Char.wraps_cast());
        assert!(CastType::Date.wraps_cast());
    }
}

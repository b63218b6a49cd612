//! Value sanitizer resolution.
//!
//! Symbolic sanitizer names resolve to a closed set of transforms, matched
//! exhaustively. Callers can supply their own transform via
//! [`Sanitizer::Custom`], which passes through resolution unchanged, or
//! install a [`SanitizerHook`] on a builder to override what a symbolic name
//! resolves to. A hook returning `None` keeps the computed default.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::escape::{escape_like, escape_text, sanitize_key};
use crate::value::Value;

/// A caller-supplied value transform.
pub type SanitizeFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Override hook: `(resolved default, requested name, current field)`.
///
/// Returning `None` keeps the default (fail-open).
pub type SanitizerHook = Arc<dyn Fn(&Sanitizer, &str, &str) -> Option<Sanitizer> + Send + Sync>;

/// A concrete value transform applied before a value is embedded.
#[derive(Clone)]
pub enum Sanitizer {
    /// Coerce to an integer.
    Int,
    /// Coerce to a float.
    Float,
    /// Generic SQL-string escaping (the default).
    Text,
    /// Restrict to the safe key character set.
    Key,
    /// `LIKE`-escape metacharacters, then string-escape.
    EscLike,
    /// Caller-supplied transform; its output embeds as-is.
    Custom(SanitizeFn),
}

impl Sanitizer {
    /// Resolve a symbolic name to a transform.
    ///
    /// Unknown names fall back to the generic string escaper.
    pub fn named(name: &str) -> Self {
        match name {
            "int" | "integer" => Sanitizer::Int,
            "float" | "double" => Sanitizer::Float,
            "string" => Sanitizer::Text,
            "key" => Sanitizer::Key,
            "esc_like" => Sanitizer::EscLike,
            other => {
                if !other.is_empty() {
                    debug!(name = other, "unknown sanitizer name, using string escaper");
                }
                Sanitizer::Text
            }
        }
    }

    /// Wrap a caller-supplied transform.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Sanitizer::Custom(Arc::new(f))
    }

    /// Apply the transform to a value.
    pub fn apply(&self, value: &Value) -> Value {
        match self {
            Sanitizer::Int => Value::Int(value.as_i64()),
            Sanitizer::Float => Value::Float(value.as_f64()),
            Sanitizer::Text => match value {
                Value::Text(s) => Value::Text(escape_text(s)),
                other => other.clone(),
            },
            Sanitizer::Key => Value::Text(sanitize_key(&value.as_text())),
            Sanitizer::EscLike => match value {
                Value::Text(s) => Value::Text(escape_text(&escape_like(s))),
                other => other.clone(),
            },
            Sanitizer::Custom(f) => f(value),
        }
    }
}

impl fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sanitizer::Int => "Int",
            Sanitizer::Float => "Float",
            Sanitizer::Text => "Text",
            Sanitizer::Key => "Key",
            Sanitizer::EscLike => "EscLike",
            Sanitizer::Custom(_) => "Custom(..)",
        };
        f.write_str(name)
    }
}

/// Resolve a symbolic name, consulting an optional override hook.
pub fn resolve(name: &str, field: &str, hook: Option<&SanitizerHook>) -> Sanitizer {
    let default = Sanitizer::named(name);
    match hook {
        Some(h) => h(&default, name, field).unwrap_or(default),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_to_their_transforms() {
        assert!(matches!(Sanitizer::named("int"), Sanitizer::Int));
        assert!(matches!(Sanitizer::named("integer"), Sanitizer::Int));
        assert!(matches!(Sanitizer::named("float"), Sanitizer::Float));
        assert!(matches!(Sanitizer::named("double"), Sanitizer::Float));
        assert!(matches!(Sanitizer::named("string"), Sanitizer::Text));
        assert!(matches!(Sanitizer::named("key"), Sanitizer::Key));
        assert!(matches!(Sanitizer::named("esc_like"), Sanitizer::EscLike));
    }

    #[test]
    fn unknown_names_default_to_string_escaper() {
        assert!(matches!(Sanitizer::named("nope"), Sanitizer::Text));
        assert!(matches!(Sanitizer::named(""), Sanitizer::Text));
    }

    #[test]
    fn int_coerces_loosely() {
        assert_eq!(Sanitizer::Int.apply(&"12abc".into()), Value::Int(12));
        assert_eq!(Sanitizer::Int.apply(&3.9.into()), Value::Int(3));
    }

    #[test]
    fn text_escapes_only_text() {
        assert_eq!(
            Sanitizer::Text.apply(&"a'b".into()),
            Value::Text("a\\'b".to_string())
        );
        assert_eq!(Sanitizer::Text.apply(&5.into()), Value::Int(5));
    }

    #[test]
    fn esc_like_escapes_wildcards_then_quotes() {
        // The LIKE layer adds a backslash before `%`; the string layer then
        // escapes that backslash and the quote.
        assert_eq!(
            Sanitizer::EscLike.apply(&"50%'s".into()),
            Value::Text(r"50\\%\'s".to_string())
        );
    }

    #[test]
    fn custom_passes_through_resolution() {
        let upper = Sanitizer::custom(|v| Value::Text(v.as_text().to_uppercase()));
        assert_eq!(upper.apply(&"abc".into()), Value::Text("ABC".to_string()));
    }

    #[test]
    fn hook_can_override_and_fails_open() {
        let hook: SanitizerHook = Arc::new(|_default, name, _field| {
            (name == "string").then(|| Sanitizer::custom(|_| Value::Text("X".into())))
        });

        let overridden = resolve("string", "f", Some(&hook));
        assert_eq!(overridden.apply(&"abc".into()), Value::Text("X".to_string()));

        // Hook declines: computed default survives.
        let default = resolve("int", "f", Some(&hook));
        assert!(matches!(default, Sanitizer::Int));
    }
}

//! Comparison fragment generators.
//!
//! Every generator shares one shape: resolve the sanitizer, normalize the
//! values to a list, render each value (classify, escape, CAST-wrap unless
//! the keyword is `CHAR`), join with the operator's boolean joiner, and
//! parenthesize when more than one value went in. Field names always render
//! through the formatter's identifier path.

use tracing::debug;

use crate::cast::CastType;
use crate::prepare::{escape_percents, prepare};
use crate::sanitizer::Sanitizer;
use crate::value::{Value, Values};

/// Equality-family comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compare {
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
}

impl Compare {
    /// Parse an operator token, falling back to `=` for anything unsupported.
    pub fn parse(token: &str) -> Self {
        match token {
            "=" => Compare::Eq,
            "!=" | "<>" => Compare::Ne,
            "<" => Compare::Lt,
            ">" => Compare::Gt,
            "<=" => Compare::Lte,
            ">=" => Compare::Gte,
            other => {
                debug!(token = other, "unsupported compare token, falling back to =");
                Compare::Eq
            }
        }
    }

    /// The SQL symbol this operator renders as.
    pub fn symbol(self) -> &'static str {
        match self {
            Compare::Eq => "=",
            Compare::Ne => "!=",
            Compare::Lt => "<",
            Compare::Gt => ">",
            Compare::Lte => "<=",
            Compare::Gte => ">=",
        }
    }

    /// Boolean joiner for multi-value input: affirmative operators accept any
    /// match, the negated one requires all.
    fn joiner(self) -> &'static str {
        match self {
            Compare::Ne => " AND ",
            _ => " OR ",
        }
    }
}

/// Render one escaped literal, CAST-wrapped unless the keyword is `CHAR`.
fn render_literal(value: &Value, cast: Option<CastType>, sanitizer: &Sanitizer) -> String {
    let value = sanitizer.apply(value);
    let literal = match &value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::Int(n) => n.to_string(),
        Value::UInt(n) => n.to_string(),
        Value::Float(x) => x.to_string(),
        // The sanitizer already escaped the text; quote it and neutralize
        // any percent signs left in the data.
        Value::Text(t) => format!("'{}'", escape_percents(t)),
    };
    match cast {
        Some(c) if c.wraps_cast() => format!("CAST({literal} AS {})", c.keyword()),
        _ => literal,
    }
}

/// Join per-value comparisons, parenthesizing iff more than one value.
fn join_parts(parts: Vec<String>, joiner: &str) -> String {
    if parts.len() == 1 {
        parts.into_iter().next().unwrap_or_default()
    } else {
        format!("({})", parts.join(joiner))
    }
}

/// Equality-family fragment: `` `field` <op> value ``.
pub fn compare_fragment(
    field: &str,
    op: Compare,
    values: &Values,
    cast: Option<&str>,
    sanitizer: &Sanitizer,
) -> String {
    if values.is_empty() {
        return String::new();
    }
    let ident = prepare("%i", field);
    let cast = cast.map(CastType::parse);
    let parts: Vec<String> = values
        .items()
        .iter()
        .map(|v| format!("{ident} {} {}", op.symbol(), render_literal(v, cast, sanitizer)))
        .collect();
    join_parts(parts, op.joiner())
}

/// `LIKE` / `NOT LIKE` fragment; values wrap unconditionally as `'%value%'`.
///
/// The wildcards are added outside the formatter so they stay literal; the
/// value itself should arrive through the `esc_like` sanitizer. Unlike the
/// other generators, the value body is not percent-tokenized either: a `\%`
/// the sanitizer produced has to reach the pattern as a literal percent
/// match, which the opaque token would break.
pub fn like_fragment(field: &str, values: &Values, negated: bool, sanitizer: &Sanitizer) -> String {
    if values.is_empty() {
        return String::new();
    }
    let ident = prepare("%i", field);
    let op = if negated { "NOT LIKE" } else { "LIKE" };
    let joiner = if negated { " AND " } else { " OR " };
    let parts: Vec<String> = values
        .items()
        .iter()
        .map(|v| {
            let pattern = sanitizer.apply(v).as_text();
            format!("{ident} {op} '%{pattern}%'")
        })
        .collect();
    join_parts(parts, joiner)
}

/// `IN` / `NOT IN` fragment; scalar input degrades to the equality family.
pub fn in_fragment(
    field: &str,
    values: &Values,
    negated: bool,
    cast: Option<&str>,
    sanitizer: &Sanitizer,
) -> String {
    if !values.is_listed() {
        let op = if negated { Compare::Ne } else { Compare::Eq };
        return compare_fragment(field, op, values, cast, sanitizer);
    }
    if values.is_empty() {
        return String::new();
    }
    let ident = prepare("%i", field);
    let op = if negated { "NOT IN" } else { "IN" };
    let cast = cast.map(CastType::parse);
    let list: Vec<String> = values
        .items()
        .iter()
        .map(|v| render_literal(v, cast, sanitizer))
        .collect();
    format!("{ident} {op} ({})", list.join(", "))
}

/// `BETWEEN` / `NOT BETWEEN` fragment over the first two values.
///
/// A value containing `:` is treated as a date-time string and cast to
/// `DATE`. Fewer than two values degrades to the empty fragment.
pub fn between_fragment(
    field: &str,
    values: &Values,
    negated: bool,
    cast: Option<&str>,
    sanitizer: &Sanitizer,
) -> String {
    if values.len() < 2 {
        debug!(field, supplied = values.len(), "between needs two values");
        return String::new();
    }
    let ident = prepare("%i", field);
    let op = if negated { "NOT BETWEEN" } else { "BETWEEN" };
    let bound = |v: &Value| {
        let cast = match v {
            Value::Text(t) if t.contains(':') => Some(CastType::Date),
            _ => cast.map(CastType::parse),
        };
        render_literal(v, cast, sanitizer)
    };
    let items = values.items();
    format!("{ident} {op} {} AND {}", bound(&items[0]), bound(&items[1]))
}

/// `IS NULL` fragment, used by the builder's `not_exists`.
pub fn is_null_fragment(field: &str) -> String {
    format!("{} IS NULL", prepare("%i", field))
}

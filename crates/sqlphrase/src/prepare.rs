//! The sprintf-style template formatter.
//!
//! [`prepare`] parses a template for printf-like placeholders, validates
//! argument arity, escapes each argument according to its runtime kind, and
//! substitutes. The recognized grammar is:
//!
//! ```text
//! %[index$][flags][width][.precision]<type>     type in { s, d, f, F, i }
//! ```
//!
//! `%%` is a literal percent. Any `%` that doesn't open a valid placeholder
//! is treated as a literal as well. As a final defensive pass, every `%`
//! remaining in the finished output is replaced with the process-wide opaque
//! token from [`placeholder_escape`], so argument data can never be
//! reinterpreted as a new placeholder downstream. The token is never reversed
//! by this engine.
//!
//! # Example
//! ```
//! use sqlphrase::prepare;
//!
//! assert_eq!(prepare("id = %d", 5), "id = 5");
//! assert_eq!(prepare("name = %s", "a'b"), "name = 'a\\'b'");
//! assert_eq!(prepare("ORDER BY %i", "created_at"), "ORDER BY `created_at`");
//! ```

use std::sync::OnceLock;

use tracing::debug;

use crate::error::{FormatError, FormatResult};
use crate::escape::{escape_identifier_body, escape_text};
use crate::value::{IntoValues, Value, Values};

/// Key for the percent-escape token hash. The salt is random per process;
/// the key just domain-separates the hash.
const TOKEN_KEY: &[u8; 32] = b"sqlphrase-placeholder-escape-key";

/// The process-wide opaque token substituted for `%` in formatter output.
///
/// Computed once per process from a keyed hash over a random salt; stable for
/// the process lifetime thereafter.
pub fn placeholder_escape() -> &'static str {
    static TOKEN: OnceLock<String> = OnceLock::new();
    TOKEN.get_or_init(|| {
        let salt: [u8; 32] = rand::random();
        let hash = blake3::keyed_hash(TOKEN_KEY, &salt);
        let hex = hash.to_hex();
        format!("{{{}}}", &hex[..16])
    })
}

/// Replace every `%` in a string with the process-wide escape token.
pub fn escape_percents(s: &str) -> String {
    s.replace('%', placeholder_escape())
}

/// How a substituted argument is wrapped in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Quote {
    #[default]
    None,
    Single,
}

/// One recognized placeholder, decoded.
#[derive(Debug, Clone, Default)]
struct PlaceholderSpec {
    /// Explicit 1-based argument index (`%2$s`).
    index: Option<usize>,
    left_align: bool,
    plus_sign: bool,
    space_sign: bool,
    zero_pad: bool,
    /// Custom pad character from the `'x` flag.
    pad_char: Option<char>,
    width: Option<usize>,
    precision: Option<usize>,
    /// Normalized type char: `s`, `d`, `F`, or `i`.
    kind: char,
    quote: Quote,
}

impl PlaceholderSpec {
    /// A bare placeholder carries no index and no format modifiers.
    fn is_bare(&self) -> bool {
        self.index.is_none()
            && !self.left_align
            && !self.plus_sign
            && !self.space_sign
            && !self.zero_pad
            && self.pad_char.is_none()
            && self.width.is_none()
            && self.precision.is_none()
    }
}

#[derive(Debug)]
enum Segment {
    Literal(String),
    Placeholder(PlaceholderSpec),
}

/// Try to decode a placeholder starting just after a `%`.
///
/// Returns the spec and the number of chars consumed, or `None` when the
/// text doesn't form a valid placeholder (the `%` is then literal).
fn parse_placeholder(rest: &[char]) -> Option<(PlaceholderSpec, usize)> {
    let mut spec = PlaceholderSpec::default();
    let mut i = 0;

    // Explicit 1-based index: digits followed by '$'.
    let mut j = 0;
    while j < rest.len() && rest[j].is_ascii_digit() {
        j += 1;
    }
    if j > 0 && rest.get(j) == Some(&'$') {
        let idx: usize = rest[..j].iter().collect::<String>().parse().ok()?;
        if idx == 0 {
            return None;
        }
        spec.index = Some(idx);
        i = j + 1;
    }

    // Flags. A leading '0' is the zero-pad flag, not part of the width.
    loop {
        match rest.get(i) {
            Some('-') => spec.left_align = true,
            Some('+') => spec.plus_sign = true,
            Some(' ') => spec.space_sign = true,
            Some('0') => spec.zero_pad = true,
            Some('\'') => {
                spec.pad_char = Some(*rest.get(i + 1)?);
                i += 1;
            }
            _ => break,
        }
        i += 1;
    }

    // Width.
    let mut width = 0usize;
    let mut has_width = false;
    while let Some(c) = rest.get(i) {
        let Some(d) = c.to_digit(10) else { break };
        width = width.checked_mul(10)?.checked_add(d as usize)?;
        has_width = true;
        i += 1;
    }
    if has_width {
        spec.width = Some(width);
    }

    // Precision.
    if rest.get(i) == Some(&'.') {
        i += 1;
        let mut precision = 0usize;
        while let Some(c) = rest.get(i) {
            let Some(d) = c.to_digit(10) else { break };
            precision = precision.checked_mul(10)?.checked_add(d as usize)?;
            i += 1;
        }
        spec.precision = Some(precision);
    }

    // Mandatory type char. `f` normalizes to the locale-independent `F`.
    match rest.get(i) {
        Some(&k @ ('s' | 'd' | 'F' | 'i')) => {
            spec.kind = k;
            Some((spec, i + 1))
        }
        Some('f') => {
            spec.kind = 'F';
            Some((spec, i + 1))
        }
        _ => None,
    }
}

/// Split a template into literal text and placeholders.
///
/// `%%` pairs collapse to a literal `%` here, which the final output pass
/// then turns into the escape token. Consuming `%` runs pairwise from the
/// left also gives the parity behavior for `f`: in `%%f` the trailing `f` is
/// plain text, while `%%%f` ends with a real float placeholder.
fn scan(template: &str) -> Vec<Segment> {
    let chars: Vec<char> = template.chars().collect();
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != '%' {
            literal.push(c);
            i += 1;
            continue;
        }
        if chars.get(i + 1) == Some(&'%') {
            literal.push('%');
            i += 2;
            continue;
        }
        let Some((mut spec, used)) = parse_placeholder(&chars[i + 1..]) else {
            // Stray '%': defensively treated as a literal.
            literal.push('%');
            i += 1;
            continue;
        };
        i += 1 + used;

        if spec.kind == 's' && spec.is_bare() {
            // A bare %s the template already quoted has its quotes stripped;
            // single quotes are re-added uniformly below.
            if let (Some(q @ ('\'' | '"')), Some(&after)) = (literal.chars().last(), chars.get(i))
                && after == q
            {
                literal.pop();
                i += 1;
            }
            spec.quote = Quote::Single;
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Placeholder(spec));
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// Pad a rendered number to the requested width, honoring sign placement.
fn pad_numeric(spec: &PlaceholderSpec, s: String) -> String {
    let Some(width) = spec.width else { return s };
    let len = s.chars().count();
    if len >= width {
        return s;
    }
    let fill = width - len;
    if spec.left_align {
        let pad: String = std::iter::repeat_n(spec.pad_char.unwrap_or(' '), fill).collect();
        return s + &pad;
    }
    if spec.zero_pad && spec.pad_char.is_none() {
        // Zeros sit between the sign and the digits.
        let (sign, rest) = match s.chars().next() {
            Some(c @ ('-' | '+' | ' ')) => (c.to_string(), s[c.len_utf8()..].to_string()),
            _ => (String::new(), s),
        };
        return format!("{sign}{}{rest}", "0".repeat(fill));
    }
    let pad: String = std::iter::repeat_n(spec.pad_char.unwrap_or(' '), fill).collect();
    pad + &s
}

/// Truncate to the precision and pad to the width.
fn pad_string(spec: &PlaceholderSpec, s: String) -> String {
    let mut s = s;
    if let Some(p) = spec.precision {
        s = s.chars().take(p).collect();
    }
    let Some(width) = spec.width else { return s };
    let len = s.chars().count();
    if len >= width {
        return s;
    }
    let pad_char = spec
        .pad_char
        .unwrap_or(if spec.zero_pad { '0' } else { ' ' });
    let pad: String = std::iter::repeat_n(pad_char, width - len).collect();
    if spec.left_align { s + &pad } else { pad + &s }
}

fn format_integer(spec: &PlaceholderSpec, n: i64) -> String {
    let mut s = n.to_string();
    if n >= 0 {
        if spec.plus_sign {
            s.insert(0, '+');
        } else if spec.space_sign {
            s.insert(0, ' ');
        }
    }
    pad_numeric(spec, s)
}

fn format_float(spec: &PlaceholderSpec, x: f64) -> String {
    let precision = spec.precision.unwrap_or(6);
    let mut s = format!("{x:.precision$}");
    if !s.starts_with('-') {
        if spec.plus_sign {
            s.insert(0, '+');
        } else if spec.space_sign {
            s.insert(0, ' ');
        }
    }
    pad_numeric(spec, s)
}

/// Render one substituted argument.
fn render(spec: &PlaceholderSpec, value: &Value) -> String {
    match spec.kind {
        'd' => format_integer(spec, value.as_i64()),
        'F' => format_float(spec, value.as_f64()),
        'i' => {
            // Identifiers get backtick doubling only, never string quoting.
            let body = pad_string(spec, escape_identifier_body(&value.as_text()));
            format!("`{body}`")
        }
        _ => {
            // Numbers pass through unescaped; everything else is
            // backslash-escaped text.
            let body = match value {
                Value::Text(t) => escape_text(t),
                other => other.as_text(),
            };
            let body = pad_string(spec, body);
            match spec.quote {
                Quote::Single => format!("'{body}'"),
                Quote::None => body,
            }
        }
    }
}

/// Format a template, returning the reason when the input is rejected.
///
/// See [`prepare`] for the grammar. Failures are: argument-count mismatch, a
/// lone list argument for a single placeholder, a numbered placeholder
/// pointing past the supplied arguments, and an argument claimed as both an
/// identifier and a string.
pub fn try_prepare(template: &str, args: impl IntoValues) -> FormatResult<String> {
    let values: Values = args.into_values();
    let segments = scan(template);

    // Walk the placeholders once to assign argument positions and check
    // cross-placeholder consistency.
    let mut count = 0usize;
    let mut unnumbered = 0usize;
    let mut max_numbered = 0usize;
    let mut identifier_args: Vec<usize> = Vec::new();
    let mut string_args: Vec<usize> = Vec::new();

    for segment in &segments {
        let Segment::Placeholder(spec) = segment else {
            continue;
        };
        count += 1;
        let position = match spec.index {
            Some(idx) => {
                max_numbered = max_numbered.max(idx);
                idx - 1
            }
            None => {
                unnumbered += 1;
                unnumbered - 1
            }
        };
        match spec.kind {
            'i' => identifier_args.push(position),
            's' => string_args.push(position),
            _ => {}
        }
    }

    for &position in &identifier_args {
        if string_args.contains(&position) {
            return Err(FormatError::MixedUseArgument { index: position + 1 });
        }
    }

    let supplied = values.len();
    if count != supplied {
        if count == 1 && values.is_listed() {
            return Err(FormatError::ListForSinglePlaceholder);
        }
        if supplied < count {
            let required = max_numbered.max(unnumbered);
            if supplied < required {
                return Err(FormatError::ArityMismatch {
                    placeholders: count,
                    arguments: supplied,
                });
            }
        } else {
            return Err(FormatError::ArityMismatch {
                placeholders: count,
                arguments: supplied,
            });
        }
    }
    if max_numbered > supplied {
        return Err(FormatError::MissingArgument {
            index: max_numbered,
            arguments: supplied,
        });
    }

    let mut out = String::with_capacity(template.len());
    let mut seq = 0usize;
    for segment in &segments {
        match segment {
            Segment::Literal(s) => out.push_str(s),
            Segment::Placeholder(spec) => {
                let position = spec.index.map(|idx| idx - 1).unwrap_or_else(|| {
                    let p = seq;
                    seq += 1;
                    p
                });
                let value = values.items().get(position).cloned().unwrap_or(Value::Null);
                out.push_str(&render(spec, &value));
            }
        }
    }

    Ok(escape_percents(&out))
}

/// Format a template with type-aware escaping.
///
/// Rejected input (malformed arity, a list argument for a single
/// placeholder, an argument used as both identifier and string) degrades to
/// the empty string so the result can be absorbed inline while assembling
/// fragments. Use [`try_prepare`] to observe the reason instead.
pub fn prepare(template: &str, args: impl IntoValues) -> String {
    match try_prepare(template, args) {
        Ok(s) => s,
        Err(err) => {
            debug!(template, error = %err, "prepare rejected input, returning empty fragment");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_substitution() {
        assert_eq!(prepare("%d", 5), "5");
        assert_eq!(prepare("id = %d", -3), "id = -3");
        assert_eq!(prepare("%d", "12abc"), "12");
    }

    #[test]
    fn string_is_escaped_and_quoted() {
        assert_eq!(prepare("%s", "a'b"), "'a\\'b'");
        assert_eq!(prepare("%s", "plain"), "'plain'");
    }

    #[test]
    fn template_quotes_around_bare_s_are_stripped() {
        assert_eq!(prepare("name = '%s'", "x"), "name = 'x'");
        assert_eq!(prepare("name = \"%s\"", "x"), "name = 'x'");
        // Mismatched quotes stay literal.
        assert_eq!(prepare("name = '%s\"", "x"), "name = ''x'\"");
    }

    #[test]
    fn positional_placeholders_are_not_auto_quoted() {
        assert_eq!(prepare("%1$s", "x"), "x");
        assert_eq!(prepare("%-5s|", "x"), "x    |");
    }

    #[test]
    fn positional_reuse_allows_fewer_arguments() {
        assert_eq!(prepare("%1$s = %1$s", "a"), "a = a");
        assert_eq!(prepare("%2$s %1$s", ("a", "b")), "b a");
    }

    #[test]
    fn arity_mismatch_returns_sentinel() {
        assert_eq!(prepare("%s %s", ["x"]), "");
        assert_eq!(prepare("%s", ("a", "b")), "");
        assert_eq!(
            try_prepare("%s %s", ["x"]),
            Err(FormatError::ArityMismatch {
                placeholders: 2,
                arguments: 1
            })
        );
    }

    #[test]
    fn list_for_single_placeholder_fails() {
        assert_eq!(
            try_prepare("%s", vec!["a", "b"]),
            Err(FormatError::ListForSinglePlaceholder)
        );
        // A one-element list matches the count and is fine.
        assert_eq!(prepare("%s", vec!["a"]), "'a'");
    }

    #[test]
    fn numbered_placeholder_past_arguments_fails() {
        assert_eq!(
            try_prepare("%s %3$s", ("a", "b")),
            Err(FormatError::MissingArgument {
                index: 3,
                arguments: 2
            })
        );
    }

    #[test]
    fn identifier_substitution_backticks() {
        assert_eq!(prepare("ORDER BY %i", "created_at"), "ORDER BY `created_at`");
        assert_eq!(prepare("%i", "we`ird"), "`we``ird`");
        // Identifier arguments are never string-quoted.
        assert_eq!(prepare("%i", "a'b"), "`a'b`");
    }

    #[test]
    fn identifier_and_string_dual_use_fails() {
        assert_eq!(prepare("%1$i = %1$s", "col"), "");
        assert_eq!(
            try_prepare("%1$i = %1$s", "col"),
            Err(FormatError::MixedUseArgument { index: 1 })
        );
    }

    #[test]
    fn float_normalizes_locale_independent() {
        assert_eq!(prepare("%f", 1.5), "1.500000");
        assert_eq!(prepare("%F", 1.5), "1.500000");
        assert_eq!(prepare("%.2f", 1.005), "1.00");
    }

    #[test]
    fn escaped_percent_before_f_is_literal() {
        let token = placeholder_escape();
        // "%%f" is an escaped percent followed by a plain 'f'.
        assert_eq!(prepare("100%%f", ()), format!("100{token}f"));
        // "%%%f" is an escaped percent followed by a real placeholder.
        assert_eq!(prepare("%%%f", 2.0), format!("{token}2.000000"));
    }

    #[test]
    fn width_and_flags() {
        assert_eq!(prepare("%05d", 42), "00042");
        assert_eq!(prepare("%+d", 42), "+42");
        assert_eq!(prepare("%05d", -42), "-0042");
        assert_eq!(prepare("%-6d|", 42), "42    |");
        assert_eq!(prepare("%'x5d", 42), "xxx42");
        assert_eq!(prepare("%8.2F", 3.14159), "    3.14");
    }

    #[test]
    fn stray_percent_becomes_token() {
        let token = placeholder_escape();
        assert_eq!(prepare("100% of %d", 5), format!("100{token} of 5"));
        assert_eq!(prepare("%z %d", 5), format!("{token}z 5"));
    }

    #[test]
    fn percent_in_argument_data_becomes_token() {
        let token = placeholder_escape();
        assert_eq!(prepare("%s", "50%"), format!("'50{token}'"));
        // Even a value crafted to look like a placeholder is inert.
        assert_eq!(prepare("%s", "%s"), format!("'{token}s'"));
    }

    #[test]
    fn token_is_stable_for_the_process() {
        assert_eq!(placeholder_escape(), placeholder_escape());
        let t = placeholder_escape();
        assert!(t.starts_with('{') && t.ends_with('}'));
        assert_eq!(t.len(), 18);
    }

    #[test]
    fn no_placeholders_no_arguments() {
        assert_eq!(prepare("SELECT 1", ()), "SELECT 1");
    }

    #[test]
    fn null_renders_as_empty_quoted_string() {
        assert_eq!(prepare("%s", Value::Null), "''");
    }

    #[test]
    fn numbers_pass_through_string_placeholders_unescaped() {
        assert_eq!(prepare("%s", 5), "'5'");
        assert_eq!(prepare("a = %1$s", 5), "a = 5");
    }
}

//! The WHERE-clause builder.
//!
//! [`WhereBuilder`] assembles one boolean expression across chained calls.
//! Selecting a field and issuing a comparison commits a phrase; issuing
//! [`or`](WhereBuilder::or) or [`and`](WhereBuilder::and) arms amendment, so
//! the next comparison merges into the previous phrase instead of appending a
//! new one. Committed phrases join with `AND` at render time.
//!
//! A builder instance owns its state and must not be shared across concurrent
//! clause-building sequences; give each caller its own.
//!
//! # Example
//! ```
//! use sqlphrase::WhereBuilder;
//!
//! let mut qb = WhereBuilder::new();
//! qb.r#where("status").equals("active");
//! qb.or().equals("pending");
//! qb.r#where("age").at_least(18);
//! assert_eq!(
//!     qb.render(),
//!     "WHERE `status` = 'active' OR `status` = 'pending' AND `age` >= 18"
//! );
//! ```

use std::fmt;

use tracing::debug;

use crate::compare::{
    Compare, between_fragment, compare_fragment, in_fragment, is_null_fragment, like_fragment,
};
use crate::escape::sanitize_key;
use crate::sanitizer::{self, Sanitizer, SanitizerHook};
use crate::value::IntoValues;

/// Boolean operator used when amending the previous phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoolOp {
    And,
    #[default]
    Or,
}

impl BoolOp {
    pub fn keyword(self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
        }
    }
}

/// Incremental builder for a single WHERE clause.
pub struct WhereBuilder {
    /// The only supported clause keyword.
    clause: &'static str,
    phrases: Vec<String>,
    field: String,
    operator: BoolOp,
    amending: bool,
    /// Phrase captured by `or()`/`and()`, waiting to be merged.
    pending: Option<String>,
    hook: Option<SanitizerHook>,
}

impl Default for WhereBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WhereBuilder {
    pub fn new() -> Self {
        Self {
            clause: "WHERE",
            phrases: Vec::new(),
            field: String::new(),
            operator: BoolOp::default(),
            amending: false,
            pending: None,
            hook: None,
        }
    }

    /// Select the field the next comparisons apply to.
    ///
    /// The name is sanitized to letters, digits, underscore, and hyphen.
    /// Switching fields commits nothing.
    pub fn r#where(&mut self, field: &str) -> &mut Self {
        let sanitized = sanitize_key(field);
        if sanitized != self.field {
            self.field = sanitized;
        }
        self
    }

    /// Install a sanitizer override hook for this builder instance.
    ///
    /// The hook sees `(resolved default, requested name, current field)` and
    /// may substitute another sanitizer; returning `None` keeps the default.
    pub fn sanitizer_hook(&mut self, hook: SanitizerHook) -> &mut Self {
        self.hook = Some(hook);
        self
    }

    /// Merge the next comparison into the previous phrase with `OR`.
    pub fn or(&mut self) -> &mut Self {
        self.arm(BoolOp::Or)
    }

    /// Merge the next comparison into the previous phrase with `AND`.
    pub fn and(&mut self) -> &mut Self {
        self.arm(BoolOp::And)
    }

    fn arm(&mut self, op: BoolOp) -> &mut Self {
        self.operator = op;
        // Capture the clause's last committed phrase as the merge target.
        // With nothing committed yet the target is simply absent. A repeated
        // or()/and() only switches the operator; the captured phrase stays.
        if !self.amending {
            self.pending = self.phrases.pop();
        }
        self.amending = true;
        self
    }

    fn resolve(&self, name: &str) -> Sanitizer {
        sanitizer::resolve(name, &self.field, self.hook.as_ref())
    }

    /// Commit a rendered fragment, amending the previous phrase when armed.
    fn commit(&mut self, fragment: String) -> &mut Self {
        if fragment.is_empty() {
            // Degraded input: absorb silently, putting any captured merge
            // target back where it was.
            debug!(field = %self.field, "empty fragment absorbed");
            if let Some(previous) = self.pending.take() {
                self.phrases.push(previous);
            }
            self.amending = false;
            return self;
        }
        if self.amending {
            let merged = match self.pending.take() {
                Some(previous) => {
                    format!("{previous} {} {fragment}", self.operator.keyword())
                }
                None => fragment,
            };
            self.phrases.push(merged);
            self.amending = false;
        } else {
            self.phrases.push(fragment);
        }
        self
    }

    // ==================== Comparison operations ====================

    /// `field = value`; multiple values join with OR.
    pub fn equals(&mut self, values: impl IntoValues) -> &mut Self {
        let frag = compare_fragment(
            &self.field,
            Compare::Eq,
            &values.into_values(),
            None,
            &self.resolve("string"),
        );
        self.commit(frag)
    }

    /// `field != value`; multiple values join with AND.
    pub fn not_equals(&mut self, values: impl IntoValues) -> &mut Self {
        let frag = compare_fragment(
            &self.field,
            Compare::Ne,
            &values.into_values(),
            None,
            &self.resolve("string"),
        );
        self.commit(frag)
    }

    /// `field < value`.
    pub fn less_than(&mut self, values: impl IntoValues) -> &mut Self {
        let frag = compare_fragment(
            &self.field,
            Compare::Lt,
            &values.into_values(),
            None,
            &self.resolve("string"),
        );
        self.commit(frag)
    }

    /// `field > value`.
    pub fn greater_than(&mut self, values: impl IntoValues) -> &mut Self {
        let frag = compare_fragment(
            &self.field,
            Compare::Gt,
            &values.into_values(),
            None,
            &self.resolve("string"),
        );
        self.commit(frag)
    }

    /// `field <= value`.
    pub fn at_most(&mut self, values: impl IntoValues) -> &mut Self {
        let frag = compare_fragment(
            &self.field,
            Compare::Lte,
            &values.into_values(),
            None,
            &self.resolve("string"),
        );
        self.commit(frag)
    }

    /// `field >= value`.
    pub fn at_least(&mut self, values: impl IntoValues) -> &mut Self {
        let frag = compare_fragment(
            &self.field,
            Compare::Gte,
            &values.into_values(),
            None,
            &self.resolve("string"),
        );
        self.commit(frag)
    }

    /// Generic comparison by operator token; unsupported tokens fall back
    /// to `=`. Dispatching here is equivalent to the dedicated method.
    pub fn compare(&mut self, token: &str, values: impl IntoValues) -> &mut Self {
        let frag = compare_fragment(
            &self.field,
            Compare::parse(token),
            &values.into_values(),
            None,
            &self.resolve("string"),
        );
        self.commit(frag)
    }

    /// Comparison with an explicit cast hint; escaped literals wrap in
    /// `CAST(.. AS <keyword>)` unless the keyword classifies to `CHAR`.
    pub fn compare_cast(
        &mut self,
        token: &str,
        values: impl IntoValues,
        cast: &str,
    ) -> &mut Self {
        let frag = compare_fragment(
            &self.field,
            Compare::parse(token),
            &values.into_values(),
            Some(cast),
            &self.resolve("string"),
        );
        self.commit(frag)
    }

    /// Comparison with an explicitly named sanitizer (or a custom one via
    /// the override hook); unknown names use the default string escaper.
    pub fn compare_with(
        &mut self,
        token: &str,
        values: impl IntoValues,
        sanitizer: &str,
    ) -> &mut Self {
        let frag = compare_fragment(
            &self.field,
            Compare::parse(token),
            &values.into_values(),
            None,
            &self.resolve(sanitizer),
        );
        self.commit(frag)
    }

    /// Comparison with a caller-supplied sanitizer, bypassing name
    /// resolution entirely.
    pub fn compare_sanitized(
        &mut self,
        token: &str,
        values: impl IntoValues,
        sanitizer: &Sanitizer,
    ) -> &mut Self {
        let frag = compare_fragment(
            &self.field,
            Compare::parse(token),
            &values.into_values(),
            None,
            sanitizer,
        );
        self.commit(frag)
    }

    /// `field LIKE '%value%'`.
    pub fn like(&mut self, values: impl IntoValues) -> &mut Self {
        let frag = like_fragment(
            &self.field,
            &values.into_values(),
            false,
            &self.resolve("esc_like"),
        );
        self.commit(frag)
    }

    /// `field NOT LIKE '%value%'`.
    pub fn not_like(&mut self, values: impl IntoValues) -> &mut Self {
        let frag = like_fragment(
            &self.field,
            &values.into_values(),
            true,
            &self.resolve("esc_like"),
        );
        self.commit(frag)
    }

    /// `field IN (values...)`; scalar input degrades to `equals`.
    pub fn in_list(&mut self, values: impl IntoValues) -> &mut Self {
        let frag = in_fragment(
            &self.field,
            &values.into_values(),
            false,
            None,
            &self.resolve("string"),
        );
        self.commit(frag)
    }

    /// `field NOT IN (values...)`; scalar input degrades to `not_equals`.
    pub fn not_in(&mut self, values: impl IntoValues) -> &mut Self {
        let frag = in_fragment(
            &self.field,
            &values.into_values(),
            true,
            None,
            &self.resolve("string"),
        );
        self.commit(frag)
    }

    /// `field BETWEEN a AND b`, using only the first two values. Values
    /// containing `:` cast to `DATE`. Fewer than two values commit nothing.
    pub fn between(&mut self, values: impl IntoValues) -> &mut Self {
        let frag = between_fragment(
            &self.field,
            &values.into_values(),
            false,
            None,
            &self.resolve("string"),
        );
        self.commit(frag)
    }

    /// `field NOT BETWEEN a AND b`.
    pub fn not_between(&mut self, values: impl IntoValues) -> &mut Self {
        let frag = between_fragment(
            &self.field,
            &values.into_values(),
            true,
            None,
            &self.resolve("string"),
        );
        self.commit(frag)
    }

    /// Alias for [`equals`](WhereBuilder::equals).
    pub fn exists(&mut self, values: impl IntoValues) -> &mut Self {
        self.equals(values)
    }

    /// `field IS NULL`, regardless of any value previously supplied.
    pub fn not_exists(&mut self) -> &mut Self {
        let frag = is_null_fragment(&self.field);
        self.commit(frag)
    }

    // ==================== Rendering ====================

    /// Render the clause without touching builder state.
    pub fn render_keeping_state(&self) -> String {
        let mut phrases: Vec<&str> = self.phrases.iter().map(String::as_str).collect();
        // A dangling or()/and() still holds the last phrase.
        if let Some(pending) = &self.pending {
            phrases.push(pending);
        }
        if phrases.is_empty() {
            return String::new();
        }
        format!("{} {}", self.clause, phrases.join(" AND "))
    }

    /// Render the clause and reset the builder for the next one.
    pub fn render(&mut self) -> String {
        let out = self.render_keeping_state();
        self.reset();
        out
    }

    /// Drop all clause state; the sanitizer hook stays installed.
    pub fn reset(&mut self) {
        self.phrases.clear();
        self.field.clear();
        self.operator = BoolOp::default();
        self.amending = false;
        self.pending = None;
    }
}

impl fmt::Debug for WhereBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhereBuilder")
            .field("clause", &self.clause)
            .field("phrases", &self.phrases)
            .field("field", &self.field)
            .field("operator", &self.operator)
            .field("amending", &self.amending)
            .field("pending", &self.pending)
            .field("hook", &self.hook.as_ref().map(|_| "<hook>"))
            .finish()
    }
}

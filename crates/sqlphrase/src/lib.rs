//! # sqlphrase
//!
//! An escaping-first SQL WHERE-clause builder with a sprintf-style template
//! formatter.
//!
//! ## Features
//!
//! - **Safe by construction**: every literal is escaped according to its
//!   runtime kind before it touches SQL text; identifiers get backtick
//!   quoting, strings get quoting plus backslash escaping, numbers embed raw
//! - **Printf-style templates**: `prepare()` understands `%s`, `%d`, `%f`,
//!   `%F`, and `%i` (identifier) placeholders with positional indexes and
//!   format modifiers, and neutralizes stray `%` so argument data can never
//!   become a new placeholder
//! - **Chainable clause assembly**: one builder tracks the current field and
//!   boolean operator across calls, merging `or()`/`and()` amendments into
//!   the previous phrase
//! - **Silent degradation**: malformed input yields an inert empty fragment
//!   instead of an error mid-assembly (`try_prepare` reports the reason when
//!   you need it)
//!
//! ## Quick start
//!
//! ```
//! use sqlphrase::{WhereBuilder, prepare};
//!
//! let mut qb = WhereBuilder::new();
//! qb.r#where("status").equals("active");
//! qb.r#where("age").between(vec![18, 65]);
//! assert_eq!(
//!     qb.render(),
//!     "WHERE `status` = 'active' AND `age` BETWEEN 18 AND 65"
//! );
//!
//! let frag = prepare("ORDER BY %i LIMIT %d", ("created_at", 10));
//! assert_eq!(frag, "ORDER BY `created_at` LIMIT 10");
//! ```

pub mod builder;
pub mod cast;
pub mod compare;
pub mod error;
pub mod escape;
pub mod prelude;
pub mod prepare;
pub mod sanitizer;
pub mod value;

pub use builder::{BoolOp, WhereBuilder};
pub use cast::CastType;
pub use compare::Compare;
pub use error::{FormatError, FormatResult};
pub use escape::{escape_identifier, escape_like, escape_text, sanitize_key};
pub use prepare::{placeholder_escape, prepare, try_prepare};
pub use sanitizer::{SanitizeFn, Sanitizer, SanitizerHook};
pub use value::{IntoValues, Value, Values};

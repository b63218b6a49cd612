//! Convenient imports for typical `sqlphrase` usage.
//!
//! This module is intentionally small and focused on the most common APIs so
//! examples can start with:
//!
//! ```ignore
//! use sqlphrase::prelude::*;
//! ```

pub use crate::{
    CastType, Compare, FormatError, FormatResult, IntoValues, Sanitizer, Value, WhereBuilder,
    placeholder_escape, prepare, try_prepare,
};

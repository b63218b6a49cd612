//! Error types for sqlphrase.
//!
//! The fragment-building surface never raises: malformed input degrades to a
//! documented fallback (usually the empty string). These error types back the
//! `try_` variants of the formatter so callers who want to tell "rejected
//! input" apart from "empty by design" can.

use thiserror::Error;

/// Result type alias for formatter operations.
pub type FormatResult<T> = Result<T, FormatError>;

/// Error types for template formatting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The number of placeholders does not match the number of arguments.
    #[error("template expects {placeholders} argument(s), {arguments} supplied")]
    ArityMismatch {
        placeholders: usize,
        arguments: usize,
    },

    /// A lone list argument was supplied for a single-placeholder template.
    #[error("a list argument cannot fill a single placeholder")]
    ListForSinglePlaceholder,

    /// A numbered placeholder references an argument position that was never supplied.
    #[error("placeholder references argument {index}, only {arguments} supplied")]
    MissingArgument { index: usize, arguments: usize },

    /// The same argument is claimed by both an identifier and a string placeholder.
    #[error("argument {index} is used as both an identifier and a string")]
    MixedUseArgument { index: usize },
}

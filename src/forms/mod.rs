//! Form definitions backing the listing URLs.

use thiserror::Error;

pub mod query;

#[derive(Debug, Error)]
/// Errors that can occur when decoding or encoding form data.
pub enum FormError {
    #[error("malformed query string: {0}")]
    Malformed(String),

    #[error("invalid `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

//! Domain model for articles, their tags and threaded comments.
//!
//! # Responsibility
//! - Define canonical records read back from storage.
//! - Define write-side drafts and their field validation.
//!
//! # Invariants
//! - Articles and comments are identified by stable UUIDs.
//! - Tags are identified by their exact (case-sensitive) name.
//! - Timestamps are owned by storage and never taken from drafts.

pub mod article;
pub mod comment;
pub mod tag;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reason a draft field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Field is empty after trimming.
    Required,
    /// Field is longer than the allowed number of characters.
    TooLong { max_chars: usize },
}

/// User-correctable draft validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelValidationError {
    /// Name of the offending input field.
    pub field: &'static str,
    pub kind: FieldErrorKind,
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            FieldErrorKind::Required => write!(f, "field `{}` is required", self.field),
            FieldErrorKind::TooLong { max_chars } => write!(
                f,
                "field `{}` must be at most {max_chars} characters",
                self.field
            ),
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) fn check_text_field(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ModelValidationError> {
    if value.trim().is_empty() {
        return Err(ModelValidationError {
            field,
            kind: FieldErrorKind::Required,
        });
    }
    if value.chars().count() > max_chars {
        return Err(ModelValidationError {
            field,
            kind: FieldErrorKind::TooLong { max_chars },
        });
    }
    Ok(())
}

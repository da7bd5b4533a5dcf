//! Comment domain model.

use super::article::{ArticleId, AUTHOR_MAX_CHARS};
use super::check_text_field;
use super::ModelValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CommentId = Uuid;

pub const COMMENT_TEXT_MAX_CHARS: usize = 400;

/// Comment owned by exactly one article. Destroyed with its article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub uuid: CommentId,
    pub article_id: ArticleId,
    pub author: String,
    pub text: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// User input for posting a comment under an article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDraft {
    pub author: String,
    pub text: String,
}

impl CommentDraft {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        check_text_field("author", &self.author, AUTHOR_MAX_CHARS)?;
        check_text_field("text", &self.text, COMMENT_TEXT_MAX_CHARS)
    }
}

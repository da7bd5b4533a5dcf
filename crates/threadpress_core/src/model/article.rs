//! Article domain model.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another article.
//! - `author` is a free-text identifier, not a user account reference.
//! - `created_at`/`updated_at` are set by storage (epoch milliseconds).

use super::check_text_field;
use super::tag::Tag;
use super::ModelValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for articles.
pub type ArticleId = Uuid;

pub const TITLE_MAX_CHARS: usize = 200;
pub const BODY_MAX_CHARS: usize = 3000;
pub const AUTHOR_MAX_CHARS: usize = 40;
pub const TAG_INPUT_MAX_CHARS: usize = 500;

/// Article read model with its current tag set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub uuid: ArticleId,
    pub title: String,
    pub body: String,
    pub author: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds, bumped on every update.
    pub updated_at: i64,
    /// Attached tags sorted by name.
    pub tags: Vec<Tag>,
}

impl Article {
    /// Renders the attached tags the way the edit form expects them back:
    /// names joined by `,`, no trailing separator.
    pub fn tag_input(&self) -> String {
        self.tags
            .iter()
            .map(|tag| tag.name.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// User input for creating or fully replacing an article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub body: String,
    pub author: String,
    /// Raw comma-separated tag list, resolved on save.
    pub tags: String,
}

impl ArticleDraft {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            author: author.into(),
            tags: String::new(),
        }
    }

    /// Sets the raw tag list.
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Checks required fields and length limits.
    ///
    /// The tag list is optional; only its length is bounded.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        check_text_field("title", &self.title, TITLE_MAX_CHARS)?;
        check_text_field("body", &self.body, BODY_MAX_CHARS)?;
        check_text_field("author", &self.author, AUTHOR_MAX_CHARS)?;
        if self.tags.chars().count() > TAG_INPUT_MAX_CHARS {
            return Err(ModelValidationError {
                field: "tags",
                kind: super::FieldErrorKind::TooLong {
                    max_chars: TAG_INPUT_MAX_CHARS,
                },
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Article, ArticleDraft, TITLE_MAX_CHARS};
    use crate::model::tag::Tag;
    use crate::model::FieldErrorKind;
    use uuid::Uuid;

    #[test]
    fn tag_input_joins_names_without_trailing_comma() {
        let article = Article {
            uuid: Uuid::new_v4(),
            title: "t".to_string(),
            body: "b".to_string(),
            author: "a".to_string(),
            created_at: 0,
            updated_at: 0,
            tags: vec![
                Tag {
                    id: 1,
                    name: "a".to_string(),
                },
                Tag {
                    id: 2,
                    name: "b".to_string(),
                },
            ],
        };
        assert_eq!(article.tag_input(), "a,b");
    }

    #[test]
    fn validate_rejects_blank_title() {
        let err = ArticleDraft::new("  ", "body", "bob").validate().unwrap_err();
        assert_eq!(err.field, "title");
        assert_eq!(err.kind, FieldErrorKind::Required);
    }

    #[test]
    fn validate_rejects_overlong_title() {
        let title = "x".repeat(TITLE_MAX_CHARS + 1);
        let err = ArticleDraft::new(title, "body", "bob").validate().unwrap_err();
        assert!(matches!(err.kind, FieldErrorKind::TooLong { .. }));
    }

    #[test]
    fn validate_accepts_empty_tag_list() {
        assert!(ArticleDraft::new("t", "b", "a").validate().is_ok());
    }
}

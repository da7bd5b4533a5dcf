//! OR-combined article predicates and their SQL rendering.
//!
//! # Responsibility
//! - Translate validated [`SearchCriteria`] into a [`Predicate`].
//! - Render a predicate as a parameterized `WHERE` fragment over `articles`.
//!
//! # Invariants
//! - A predicate with zero clauses renders as a contradiction (`0 = 1`),
//!   never as an always-true filter.
//! - Related-row clauses use `EXISTS` subqueries, so an article matching
//!   through several tags or comments is selected once.
//! - Case-insensitive comparisons fold both sides with the same Unicode
//!   lowercase mapping (`casefold` SQL function / `str::to_lowercase`).

use super::criteria::SearchCriteria;
use rusqlite::types::Value;

/// One search condition over an article and its related rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// Case-insensitive substring of the title.
    TitleContains(String),
    /// Case-insensitive substring of the body.
    BodyContains(String),
    /// Some attached tag has exactly this name, ignoring case.
    TagNamed(String),
    /// Some comment's text contains the value, ignoring case.
    CommentTextContains(String),
    /// Article author equals the value, ignoring case.
    AuthorIs(String),
    /// Some comment's author equals the value, ignoring case.
    CommentAuthorIs(String),
}

impl Clause {
    fn render(&self, params: &mut Vec<Value>) -> &'static str {
        let (sql, value) = match self {
            Self::TitleContains(value) => ("instr(casefold(articles.title), ?) > 0", value),
            Self::BodyContains(value) => ("instr(casefold(articles.body), ?) > 0", value),
            Self::TagNamed(value) => (
                "EXISTS (
                    SELECT 1
                    FROM article_tags at
                    INNER JOIN tags t ON t.id = at.tag_id
                    WHERE at.article_uuid = articles.uuid
                      AND casefold(t.name) = ?
                )",
                value,
            ),
            Self::CommentTextContains(value) => (
                "EXISTS (
                    SELECT 1
                    FROM comments c
                    WHERE c.article_uuid = articles.uuid
                      AND instr(casefold(c.text), ?) > 0
                )",
                value,
            ),
            Self::AuthorIs(value) => ("casefold(articles.author) = ?", value),
            Self::CommentAuthorIs(value) => (
                "EXISTS (
                    SELECT 1
                    FROM comments c
                    WHERE c.article_uuid = articles.uuid
                      AND casefold(c.author) = ?
                )",
                value,
            ),
        };
        params.push(Value::Text(value.to_lowercase()));
        sql
    }
}

/// Disjunction of clauses. Starts out matching nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

/// Parameterized SQL condition, valid inside `SELECT ... FROM articles WHERE`.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFilter {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Predicate {
    /// The empty disjunction: matches no article.
    pub fn nothing() -> Self {
        Self::default()
    }

    /// Adds `clause` as another alternative.
    pub fn or(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn to_sql(&self) -> SqlFilter {
        let mut params = Vec::with_capacity(self.clauses.len());
        if self.clauses.is_empty() {
            return SqlFilter {
                sql: "0 = 1".to_string(),
                params,
            };
        }

        let parts = self
            .clauses
            .iter()
            .map(|clause| clause.render(&mut params))
            .collect::<Vec<_>>();
        SqlFilter {
            sql: format!("({})", parts.join(" OR ")),
            params,
        }
    }
}

/// Builds the OR of every enabled scope whose target field is present.
///
/// Flags whose text/author field is empty contribute nothing.
pub fn build_predicate(criteria: &SearchCriteria) -> Predicate {
    let mut predicate = Predicate::nothing();

    if criteria.has_text() {
        let text = &criteria.text;
        if criteria.in_title {
            predicate = predicate.or(Clause::TitleContains(text.clone()));
        }
        if criteria.in_text {
            predicate = predicate.or(Clause::BodyContains(text.clone()));
        }
        if criteria.in_tags {
            predicate = predicate.or(Clause::TagNamed(text.clone()));
        }
        if criteria.in_comment_text {
            predicate = predicate.or(Clause::CommentTextContains(text.clone()));
        }
    }

    if criteria.has_author() {
        let author = &criteria.author;
        if criteria.in_articles {
            predicate = predicate.or(Clause::AuthorIs(author.clone()));
        }
        if criteria.in_comments {
            predicate = predicate.or(Clause::CommentAuthorIs(author.clone()));
        }
    }

    predicate
}

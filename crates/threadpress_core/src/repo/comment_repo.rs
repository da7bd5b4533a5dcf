//! Comment repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Comments always reference an existing article.
//! - Per-article listing is newest first: `created_at DESC, rowid DESC`.

use crate::model::article::ArticleId;
use crate::model::comment::{Comment, CommentDraft, CommentId};
use crate::repo::{ensure_schema, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[(
    "comments",
    &["uuid", "article_uuid", "author", "text", "created_at"],
)];

/// Repository interface for comment operations.
pub trait CommentRepository {
    /// Inserts a validated comment under an existing article.
    fn create_comment(&self, article_id: ArticleId, draft: &CommentDraft)
        -> RepoResult<CommentId>;
    fn get_comment(&self, comment_id: CommentId) -> RepoResult<Option<Comment>>;
    fn count_comments(&self, article_id: ArticleId) -> RepoResult<u64>;
    /// Lists one page of an article's comments, newest first.
    fn list_comments(
        &self,
        article_id: ArticleId,
        limit: u32,
        offset: u32,
    ) -> RepoResult<Vec<Comment>>;
}

/// SQLite-backed comment repository.
pub struct SqliteCommentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCommentRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn, REQUIRED_SCHEMA)?;
        Ok(Self { conn })
    }
}

impl CommentRepository for SqliteCommentRepository<'_> {
    fn create_comment(
        &self,
        article_id: ArticleId,
        draft: &CommentDraft,
    ) -> RepoResult<CommentId> {
        draft.validate()?;

        let article_uuid = article_id.to_string();
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM articles WHERE uuid = ?1);",
            [article_uuid.as_str()],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::NotFound(article_id));
        }

        let comment_id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO comments (uuid, article_uuid, author, text) VALUES (?1, ?2, ?3, ?4);",
            params![
                comment_id.to_string(),
                article_uuid,
                draft.author.as_str(),
                draft.text.as_str(),
            ],
        )?;

        Ok(comment_id)
    }

    fn get_comment(&self, comment_id: CommentId) -> RepoResult<Option<Comment>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, article_uuid, author, text, created_at
             FROM comments
             WHERE uuid = ?1;",
        )?;
        let mut rows = stmt.query([comment_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_comment_row(row)?));
        }
        Ok(None)
    }

    fn count_comments(&self, article_id: ArticleId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM comments WHERE article_uuid = ?1;",
            [article_id.to_string()],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative comment count {count}")))
    }

    fn list_comments(
        &self,
        article_id: ArticleId,
        limit: u32,
        offset: u32,
    ) -> RepoResult<Vec<Comment>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, article_uuid, author, text, created_at
             FROM comments
             WHERE article_uuid = ?1
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?2 OFFSET ?3;",
        )?;
        let mut rows = stmt.query(params![article_id.to_string(), limit, offset])?;
        let mut comments = Vec::new();
        while let Some(row) = rows.next()? {
            comments.push(parse_comment_row(row)?);
        }
        Ok(comments)
    }
}

fn parse_comment_row(row: &Row<'_>) -> RepoResult<Comment> {
    let uuid_text: String = row.get("uuid")?;
    let article_text: String = row.get("article_uuid")?;
    Ok(Comment {
        uuid: parse_uuid(&uuid_text, "comments.uuid")?,
        article_id: parse_uuid(&article_text, "comments.article_uuid")?,
        author: row.get("author")?,
        text: row.get("text")?,
        created_at: row.get("created_at")?,
    })
}

//! Tag repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Look up tags by exact name and create missing ones.
//! - Recover from concurrent creation of the same name.
//!
//! # Invariants
//! - `tags.name` is unique and compared case-sensitively.
//! - A unique-constraint violation on insert means "already exists" and is
//!   answered by re-fetching, never surfaced to callers.

use crate::model::article::ArticleId;
use crate::model::tag::{Tag, TagId};
use crate::repo::{ensure_schema, RepoError, RepoResult};
use log::{debug, info};
use rusqlite::{ffi, Connection, OptionalExtension};

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    ("tags", &["id", "name"]),
    ("article_tags", &["article_uuid", "tag_id"]),
];

/// Repository interface for tag lookup and creation.
pub trait TagRepository {
    /// Returns the tag with exactly this name.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Tag>>;
    /// Inserts the tag, or returns the existing row when the name is taken.
    fn create_or_fetch(&self, name: &str) -> RepoResult<Tag>;
    /// Returns all tags sorted by name.
    fn list_tags(&self) -> RepoResult<Vec<Tag>>;
    /// Returns tags attached to one article sorted by name.
    fn tags_for_article(&self, article_id: ArticleId) -> RepoResult<Vec<Tag>>;
}

/// SQLite-backed tag repository.
pub struct SqliteTagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn, REQUIRED_SCHEMA)?;
        Ok(Self { conn })
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Tag>> {
        let tag = self
            .conn
            .query_row(
                "SELECT id, name FROM tags WHERE name = ?1;",
                [name],
                |row| {
                    Ok(Tag {
                        id: row.get("id")?,
                        name: row.get("name")?,
                    })
                },
            )
            .optional()?;
        Ok(tag)
    }

    fn create_or_fetch(&self, name: &str) -> RepoResult<Tag> {
        match self
            .conn
            .execute("INSERT INTO tags (name) VALUES (?1);", [name])
        {
            Ok(_) => {
                let id: TagId = self.conn.last_insert_rowid();
                info!("event=tag_created module=repo status=ok tag_id={id}");
                Ok(Tag {
                    id,
                    name: name.to_string(),
                })
            }
            Err(err) if is_unique_violation(&err) => {
                debug!("event=tag_conflict_refetch module=repo status=ok");
                self.find_by_name(name)?.ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "tag `{name}` reported as duplicate but cannot be re-fetched"
                    ))
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM tags ORDER BY name ASC;")?;
        let mut rows = stmt.query([])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(Tag {
                id: row.get("id")?,
                name: row.get("name")?,
            });
        }
        Ok(tags)
    }

    fn tags_for_article(&self, article_id: ArticleId) -> RepoResult<Vec<Tag>> {
        load_tags_for_article(self.conn, &article_id.to_string())
    }
}

pub(crate) fn load_tags_for_article(conn: &Connection, article_uuid: &str) -> RepoResult<Vec<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name
         FROM article_tags at
         INNER JOIN tags t ON t.id = at.tag_id
         WHERE at.article_uuid = ?1
         ORDER BY t.name ASC;",
    )?;
    let mut rows = stmt.query([article_uuid])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(Tag {
            id: row.get(0)?,
            name: row.get(1)?,
        });
    }
    Ok(tags)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

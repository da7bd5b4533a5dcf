//! Article repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `articles` and their tag links.
//! - Execute search predicates and the single-tag list filter.
//!
//! # Invariants
//! - Listing order is always `created_at DESC, rowid DESC`: newest first,
//!   insertion order breaking millisecond ties.
//! - `set_article_tags` replaces the whole tag set in a single transaction.
//! - `write_atomically` nests: inside an open transaction it joins it.
//! - Deleting an article cascades to its comments and tag links.
//! - Every returned list holds each article at most once.

use crate::model::article::{Article, ArticleDraft, ArticleId};
use crate::model::tag::TagId;
use crate::repo::tag_repo::load_tags_for_article;
use crate::repo::{ensure_schema, parse_uuid, RepoError, RepoResult};
use crate::search::predicate::{Clause, Predicate, SqlFilter};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const ARTICLE_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    body,
    author,
    created_at,
    updated_at
FROM articles";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    (
        "articles",
        &["uuid", "title", "body", "author", "created_at", "updated_at"],
    ),
    ("article_tags", &["article_uuid", "tag_id"]),
    ("comments", &["article_uuid", "author", "text"]),
];

const ARTICLE_ORDER_SQL: &str = " ORDER BY created_at DESC, rowid DESC";

/// Query options for article list use-cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleListQuery {
    /// Optional single-tag filter, matched case-insensitively and exactly.
    pub tag: Option<String>,
    /// Maximum rows to return. `None` returns every row.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

impl ArticleListQuery {
    fn filter(&self) -> Option<SqlFilter> {
        self.tag
            .as_ref()
            .map(|tag| Predicate::nothing().or(Clause::TagNamed(tag.clone())).to_sql())
    }
}

/// Repository interface for article operations.
pub trait ArticleRepository {
    /// Inserts a validated draft and returns the new stable id.
    fn create_article(&self, draft: &ArticleDraft) -> RepoResult<ArticleId>;
    /// Replaces title/body/author and bumps `updated_at`.
    fn update_article(&self, article_id: ArticleId, draft: &ArticleDraft) -> RepoResult<()>;
    fn get_article(&self, article_id: ArticleId) -> RepoResult<Option<Article>>;
    /// Hard-deletes one article together with its comments.
    fn delete_article(&self, article_id: ArticleId) -> RepoResult<()>;
    /// Replaces all tag links of one article in one transaction.
    fn set_article_tags(&self, article_id: ArticleId, tag_ids: &[TagId]) -> RepoResult<()>;
    /// Runs `op` in one IMMEDIATE transaction. An error from `op` rolls back
    /// every write it made through the same connection.
    fn write_atomically<R, F>(&self, op: F) -> RepoResult<R>
    where
        F: FnOnce() -> RepoResult<R>;
    fn count_articles(&self, query: &ArticleListQuery) -> RepoResult<u64>;
    fn list_articles(&self, query: &ArticleListQuery) -> RepoResult<Vec<Article>>;
    /// Returns articles matching the predicate; an empty predicate yields none.
    fn search_articles(&self, predicate: &Predicate) -> RepoResult<Vec<Article>>;
}

/// SQLite-backed article repository.
pub struct SqliteArticleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArticleRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn, REQUIRED_SCHEMA)?;
        Ok(Self { conn })
    }

    fn query_articles(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Article>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut articles = Vec::new();
        while let Some(row) = rows.next()? {
            articles.push(parse_article_row(self.conn, row)?);
        }
        Ok(articles)
    }
}

impl ArticleRepository for SqliteArticleRepository<'_> {
    fn create_article(&self, draft: &ArticleDraft) -> RepoResult<ArticleId> {
        draft.validate()?;

        let article_id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO articles (uuid, title, body, author) VALUES (?1, ?2, ?3, ?4);",
            params![
                article_id.to_string(),
                draft.title.as_str(),
                draft.body.as_str(),
                draft.author.as_str(),
            ],
        )?;

        Ok(article_id)
    }

    fn update_article(&self, article_id: ArticleId, draft: &ArticleDraft) -> RepoResult<()> {
        draft.validate()?;

        let changed = self.conn.execute(
            "UPDATE articles
             SET
                title = ?2,
                body = ?3,
                author = ?4,
                updated_at = CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)
             WHERE uuid = ?1;",
            params![
                article_id.to_string(),
                draft.title.as_str(),
                draft.body.as_str(),
                draft.author.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(article_id));
        }

        Ok(())
    }

    fn get_article(&self, article_id: ArticleId) -> RepoResult<Option<Article>> {
        let mut articles = self.query_articles(
            &format!("{ARTICLE_SELECT_SQL} WHERE uuid = ?;"),
            vec![Value::Text(article_id.to_string())],
        )?;
        Ok(articles.pop())
    }

    fn delete_article(&self, article_id: ArticleId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM articles WHERE uuid = ?1;",
            [article_id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(article_id));
        }

        Ok(())
    }

    fn set_article_tags(&self, article_id: ArticleId, tag_ids: &[TagId]) -> RepoResult<()> {
        self.write_atomically(|| replace_article_tags(self.conn, article_id, tag_ids))
    }

    fn write_atomically<R, F>(&self, op: F) -> RepoResult<R>
    where
        F: FnOnce() -> RepoResult<R>,
    {
        if !self.conn.is_autocommit() {
            return op();
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let value = op()?;
        tx.commit()?;
        Ok(value)
    }

    fn count_articles(&self, query: &ArticleListQuery) -> RepoResult<u64> {
        let mut sql = String::from("SELECT COUNT(*) FROM articles");
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(filter) = query.filter() {
            sql.push_str(" WHERE ");
            sql.push_str(&filter.sql);
            bind_values.extend(filter.params);
        }

        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(bind_values), |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative article count {count}")))
    }

    fn list_articles(&self, query: &ArticleListQuery) -> RepoResult<Vec<Article>> {
        let mut sql = String::from(ARTICLE_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(filter) = query.filter() {
            sql.push_str(" WHERE ");
            sql.push_str(&filter.sql);
            bind_values.extend(filter.params);
        }

        sql.push_str(ARTICLE_ORDER_SQL);

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        self.query_articles(&sql, bind_values)
    }

    fn search_articles(&self, predicate: &Predicate) -> RepoResult<Vec<Article>> {
        let filter = predicate.to_sql();
        let sql = format!("{ARTICLE_SELECT_SQL} WHERE {}{ARTICLE_ORDER_SQL};", filter.sql);
        self.query_articles(&sql, filter.params)
    }
}

fn parse_article_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Article> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "articles.uuid")?;
    let tags = load_tags_for_article(conn, &uuid_text)?;
    Ok(Article {
        uuid,
        title: row.get("title")?,
        body: row.get("body")?,
        author: row.get("author")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        tags,
    })
}

fn replace_article_tags(
    conn: &Connection,
    article_id: ArticleId,
    tag_ids: &[TagId],
) -> RepoResult<()> {
    let article_id_text = article_id.to_string();
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM articles WHERE uuid = ?1);",
        [article_id_text.as_str()],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::NotFound(article_id));
    }

    conn.execute(
        "DELETE FROM article_tags WHERE article_uuid = ?1;",
        [article_id_text.as_str()],
    )?;

    for tag_id in tag_ids {
        conn.execute(
            "INSERT OR IGNORE INTO article_tags (article_uuid, tag_id) VALUES (?1, ?2);",
            params![article_id_text.as_str(), tag_id],
        )?;
    }

    Ok(())
}

//! Comment use-case service.
//!
//! # Responsibility
//! - Post comments under existing articles.
//! - Serve an article's comments newest first, paginated.

use crate::model::article::ArticleId;
use crate::model::comment::{Comment, CommentDraft};
use crate::pagination::{Page, Paginator};
use crate::repo::comment_repo::CommentRepository;
use crate::repo::{RepoError, RepoResult};
use log::info;

pub const COMMENTS_PER_PAGE: u32 = 3;
pub const COMMENT_PAGE_ORPHANS: u32 = 0;

/// Comment service facade over repository implementations.
pub struct CommentService<C: CommentRepository> {
    repo: C,
    per_page: u32,
    orphans: u32,
}

impl<C: CommentRepository> CommentService<C> {
    pub fn new(repo: C) -> Self {
        Self::with_paging(repo, COMMENTS_PER_PAGE, COMMENT_PAGE_ORPHANS)
    }

    pub fn with_paging(repo: C, per_page: u32, orphans: u32) -> Self {
        Self {
            repo,
            per_page,
            orphans,
        }
    }

    /// Adds a comment and returns it as stored.
    ///
    /// Fails with `RepoError::NotFound` when the article does not exist.
    pub fn add_comment(&self, article_id: ArticleId, draft: &CommentDraft) -> RepoResult<Comment> {
        let comment_id = self.repo.create_comment(article_id, draft)?;
        info!("event=comment_added module=service status=ok");
        self.repo.get_comment(comment_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("comment {comment_id} missing after insert"))
        })
    }

    /// Returns one page of comments; `page` is parsed leniently.
    pub fn list_comments(
        &self,
        article_id: ArticleId,
        page: Option<&str>,
    ) -> RepoResult<Page<Comment>> {
        let paginator = Paginator::new(
            self.repo.count_comments(article_id)?,
            self.per_page,
            self.orphans,
        );
        let number = paginator.lenient_number(page);
        let window = paginator
            .window(number)
            .map_err(|err| RepoError::InvalidData(err.to_string()))?;
        let items = self
            .repo
            .list_comments(article_id, window.limit, window.offset)?;
        Ok(Page::new(items, window.number, paginator))
    }
}

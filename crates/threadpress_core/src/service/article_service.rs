//! Article use-case service.
//!
//! # Responsibility
//! - Create/update/delete articles with their tag sets.
//! - Serve the paginated index, optionally filtered by one tag.
//! - Serve an article detail view with its first or requested comment page.
//!
//! # Invariants
//! - Saving an article replaces its tag set wholesale with the resolved input.
//! - The article row and its tag set are written in one transaction; a
//!   failed save leaves neither behind.
//! - Tags survive article deletion and tag-set replacement.
//! - An empty tag filter lists every article.

use crate::model::article::{Article, ArticleDraft, ArticleId};
use crate::model::comment::Comment;
use crate::model::tag::Tag;
use crate::pagination::{Page, Paginator};
use crate::repo::article_repo::{ArticleListQuery, ArticleRepository};
use crate::repo::comment_repo::CommentRepository;
use crate::repo::tag_repo::TagRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::comment_service::CommentService;
use crate::service::tag_resolver::TagResolver;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const ARTICLES_PER_PAGE: u32 = 5;
pub const ARTICLE_PAGE_ORPHANS: u32 = 1;

/// Service error for article use-cases.
#[derive(Debug)]
pub enum ArticleServiceError {
    /// Target article does not exist.
    ArticleNotFound(ArticleId),
    /// Persistence-layer failure, including draft validation.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ArticleServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ArticleNotFound(id) => write!(f, "article not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent article state: {details}"),
        }
    }
}

impl Error for ArticleServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ArticleServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ArticleNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Paging settings for the article index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArticlePaging {
    pub per_page: u32,
    pub orphans: u32,
}

impl Default for ArticlePaging {
    fn default() -> Self {
        Self {
            per_page: ARTICLES_PER_PAGE,
            orphans: ARTICLE_PAGE_ORPHANS,
        }
    }
}

/// One article with a page of its comments, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDetail {
    pub article: Article,
    pub comments: Page<Comment>,
}

/// Article service facade over repository implementations.
pub struct ArticleService<A: ArticleRepository, T: TagRepository> {
    articles: A,
    tags: T,
    paging: ArticlePaging,
}

impl<A: ArticleRepository, T: TagRepository> ArticleService<A, T> {
    pub fn new(articles: A, tags: T) -> Self {
        Self::with_paging(articles, tags, ArticlePaging::default())
    }

    pub fn with_paging(articles: A, tags: T, paging: ArticlePaging) -> Self {
        Self {
            articles,
            tags,
            paging,
        }
    }

    /// Creates an article and attaches the tags named in `draft.tags`.
    pub fn create_article(&self, draft: &ArticleDraft) -> Result<Article, ArticleServiceError> {
        let (article_id, tag_count) = self.articles.write_atomically(|| {
            let article_id = self.articles.create_article(draft)?;
            let tag_count = self.replace_tags(article_id, &draft.tags)?;
            Ok((article_id, tag_count))
        })?;
        info!(
            "event=article_saved module=service status=ok op=create tag_count={tag_count}"
        );
        self.read_back(article_id, "created article not found in read-back")
    }

    /// Fully replaces article fields and its tag set.
    pub fn update_article(
        &self,
        article_id: ArticleId,
        draft: &ArticleDraft,
    ) -> Result<Article, ArticleServiceError> {
        let tag_count = self.articles.write_atomically(|| {
            self.articles.update_article(article_id, draft)?;
            self.replace_tags(article_id, &draft.tags)
        })?;
        info!(
            "event=article_saved module=service status=ok op=update tag_count={tag_count}"
        );
        self.read_back(article_id, "updated article not found in read-back")
    }

    /// Prefills an edit draft from the stored article.
    pub fn edit_draft(&self, article_id: ArticleId) -> Result<ArticleDraft, ArticleServiceError> {
        let article = self
            .articles
            .get_article(article_id)?
            .ok_or(ArticleServiceError::ArticleNotFound(article_id))?;
        Ok(ArticleDraft {
            tags: article.tag_input(),
            title: article.title,
            body: article.body,
            author: article.author,
        })
    }

    pub fn get_article(&self, article_id: ArticleId) -> RepoResult<Option<Article>> {
        self.articles.get_article(article_id)
    }

    /// Loads the detail view. `page` selects the comment page leniently.
    pub fn detail<C: CommentRepository>(
        &self,
        comments: &CommentService<C>,
        article_id: ArticleId,
        page: Option<&str>,
    ) -> Result<ArticleDetail, ArticleServiceError> {
        let article = self
            .articles
            .get_article(article_id)?
            .ok_or(ArticleServiceError::ArticleNotFound(article_id))?;
        let comments = comments.list_comments(article_id, page)?;
        Ok(ArticleDetail { article, comments })
    }

    /// Deletes an article; its comments go with it, tags stay.
    pub fn delete_article(&self, article_id: ArticleId) -> Result<(), ArticleServiceError> {
        self.articles.delete_article(article_id)?;
        info!("event=article_deleted module=service status=ok");
        Ok(())
    }

    /// Lists one index page, newest first.
    ///
    /// A blank `tag` means no filter. `page` is parsed leniently.
    pub fn list_articles(
        &self,
        tag: Option<&str>,
        page: Option<&str>,
    ) -> Result<Page<Article>, ArticleServiceError> {
        let tag = tag
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        let count_query = ArticleListQuery {
            tag: tag.clone(),
            limit: None,
            offset: 0,
        };
        let paginator = Paginator::new(
            self.articles.count_articles(&count_query)?,
            self.paging.per_page,
            self.paging.orphans,
        );
        let number = paginator.lenient_number(page);
        let window = paginator
            .window(number)
            .map_err(|_| ArticleServiceError::InconsistentState("lenient page out of range"))?;
        let items = self.articles.list_articles(&ArticleListQuery {
            tag,
            limit: Some(window.limit),
            offset: window.offset,
        })?;
        Ok(Page::new(items, window.number, paginator))
    }

    pub fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        self.tags.list_tags()
    }

    fn replace_tags(&self, article_id: ArticleId, raw: &str) -> RepoResult<usize> {
        let tags = TagResolver::new(&self.tags).resolve_tags(raw)?;
        let tag_ids = tags.iter().map(|tag| tag.id).collect::<Vec<_>>();
        self.articles.set_article_tags(article_id, &tag_ids)?;
        Ok(tag_ids.len())
    }

    fn read_back(
        &self,
        article_id: ArticleId,
        details: &'static str,
    ) -> Result<Article, ArticleServiceError> {
        self.articles
            .get_article(article_id)?
            .ok_or(ArticleServiceError::InconsistentState(details))
    }
}

//! Search use-case service.
//!
//! # Responsibility
//! - Run the validate -> build predicate -> execute pipeline.
//!
//! # Invariants
//! - Validation failures stop the pipeline before any query is built.
//! - Logs carry clause and hit counts only, never the query text.

use crate::model::article::Article;
use crate::repo::article_repo::ArticleRepository;
use crate::repo::RepoError;
use crate::search::criteria::{ScopeDefaults, SearchCriteria, SearchForm, SearchValidationError};
use crate::search::predicate::build_predicate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for search use-cases.
#[derive(Debug)]
pub enum SearchServiceError {
    /// User-correctable input problem; redisplay the form with this message.
    Invalid(SearchValidationError),
    Repo(RepoError),
}

impl Display for SearchServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SearchServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<SearchValidationError> for SearchServiceError {
    fn from(value: SearchValidationError) -> Self {
        Self::Invalid(value)
    }
}

impl From<RepoError> for SearchServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Search service facade over an article repository.
pub struct SearchService<A: ArticleRepository> {
    repo: A,
    defaults: ScopeDefaults,
}

impl<A: ArticleRepository> SearchService<A> {
    pub fn new(repo: A, defaults: ScopeDefaults) -> Self {
        Self { repo, defaults }
    }

    pub fn defaults(&self) -> ScopeDefaults {
        self.defaults
    }

    /// Validates raw form input with this service's defaults, then searches.
    pub fn search_form(&self, form: &SearchForm) -> Result<Vec<Article>, SearchServiceError> {
        let criteria = form.validate(self.defaults).inspect_err(|err| {
            warn!("event=search_rejected module=search status=invalid reason={}", err.code());
        })?;
        self.search(&criteria)
    }

    /// Searches with already-typed criteria; the cross-field rules are
    /// re-checked before any predicate is built.
    pub fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Article>, SearchServiceError> {
        criteria.check().inspect_err(|err| {
            warn!("event=search_rejected module=search status=invalid reason={}", err.code());
        })?;

        let started_at = Instant::now();
        let predicate = build_predicate(criteria);
        let articles = self.repo.search_articles(&predicate)?;
        info!(
            "event=search_executed module=search status=ok clause_count={} hit_count={} duration_ms={}",
            predicate.clauses().len(),
            articles.len(),
            started_at.elapsed().as_millis()
        );
        Ok(articles)
    }
}

//! Core domain logic for the threadpress content site.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod pagination;
pub mod repo;
pub mod search;
pub mod service;

pub use config::{ConfigError, SiteConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::article::{Article, ArticleDraft, ArticleId};
pub use model::comment::{Comment, CommentDraft, CommentId};
pub use model::tag::{Tag, TagId};
pub use model::{FieldErrorKind, ModelValidationError};
pub use pagination::{Page, PageError, PageWindow, Paginator};
pub use repo::article_repo::{ArticleListQuery, ArticleRepository, SqliteArticleRepository};
pub use repo::comment_repo::{CommentRepository, SqliteCommentRepository};
pub use repo::tag_repo::{SqliteTagRepository, TagRepository};
pub use repo::{RepoError, RepoResult};
pub use search::criteria::{
    ScopeDefaults, SearchCriteria, SearchDefaultsProfile, SearchForm, SearchValidationError,
};
pub use search::predicate::{build_predicate, Clause, Predicate, SqlFilter};
pub use service::article_service::{
    ArticleDetail, ArticlePaging, ArticleService, ArticleServiceError,
};
pub use service::comment_service::CommentService;
pub use service::search_service::{SearchService, SearchServiceError};
pub use service::tag_resolver::{split_tag_input, TagResolver};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

//! Site configuration.
//!
//! # Responsibility
//! - Hold deployment settings: database path, logging, paging, search defaults.
//! - Load overrides from `THREADPRESS_*` environment variables.
//!
//! # Invariants
//! - Every setting has a usable default.
//! - Invalid override values are rejected, never silently ignored.

use crate::logging::default_log_level;
use crate::repo::comment_repo::CommentRepository;
use crate::search::criteria::SearchDefaultsProfile;
use crate::service::article_service::{ArticlePaging, ARTICLES_PER_PAGE, ARTICLE_PAGE_ORPHANS};
use crate::service::comment_service::{CommentService, COMMENTS_PER_PAGE, COMMENT_PAGE_ORPHANS};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "THREADPRESS_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "THREADPRESS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "THREADPRESS_LOG_DIR";
pub const ENV_SEARCH_DEFAULTS: &str = "THREADPRESS_SEARCH_DEFAULTS";
pub const ENV_ARTICLES_PER_PAGE: &str = "THREADPRESS_ARTICLES_PER_PAGE";
pub const ENV_COMMENTS_PER_PAGE: &str = "THREADPRESS_COMMENTS_PER_PAGE";

const DEFAULT_DB_FILE_NAME: &str = "threadpress.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => write!(f, "invalid value `{value}` for {key}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute log directory; logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
    pub search_defaults: SearchDefaultsProfile,
    pub articles_per_page: u32,
    pub article_orphans: u32,
    pub comments_per_page: u32,
    pub comment_orphans: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            search_defaults: SearchDefaultsProfile::default(),
            articles_per_page: ARTICLES_PER_PAGE,
            article_orphans: ARTICLE_PAGE_ORPHANS,
            comments_per_page: COMMENTS_PER_PAGE,
            comment_orphans: COMMENT_PAGE_ORPHANS,
        }
    }
}

impl SiteConfig {
    pub fn article_paging(&self) -> ArticlePaging {
        ArticlePaging {
            per_page: self.articles_per_page,
            orphans: self.article_orphans,
        }
    }

    /// Builds a comment service paged the way this site is configured.
    pub fn comment_service<C: CommentRepository>(&self, repo: C) -> CommentService<C> {
        CommentService::with_paging(repo, self.comments_per_page, self.comment_orphans)
    }

    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = get(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = get(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(profile) = get(ENV_SEARCH_DEFAULTS) {
            config.search_defaults = SearchDefaultsProfile::parse(&profile).ok_or(
                ConfigError::InvalidValue {
                    key: ENV_SEARCH_DEFAULTS,
                    value: profile,
                },
            )?;
        }
        if let Some(value) = get(ENV_ARTICLES_PER_PAGE) {
            config.articles_per_page = parse_page_size(ENV_ARTICLES_PER_PAGE, value)?;
        }
        if let Some(value) = get(ENV_COMMENTS_PER_PAGE) {
            config.comments_per_page = parse_page_size(ENV_COMMENTS_PER_PAGE, value)?;
        }

        Ok(config)
    }
}

fn parse_page_size(key: &'static str, value: String) -> Result<u32, ConfigError> {
    match value.parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::InvalidValue { key, value }),
    }
}

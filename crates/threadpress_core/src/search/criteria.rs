//! Search form parsing and cross-field validation.
//!
//! # Responsibility
//! - Map raw key/value request parameters onto [`SearchForm`].
//! - Turn a form into [`SearchCriteria`] using an explicit default set.
//! - Reject requests with no target, or a target without any scope.
//!
//! # Invariants
//! - Rules are checked in order and the first violation is returned:
//!   target present, text scope present, author scope present.
//! - `text`/`author` are trimmed and otherwise kept verbatim.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum length of the free-text and author search fields.
pub const SEARCH_FIELD_MAX_CHARS: usize = 100;

/// Per-deployment defaults for scope flags absent from the request.
///
/// Two sets exist and are deliberately kept apart; see [`SearchDefaultsProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeDefaults {
    pub in_title: bool,
    pub in_text: bool,
    pub in_tags: bool,
    pub in_comment_text: bool,
    pub in_articles: bool,
    pub in_comments: bool,
}

impl ScopeDefaults {
    /// Article fields and article author only.
    pub const STANDARD: Self = Self {
        in_title: true,
        in_text: true,
        in_tags: true,
        in_comment_text: false,
        in_articles: true,
        in_comments: false,
    };

    /// Also looks into comment text and comment authors.
    pub const WITH_COMMENTS: Self = Self {
        in_title: true,
        in_text: true,
        in_tags: true,
        in_comment_text: true,
        in_articles: true,
        in_comments: true,
    };
}

impl Default for ScopeDefaults {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Named selector for [`ScopeDefaults`], used by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDefaultsProfile {
    #[default]
    Standard,
    WithComments,
}

impl SearchDefaultsProfile {
    pub fn defaults(self) -> ScopeDefaults {
        match self {
            Self::Standard => ScopeDefaults::STANDARD,
            Self::WithComments => ScopeDefaults::WITH_COMMENTS,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "with_comments" => Some(Self::WithComments),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::WithComments => "with_comments",
        }
    }
}

/// Validated search request. Constructed per request, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Free-text query; empty means "no text target".
    pub text: String,
    /// Author query; empty means "no author target".
    pub author: String,
    pub in_title: bool,
    pub in_text: bool,
    pub in_tags: bool,
    pub in_comment_text: bool,
    pub in_articles: bool,
    pub in_comments: bool,
}

impl SearchCriteria {
    /// Empty criteria with every scope taken from `defaults`.
    pub fn with_defaults(defaults: ScopeDefaults) -> Self {
        Self {
            text: String::new(),
            author: String::new(),
            in_title: defaults.in_title,
            in_text: defaults.in_text,
            in_tags: defaults.in_tags,
            in_comment_text: defaults.in_comment_text,
            in_articles: defaults.in_articles,
            in_comments: defaults.in_comments,
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn has_author(&self) -> bool {
        !self.author.is_empty()
    }

    fn has_text_scope(&self) -> bool {
        self.in_title || self.in_text || self.in_tags || self.in_comment_text
    }

    fn has_author_scope(&self) -> bool {
        self.in_articles || self.in_comments
    }

    /// Enforces the cross-field rules, failing on the first violation.
    pub fn check(&self) -> Result<(), SearchValidationError> {
        if !self.has_text() && !self.has_author() {
            return Err(SearchValidationError::NoSearchTarget);
        }
        if self.has_text() && !self.has_text_scope() {
            return Err(SearchValidationError::NoTextScope);
        }
        if self.has_author() && !self.has_author_scope() {
            return Err(SearchValidationError::NoAuthorScope);
        }
        Ok(())
    }

    /// Returns every violated rule instead of only the first one.
    pub fn violations(&self) -> Vec<SearchValidationError> {
        let mut violations = Vec::new();
        if !self.has_text() && !self.has_author() {
            violations.push(SearchValidationError::NoSearchTarget);
        }
        if self.has_text() && !self.has_text_scope() {
            violations.push(SearchValidationError::NoTextScope);
        }
        if self.has_author() && !self.has_author_scope() {
            violations.push(SearchValidationError::NoAuthorScope);
        }
        violations
    }
}

/// User-correctable search input error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchValidationError {
    /// Both text and author are empty.
    NoSearchTarget,
    /// Text given but no text scope selected.
    NoTextScope,
    /// Author given but neither articles nor comments selected.
    NoAuthorScope,
    /// Boolean parameter has an unrecognized value.
    InvalidFlag { field: &'static str, value: String },
    TooLong {
        field: &'static str,
        max_chars: usize,
    },
}

impl SearchValidationError {
    /// Stable machine-readable code, safe to log.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoSearchTarget => "no_search_target",
            Self::NoTextScope => "no_text_scope",
            Self::NoAuthorScope => "no_author_scope",
            Self::InvalidFlag { .. } => "invalid_flag",
            Self::TooLong { .. } => "too_long",
        }
    }
}

impl Display for SearchValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSearchTarget => write!(f, "enter search text or an author"),
            Self::NoTextScope => write!(
                f,
                "select where to look for the text: title, body, tags or comment text"
            ),
            Self::NoAuthorScope => {
                write!(f, "select where to look for the author: articles or comments")
            }
            Self::InvalidFlag { field, value } => {
                write!(f, "invalid value `{value}` for `{field}`")
            }
            Self::TooLong { field, max_chars } => {
                write!(f, "`{field}` must be at most {max_chars} characters")
            }
        }
    }
}

impl Error for SearchValidationError {}

/// Raw search parameters as delivered by the request layer.
///
/// Absent values stay `None` so that defaults can be applied at validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub text: Option<String>,
    pub author: Option<String>,
    pub in_title: Option<String>,
    pub in_text: Option<String>,
    pub in_tags: Option<String>,
    pub in_comment_text: Option<String>,
    pub in_articles: Option<String>,
    pub in_comments: Option<String>,
}

impl SearchForm {
    /// Collects known keys from key/value pairs; unknown keys are ignored
    /// and a repeated key keeps its last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "text" => &mut form.text,
                "author" => &mut form.author,
                "in_title" => &mut form.in_title,
                "in_text" => &mut form.in_text,
                "in_tags" => &mut form.in_tags,
                "in_comment_text" => &mut form.in_comment_text,
                "in_articles" => &mut form.in_articles,
                "in_comments" => &mut form.in_comments,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        form
    }

    /// Parses the form and enforces the search rules.
    ///
    /// # Errors
    /// - `InvalidFlag`/`TooLong` for malformed fields.
    /// - `NoSearchTarget`, `NoTextScope`, `NoAuthorScope` in that order.
    pub fn validate(&self, defaults: ScopeDefaults) -> Result<SearchCriteria, SearchValidationError> {
        let criteria = self.parse(defaults)?;
        criteria.check()?;
        Ok(criteria)
    }

    /// Parses fields without applying the cross-field rules.
    pub fn parse(&self, defaults: ScopeDefaults) -> Result<SearchCriteria, SearchValidationError> {
        Ok(SearchCriteria {
            text: parse_query_field("text", self.text.as_deref())?,
            author: parse_query_field("author", self.author.as_deref())?,
            in_title: parse_flag("in_title", self.in_title.as_deref(), defaults.in_title)?,
            in_text: parse_flag("in_text", self.in_text.as_deref(), defaults.in_text)?,
            in_tags: parse_flag("in_tags", self.in_tags.as_deref(), defaults.in_tags)?,
            in_comment_text: parse_flag(
                "in_comment_text",
                self.in_comment_text.as_deref(),
                defaults.in_comment_text,
            )?,
            in_articles: parse_flag(
                "in_articles",
                self.in_articles.as_deref(),
                defaults.in_articles,
            )?,
            in_comments: parse_flag(
                "in_comments",
                self.in_comments.as_deref(),
                defaults.in_comments,
            )?,
        })
    }
}

fn parse_query_field(field: &'static str, raw: Option<&str>) -> Result<String, SearchValidationError> {
    let value = raw.unwrap_or_default().trim();
    if value.chars().count() > SEARCH_FIELD_MAX_CHARS {
        return Err(SearchValidationError::TooLong {
            field,
            max_chars: SEARCH_FIELD_MAX_CHARS,
        });
    }
    Ok(value.to_string())
}

fn parse_flag(
    field: &'static str,
    raw: Option<&str>,
    default: bool,
) -> Result<bool, SearchValidationError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" | "" => Ok(false),
        _ => Err(SearchValidationError::InvalidFlag {
            field,
            value: raw.to_string(),
        }),
    }
}

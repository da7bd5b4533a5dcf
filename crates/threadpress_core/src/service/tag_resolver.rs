//! Comma-separated tag input resolution.
//!
//! # Responsibility
//! - Split raw tag input into tag names.
//! - Map each name to a persisted tag, creating missing ones.
//!
//! # Invariants
//! - Empty fragments (leading, trailing or doubled commas) never become tags.
//! - Any other fragment is a legal name and is kept verbatim, spaces included.
//! - Resolution is idempotent: the same input yields the same tag ids and
//!   never creates a second row for a name.
//! - Names are kept case-sensitive; `Rust` and `rust` are distinct tags.

use crate::model::tag::Tag;
use crate::repo::tag_repo::TagRepository;
use crate::repo::RepoResult;

/// Splits raw input on commas, dropping empty fragments and repeated names
/// (first occurrence wins).
pub fn split_tag_input(raw: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for fragment in raw.split(',') {
        if fragment.is_empty() || names.iter().any(|name| name == fragment) {
            continue;
        }
        names.push(fragment.to_string());
    }
    names
}

/// Resolves raw tag input against a tag repository.
pub struct TagResolver<'r, T: TagRepository> {
    repo: &'r T,
}

impl<'r, T: TagRepository> TagResolver<'r, T> {
    pub fn new(repo: &'r T) -> Self {
        Self { repo }
    }

    /// Returns one persisted tag per distinct name in `raw`, in input order.
    ///
    /// # Side effects
    /// - Creates tag rows for names that do not exist yet.
    pub fn resolve_tags(&self, raw: &str) -> RepoResult<Vec<Tag>> {
        let mut tags = Vec::new();
        for name in split_tag_input(raw) {
            let tag = match self.repo.find_by_name(&name)? {
                Some(tag) => tag,
                None => self.repo.create_or_fetch(&name)?,
            };
            tags.push(tag);
        }
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::split_tag_input;

    #[test]
    fn split_drops_empty_fragments() {
        assert_eq!(split_tag_input(",a,,b,"), vec!["a", "b"]);
        assert!(split_tag_input("").is_empty());
        assert!(split_tag_input(",,,").is_empty());
    }

    #[test]
    fn split_keeps_whitespace_fragments_verbatim() {
        assert_eq!(split_tag_input("a, b, "), vec!["a", " b", " "]);
        assert_eq!(split_tag_input(" , ,"), vec![" "]);
    }

    #[test]
    fn split_deduplicates_but_keeps_case() {
        assert_eq!(
            split_tag_input("rust,Rust,rust"),
            vec!["rust".to_string(), "Rust".to_string()]
        );
    }

    #[test]
    fn split_keeps_inner_spaces() {
        assert_eq!(split_tag_input("web dev,db"), vec!["web dev", "db"]);
    }
}

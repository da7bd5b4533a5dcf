//! Tag domain model.

use serde::{Deserialize, Serialize};

/// Storage-assigned tag identifier.
pub type TagId = i64;

/// Shared label attached to many articles.
///
/// `name` is the identity key: lookups and creation are exact and
/// case-sensitive, so `Rust` and `rust` are two tags.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

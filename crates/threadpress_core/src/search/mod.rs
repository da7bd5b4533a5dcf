//! Multi-scope article search.
//!
//! # Responsibility
//! - Parse raw search parameters into typed, validated criteria.
//! - Assemble one OR-combined predicate over articles and their related
//!   tags and comments.
//!
//! # Invariants
//! - Invalid criteria never reach predicate construction.
//! - A predicate without clauses matches no article.

pub mod criteria;
pub mod predicate;

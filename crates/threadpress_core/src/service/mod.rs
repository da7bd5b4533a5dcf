//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep CLI/request layers decoupled from storage details.

pub mod article_service;
pub mod comment_service;
pub mod search_service;
pub mod tag_resolver;

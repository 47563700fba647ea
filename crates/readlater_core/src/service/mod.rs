//! Use-case services over repositories and the rule engine.
//!
//! # Responsibility
//! - Orchestrate repository calls and classification into use-case APIs.
//! - Own the mapping from undecided classifications to the stored default tag.

pub mod article_service;
pub mod rule_service;

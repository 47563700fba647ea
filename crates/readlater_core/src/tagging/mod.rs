//! Rule-based auto-tagging and tagging analytics.
//!
//! # Responsibility
//! - Classify articles into `work`/`personal` from domain and keyword rules.
//! - Mine the tagged history for new domain rule suggestions.
//!
//! # Invariants
//! - Classification and analytics are total and perform no I/O.
//! - Rule sets are append-only for the lifetime of a [`engine::RuleEngine`].

pub mod analytics;
pub mod domain;
pub mod engine;
pub mod rules;

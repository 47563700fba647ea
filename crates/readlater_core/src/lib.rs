//! Core domain logic for the read-later tagging engine.
//! This crate is the single source of truth for tagging invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod tagging;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::article::{
    is_untagged_tag, normalize_tag, Article, ArticleId, ArticleState, ArticleValidationError,
    DEFAULT_TAG,
};
pub use repo::article_repo::{
    ArticleListQuery, ArticleRepository, RepoError, RepoResult, SqliteArticleRepository,
};
pub use repo::rule_repo::{LearnedRule, RuleRepository, SqliteRuleRepository};
pub use service::article_service::{
    ArticleService, ArticleServiceError, NewArticle, RetagSummary, SavedArticle,
};
pub use service::rule_service::{RuleService, RuleServiceError};
pub use tagging::analytics::{generate_analytics, Suggestion, TaggingStats};
pub use tagging::domain::extract_domain;
pub use tagging::engine::{ClassificationResult, Confidence, RuleEngine};
pub use tagging::rules::{
    load_rules_file, CategoryRules, RuleKind, RulesConfigError, TagCategory, TaggingRules,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

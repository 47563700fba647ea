//! Rule management use-cases.
//!
//! # Responsibility
//! - Replay persisted learned rules into a freshly built engine.
//! - Validate, persist and apply new rules and accepted suggestions.
//!
//! # Invariants
//! - A rule is persisted before the engine sees it, so a failed write never
//!   leaves the in-memory rules ahead of storage.
//! - Built-in rules are never written to storage.

use crate::repo::article_repo::RepoError;
use crate::repo::rule_repo::{LearnedRule, RuleRepository};
use crate::tagging::analytics::Suggestion;
use crate::tagging::engine::RuleEngine;
use crate::tagging::rules::{RuleKind, TagCategory, TaggingRules};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Service error for rule use-cases.
#[derive(Debug)]
pub enum RuleServiceError {
    /// Rule value is blank after trimming.
    InvalidRuleValue(String),
    Repo(RepoError),
}

impl Display for RuleServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRuleValue(value) => write!(f, "invalid rule value: `{value}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RuleServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::InvalidRuleValue(_) => None,
        }
    }
}

impl From<RepoError> for RuleServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Rule service facade over a rule store and a shared engine.
pub struct RuleService<R: RuleRepository> {
    repo: R,
    engine: Arc<RuleEngine>,
}

impl<R: RuleRepository> RuleService<R> {
    pub fn new(repo: R, engine: Arc<RuleEngine>) -> Self {
        Self { repo, engine }
    }

    /// Appends every stored learned rule to the engine, in insertion order.
    ///
    /// Call once per engine; replaying twice duplicates patterns, which does
    /// not change classification.
    pub fn load_persisted_rules(&self) -> Result<usize, RuleServiceError> {
        let rules = self.repo.list_rules()?;
        for rule in &rules {
            self.engine
                .add_rule(rule.kind, rule.category, rule.value.clone());
        }
        info!(
            "event=rules_replay module=service status=ok count={}",
            rules.len()
        );
        Ok(rules.len())
    }

    /// Validates, persists and applies one rule.
    pub fn add_rule(
        &self,
        kind: RuleKind,
        category: TagCategory,
        value: &str,
    ) -> Result<LearnedRule, RuleServiceError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(RuleServiceError::InvalidRuleValue(value.to_string()));
        }

        let rule = LearnedRule {
            kind,
            category,
            value: trimmed.to_string(),
        };
        if let Err(err) = self.repo.insert_rule(&rule) {
            error!(
                "event=rule_persist module=service status=error kind={} category={} error={}",
                kind, category, err
            );
            return Err(err.into());
        }
        self.engine.add_rule(kind, category, rule.value.clone());
        Ok(rule)
    }

    /// Turns an analytics suggestion into a permanent rule.
    pub fn apply_suggestion(&self, suggestion: &Suggestion) -> Result<LearnedRule, RuleServiceError> {
        self.add_rule(suggestion.kind, suggestion.category, suggestion.value.as_str())
    }

    /// Snapshot of the engine rules, built-in and learned.
    pub fn rules(&self) -> TaggingRules {
        self.engine.rules()
    }

    /// Rules stored since the first run.
    pub fn learned_rules(&self) -> Result<Vec<LearnedRule>, RuleServiceError> {
        Ok(self.repo.list_rules()?)
    }
}

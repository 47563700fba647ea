//! Rule engine for `work`/`personal` auto-tagging.
//!
//! # Responsibility
//! - Score domain and keyword evidence per category.
//! - Turn scores into a tag decision with a coarse confidence bucket.
//! - Accept new rules at runtime.
//!
//! # Invariants
//! - `classify` is total and deterministic for unchanged rule state.
//! - A domain match contributes exactly one point per category.
//! - Each distinct matching keyword contributes one point.
//! - Equal scores never produce a tag.
//! - Rule mutation is serialized through an internal `RwLock`, so one engine
//!   can be shared across request handlers behind an `Arc`.

use crate::model::article::Article;
use crate::tagging::domain::extract_domain;
use crate::tagging::rules::{CategoryRules, RuleKind, TagCategory, TaggingRules};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

/// Reason emitted when neither category has any evidence.
pub const NO_INDICATORS_REASON: &str = "No clear work or personal indicators found";
/// Reason emitted when both categories have the same non-zero score.
pub const EQUAL_INDICATORS_REASON: &str = "Equal work and personal indicators found";

const MAX_KEYWORDS_IN_REASON: usize = 3;
const HIGH_CONFIDENCE_SCORE: usize = 2;

/// Coarse strength of a classification decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Outcome of classifying one article.
///
/// `tag == None` means "no confident classification". Mapping that to a
/// persisted default tag is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub tag: Option<TagCategory>,
    pub confidence: Confidence,
    /// Human-readable evidence, e.g. `Domain: github.com`.
    pub reasons: Vec<String>,
}

impl ClassificationResult {
    fn undecided(reason: &str) -> Self {
        Self {
            tag: None,
            confidence: Confidence::Low,
            reasons: vec![reason.to_string()],
        }
    }
}

#[derive(Debug, Default)]
struct CategoryEvidence {
    domain_match: Option<String>,
    keywords: Vec<String>,
}

impl CategoryEvidence {
    fn collect(domain: &str, text: &str, rules: &CategoryRules) -> Self {
        let domain_match = if domain.is_empty() {
            None
        } else {
            rules
                .domains
                .iter()
                .find(|pattern| domain.contains(pattern.to_lowercase().as_str()))
                .cloned()
        };

        let mut seen = HashSet::new();
        let keywords = rules
            .keywords
            .iter()
            .filter(|keyword| {
                let lowered = keyword.to_lowercase();
                text.contains(lowered.as_str()) && seen.insert(lowered)
            })
            .cloned()
            .collect();

        Self {
            domain_match,
            keywords,
        }
    }

    fn score(&self) -> usize {
        usize::from(self.domain_match.is_some()) + self.keywords.len()
    }

    fn into_reasons(self) -> Vec<String> {
        let mut reasons = Vec::new();
        if let Some(pattern) = self.domain_match {
            reasons.push(format!("Domain: {pattern}"));
        }
        if !self.keywords.is_empty() {
            let shown = self
                .keywords
                .iter()
                .take(MAX_KEYWORDS_IN_REASON)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            reasons.push(format!("Keywords: {shown}"));
        }
        reasons
    }
}

/// Deterministic domain/keyword classifier with runtime-extensible rules.
#[derive(Debug)]
pub struct RuleEngine {
    rules: RwLock<TaggingRules>,
}

impl RuleEngine {
    /// Creates an engine from caller-provided initial rules.
    pub fn new(rules: TaggingRules) -> Self {
        Self {
            rules: RwLock::new(rules),
        }
    }

    /// Creates an engine with the built-in rule lists.
    pub fn with_default_rules() -> Self {
        Self::new(TaggingRules::default())
    }

    /// Classifies one article as `work`, `personal`, or undecided.
    ///
    /// Evidence comes from the hostname of `url` and from the lowercased
    /// `title` + `content` text. Annotations are not considered.
    pub fn classify(&self, article: &Article) -> ClassificationResult {
        let domain = article
            .url
            .as_deref()
            .map(extract_domain)
            .unwrap_or_default();
        let text = format!(
            "{} {}",
            article.title,
            article.content.as_deref().unwrap_or("")
        )
        .to_lowercase();

        let (work, personal) = {
            let rules = self.read_rules();
            (
                CategoryEvidence::collect(&domain, &text, &rules.work),
                CategoryEvidence::collect(&domain, &text, &rules.personal),
            )
        };

        let work_score = work.score();
        let personal_score = personal.score();
        let result = decide(work, work_score, personal, personal_score);

        debug!(
            "event=classify module=tagging status=ok tag={} confidence={} work_score={} personal_score={}",
            result.tag.map_or("none", TagCategory::as_str),
            result.confidence.as_str(),
            work_score,
            personal_score
        );
        result
    }

    /// Appends `value` to the `kind` list of `category`.
    ///
    /// No validation or duplicate check happens here; callers that accept
    /// user input validate before calling.
    pub fn add_rule(&self, kind: RuleKind, category: TagCategory, value: impl Into<String>) {
        let value = value.into();
        let mut rules = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        rules.category_mut(category).patterns_mut(kind).push(value);
        info!(
            "event=rule_add module=tagging status=ok kind={} category={}",
            kind, category
        );
    }

    /// Returns a snapshot of the current rules.
    pub fn rules(&self) -> TaggingRules {
        self.read_rules().clone()
    }

    /// Returns whether any domain rule of either category matches `domain`.
    pub fn knows_domain(&self, domain: &str) -> bool {
        let domain = domain.to_lowercase();
        let rules = self.read_rules();
        TagCategory::ALL.iter().any(|category| {
            rules
                .category(*category)
                .domains
                .iter()
                .any(|pattern| domain.contains(pattern.to_lowercase().as_str()))
        })
    }

    fn read_rules(&self) -> RwLockReadGuard<'_, TaggingRules> {
        // Rules are plain data; a panicked writer cannot leave them half-built.
        self.rules.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

fn decide(
    work: CategoryEvidence,
    work_score: usize,
    personal: CategoryEvidence,
    personal_score: usize,
) -> ClassificationResult {
    let (category, score, evidence) = if work_score > personal_score {
        (TagCategory::Work, work_score, work)
    } else if personal_score > work_score {
        (TagCategory::Personal, personal_score, personal)
    } else if work_score == 0 {
        return ClassificationResult::undecided(NO_INDICATORS_REASON);
    } else {
        return ClassificationResult::undecided(EQUAL_INDICATORS_REASON);
    };

    let confidence = if score >= HIGH_CONFIDENCE_SCORE {
        Confidence::High
    } else {
        Confidence::Medium
    };

    ClassificationResult {
        tag: Some(category),
        confidence,
        reasons: evidence.into_reasons(),
    }
}

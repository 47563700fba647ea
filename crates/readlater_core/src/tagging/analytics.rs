//! Tag distribution analytics and rule suggestion mining.
//!
//! # Responsibility
//! - Count stored records per tag bucket.
//! - Suggest new domain rules from consistent manual tagging history.
//!
//! # Invariants
//! - `work_count + personal_count + untagged_count == total_articles`.
//! - Domains already matched by an engine rule are never suggested.
//! - Suggestions are ordered by `count DESC, value ASC` and capped.
//! - Analytics never mutates engine state.

use crate::model::article::Article;
use crate::tagging::engine::RuleEngine;
use crate::tagging::rules::{RuleKind, TagCategory};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum decided records from one domain before it can be suggested.
pub const MIN_DOMAIN_EVIDENCE: usize = 3;
/// Maximum suggestions returned per analytics call.
pub const MAX_SUGGESTIONS: usize = 5;

// Dominant share threshold of 70%, kept as an integer ratio.
const PURITY_NUMERATOR: usize = 7;
const PURITY_DENOMINATOR: usize = 10;

/// Proposed rule inferred from tagging history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Stable id, e.g. `domain-news.ycombinator.com`.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RuleKind,
    pub category: TagCategory,
    pub value: String,
    /// Number of records supporting the suggested category.
    pub count: usize,
    pub description: String,
}

/// Aggregate tagging statistics for one record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggingStats {
    pub total_articles: usize,
    pub work_count: usize,
    pub personal_count: usize,
    /// Every record whose tag is neither `work` nor `personal`.
    pub untagged_count: usize,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Default, Clone, Copy)]
struct DomainTally {
    work: usize,
    personal: usize,
}

impl DomainTally {
    fn record(&mut self, category: TagCategory) {
        match category {
            TagCategory::Work => self.work += 1,
            TagCategory::Personal => self.personal += 1,
        }
    }

    fn total(self) -> usize {
        self.work + self.personal
    }

    fn dominant(self) -> (TagCategory, usize) {
        if self.work > self.personal {
            (TagCategory::Work, self.work)
        } else {
            (TagCategory::Personal, self.personal)
        }
    }
}

/// Computes tag counts and domain rule suggestions over `articles`.
pub fn generate_analytics(engine: &RuleEngine, articles: &[Article]) -> TaggingStats {
    let mut work_count = 0;
    let mut personal_count = 0;
    for article in articles {
        match TagCategory::from_tag(article.tag.as_str()) {
            Some(TagCategory::Work) => work_count += 1,
            Some(TagCategory::Personal) => personal_count += 1,
            None => {}
        }
    }

    let suggestions = suggest_domain_rules(engine, articles);
    let stats = TaggingStats {
        total_articles: articles.len(),
        work_count,
        personal_count,
        untagged_count: articles.len() - work_count - personal_count,
        suggestions,
    };

    info!(
        "event=analytics module=tagging status=ok total={} work={} personal={} untagged={} suggestions={}",
        stats.total_articles,
        stats.work_count,
        stats.personal_count,
        stats.untagged_count,
        stats.suggestions.len()
    );
    stats
}

/// Mines domains the engine does not know yet that were tagged consistently.
pub fn suggest_domain_rules(engine: &RuleEngine, articles: &[Article]) -> Vec<Suggestion> {
    let mut tallies: BTreeMap<String, DomainTally> = BTreeMap::new();
    for article in articles {
        let Some(category) = TagCategory::from_tag(article.tag.as_str()) else {
            continue;
        };
        let domain = article.effective_domain();
        if domain.is_empty() || engine.knows_domain(domain.as_str()) {
            continue;
        }
        tallies.entry(domain).or_default().record(category);
    }

    let mut suggestions = tallies
        .into_iter()
        .filter_map(|(domain, tally)| domain_suggestion(domain, tally))
        .collect::<Vec<_>>();
    suggestions.sort_by(|left, right| {
        right
            .count
            .cmp(&left.count)
            .then_with(|| left.value.cmp(&right.value))
    });
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

fn domain_suggestion(domain: String, tally: DomainTally) -> Option<Suggestion> {
    let total = tally.total();
    if total < MIN_DOMAIN_EVIDENCE {
        return None;
    }

    let (category, dominant) = tally.dominant();
    if dominant * PURITY_DENOMINATOR < total * PURITY_NUMERATOR {
        return None;
    }

    Some(Suggestion {
        id: format!("domain-{domain}"),
        kind: RuleKind::Domain,
        category,
        description: format!(
            "Add {domain} to {category} domains ({dominant}/{total} articles tagged as {category})"
        ),
        value: domain,
        count: dominant,
    })
}

#[cfg(test)]
mod tests {
    use super::{domain_suggestion, DomainTally};
    use crate::tagging::rules::TagCategory;

    #[test]
    fn purity_threshold_is_inclusive_at_seventy_percent() {
        let passing = domain_suggestion(
            "blog.example".to_string(),
            DomainTally {
                work: 7,
                personal: 3,
            },
        )
        .expect("7/10 should pass");
        assert_eq!(passing.category, TagCategory::Work);
        assert_eq!(passing.count, 7);
        assert_eq!(
            passing.description,
            "Add blog.example to work domains (7/10 articles tagged as work)"
        );

        let failing = domain_suggestion(
            "blog.example".to_string(),
            DomainTally {
                work: 2,
                personal: 1,
            },
        );
        assert!(failing.is_none(), "2/3 is below 70%");
    }

    #[test]
    fn minimum_evidence_is_three_records() {
        let tally = DomainTally {
            work: 0,
            personal: 2,
        };
        assert!(domain_suggestion("cook.example".to_string(), tally).is_none());
    }
}

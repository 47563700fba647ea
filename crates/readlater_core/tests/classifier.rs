use readlater_core::tagging::engine::{EQUAL_INDICATORS_REASON, NO_INDICATORS_REASON};
use readlater_core::{
    Article, CategoryRules, Confidence, RuleEngine, RuleKind, TagCategory, TaggingRules,
};
use std::sync::Arc;
use std::thread;

fn category(domains: &[&str], keywords: &[&str]) -> CategoryRules {
    CategoryRules {
        domains: domains.iter().map(|value| value.to_string()).collect(),
        keywords: keywords.iter().map(|value| value.to_string()).collect(),
    }
}

fn engine_with(work: CategoryRules, personal: CategoryRules) -> RuleEngine {
    RuleEngine::new(TaggingRules { work, personal })
}

fn crossover_engine() -> RuleEngine {
    engine_with(
        category(&["github.com"], &["compiler"]),
        category(&["allrecipes.com"], &["soup", "bread"]),
    )
}

#[test]
fn empty_input_is_undecided_with_low_confidence() {
    let engine = RuleEngine::with_default_rules();
    let result = engine.classify(&Article::from_url("", ""));

    assert_eq!(result.tag, None);
    assert_eq!(result.confidence, Confidence::Low);
    assert_eq!(result.reasons, vec![NO_INDICATORS_REASON.to_string()]);
}

#[test]
fn work_domain_with_keywords_is_high_confidence() {
    let engine = RuleEngine::with_default_rules();
    let article = Article::from_url("https://techcrunch.com/x", "AI Startup Raises Funding")
        .with_content("machine learning startup growth");

    let result = engine.classify(&article);

    assert_eq!(result.tag, Some(TagCategory::Work));
    assert_eq!(result.confidence, Confidence::High);
    assert_eq!(
        result.reasons,
        vec![
            "Domain: techcrunch.com".to_string(),
            "Keywords: ai, machine learning, startup".to_string(),
        ]
    );
}

#[test]
fn classification_is_deterministic() {
    let engine = RuleEngine::with_default_rules();
    let article = Article::from_url(
        "https://medium.com/food-blog/recipe",
        "Cooking Tips for Developers",
    )
    .with_content("How to cook healthy meals while working in tech.");

    let first = engine.classify(&article);
    for _ in 0..10 {
        assert_eq!(engine.classify(&article), first);
    }
}

#[test]
fn work_domain_alone_ties_with_one_personal_keyword() {
    let engine = crossover_engine();
    let article = Article::from_url("https://github.com/x/y", "Soup notes");

    let result = engine.classify(&article);

    assert_eq!(result.tag, None);
    assert_eq!(result.confidence, Confidence::Low);
    assert_eq!(result.reasons, vec![EQUAL_INDICATORS_REASON.to_string()]);
}

#[test]
fn two_personal_keywords_outweigh_a_work_domain() {
    let engine = crossover_engine();
    let article = Article::from_url("https://github.com/x/y", "Soup and bread");

    let result = engine.classify(&article);

    assert_eq!(result.tag, Some(TagCategory::Personal));
    assert_eq!(result.confidence, Confidence::High);
    assert_eq!(result.reasons, vec!["Keywords: soup, bread".to_string()]);
}

#[test]
fn work_domain_plus_keyword_beats_one_personal_keyword() {
    let engine = crossover_engine();
    let article = Article::from_url("https://github.com/x/y", "Soup compiler");

    let result = engine.classify(&article);

    assert_eq!(result.tag, Some(TagCategory::Work));
    assert_eq!(result.confidence, Confidence::High);
}

#[test]
fn keyword_evidence_can_outweigh_a_default_work_domain() {
    let engine = RuleEngine::with_default_rules();
    let article = Article::from_url("https://github.com/x/y", "Recipe app")
        .with_content("cooking recipes for family");

    let result = engine.classify(&article);

    // work: github.com (1); personal: recipe, cooking, family (3)
    assert_eq!(result.tag, Some(TagCategory::Personal));
    assert_eq!(result.reasons, vec!["Keywords: recipe, cooking, family".to_string()]);
}

#[test]
fn single_domain_match_is_medium_confidence() {
    let engine = engine_with(category(&["linkedin.com"], &[]), category(&[], &[]));
    let article = Article::from_url("https://www.linkedin.com/post", "Random post");

    let result = engine.classify(&article);

    assert_eq!(result.tag, Some(TagCategory::Work));
    assert_eq!(result.confidence, Confidence::Medium);
    assert_eq!(result.reasons, vec!["Domain: linkedin.com".to_string()]);
}

#[test]
fn domain_patterns_match_as_substrings() {
    let engine = engine_with(category(&["github.com"], &[]), category(&[], &[]));
    let article = Article::from_url("https://gist.github.com/abc", "Snippet");

    let result = engine.classify(&article);

    assert_eq!(result.tag, Some(TagCategory::Work));
    assert_eq!(result.reasons, vec!["Domain: github.com".to_string()]);
}

#[test]
fn leniently_written_urls_still_yield_domain_evidence() {
    let engine = engine_with(category(&["github.com"], &[]), category(&[], &[]));

    for url in ["https://github.com\\x", "https:github.com/x", "https://github.com\t/x"] {
        let result = engine.classify(&Article::from_url(url, "Snippet"));
        assert_eq!(result.tag, Some(TagCategory::Work), "url: {url:?}");
        assert_eq!(result.reasons, vec!["Domain: github.com".to_string()]);
    }
}

#[test]
fn keyword_matching_ignores_case_and_reports_at_most_three() {
    let engine = engine_with(
        category(&[], &["Machine Learning", "alpha", "beta", "gamma"]),
        category(&[], &[]),
    );
    let article = Article::new("MACHINE LEARNING notes").with_content("Alpha, BETA and gamma.");

    let result = engine.classify(&article);

    assert_eq!(result.tag, Some(TagCategory::Work));
    assert_eq!(result.confidence, Confidence::High);
    assert_eq!(
        result.reasons,
        vec!["Keywords: Machine Learning, alpha, beta".to_string()]
    );
}

#[test]
fn notes_without_url_classify_from_keywords() {
    let engine = RuleEngine::with_default_rules();
    let note = Article::new("Notes on javascript");

    let result = engine.classify(&note);

    assert_eq!(result.tag, Some(TagCategory::Work));
    assert_eq!(result.confidence, Confidence::Medium);
}

#[test]
fn annotation_is_not_classification_evidence() {
    let engine = engine_with(category(&[], &["roadmap"]), category(&[], &[]));
    let mut note = Article::new("Untitled");
    note.annotation = Some("roadmap".to_string());

    assert_eq!(engine.classify(&note).tag, None);
}

#[test]
fn malformed_url_contributes_no_domain_evidence() {
    let engine = engine_with(category(&["github.com"], &[]), category(&[], &[]));

    for url in ["github.com/rust-lang", "not a url", "https://"] {
        let result = engine.classify(&Article::from_url(url, "Repository"));
        assert_eq!(result.tag, None, "url: {url}");
        assert_eq!(result.confidence, Confidence::Low);
        assert_eq!(result.reasons, vec![NO_INDICATORS_REASON.to_string()]);
    }
}

#[test]
fn added_domain_rule_scores_one_point_however_often_added() {
    let engine = RuleEngine::with_default_rules();
    let article = Article::from_url("https://example.com/post", "Untitled");
    assert_eq!(engine.classify(&article).tag, None);

    for _ in 0..3 {
        engine.add_rule(RuleKind::Domain, TagCategory::Work, "example.com");
        let result = engine.classify(&article);
        assert_eq!(result.tag, Some(TagCategory::Work));
        assert_eq!(result.confidence, Confidence::Medium);
        assert_eq!(result.reasons, vec!["Domain: example.com".to_string()]);
    }

    let duplicates = engine
        .rules()
        .work
        .domains
        .iter()
        .filter(|pattern| pattern.as_str() == "example.com")
        .count();
    assert_eq!(duplicates, 3);
}

#[test]
fn knows_domain_checks_both_categories() {
    let engine = RuleEngine::with_default_rules();
    assert!(engine.knows_domain("docs.github.com"));
    assert!(engine.knows_domain("allrecipes.com"));
    assert!(!engine.knows_domain("news.example.org"));
}

#[test]
fn shared_engine_serializes_concurrent_rule_additions() {
    let engine = Arc::new(RuleEngine::new(TaggingRules::empty()));
    let handles = (0..8)
        .map(|idx| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                engine.add_rule(RuleKind::Keyword, TagCategory::Personal, format!("hobby{idx}"));
                engine.classify(&Article::new(format!("weekend hobby{idx}")))
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        let result = handle.join().expect("classifier thread should not panic");
        assert_eq!(result.tag, Some(TagCategory::Personal));
    }
    assert_eq!(engine.rules().personal.keywords.len(), 8);
}

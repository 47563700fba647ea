use readlater_core::db::{open_db, open_db_in_memory};
use readlater_core::{
    generate_analytics, Article, LearnedRule, RuleEngine, RuleKind, RuleRepository, RuleService,
    RuleServiceError, SqliteRuleRepository, TagCategory, TaggingRules,
};
use std::sync::Arc;

#[test]
fn add_rule_persists_and_applies_immediately() {
    let conn = open_db_in_memory().unwrap();
    let engine = Arc::new(RuleEngine::new(TaggingRules::empty()));
    let service = RuleService::new(
        SqliteRuleRepository::try_new(&conn).unwrap(),
        Arc::clone(&engine),
    );

    let rule = service
        .add_rule(RuleKind::Keyword, TagCategory::Personal, "  sourdough ")
        .unwrap();

    assert_eq!(
        rule,
        LearnedRule {
            kind: RuleKind::Keyword,
            category: TagCategory::Personal,
            value: "sourdough".to_string(),
        }
    );
    assert_eq!(service.learned_rules().unwrap(), vec![rule]);
    assert_eq!(service.rules().personal.keywords, vec!["sourdough"]);
    assert_eq!(
        engine.classify(&Article::new("Sourdough starter")).tag,
        Some(TagCategory::Personal)
    );
}

#[test]
fn blank_rule_values_are_rejected_and_not_stored() {
    let conn = open_db_in_memory().unwrap();
    let engine = Arc::new(RuleEngine::new(TaggingRules::empty()));
    let service = RuleService::new(
        SqliteRuleRepository::try_new(&conn).unwrap(),
        Arc::clone(&engine),
    );

    let err = service
        .add_rule(RuleKind::Domain, TagCategory::Work, "   ")
        .unwrap_err();

    assert!(matches!(err, RuleServiceError::InvalidRuleValue(_)));
    assert!(service.learned_rules().unwrap().is_empty());
    assert_eq!(engine.rules(), TaggingRules::empty());
}

#[test]
fn applied_suggestion_is_replayed_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("readlater.sqlite3");
    let history = (0..3)
        .map(|_| Article::from_url("https://news.example.org/a", "Story").with_tag("work"))
        .collect::<Vec<_>>();

    {
        let conn = open_db(&db_path).unwrap();
        let engine = Arc::new(RuleEngine::with_default_rules());
        let service = RuleService::new(
            SqliteRuleRepository::try_new(&conn).unwrap(),
            Arc::clone(&engine),
        );
        let stats = generate_analytics(&engine, &history);
        assert_eq!(stats.suggestions.len(), 1);
        service.apply_suggestion(&stats.suggestions[0]).unwrap();
    }

    let conn = open_db(&db_path).unwrap();
    let engine = Arc::new(RuleEngine::with_default_rules());
    let service = RuleService::new(
        SqliteRuleRepository::try_new(&conn).unwrap(),
        Arc::clone(&engine),
    );
    assert!(!engine.knows_domain("news.example.org"));

    assert_eq!(service.load_persisted_rules().unwrap(), 1);

    assert!(engine.knows_domain("news.example.org"));
    assert!(generate_analytics(&engine, &history).suggestions.is_empty());
    let rules = engine.rules();
    assert_eq!(rules.work.domains.last().map(String::as_str), Some("news.example.org"));
    assert_eq!(
        rules.work.domains.len(),
        TaggingRules::default().work.domains.len() + 1
    );
}

#[test]
fn rule_repository_keeps_duplicates_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRuleRepository::try_new(&conn).unwrap();
    let first = LearnedRule {
        kind: RuleKind::Domain,
        category: TagCategory::Work,
        value: "corp.example".to_string(),
    };
    let second = LearnedRule {
        kind: RuleKind::Keyword,
        category: TagCategory::Personal,
        value: "garden".to_string(),
    };

    repo.insert_rule(&first).unwrap();
    repo.insert_rule(&second).unwrap();
    repo.insert_rule(&first).unwrap();

    assert_eq!(
        repo.list_rules().unwrap(),
        vec![first.clone(), second, first]
    );
}

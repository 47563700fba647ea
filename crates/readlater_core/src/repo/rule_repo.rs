//! Persistence for rules learned at runtime.
//!
//! # Invariants
//! - Rules are append-only; no delete or update path exists.
//! - `list_rules` returns rules in insertion order so replay is stable.

use crate::db::RULES_TABLE;
use crate::repo::article_repo::{ensure_table, RepoError, RepoResult};
use crate::tagging::rules::{RuleKind, TagCategory};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

/// One rule added after startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnedRule {
    pub kind: RuleKind,
    pub category: TagCategory,
    pub value: String,
}

/// Repository interface for learned rules.
pub trait RuleRepository {
    fn insert_rule(&self, rule: &LearnedRule) -> RepoResult<()>;
    fn list_rules(&self) -> RepoResult<Vec<LearnedRule>>;
}

/// SQLite-backed learned rule store.
pub struct SqliteRuleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRuleRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(conn, RULES_TABLE)?;
        Ok(Self { conn })
    }
}

impl RuleRepository for SqliteRuleRepository<'_> {
    fn insert_rule(&self, rule: &LearnedRule) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO tagging_rules (kind, category, value) VALUES (?1, ?2, ?3);",
            params![
                rule.kind.as_str(),
                rule.category.as_str(),
                rule.value.as_str()
            ],
        )?;
        Ok(())
    }

    fn list_rules(&self) -> RepoResult<Vec<LearnedRule>> {
        let mut stmt = self
            .conn
            .prepare("SELECT kind, category, value FROM tagging_rules ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut rules = Vec::new();
        while let Some(row) = rows.next()? {
            let kind: String = row.get("kind")?;
            let category: String = row.get("category")?;
            rules.push(LearnedRule {
                kind: kind
                    .parse()
                    .map_err(|err| RepoError::InvalidData(format!("{err}")))?,
                category: category
                    .parse()
                    .map_err(|err| RepoError::InvalidData(format!("{err}")))?,
                value: row.get("value")?,
            });
        }
        Ok(rules)
    }
}

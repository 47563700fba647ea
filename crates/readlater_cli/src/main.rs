//! `readlater` command-line entry point.
//!
//! # Responsibility
//! - Compose the rule engine, SQLite store and services for one invocation.
//! - Expose classification, saving, retagging, analytics and rule commands.
//! - Print JSON on stdout so the output can feed other tools.
//!
//! ```bash
//! readlater --db ./readlater.sqlite3 save --url https://github.com/rust-lang/rust --title "Rust"
//! readlater --db ./readlater.sqlite3 analytics
//! readlater --db ./readlater.sqlite3 apply-suggestion domain-news.example.org
//! ```

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use readlater_core::db::open_db;
use readlater_core::{
    core_version, default_log_level, init_logging, load_rules_file, Article, ArticleId,
    ArticleService, ArticleState, NewArticle, RuleEngine, RuleKind, RuleService,
    SqliteArticleRepository, SqliteRuleRepository, TagCategory, TaggingRules,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Read-later tagging store: save links, auto-tag them as work or
/// personal, and mine your tagging history for new rules.
#[derive(Parser)]
#[command(name = "readlater", version, about)]
struct Cli {
    /// SQLite database file.
    #[arg(long, global = true, default_value = "readlater.sqlite3")]
    db: PathBuf,

    /// TOML file replacing the built-in rule lists.
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Absolute directory for rolling log files. Logging is off without it.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a record without saving it.
    Classify {
        #[arg(long)]
        url: Option<String>,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long)]
        content: Option<String>,
    },
    /// Save a link or note, auto-tagging it unless --tag is given.
    Save {
        #[arg(long)]
        url: Option<String>,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        tag: Option<String>,
    },
    /// List saved records.
    List {
        /// Tag filter; `all` disables filtering.
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        state: Option<ArticleState>,
        /// Maximum number of records; all when omitted.
        #[arg(long)]
        limit: Option<u32>,
        /// Records to skip, newest first.
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// List distinct stored tags.
    Tags,
    /// Set a manual tag.
    Tag { id: ArticleId, tag: String },
    /// Move a record to inbox or reference.
    State { id: ArticleId, state: ArticleState },
    /// Set or clear (empty string) the annotation of a record.
    Annotate { id: ArticleId, annotation: String },
    /// Auto-tag every record still in the untagged bucket.
    Retag,
    /// Tag counts and rule suggestions.
    Analytics,
    /// Show the active rule lists.
    Rules,
    /// Add and persist one rule.
    AddRule {
        #[arg(long = "type")]
        kind: RuleKind,
        #[arg(long)]
        category: TagCategory,
        #[arg(long)]
        value: String,
    },
    /// Persist a suggestion from `analytics` by its id.
    ApplySuggestion { id: String },
    /// Print the core version.
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy()).context("failed to initialize logging")?;
    }

    if let Command::Version = cli.command {
        println!("{}", json!({ "version": core_version() }));
        return Ok(());
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let engine = Arc::new(RuleEngine::new(initial_rules(cli.rules.as_deref())?));
    let rule_service = RuleService::new(SqliteRuleRepository::try_new(&conn)?, Arc::clone(&engine));
    rule_service
        .load_persisted_rules()
        .context("failed to load learned rules")?;
    let articles = ArticleService::new(SqliteArticleRepository::try_new(&conn)?, Arc::clone(&engine));

    info!("event=cli_command module=cli status=start");
    let output = match cli.command {
        Command::Classify {
            url,
            title,
            content,
        } => {
            let mut article = match url {
                Some(url) => Article::from_url(url, title),
                None => Article::new(title),
            };
            article.content = content;
            serde_json::to_value(engine.classify(&article))?
        }
        Command::Save {
            url,
            title,
            content,
            tag,
        } => {
            let saved = articles.save_article(NewArticle {
                url,
                title,
                content,
                tag,
            })?;
            json!({ "article": saved.article, "classification": saved.classification })
        }
        Command::List {
            tag,
            state,
            limit,
            offset,
        } => serde_json::to_value(articles.list_articles_page(
            tag.as_deref(),
            state,
            limit,
            offset,
        )?)?,
        Command::Tags => serde_json::to_value(articles.list_tags()?)?,
        Command::Tag { id, tag } => serde_json::to_value(articles.set_tag(id, &tag)?)?,
        Command::State { id, state } => serde_json::to_value(articles.set_state(id, state)?)?,
        Command::Annotate { id, annotation } => {
            serde_json::to_value(articles.set_annotation(id, Some(annotation.as_str()))?)?
        }
        Command::Retag => {
            let summary = articles.retag_untagged()?;
            json!({ "scanned": summary.scanned, "updated": summary.updated })
        }
        Command::Analytics => serde_json::to_value(articles.analytics()?)?,
        Command::Rules => json!({
            "active": rule_service.rules(),
            "learned": rule_service.learned_rules()?,
        }),
        Command::AddRule {
            kind,
            category,
            value,
        } => serde_json::to_value(rule_service.add_rule(kind, category, &value)?)?,
        Command::ApplySuggestion { id } => {
            let stats = articles.analytics()?;
            let suggestion = stats
                .suggestions
                .iter()
                .find(|suggestion| suggestion.id == id)
                .ok_or_else(|| anyhow!("no current suggestion with id `{id}`"))?;
            serde_json::to_value(rule_service.apply_suggestion(suggestion)?)?
        }
        Command::Version => bail!("version is handled before opening the database"),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn initial_rules(path: Option<&Path>) -> Result<TaggingRules> {
    match path {
        Some(path) => load_rules_file(path).context("failed to load rules file"),
        None => Ok(TaggingRules::default()),
    }
}

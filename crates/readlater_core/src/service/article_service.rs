//! Article use-case service.
//!
//! # Responsibility
//! - Save articles with save-time auto-tagging.
//! - Retag stored records that are still in the untagged bucket.
//! - Apply manual tag, state and annotation updates.
//! - Run tagging analytics over the stored collection.
//!
//! # Invariants
//! - A non-blank manual tag always wins over classification.
//! - An undecided classification is stored as [`DEFAULT_TAG`].
//! - Retagging only writes decided tags; undecided records stay untouched.
//! - Retagging persists all decided tags at once or none of them.

use crate::model::article::{
    normalize_tag, Article, ArticleId, ArticleState, ArticleValidationError, DEFAULT_TAG,
};
use crate::repo::article_repo::{ArticleListQuery, ArticleRepository, RepoError, RepoResult};
use crate::tagging::analytics::{generate_analytics, TaggingStats};
use crate::tagging::engine::{ClassificationResult, RuleEngine};
use crate::tagging::rules::TagCategory;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Title used when a link is saved without one.
pub const UNTITLED: &str = "Untitled";

/// Tag filter value meaning "no filter".
pub const ALL_TAGS_FILTER: &str = "all";

/// Service error for article use-cases.
#[derive(Debug)]
pub enum ArticleServiceError {
    /// Tag input is blank.
    InvalidTag(String),
    /// Record-level validation failed.
    Validation(ArticleValidationError),
    /// Target article does not exist.
    ArticleNotFound(ArticleId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but read-back did not return the row.
    InconsistentState(&'static str),
}

impl Display for ArticleServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTag(value) => write!(f, "invalid tag: `{value}`"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::ArticleNotFound(id) => write!(f, "article not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent article state: {details}"),
        }
    }
}

impl Error for ArticleServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ArticleServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ArticleNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ArticleValidationError> for ArticleServiceError {
    fn from(value: ArticleValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Input for saving one article or note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewArticle {
    pub url: Option<String>,
    pub title: String,
    /// Already-extracted readable text.
    pub content: Option<String>,
    /// Manual tag; blank or `None` enables auto-tagging.
    pub tag: Option<String>,
}

/// Save outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArticle {
    pub article: Article,
    /// Present when auto-tagging ran.
    pub classification: Option<ClassificationResult>,
}

/// Counters returned by [`ArticleService::retag_untagged`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetagSummary {
    /// Untagged records that were classified.
    pub scanned: usize,
    /// Records that received a decided tag.
    pub updated: usize,
}

/// Article service facade over a repository and a shared rule engine.
pub struct ArticleService<R: ArticleRepository> {
    repo: R,
    engine: Arc<RuleEngine>,
}

impl<R: ArticleRepository> ArticleService<R> {
    pub fn new(repo: R, engine: Arc<RuleEngine>) -> Self {
        Self { repo, engine }
    }

    /// Saves one article, auto-tagging it unless a manual tag is given.
    pub fn save_article(&self, input: NewArticle) -> Result<SavedArticle, ArticleServiceError> {
        let NewArticle {
            url,
            title,
            content,
            tag,
        } = input;

        let url = url.filter(|value| !value.trim().is_empty());
        let title = title.trim().to_string();
        if url.is_none() && title.is_empty() {
            return Err(ArticleValidationError::MissingUrlAndTitle.into());
        }
        let title = if title.is_empty() {
            UNTITLED.to_string()
        } else {
            title
        };

        let mut article = Article::with_id(uuid::Uuid::new_v4(), url, title);
        article.content = content.filter(|value| !value.trim().is_empty());

        let manual_tag = tag.as_deref().and_then(normalize_tag);
        let classification = match manual_tag {
            Some(tag) => {
                article.tag = tag;
                None
            }
            None => {
                let result = self.engine.classify(&article);
                article.tag = result
                    .tag
                    .map_or(DEFAULT_TAG, TagCategory::as_str)
                    .to_string();
                Some(result)
            }
        };

        let id = self.repo.create_article(&article)?;
        let stored = self
            .repo
            .get_article(id)?
            .ok_or(ArticleServiceError::InconsistentState(
                "created article not found in read-back",
            ))?;

        info!(
            "event=article_save module=service status=ok auto_tagged={} tag={}",
            classification.is_some(),
            stored.tag
        );
        Ok(SavedArticle {
            article: stored,
            classification,
        })
    }

    /// Gets one article by stable ID.
    pub fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>> {
        self.repo.get_article(id)
    }

    /// Lists articles filtered by tag (`all` or blank disables the filter)
    /// and optional state.
    pub fn list_articles(
        &self,
        tag: Option<&str>,
        state: Option<ArticleState>,
    ) -> Result<Vec<Article>, ArticleServiceError> {
        self.list_articles_page(tag, state, None, 0)
    }

    /// Same filters as [`Self::list_articles`], newest first, skipping
    /// `offset` rows and returning at most `limit` (`None` = no cap).
    pub fn list_articles_page(
        &self,
        tag: Option<&str>,
        state: Option<ArticleState>,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<Vec<Article>, ArticleServiceError> {
        let tag = tag
            .and_then(normalize_tag)
            .filter(|value| value != ALL_TAGS_FILTER);
        let query = ArticleListQuery {
            tag,
            state,
            limit,
            offset,
        };
        Ok(self.repo.list_articles(&query)?)
    }

    /// Lists distinct stored tags.
    pub fn list_tags(&self) -> RepoResult<Vec<String>> {
        self.repo.list_tags()
    }

    /// Replaces the tag of one article with a manual value.
    pub fn set_tag(&self, id: ArticleId, tag: &str) -> Result<Article, ArticleServiceError> {
        let normalized =
            normalize_tag(tag).ok_or_else(|| ArticleServiceError::InvalidTag(tag.to_string()))?;
        self.repo.update_tag(id, normalized.as_str())?;
        self.read_back(id, "article missing after tag update")
    }

    /// Moves an article between inbox and reference.
    pub fn set_state(
        &self,
        id: ArticleId,
        state: ArticleState,
    ) -> Result<Article, ArticleServiceError> {
        self.repo.update_state(id, state)?;
        self.read_back(id, "article missing after state update")
    }

    /// Replaces the annotation; blank clears it.
    pub fn set_annotation(
        &self,
        id: ArticleId,
        annotation: Option<&str>,
    ) -> Result<Article, ArticleServiceError> {
        self.repo.update_annotation(id, annotation)?;
        self.read_back(id, "article missing after annotation update")
    }

    pub fn delete_article(&self, id: ArticleId) -> Result<(), ArticleServiceError> {
        Ok(self.repo.delete_article(id)?)
    }

    /// Classifies every stored record in the untagged bucket and persists
    /// the decided tags.
    pub fn retag_untagged(&self) -> Result<RetagSummary, ArticleServiceError> {
        let articles = self.repo.list_articles(&ArticleListQuery::default())?;
        let mut summary = RetagSummary::default();
        let mut updates = Vec::new();

        for article in articles.iter().filter(|article| article.is_untagged()) {
            summary.scanned += 1;
            if let Some(category) = self.engine.classify(article).tag {
                updates.push((article.id, category.as_str().to_string()));
            }
        }

        if let Err(err) = self.repo.update_tags(&updates) {
            error!(
                "event=retag module=service status=error scanned={} pending={} error={}",
                summary.scanned,
                updates.len(),
                err
            );
            return Err(err.into());
        }
        summary.updated = updates.len();

        info!(
            "event=retag module=service status=ok scanned={} updated={}",
            summary.scanned, summary.updated
        );
        Ok(summary)
    }

    /// Computes tagging analytics over every stored record.
    pub fn analytics(&self) -> Result<TaggingStats, ArticleServiceError> {
        let articles = self.repo.list_articles(&ArticleListQuery::default())?;
        Ok(generate_analytics(&self.engine, &articles))
    }

    fn read_back(
        &self,
        id: ArticleId,
        details: &'static str,
    ) -> Result<Article, ArticleServiceError> {
        self.repo
            .get_article(id)?
            .ok_or(ArticleServiceError::InconsistentState(details))
    }
}

//! Saved article domain model.
//!
//! # Responsibility
//! - Define the one record shape shared by saved links and manual notes.
//! - Own tag normalization and the persisted "untagged" default.
//!
//! # Invariants
//! - `id` is stable and never reused for another article.
//! - `domain` is always the normalized hostname of `url` (empty when absent).
//! - `tag` is never blank once persisted; the default is [`DEFAULT_TAG`].

use crate::tagging::domain::extract_domain;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for a saved article or note.
pub type ArticleId = Uuid;

/// Persisted tag for records without a confident classification.
pub const DEFAULT_TAG: &str = "untagged";

/// Legacy persisted tag written by older classifier revisions.
pub const LEGACY_UNCERTAIN_TAG: &str = "uncertain";

/// Lifecycle state of a saved record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleState {
    /// Newly saved, not yet triaged.
    #[default]
    Inbox,
    /// Explicitly archived for later reference.
    Reference,
}

impl ArticleState {
    /// Stable string id used in storage and CLI flags.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::Reference => "reference",
        }
    }
}

impl FromStr for ArticleState {
    type Err = ArticleValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "inbox" => Ok(Self::Inbox),
            "reference" => Ok(Self::Reference),
            other => Err(ArticleValidationError::UnknownState(other.to_string())),
        }
    }
}

/// Canonical record for saved links and manual notes.
///
/// Notes created by hand simply have no `url` and an empty `domain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub url: Option<String>,
    pub title: String,
    /// Extracted readable body text.
    pub content: Option<String>,
    /// Lowercase hostname without `www.`, derived from `url`.
    pub domain: String,
    pub annotation: Option<String>,
    pub tag: String,
    pub state: ArticleState,
    /// Epoch milliseconds. `None` until the record is persisted.
    pub saved_at: Option<i64>,
}

impl Article {
    /// Creates a manual note without source URL.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), None, title)
    }

    /// Creates a saved link; `domain` is derived from `url`.
    pub fn from_url(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), Some(url.into()), title)
    }

    /// Creates a record with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(id: ArticleId, url: Option<String>, title: impl Into<String>) -> Self {
        let domain = url.as_deref().map(extract_domain).unwrap_or_default();
        Self {
            id,
            url,
            title: title.into(),
            content: None,
            domain,
            annotation: None,
            tag: DEFAULT_TAG.to_string(),
            state: ArticleState::Inbox,
            saved_at: None,
        }
    }

    /// Attaches extracted body text.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Replaces the tag, keeping the default when `tag` is blank.
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = normalize_tag(tag).unwrap_or_else(|| DEFAULT_TAG.to_string());
        self
    }

    /// Returns whether this record sits in the untagged bucket.
    pub fn is_untagged(&self) -> bool {
        is_untagged_tag(self.tag.as_str())
    }

    /// Domain used for analytics grouping.
    ///
    /// Prefers the hostname of `url`; falls back to the stored `domain`
    /// when the URL is missing or cannot be parsed.
    pub fn effective_domain(&self) -> String {
        let from_url = self.url.as_deref().map(extract_domain).unwrap_or_default();
        if !from_url.is_empty() {
            return from_url;
        }
        normalize_domain(self.domain.as_str())
    }

    /// Validates record-level invariants before persistence.
    ///
    /// # Errors
    /// - [`ArticleValidationError::MissingUrlAndTitle`] when both are blank.
    /// - [`ArticleValidationError::BlankUrl`] when `url` is present but blank.
    /// - [`ArticleValidationError::BlankTag`] when `tag` is blank.
    pub fn validate(&self) -> Result<(), ArticleValidationError> {
        if let Some(url) = self.url.as_deref() {
            if url.trim().is_empty() {
                return Err(ArticleValidationError::BlankUrl);
            }
        }
        if self.url.is_none() && self.title.trim().is_empty() {
            return Err(ArticleValidationError::MissingUrlAndTitle);
        }
        if self.tag.trim().is_empty() {
            return Err(ArticleValidationError::BlankTag);
        }
        Ok(())
    }
}

/// Validation errors for article records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleValidationError {
    MissingUrlAndTitle,
    BlankUrl,
    BlankTag,
    UnknownState(String),
}

impl Display for ArticleValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingUrlAndTitle => write!(f, "article requires a url or a title"),
            Self::BlankUrl => write!(f, "article url must not be blank when present"),
            Self::BlankTag => write!(f, "article tag must not be blank"),
            Self::UnknownState(value) => {
                write!(f, "unknown article state `{value}`; expected inbox|reference")
            }
        }
    }
}

impl Error for ArticleValidationError {}

/// Normalizes one tag value: trimmed and lowercased, `None` when blank.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Returns whether a stored tag value belongs to the untagged bucket.
///
/// Blank values and the legacy `uncertain` tag count as untagged.
pub fn is_untagged_tag(tag: &str) -> bool {
    match normalize_tag(tag) {
        None => true,
        Some(value) => value == DEFAULT_TAG || value == LEGACY_UNCERTAIN_TAG,
    }
}

fn normalize_domain(domain: &str) -> String {
    let lowered = domain.trim().to_lowercase();
    match lowered.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => lowered,
    }
}

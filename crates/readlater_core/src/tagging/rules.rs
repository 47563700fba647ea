//! Tagging rule sets and their configuration sources.
//!
//! # Responsibility
//! - Define the `work`/`personal` categories and rule kinds.
//! - Provide the built-in rule lists and TOML-backed overrides.
//!
//! # Invariants
//! - Patterns are stored exactly as given; matching lowercases both sides.
//! - Duplicate patterns are allowed and never change classification.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Category a classification or rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    Work,
    Personal,
}

impl TagCategory {
    /// Both categories in evaluation order.
    pub const ALL: [TagCategory; 2] = [TagCategory::Work, TagCategory::Personal];

    /// Tag string persisted for this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
        }
    }

    /// Maps a stored tag value to a category, ignoring case and padding.
    ///
    /// Returns `None` for untagged values and free-form user tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        tag.parse().ok()
    }
}

impl Display for TagCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagCategory {
    type Err = RulesConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "work" => Ok(Self::Work),
            "personal" => Ok(Self::Personal),
            other => Err(RulesConfigError::UnknownCategory(other.to_string())),
        }
    }
}

/// Kind of evidence a rule pattern is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Substring of the article hostname.
    Domain,
    /// Substring of the lowercased title + content text.
    Keyword,
}

impl RuleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Keyword => "keyword",
        }
    }
}

impl Display for RuleKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = RulesConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "domain" => Ok(Self::Domain),
            "keyword" => Ok(Self::Keyword),
            other => Err(RulesConfigError::UnknownRuleKind(other.to_string())),
        }
    }
}

/// Domain and keyword patterns for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRules {
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CategoryRules {
    fn from_static(domains: &[&str], keywords: &[&str]) -> Self {
        Self {
            domains: domains.iter().map(|value| (*value).to_string()).collect(),
            keywords: keywords.iter().map(|value| (*value).to_string()).collect(),
        }
    }

    /// Mutable pattern list for one rule kind.
    pub fn patterns_mut(&mut self, kind: RuleKind) -> &mut Vec<String> {
        match kind {
            RuleKind::Domain => &mut self.domains,
            RuleKind::Keyword => &mut self.keywords,
        }
    }
}

/// Complete rule state for both categories.
///
/// Deserializes from TOML shaped as:
///
/// ```toml
/// [work]
/// domains = ["github.com"]
/// keywords = ["roadmap"]
///
/// [personal]
/// domains = ["allrecipes.com"]
/// keywords = ["recipe"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggingRules {
    #[serde(default)]
    pub work: CategoryRules,
    #[serde(default)]
    pub personal: CategoryRules,
}

impl TaggingRules {
    /// Rule set with no patterns at all.
    pub fn empty() -> Self {
        Self {
            work: CategoryRules::default(),
            personal: CategoryRules::default(),
        }
    }

    /// Rules for one category.
    pub fn category(&self, category: TagCategory) -> &CategoryRules {
        match category {
            TagCategory::Work => &self.work,
            TagCategory::Personal => &self.personal,
        }
    }

    /// Mutable rules for one category.
    pub fn category_mut(&mut self, category: TagCategory) -> &mut CategoryRules {
        match category {
            TagCategory::Work => &mut self.work,
            TagCategory::Personal => &mut self.personal,
        }
    }

    /// Parses rules from TOML text. Missing tables and lists are empty.
    pub fn from_toml_str(source: &str) -> Result<Self, RulesConfigError> {
        toml::from_str(source).map_err(|err| RulesConfigError::Parse(err.to_string()))
    }
}

impl Default for TaggingRules {
    /// Built-in rule lists shipped with the application.
    fn default() -> Self {
        Self {
            work: CategoryRules::from_static(DEFAULT_WORK_DOMAINS, DEFAULT_WORK_KEYWORDS),
            personal: CategoryRules::from_static(
                DEFAULT_PERSONAL_DOMAINS,
                DEFAULT_PERSONAL_KEYWORDS,
            ),
        }
    }
}

/// Loads rules from a TOML file on disk.
///
/// # Errors
/// - [`RulesConfigError::Io`] when the file cannot be read.
/// - [`RulesConfigError::Parse`] when the content is not valid rules TOML.
pub fn load_rules_file(path: impl AsRef<Path>) -> Result<TaggingRules, RulesConfigError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|err| RulesConfigError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    TaggingRules::from_toml_str(source.as_str())
}

/// Rule configuration and rule-input parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulesConfigError {
    Io { path: PathBuf, message: String },
    Parse(String),
    UnknownCategory(String),
    UnknownRuleKind(String),
}

impl Display for RulesConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, message } => {
                write!(f, "failed to read rules file `{}`: {message}", path.display())
            }
            Self::Parse(message) => write!(f, "invalid rules file: {message}"),
            Self::UnknownCategory(value) => {
                write!(f, "unknown tag category `{value}`; expected work|personal")
            }
            Self::UnknownRuleKind(value) => {
                write!(f, "unknown rule type `{value}`; expected domain|keyword")
            }
        }
    }
}

impl Error for RulesConfigError {}

const DEFAULT_WORK_DOMAINS: &[&str] = &[
    "github.com",
    "stackoverflow.com",
    "linkedin.com",
    "medium.com",
    "substack.com",
    "techcrunch.com",
    "venturebeat.com",
    "firstround.com",
    "a16z.com",
    "hbr.org",
    "mckinsey.com",
    "stratechery.com",
];

const DEFAULT_WORK_KEYWORDS: &[&str] = &[
    "ai",
    "artificial intelligence",
    "machine learning",
    "product management",
    "product manager",
    "startup",
    "saas",
    "growth",
    "metrics",
    "roadmap",
    "user experience",
    "analytics",
    "strategy",
    "business",
    "technology",
    "software",
    "development",
    "programming",
    "javascript",
    "marketing",
    "sales",
    "revenue",
];

const DEFAULT_PERSONAL_DOMAINS: &[&str] = &[
    "allrecipes.com",
    "foodnetwork.com",
    "seriouseats.com",
    "tripadvisor.com",
    "booking.com",
    "airbnb.com",
    "strava.com",
    "myfitnesspal.com",
    "peloton.com",
    "mayoclinic.org",
];

const DEFAULT_PERSONAL_KEYWORDS: &[&str] = &[
    "recipe",
    "cooking",
    "food",
    "travel",
    "vacation",
    "trip",
    "hotel",
    "workout",
    "exercise",
    "fitness",
    "gym",
    "kids",
    "children",
    "family",
    "parenting",
    "restaurant",
    "dining",
    "meal",
    "health",
    "wellness",
    "meditation",
    "hobby",
    "leisure",
    "entertainment",
];

//! Article repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and tag/state updates over the `articles` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Article::validate()` before SQL mutations.
//! - Stored tags are normalized to lowercase.
//! - Lists are ordered by `saved_at DESC, id ASC`.
//! - `update_tags` runs in a single transaction.

use crate::db::{table_exists, DbError, ARTICLES_TABLE};
use crate::model::article::{
    normalize_tag, Article, ArticleId, ArticleState, ArticleValidationError,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ARTICLE_SELECT_SQL: &str = "SELECT
    id,
    url,
    title,
    domain,
    content,
    annotation,
    tag,
    state,
    saved_at
FROM articles";

const NOW_MS_SQL: &str = "(CAST(strftime('%s', 'now') AS INTEGER) * 1000)";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for article and rule persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(ArticleValidationError),
    Db(DbError),
    NotFound(ArticleId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "article not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "connection is missing required table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<ArticleValidationError> for RepoError {
    fn from(value: ArticleValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing articles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleListQuery {
    /// Exact (case-insensitive) tag filter.
    pub tag: Option<String>,
    pub state: Option<ArticleState>,
    /// `None` returns every matching row.
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for saved articles.
pub trait ArticleRepository {
    fn create_article(&self, article: &Article) -> RepoResult<ArticleId>;
    fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>>;
    fn list_articles(&self, query: &ArticleListQuery) -> RepoResult<Vec<Article>>;
    fn update_tag(&self, id: ArticleId, tag: &str) -> RepoResult<()>;
    /// Applies every `(id, tag)` pair or none of them.
    fn update_tags(&self, updates: &[(ArticleId, String)]) -> RepoResult<()>;
    fn update_state(&self, id: ArticleId, state: ArticleState) -> RepoResult<()>;
    fn update_annotation(&self, id: ArticleId, annotation: Option<&str>) -> RepoResult<()>;
    fn delete_article(&self, id: ArticleId) -> RepoResult<()>;
    /// Distinct stored tag values sorted by name.
    fn list_tags(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed article repository.
pub struct SqliteArticleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteArticleRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - [`RepoError::MissingRequiredTable`] when migrations were not applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(conn, ARTICLES_TABLE)?;
        Ok(Self { conn })
    }

    fn touch(&self, id: ArticleId, set_clause: &str, value: Value) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!("UPDATE articles SET {set_clause} = ?2, updated_at = {NOW_MS_SQL} WHERE id = ?1;"),
            params![id.to_string(), value],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

impl ArticleRepository for SqliteArticleRepository<'_> {
    fn create_article(&self, article: &Article) -> RepoResult<ArticleId> {
        article.validate()?;
        let tag = normalize_tag(article.tag.as_str()).ok_or(ArticleValidationError::BlankTag)?;

        self.conn.execute(
            &format!(
                "INSERT INTO articles (
                    id,
                    url,
                    title,
                    domain,
                    content,
                    annotation,
                    tag,
                    state,
                    saved_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, COALESCE(?9, {NOW_MS_SQL}));"
            ),
            params![
                article.id.to_string(),
                article.url.as_deref(),
                article.title.as_str(),
                article.domain.as_str(),
                article.content.as_deref(),
                article.annotation.as_deref(),
                tag,
                article.state.as_str(),
                article.saved_at,
            ],
        )?;

        Ok(article.id)
    }

    fn get_article(&self, id: ArticleId) -> RepoResult<Option<Article>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ARTICLE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_article_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_articles(&self, query: &ArticleListQuery) -> RepoResult<Vec<Article>> {
        let mut sql = format!("{ARTICLE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(tag) = query.tag.as_deref().and_then(normalize_tag) {
            sql.push_str(" AND tag = ? COLLATE NOCASE");
            bind_values.push(Value::Text(tag));
        }
        if let Some(state) = query.state {
            sql.push_str(" AND state = ?");
            bind_values.push(Value::Text(state.as_str().to_string()));
        }

        sql.push_str(" ORDER BY saved_at DESC, id ASC");
        if query.limit.is_some() || query.offset > 0 {
            // SQLite requires LIMIT before OFFSET; -1 means unbounded.
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(query.limit.map_or(-1, i64::from)));
            sql.push_str(" OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut articles = Vec::new();
        while let Some(row) = rows.next()? {
            articles.push(parse_article_row(row)?);
        }
        Ok(articles)
    }

    fn update_tag(&self, id: ArticleId, tag: &str) -> RepoResult<()> {
        let tag = normalize_tag(tag).ok_or(ArticleValidationError::BlankTag)?;
        self.touch(id, "tag", Value::Text(tag))
    }

    fn update_tags(&self, updates: &[(ArticleId, String)]) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (id, tag) in updates {
            let tag = normalize_tag(tag).ok_or(ArticleValidationError::BlankTag)?;
            let changed = tx.execute(
                &format!("UPDATE articles SET tag = ?2, updated_at = {NOW_MS_SQL} WHERE id = ?1;"),
                params![id.to_string(), tag],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound(*id));
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn update_state(&self, id: ArticleId, state: ArticleState) -> RepoResult<()> {
        self.touch(id, "state", Value::Text(state.as_str().to_string()))
    }

    fn update_annotation(&self, id: ArticleId, annotation: Option<&str>) -> RepoResult<()> {
        let value = annotation
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map_or(Value::Null, |text| Value::Text(text.to_string()));
        self.touch(id, "annotation", value)
    }

    fn delete_article(&self, id: ArticleId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM articles WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn list_tags(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT lower(tag) AS tag FROM articles ORDER BY tag ASC;")?;
        let mut rows = stmt.query([])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(row.get("tag")?);
        }
        Ok(tags)
    }
}

fn parse_article_row(row: &Row<'_>) -> RepoResult<Article> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{id_text}` in articles.id")))?;
    let state_text: String = row.get("state")?;
    let state = state_text
        .parse::<ArticleState>()
        .map_err(|err| RepoError::InvalidData(err.to_string()))?;

    Ok(Article {
        id,
        url: row.get("url")?,
        title: row.get("title")?,
        content: row.get("content")?,
        domain: row.get("domain")?,
        annotation: row.get("annotation")?,
        tag: row.get("tag")?,
        state,
        saved_at: Some(row.get("saved_at")?),
    })
}

pub(crate) fn ensure_table(conn: &Connection, table: &'static str) -> RepoResult<()> {
    if table_exists(conn, table)? {
        Ok(())
    } else {
        Err(RepoError::MissingRequiredTable(table))
    }
}

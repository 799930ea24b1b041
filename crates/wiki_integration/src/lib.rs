use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::{
    domain::{Article, InvalidationToken},
    error::SetupError,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

mod render;

pub use render::{render_html, RenderedDocument, SITE_SUBTITLE};

/// Titles with this prefix are list pages and never make good candidates.
pub const LIST_TITLE_PREFIX: &str = "List of";
const RANDOM_BATCH_LIMIT: &str = "50";
const ARTICLE_NAMESPACE: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentQuery {
    pub min_content_length: u64,
    pub count: usize,
    pub language: String,
    pub invalidation_token: InvalidationToken,
}

#[derive(Debug, Error)]
pub enum DocumentSourceError {
    #[error("encyclopedia request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("data doesn't fit expected format: {0}")]
    UnexpectedShape(String),
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("invalid language code '{0}'")]
    InvalidLanguage(String),
}

impl From<DocumentSourceError> for SetupError {
    fn from(value: DocumentSourceError) -> Self {
        match value {
            DocumentSourceError::UnexpectedShape(raw) => SetupError::UnexpectedShape(raw),
            other => SetupError::Fetch(other.to_string()),
        }
    }
}

#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn random_candidates(
        &self,
        query: &DocumentQuery,
    ) -> Result<Vec<Article>, DocumentSourceError>;
}

#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(
        &self,
        article: &Article,
        language: &str,
    ) -> Result<RenderedDocument, DocumentSourceError>;
}

/// Client for the public Wikipedia action API.
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    http: Client,
    base_url: Option<Url>,
}

impl Default for WikipediaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WikipediaClient {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
            base_url: None,
        }
    }

    /// Sends every request to `{base_url}/w/api.php` regardless of language.
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url: Some(base_url),
        }
    }

    pub fn api_url(&self, language: &str) -> Result<Url, DocumentSourceError> {
        validate_language(language)?;
        let mut url = match &self.base_url {
            Some(base) => base.clone(),
            None => site_url(language)?,
        };
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["w", "api.php"]);
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Value, DocumentSourceError> {
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        serde_json::from_str(&body).map_err(|err| {
            DocumentSourceError::UnexpectedShape(format!("{err}: {body}"))
        })
    }
}

#[async_trait]
impl DocumentSource for WikipediaClient {
    async fn random_candidates(
        &self,
        query: &DocumentQuery,
    ) -> Result<Vec<Article>, DocumentSourceError> {
        let mut url = self.api_url(&query.language)?;
        url.query_pairs_mut().extend_pairs([
            ("format", "json"),
            ("action", "query"),
            ("generator", "random"),
            ("prop", "info"),
            ("inprop", "url"),
            ("grnlimit", RANDOM_BATCH_LIMIT),
            ("grnnamespace", ARTICLE_NAMESPACE),
            ("origin", "*"),
        ]);
        debug!(
            token = query.invalidation_token.0,
            language = %query.language,
            "wiki: requesting random articles"
        );

        let body = self.get_json(url).await?;
        select_candidates(&body, query.min_content_length, query.count)
    }
}

#[async_trait]
impl DocumentRenderer for WikipediaClient {
    async fn render(
        &self,
        article: &Article,
        language: &str,
    ) -> Result<RenderedDocument, DocumentSourceError> {
        let mut url = self.api_url(language)?;
        let page_id = article.page_id.to_string();
        url.query_pairs_mut().extend_pairs([
            ("format", "json"),
            ("action", "parse"),
            ("pageid", page_id.as_str()),
            ("mobileformat", "true"),
            ("prop", "text"),
            ("origin", "*"),
        ]);
        debug!(page_id = article.page_id.0, "wiki: requesting rendered article");

        let body = self.get_json(url).await?;
        let html = body
            .pointer("/parse/text/*")
            .and_then(Value::as_str)
            .ok_or_else(|| DocumentSourceError::UnexpectedShape(body.to_string()))?;
        Ok(render_html(&article.title, language, html))
    }
}

/// Picks up to `count` usable articles out of a random-generator response.
///
/// Pages are ordered by page id so the same response always yields the same
/// candidates, then filtered by body length and the list-title convention.
pub fn select_candidates(
    body: &Value,
    min_content_length: u64,
    count: usize,
) -> Result<Vec<Article>, DocumentSourceError> {
    let pages = body
        .get("query")
        .and_then(|query| query.get("pages"))
        .and_then(Value::as_object)
        .ok_or_else(|| DocumentSourceError::UnexpectedShape(body.to_string()))?;

    let mut articles = pages
        .values()
        .map(|page| serde_json::from_value::<Article>(page.clone()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| DocumentSourceError::UnexpectedShape(format!("{err}: {body}")))?;
    articles.sort_by_key(|article| article.page_id);

    Ok(articles
        .into_iter()
        .filter(|article| {
            article.length > min_content_length && !article.title.starts_with(LIST_TITLE_PREFIX)
        })
        .take(count)
        .collect())
}

pub fn site_url(language: &str) -> Result<Url, DocumentSourceError> {
    validate_language(language)?;
    Ok(Url::parse(&format!("https://{language}.wikipedia.org"))?)
}

fn validate_language(language: &str) -> Result<(), DocumentSourceError> {
    let valid = !language.is_empty()
        && language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(DocumentSourceError::InvalidLanguage(language.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

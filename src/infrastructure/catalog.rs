//! Open Library implementation of [`CatalogProvider`].

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::domain::catalog::{
    CatalogAuthor, CatalogBook, CatalogError, CatalogProvider, EditionDetails, work_id,
};

pub const OPEN_LIBRARY_URL: &str = "https://openlibrary.org";
const COVERS_URL: &str = "https://covers.openlibrary.org/b/id";
const SERVICE: &str = "Open Library";

pub struct OpenLibraryCatalog {
    http: reqwest::Client,
    base_url: Url,
}

impl OpenLibraryCatalog {
    pub fn new(http: reqwest::Client, base_url: &str) -> Result<Self, url::ParseError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        self.base_url
            .join(path)
            .map_err(|err| CatalogError::Request {
                service: SERVICE,
                message: err.to_string(),
            })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        debug!(%url, "querying catalog");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| CatalogError::Request {
                service: SERVICE,
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|err| CatalogError::Decode {
            service: SERVICE,
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl CatalogProvider for OpenLibraryCatalog {
    async fn search_books(&self, query: &str) -> Result<Vec<CatalogBook>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut url = self.endpoint("search.json")?;
        url.query_pairs_mut().append_pair("q", query);

        let response: SearchResponse = self.get_json(url).await?;
        Ok(response.docs.into_iter().map(CatalogBook::from).collect())
    }

    async fn edition_details(&self, work_key: &str) -> Result<EditionDetails, CatalogError> {
        let url = self.endpoint(&format!("works/{}/editions.json", work_id(work_key)))?;
        let response: EditionsResponse = self.get_json(url).await?;
        Ok(pick_edition_details(&response.entries))
    }

    async fn search_authors(&self, query: &str) -> Result<Vec<CatalogAuthor>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut url = self.endpoint("search/authors.json")?;
        url.query_pairs_mut().append_pair("q", query);

        let response: AuthorSearchResponse = self.get_json(url).await?;
        Ok(response.docs.into_iter().map(CatalogAuthor::from).collect())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    key: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    author_name: Vec<String>,
    #[serde(default)]
    cover_i: Option<i64>,
    #[serde(default)]
    language: Vec<String>,
    #[serde(default)]
    isbn: Vec<String>,
}

impl From<SearchDoc> for CatalogBook {
    fn from(doc: SearchDoc) -> Self {
        CatalogBook {
            key: doc.key,
            title: doc.title,
            authors: doc.author_name,
            cover_url: doc.cover_i.map(|id| format!("{COVERS_URL}/{id}-M.jpg")),
            language: doc.language.into_iter().next().unwrap_or_default(),
            isbn: doc.isbn.into_iter().next().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EditionsResponse {
    #[serde(default)]
    entries: Vec<EditionDoc>,
}

#[derive(Debug, Default, Deserialize)]
struct EditionDoc {
    #[serde(default, deserialize_with = "lenient_page_count")]
    number_of_pages: Option<u32>,
    #[serde(default)]
    isbn_13: Vec<String>,
    #[serde(default)]
    isbn_10: Vec<String>,
}

/// Numeric strings are parsed; any other non-integer page count reads as
/// unknown instead of failing the whole editions response.
fn lenient_page_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let pages = match value {
        serde_json::Value::Number(number) => number.as_u64(),
        serde_json::Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    Ok(pages.and_then(|pages| u32::try_from(pages).ok()))
}

impl EditionDoc {
    fn isbn(&self) -> Option<&String> {
        self.isbn_13.first().or_else(|| self.isbn_10.first())
    }
}

/// Pages from the first edition listing a page count; ISBN from the first
/// edition listing one, ISBN-13 before ISBN-10.
fn pick_edition_details(entries: &[EditionDoc]) -> EditionDetails {
    let pages = entries
        .iter()
        .find_map(|edition| edition.number_of_pages.filter(|pages| *pages > 0));
    let isbn = entries.iter().find_map(EditionDoc::isbn).cloned();
    EditionDetails { pages, isbn }
}

#[derive(Debug, Deserialize)]
struct AuthorSearchResponse {
    #[serde(default)]
    docs: Vec<AuthorDoc>,
}

#[derive(Debug, Deserialize)]
struct AuthorDoc {
    key: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    birth_date: Option<String>,
    #[serde(default)]
    work_count: Option<u32>,
    #[serde(default)]
    top_work: Option<String>,
    #[serde(default)]
    top_subjects: Vec<String>,
}

impl From<AuthorDoc> for CatalogAuthor {
    fn from(doc: AuthorDoc) -> Self {
        CatalogAuthor {
            key: doc.key.trim_start_matches("/authors/").to_string(),
            name: doc.name,
            birth_date: doc.birth_date,
            work_count: doc.work_count.unwrap_or(0),
            top_work: doc.top_work,
            top_subjects: doc.top_subjects,
        }
    }
}

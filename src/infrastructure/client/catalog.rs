use anyhow::Result;

use super::ReadlogClient;
use crate::domain::catalog::{CatalogAuthor, CatalogBook, EditionDetails, work_id};

pub struct CatalogClient<'a> {
    client: &'a ReadlogClient,
}

impl<'a> CatalogClient<'a> {
    pub fn new(client: &'a ReadlogClient) -> Self {
        Self { client }
    }

    pub async fn search_books(&self, query: &str) -> Result<Vec<CatalogBook>> {
        let mut url = self.client.endpoint("api/v1/catalog/books")?;
        url.query_pairs_mut().append_pair("q", query);
        self.client.get_json(url).await
    }

    pub async fn edition_details(&self, work_key: &str) -> Result<EditionDetails> {
        let url = self
            .client
            .endpoint(&format!("api/v1/catalog/works/{}/edition", work_id(work_key)))?;
        self.client.get_json(url).await
    }

    pub async fn search_authors(&self, query: &str) -> Result<Vec<CatalogAuthor>> {
        let mut url = self.client.endpoint("api/v1/catalog/authors")?;
        url.query_pairs_mut().append_pair("q", query);
        self.client.get_json(url).await
    }
}

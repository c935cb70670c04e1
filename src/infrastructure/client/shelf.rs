use anyhow::Result;

use super::ReadlogClient;
use super::define_client_crud;
use crate::domain::ids::ShelfEntryId;
use crate::domain::shelf::{
    CatalogShelfSubmission, NewShelfEntry, ReadingStatus, ShelfEntry, UpdateShelfEntry,
};

pub struct ShelfClient<'a> {
    client: &'a ReadlogClient,
}

impl<'a> ShelfClient<'a> {
    pub fn new(client: &'a ReadlogClient) -> Self {
        Self { client }
    }

    define_client_crud!(
        entity_path: "api/v1/shelf",
        id_type: ShelfEntryId,
        entity_type: ShelfEntry,
        new_type: NewShelfEntry,
        update_type: UpdateShelfEntry
    );

    pub async fn list(&self, status: Option<ReadingStatus>) -> Result<Vec<ShelfEntry>> {
        let mut url = self.client.endpoint("api/v1/shelf")?;
        if let Some(status) = status {
            url.query_pairs_mut().append_pair("status", status.as_str());
        }
        self.client.get_json(url).await
    }

    pub async fn create_from_catalog(
        &self,
        submission: &CatalogShelfSubmission,
    ) -> Result<ShelfEntry> {
        let url = self.client.endpoint("api/v1/shelf/from-catalog")?;
        let response = self
            .client
            .request(reqwest::Method::POST, url)
            .json(submission)
            .send()
            .await?;
        self.client.handle_response(response).await
    }
}

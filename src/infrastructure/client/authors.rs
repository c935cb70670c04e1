use anyhow::Result;

use super::ReadlogClient;
use crate::domain::authors::{NewTrackedAuthor, TrackedAuthor, UpcomingRelease};
use crate::domain::ids::TrackedAuthorId;

pub struct AuthorsClient<'a> {
    client: &'a ReadlogClient,
}

impl<'a> AuthorsClient<'a> {
    pub fn new(client: &'a ReadlogClient) -> Self {
        Self { client }
    }

    pub async fn track(&self, payload: &NewTrackedAuthor) -> Result<TrackedAuthor> {
        let url = self.client.endpoint("api/v1/tracked-authors")?;
        let response = self
            .client
            .request(reqwest::Method::POST, url)
            .json(payload)
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    pub async fn list(&self) -> Result<Vec<TrackedAuthor>> {
        let url = self.client.endpoint("api/v1/tracked-authors")?;
        self.client.get_json(url).await
    }

    pub async fn untrack(&self, id: TrackedAuthorId) -> Result<()> {
        let url = self
            .client
            .endpoint(&format!("api/v1/tracked-authors/{id}"))?;
        let response = self
            .client
            .request(reqwest::Method::DELETE, url)
            .send()
            .await?;
        self.client.expect_empty(response).await
    }

    pub async fn upcoming(&self) -> Result<Vec<UpcomingRelease>> {
        let url = self.client.endpoint("api/v1/tracked-authors/upcoming")?;
        self.client.get_json(url).await
    }
}

use anyhow::Result;

use super::ReadlogClient;
use crate::domain::reviews::PublicReview;

pub struct ReviewsClient<'a> {
    client: &'a ReadlogClient,
}

impl<'a> ReviewsClient<'a> {
    pub fn new(client: &'a ReadlogClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<PublicReview>> {
        let mut url = self.client.endpoint("api/v1/reviews")?;
        if let Some(search) = search {
            url.query_pairs_mut().append_pair("q", search);
        }
        self.client.get_json(url).await
    }
}

use anyhow::Result;
use serde_json::json;

use super::ReadlogClient;
use crate::domain::ids::TokenId;
use crate::domain::tokens::{IssuedToken, ProvisionedUser, Token};
use crate::domain::users::NewUser;

pub struct TokensClient<'a> {
    client: &'a ReadlogClient,
}

impl<'a> TokensClient<'a> {
    pub fn new(client: &'a ReadlogClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, name: &str) -> Result<IssuedToken> {
        let url = self.client.endpoint("api/v1/tokens")?;
        let response = self
            .client
            .request(reqwest::Method::POST, url)
            .json(&json!({ "name": name }))
            .send()
            .await?;
        self.client.handle_response(response).await
    }

    pub async fn list(&self) -> Result<Vec<Token>> {
        let url = self.client.endpoint("api/v1/tokens")?;
        self.client.get_json(url).await
    }

    pub async fn revoke(&self, id: TokenId) -> Result<()> {
        let url = self.client.endpoint(&format!("api/v1/tokens/{id}/revoke"))?;
        let response = self
            .client
            .request(reqwest::Method::POST, url)
            .send()
            .await?;
        self.client.expect_empty(response).await
    }

    /// Admin only.
    pub async fn create_user(&self, new_user: &NewUser) -> Result<ProvisionedUser> {
        let url = self.client.endpoint("api/v1/admin/users")?;
        let response = self
            .client
            .request(reqwest::Method::POST, url)
            .json(new_user)
            .send()
            .await?;
        self.client.handle_response(response).await
    }
}

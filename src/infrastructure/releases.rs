//! Clients for the external release-notification service.

use async_trait::async_trait;
use url::Url;

use crate::domain::authors::{TrackedAuthor, UpcomingRelease};
use crate::domain::catalog::{CatalogError, ReleaseFeed};

const SERVICE: &str = "release feed";

/// Calls `GET {base}/authors/{author_key}/upcoming`.
pub struct HttpReleaseFeed {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpReleaseFeed {
    pub fn new(http: reqwest::Client, base_url: &str) -> Result<Self, url::ParseError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl ReleaseFeed for HttpReleaseFeed {
    async fn upcoming_for(
        &self,
        author: &TrackedAuthor,
    ) -> Result<Vec<UpcomingRelease>, CatalogError> {
        let url = self
            .base_url
            .join(&format!("authors/{}/upcoming", author.author_key))
            .map_err(|err| CatalogError::Request {
                service: SERVICE,
                message: err.to_string(),
            })?;

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

        response
            .json::<Vec<UpcomingRelease>>()
            .await
            .map_err(|err| CatalogError::Decode {
                service: SERVICE,
                message: err.to_string(),
            })
    }
}

/// Used when no release service is configured.
pub struct NoopReleaseFeed;

#[async_trait]
impl ReleaseFeed for NoopReleaseFeed {
    async fn upcoming_for(
        &self,
        _author: &TrackedAuthor,
    ) -> Result<Vec<UpcomingRelease>, CatalogError> {
        Ok(Vec::new())
    }
}

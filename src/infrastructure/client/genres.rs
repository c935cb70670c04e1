use anyhow::Result;

use super::ReadlogClient;
use super::define_client_crud;
use crate::domain::genres::{Genre, NewGenre, UpdateGenre};
use crate::domain::ids::GenreId;

pub struct GenresClient<'a> {
    client: &'a ReadlogClient,
}

impl<'a> GenresClient<'a> {
    pub fn new(client: &'a ReadlogClient) -> Self {
        Self { client }
    }

    define_client_crud!(
        entity_path: "api/v1/genres",
        id_type: GenreId,
        entity_type: Genre,
        new_type: NewGenre,
        update_type: UpdateGenre
    );

    pub async fn list(&self) -> Result<Vec<Genre>> {
        let url = self.client.endpoint("api/v1/genres")?;
        self.client.get_json(url).await
    }
}

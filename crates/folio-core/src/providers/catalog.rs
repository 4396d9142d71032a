// Live catalog provider - bridges CatalogClient with the CatalogSource trait
use async_trait::async_trait;
use folio_api::CatalogClient;

use crate::{loader::CatalogSource, models::ProjectRecord, Error, Result};

pub struct HttpCatalogSource {
    client: CatalogClient,
}

impl HttpCatalogSource {
    pub fn new(client: CatalogClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<Vec<ProjectRecord>> {
        self.client
            .fetch_json::<Vec<ProjectRecord>>()
            .await
            .map_err(|e| Error::ApiError(e.to_string()))
    }

    fn describe(&self) -> String {
        self.client.location().to_string()
    }
}

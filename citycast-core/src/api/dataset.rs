use reqwest::Client;
use serde::Deserialize;

use super::decode;
use crate::city::{CityRecord, DatasetFields};
use crate::directory::{PageRequest, PAGE_SIZE};
use crate::error::ApiError;

pub const DATASET_ID: &str = "geonames-all-cities-with-a-population-1000";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    records: Vec<SearchRecord>,
}

#[derive(Debug, Deserialize)]
struct SearchRecord {
    #[serde(default)]
    fields: DatasetFields,
}

/// OpenDataSoft records search client for the geonames city dataset.
#[derive(Debug, Clone)]
pub struct DatasetClient {
    client: Client,
    base_url: String,
}

impl DatasetClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn page_url(&self, request: PageRequest) -> String {
        format!(
            "{}/api/records/1.0/search/?dataset={}&q=&start={}&rows={}",
            self.base_url,
            DATASET_ID,
            request.offset(),
            PAGE_SIZE
        )
    }

    /// Fetch one page. An empty vector means the dataset is exhausted.
    pub async fn fetch_page(&self, request: PageRequest) -> Result<Vec<CityRecord>, ApiError> {
        let url = self.page_url(request);
        tracing::debug!(page = request.page, attempt = request.attempt, "fetching city page");

        let response = self.client.get(&url).send().await?;
        let data: SearchResponse = decode(response).await?;

        let cities: Vec<CityRecord> = data
            .records
            .into_iter()
            .map(|record| CityRecord::from(record.fields))
            .collect();
        tracing::info!(page = request.page, count = cities.len(), "city page loaded");
        Ok(cities)
    }
}

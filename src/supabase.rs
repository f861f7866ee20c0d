//! Read access to the hosted program tables.
//!
//! The tables are served by a Supabase (PostgREST) endpoint. [ProgramSource] hides the transport
//! so that the rest of the crate, and its tests, do not depend on it.

use crate::dataset::Dataset;
use crate::error::IncentiveMapError;
use crate::models::{self, DeviceCategory, Program};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

/// Source of program rows.
///
/// Defines the interface for fetching the two remote tables.
#[async_trait]
pub trait ProgramSource: Send + Sync {
    /// Fetch every row of the device categories table.
    async fn device_categories(&self) -> Result<Vec<DeviceCategory>, IncentiveMapError>;

    /// Fetch every row of the programs table.
    async fn programs(&self) -> Result<Vec<Program>, IncentiveMapError>;
}

/// Supabase REST client.
///
/// Implements [ProgramSource] over the PostgREST API.
#[derive(Debug)]
pub struct SupabaseClient {
    reqwest_client: reqwest::Client,
    /// Project URL, e.g. `https://<project>.supabase.co`
    url: Url,
    /// API key, sent as both `apikey` and bearer token
    key: String,
}

impl SupabaseClient {
    /// Create a new Supabase client.
    ///
    /// # Arguments
    ///
    /// * `url`: Supabase project URL
    /// * `key`: Supabase API key
    pub fn new(url: &Url, key: &str) -> Self {
        Self {
            reqwest_client: reqwest::Client::new(),
            url: url.clone(),
            key: key.to_string(),
        }
    }

    /// URL selecting every column of every row of a table.
    fn table_url(&self, table: &str) -> Result<Url, IncentiveMapError> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|_| IncentiveMapError::InvalidSourceUrl {
                url: self.url.to_string(),
            })?
            .pop_if_empty()
            .extend(["rest", "v1", table]);
        url.query_pairs_mut().append_pair("select", "*");
        Ok(url)
    }

    /// Fetch every row of a table.
    #[tracing::instrument(level = "DEBUG", skip(self))]
    async fn select_all<T: DeserializeOwned>(
        &self,
        table: &'static str,
    ) -> Result<Vec<T>, IncentiveMapError> {
        let url = self.table_url(table)?;
        let response = self
            .reqwest_client
            .get(url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(IncentiveMapError::DataAccessStatus {
                table,
                status: response.status().as_u16(),
            });
        }
        let rows: Vec<T> = response.json().await?;
        tracing::debug!("Fetched {} rows from {}", rows.len(), table);
        Ok(rows)
    }
}

#[async_trait]
impl ProgramSource for SupabaseClient {
    async fn device_categories(&self) -> Result<Vec<DeviceCategory>, IncentiveMapError> {
        self.select_all(models::DEVICE_CATEGORIES_TABLE).await
    }

    async fn programs(&self) -> Result<Vec<Program>, IncentiveMapError> {
        self.select_all(models::PROGRAMS_TABLE).await
    }
}

/// Load a data set from a program source.
///
/// Both tables must have rows: without categories no program can be mapped, and an empty
/// programs table indicates a misconfigured source.
///
/// # Arguments
///
/// * `source`: Where to fetch rows from
#[tracing::instrument(level = "INFO", skip(source))]
pub async fn load_dataset(source: &dyn ProgramSource) -> Result<Dataset, IncentiveMapError> {
    let categories = source.device_categories().await?;
    if categories.is_empty() {
        return Err(IncentiveMapError::EmptyTable {
            table: models::DEVICE_CATEGORIES_TABLE,
        });
    }
    let programs = source.programs().await?;
    if programs.is_empty() {
        return Err(IncentiveMapError::EmptyTable {
            table: models::PROGRAMS_TABLE,
        });
    }
    tracing::info!(
        "Loaded {} device categories and {} programs",
        categories.len(),
        programs.len()
    );
    Ok(Dataset::from_rows(categories, programs))
}

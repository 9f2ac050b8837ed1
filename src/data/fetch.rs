use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::loader;
use super::model::{Column, Record};
use crate::error::CatalogError;

const TAP_SYNC_URL: &str = "https://exoplanetarchive.ipac.caltech.edu/TAP/sync";

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Parameters of one catalog fetch; also the session cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogQuery {
    pub endpoint: String,
    pub table: String,
    pub columns: Vec<String>,
    /// ADQL `where` clause, without the keyword.
    pub filter: Option<String>,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        CatalogQuery {
            endpoint: TAP_SYNC_URL.to_string(),
            table: "pscomppars".to_string(),
            columns: Column::ALL.iter().map(|c| c.archive().to_string()).collect(),
            filter: Some("pl_eqt is not null".to_string()),
        }
    }
}

impl CatalogQuery {
    /// The ADQL statement sent to the TAP service.
    pub fn adql(&self) -> String {
        let mut adql = format!("select {} from {}", self.columns.join(","), self.table);
        if let Some(filter) = self.filter.as_deref().filter(|f| !f.trim().is_empty()) {
            adql.push_str(" where ");
            adql.push_str(filter.trim());
        }
        adql
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Something that can materialise a catalog for a query.
pub trait CatalogSource {
    fn fetch(&self, query: &CatalogQuery) -> Result<Vec<Record>>;

    /// Short human-readable origin for status messages.
    fn describe(&self) -> String;
}

/// Synchronous TAP client for the NASA Exoplanet Archive.
pub struct TapClient {
    client: Client,
}

impl TapClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("astrobiochem-explorer/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

impl CatalogSource for TapClient {
    fn fetch(&self, query: &CatalogQuery) -> Result<Vec<Record>> {
        let adql = query.adql();
        log::info!("Fetching catalog from {}: {adql}", query.endpoint);

        let response = self
            .client
            .get(&query.endpoint)
            .query(&[("query", adql.as_str()), ("format", "csv")])
            .send()
            .context("Failed to fetch catalog")?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::HttpStatus(status.as_u16()).into());
        }

        let body = response.text().context("Failed to read catalog response")?;
        loader::read_csv(body.as_bytes()).context("Failed to parse catalog CSV")
    }

    fn describe(&self) -> String {
        "NASA Exoplanet Archive".to_string()
    }
}

/// A local catalog file standing in for the remote service. The query is
/// only used as a cache key.
pub struct FileSource {
    pub path: PathBuf,
}

impl CatalogSource for FileSource {
    fn fetch(&self, _query: &CatalogQuery) -> Result<Vec<Record>> {
        loader::load_file(&self.path)
            .with_context(|| format!("loading {}", self.path.display()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ---------------------------------------------------------------------------
// Session cache
// ---------------------------------------------------------------------------

/// Fetch-once-per-session cache keyed by query. Entries stay until they are
/// explicitly invalidated (manual refresh).
#[derive(Default)]
pub struct CatalogCache {
    entries: HashMap<CatalogQuery, Arc<Vec<Record>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `query`, fetching it from `source` on a
    /// miss. Failed fetches are not cached.
    pub fn get_or_fetch(
        &mut self,
        source: &dyn CatalogSource,
        query: &CatalogQuery,
    ) -> Result<Arc<Vec<Record>>> {
        if let Some(records) = self.entries.get(query) {
            log::debug!("Catalog cache hit ({} records)", records.len());
            return Ok(Arc::clone(records));
        }

        let records = Arc::new(source.fetch(query)?);
        log::info!(
            "Loaded {} records from {}",
            records.len(),
            source.describe()
        );
        Ok(self.store(query, records))
    }

    /// Cache an already fetched table under `query`.
    pub fn store(&mut self, query: &CatalogQuery, records: Arc<Vec<Record>>) -> Arc<Vec<Record>> {
        self.entries.insert(query.clone(), Arc::clone(&records));
        records
    }

    /// Drop the entry for `query`; the next `get_or_fetch` refetches.
    pub fn invalidate(&mut self, query: &CatalogQuery) -> bool {
        self.entries.remove(query).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, query: &CatalogQuery) -> bool {
        self.entries.contains_key(query)
    }
}

//! Medicine catalog client: the data source behind the medicine list.
//!
//! One request per page: `GET {base_url}/medecines/?skip=..&limit=..`.
//! No retries; callers decide what to do with a `FetchError`.

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::pagination::PageRequest;
use crate::protocol::CatalogRecord;

/// The only error text ever shown to the user for a failed page load.
pub const FETCH_ERROR_MESSAGE: &str =
    "Erreur lors du chargement des médicaments. Veuillez réessayer plus tard.";

const MEDICINES_PATH: &str = "medecines/";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("catalog service returned status {0}")]
    Status(u16),
    #[error("failed to decode catalog page: {0}")]
    Decode(String),
}

impl FetchError {
    /// Generic, fixed-language message for display.
    pub fn user_message(&self) -> &'static str {
        FETCH_ERROR_MESSAGE
    }
}

pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<CatalogRecord>, FetchError>> + Send + 'a>>;

/// Anything that can serve one page of the catalog.
pub trait CatalogSource: Send + Sync {
    fn fetch_page(&self, request: PageRequest) -> FetchFuture<'_>;
}

/// HTTP implementation backed by `reqwest`.
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    endpoint: reqwest::Url,
}

impl CatalogClient {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let endpoint = medicines_endpoint(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(FetchError::Transport)?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }

    pub async fn fetch_page(&self, request: PageRequest) -> Result<Vec<CatalogRecord>, FetchError> {
        debug!(
            "[catalog] GET {} skip={} limit={}",
            self.endpoint,
            request.offset(),
            request.page_size
        );
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[
                ("skip", request.offset().to_string()),
                ("limit", request.page_size.to_string()),
            ])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!("[catalog] transport error: {}", e);
                FetchError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("[catalog] service returned {}", status);
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(FetchError::Transport)?;
        let records: Vec<CatalogRecord> = serde_json::from_slice(&body).map_err(|e| {
            warn!("[catalog] decode error: {}", e);
            FetchError::Decode(e.to_string())
        })?;
        debug!("[catalog] page {} -> {} records", request.page_index, records.len());
        Ok(records)
    }
}

impl CatalogSource for CatalogClient {
    fn fetch_page(&self, request: PageRequest) -> FetchFuture<'_> {
        Box::pin(CatalogClient::fetch_page(self, request))
    }
}

/// Join the base url and `medecines/`, tolerating a missing trailing slash.
pub fn medicines_endpoint(base_url: &str) -> Result<reqwest::Url, FetchError> {
    let invalid = |reason: String| FetchError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };
    let mut base = reqwest::Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(invalid("url cannot be a base".to_string()));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(MEDICINES_PATH).map_err(|e| invalid(e.to_string()))
}

/// In-memory source: serves pages by slicing a fixed list.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<CatalogRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<CatalogRecord>) -> Self {
        Self { records }
    }

    pub fn page(&self, request: PageRequest) -> Vec<CatalogRecord> {
        self.records
            .iter()
            .skip(request.offset())
            .take(request.page_size)
            .cloned()
            .collect()
    }
}

impl CatalogSource for StaticSource {
    fn fetch_page(&self, request: PageRequest) -> FetchFuture<'_> {
        let page = self.page(request);
        Box::pin(async move { Ok(page) })
    }
}

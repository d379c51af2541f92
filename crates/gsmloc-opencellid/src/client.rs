use std::time::Duration;

use gsmloc_core::CellIdentity;
use reqwest::{Client, Url};

use crate::error::LookupError;
use crate::response::{AttributePath, ResponseDocument};

pub const DEFAULT_BASE_URL: &str = gsmloc_core::config::DEFAULT_LOOKUP_URL;

const STATUS_PATH: &str = "/rsp/@stat";

/// Connection parameters for [`OpenCellIdClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub latitude_path: String,
    pub longitude_path: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: 30,
            user_agent: "gsmloc/0.1 (cell-location)".to_string(),
            latitude_path: gsmloc_core::config::DEFAULT_LATITUDE_PATH.to_string(),
            longitude_path: gsmloc_core::config::DEFAULT_LONGITUDE_PATH.to_string(),
        }
    }
}

impl ClientSettings {
    /// Default settings pointed at `base_url` (for testing with wiremock).
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl From<&gsmloc_core::AppConfig> for ClientSettings {
    fn from(config: &gsmloc_core::AppConfig) -> Self {
        Self {
            base_url: config.lookup_url.clone(),
            api_key: config.opencellid_api_key.clone(),
            timeout_secs: config.lookup_timeout_secs,
            user_agent: config.user_agent.clone(),
            latitude_path: config.latitude_path.clone(),
            longitude_path: config.longitude_path.clone(),
        }
    }
}

/// Coordinates found in a lookup answer. Each is `None` when its attribute
/// is missing or unparsable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LookupResponse {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Client for the OpenCellID `cell/get` endpoint.
///
/// Immutable after construction; share it behind an `Arc` or by reference.
pub struct OpenCellIdClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    latitude_path: AttributePath,
    longitude_path: AttributePath,
    status_path: AttributePath,
}

impl OpenCellIdClient {
    /// Builds the HTTP client and validates the base URL and attribute paths.
    ///
    /// # Errors
    ///
    /// - [`LookupError::Request`] if the `reqwest::Client` cannot be built.
    /// - [`LookupError::InvalidBaseUrl`] if `base_url` does not parse.
    /// - [`LookupError::InvalidPath`] if either attribute path is malformed.
    pub fn new(settings: &ClientSettings) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(settings.user_agent.as_str())
            .build()?;

        let base_url = Url::parse(&settings.base_url).map_err(|e| LookupError::InvalidBaseUrl {
            url: settings.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            api_key: settings.api_key.clone(),
            latitude_path: settings.latitude_path.parse()?,
            longitude_path: settings.longitude_path.parse()?,
            status_path: STATUS_PATH.parse()?,
        })
    }

    /// Looks up the coordinates of `cell`.
    ///
    /// An answer without coordinates is not an error: the missing fields are
    /// simply `None`.
    ///
    /// # Errors
    ///
    /// - [`LookupError::Request`] on network failure, timeout, or a non-2xx
    ///   status.
    /// - [`LookupError::ResponseParse`] if the body is not well-formed XML.
    pub async fn lookup(&self, cell: &CellIdentity) -> Result<LookupResponse, LookupError> {
        let url = self.build_url(cell);
        tracing::debug!(
            mcc = %cell.mcc,
            mnc = %cell.mnc,
            lac = cell.lac,
            cid = cell.cid,
            "querying cell location"
        );

        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        let document = ResponseDocument::parse(&body)?;

        if document.attribute(&self.status_path) == Some("fail") {
            tracing::warn!(
                mcc = %cell.mcc,
                mnc = %cell.mnc,
                lac = cell.lac,
                cid = cell.cid,
                "lookup service reported failure for cell"
            );
        }

        Ok(LookupResponse {
            latitude: document.get_f64(&self.latitude_path),
            longitude: document.get_f64(&self.longitude_path),
        })
    }

    /// Appends the cell identity (and API key, when set) to the base URL.
    fn build_url(&self, cell: &CellIdentity) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("mcc", &cell.mcc);
            pairs.append_pair("mnc", &cell.mnc);
            pairs.append_pair("lac", &cell.lac.to_string());
            pairs.append_pair("cellid", &cell.cid.to_string());
            if let Some(key) = &self.api_key {
                pairs.append_pair("key", key);
            }
        }
        url
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

use gsmloc_opencellid::LookupError;
use thiserror::Error;

/// Message carried by every pipeline failure reported to callers.
pub const CELL_DATA_UNAVAILABLE: &str = "cell data unavailable";

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The pipeline could not produce a position. Stage details are logged,
    /// not returned.
    #[error("position not available: {0}")]
    NotAvailable(String),

    /// The lookup client could not be built from the configuration.
    #[error("lookup client setup failed: {0}")]
    Setup(#[from] LookupError),
}

impl ProviderError {
    pub(crate) fn cell_data_unavailable() -> Self {
        Self::NotAvailable(CELL_DATA_UNAVAILABLE.to_string())
    }
}

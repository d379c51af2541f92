//! The gsmloc position provider facade.
//!
//! [`Provider`] ties the pipeline together: modem session, identifier
//! normalization, OpenCellID lookup, and position synthesis. It is the only
//! thing the server and CLI talk to.

pub mod error;
pub mod provider;

pub use error::{ProviderError, CELL_DATA_UNAVAILABLE};
pub use provider::{Provider, ProviderInfo, PROVIDER_DESCRIPTION, PROVIDER_NAME};

//! Client for the OpenCellID `cell/get` lookup service.
//!
//! Sends a normalized [`gsmloc_core::CellIdentity`] as query parameters and
//! pulls latitude and longitude out of the XML answer by attribute path. The
//! two coordinates are extracted independently: a missing longitude never
//! hides a present latitude.

pub mod client;
pub mod error;
pub mod response;

pub use client::{ClientSettings, LookupResponse, OpenCellIdClient, DEFAULT_BASE_URL};
pub use error::LookupError;
pub use response::{AttributePath, ResponseDocument};

//! Core data model for the gsmloc position provider.
//!
//! Holds the cell identity types shared by every stage of the pipeline, the
//! pure identifier normalizer, the position synthesizer, and the environment
//! driven application configuration.

pub mod app_config;
pub mod config;
pub mod error;
pub mod normalize;
pub mod position;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, NormalizeError};
pub use normalize::{hex_to_decimal, normalize, split_network_code};
pub use position::synthesize;
pub use types::{
    Accuracy, AccuracyLevel, CellIdentity, PositionField, PositionFields, PositionResult,
    ProviderStatus, RawNetworkInfo,
};

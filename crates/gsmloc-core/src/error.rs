use thiserror::Error;

/// Errors raised while loading [`crate::AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors raised while turning modem output into a [`crate::CellIdentity`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// The network code did not contain both an MCC and an MNC.
    #[error("malformed network code {0:?}: expected \"MCC MNC\"")]
    MalformedNetworkCode(String),

    /// A LAC or CID was empty, held a non-hex character, or overflowed.
    #[error("invalid hexadecimal value {0:?}")]
    HexDecode(String),
}

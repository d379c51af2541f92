use async_trait::async_trait;
use gsmloc_core::RawNetworkInfo;

use crate::error::BackendError;

/// The calls a [`crate::ModemSession`] needs from a modem driver.
///
/// Calls are made in order: `find_config`, `read_config`, `connect`,
/// `network_info`, then `disconnect` whenever `is_connected` is true.
/// `connect` may take tens of seconds when a configured modem is absent.
#[async_trait]
pub trait ModemBackend: Send {
    /// Locates the modem configuration source.
    async fn find_config(&mut self) -> Result<(), BackendError>;

    /// Loads the profile at `profile_index` from the located configuration.
    async fn read_config(&mut self, profile_index: u32) -> Result<(), BackendError>;

    /// Opens a connection, letting the driver try up to `retries` times.
    async fn connect(&mut self, retries: u32) -> Result<(), BackendError>;

    fn is_connected(&self) -> bool;

    /// Reads the current network registration.
    async fn network_info(&mut self) -> Result<RawNetworkInfo, BackendError>;

    async fn disconnect(&mut self) -> Result<(), BackendError>;
}

#[async_trait]
impl<B: ModemBackend + ?Sized> ModemBackend for Box<B> {
    async fn find_config(&mut self) -> Result<(), BackendError> {
        (**self).find_config().await
    }

    async fn read_config(&mut self, profile_index: u32) -> Result<(), BackendError> {
        (**self).read_config(profile_index).await
    }

    async fn connect(&mut self, retries: u32) -> Result<(), BackendError> {
        (**self).connect(retries).await
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    async fn network_info(&mut self) -> Result<RawNetworkInfo, BackendError> {
        (**self).network_info().await
    }

    async fn disconnect(&mut self) -> Result<(), BackendError> {
        (**self).disconnect().await
    }
}

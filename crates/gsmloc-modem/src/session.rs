//! One-shot cell identity acquisition over a [`ModemBackend`].
//!
//! Each call to [`ModemSession::acquire_cell_identity`] walks
//! `Idle → Configuring → Connecting → QueryingNetworkInfo → Disconnecting → Idle`.
//! Any stage can fail, which leaves the session in [`SessionState::Failed`]
//! until the next acquisition. Once a connection exists it is always torn
//! down before returning, whatever the outcome.

use std::time::Duration;

use gsmloc_core::RawNetworkInfo;

use crate::backend::ModemBackend;
use crate::error::ModemError;

/// Profile index used when none is configured: the first configuration.
pub const DEFAULT_PROFILE_INDEX: u32 = 0;
/// Retry count handed to the backend's connect call.
pub const DEFAULT_CONNECT_RETRIES: u32 = 3;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Configuring,
    Connecting,
    QueryingNetworkInfo,
    Disconnecting,
    Failed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Configuring => "configuring",
            SessionState::Connecting => "connecting",
            SessionState::QueryingNetworkInfo => "querying_network_info",
            SessionState::Disconnecting => "disconnecting",
            SessionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub profile_index: u32,
    pub connect_retries: u32,
    /// Upper bound on the connect stage. The backend call is dropped when it
    /// elapses.
    pub connect_timeout: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            profile_index: DEFAULT_PROFILE_INDEX,
            connect_retries: DEFAULT_CONNECT_RETRIES,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl From<&gsmloc_core::AppConfig> for SessionSettings {
    fn from(config: &gsmloc_core::AppConfig) -> Self {
        Self {
            profile_index: config.modem_profile,
            connect_retries: config.modem_connect_retries,
            connect_timeout: Duration::from_secs(config.modem_connect_timeout_secs),
        }
    }
}

pub struct ModemSession<B> {
    backend: B,
    settings: SessionSettings,
    state: SessionState,
}

impl<B: ModemBackend> ModemSession<B> {
    pub fn new(backend: B, settings: SessionSettings) -> Self {
        Self {
            backend,
            settings,
            state: SessionState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Acquires one reading of the cell the modem is registered on.
    ///
    /// # Errors
    ///
    /// - [`ModemError::Config`] if no configuration is found or it cannot be read.
    /// - [`ModemError::Connection`] if the backend fails to connect.
    /// - [`ModemError::ConnectTimeout`] if connecting exceeds the configured timeout.
    /// - [`ModemError::NetworkInfo`] if the registration query fails.
    ///
    /// Disconnect failures are logged and never returned.
    ///
    /// # Cancellation
    ///
    /// Disconnecting happens after the stages, so a future dropped mid-way
    /// leaves the backend connected. Callers that may be cancelled should
    /// run this on its own task and await the handle.
    pub async fn acquire_cell_identity(&mut self) -> Result<RawNetworkInfo, ModemError> {
        let result = self.query().await;

        if self.backend.is_connected() {
            self.transition(SessionState::Disconnecting);
            if let Err(e) = self.backend.disconnect().await {
                tracing::warn!(error = %e, "modem disconnect failed; ignoring");
            }
        }

        match &result {
            Ok(info) => {
                tracing::debug!(
                    network_code = %info.network_code,
                    lac = %info.lac,
                    cid = %info.cid,
                    "modem reported network info"
                );
                self.transition(SessionState::Idle);
            }
            Err(e) => {
                tracing::warn!(error = %e, "cell identity acquisition failed");
                self.transition(SessionState::Failed);
            }
        }

        result
    }

    async fn query(&mut self) -> Result<RawNetworkInfo, ModemError> {
        self.transition(SessionState::Configuring);
        self.backend.find_config().await.map_err(ModemError::Config)?;
        self.backend
            .read_config(self.settings.profile_index)
            .await
            .map_err(ModemError::Config)?;

        self.transition(SessionState::Connecting);
        let timeout = self.settings.connect_timeout;
        match tokio::time::timeout(timeout, self.backend.connect(self.settings.connect_retries))
            .await
        {
            Err(_elapsed) => return Err(ModemError::ConnectTimeout(timeout)),
            Ok(Err(e)) => return Err(ModemError::Connection(e)),
            Ok(Ok(())) => {}
        }

        self.transition(SessionState::QueryingNetworkInfo);
        self.backend
            .network_info()
            .await
            .map_err(ModemError::NetworkInfo)
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!(from = %self.state, to = %next, "modem session state");
        self.state = next;
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

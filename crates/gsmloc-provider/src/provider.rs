use std::fmt::Display;
use std::sync::Arc;

use gsmloc_core::{AppConfig, CellIdentity, PositionResult, ProviderStatus};
use gsmloc_modem::{GammuCli, ModemBackend, ModemSession, SessionSettings};
use gsmloc_opencellid::{ClientSettings, OpenCellIdClient};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::error::ProviderError;

type SharedSession = Arc<Mutex<ModemSession<Box<dyn ModemBackend>>>>;

pub const PROVIDER_NAME: &str = "Gsmloc";
pub const PROVIDER_DESCRIPTION: &str = "opencellid.org and gammu based provider";

/// Name and description published by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Position provider backed by the serving cell.
///
/// Position requests hold the session lock for the whole pipeline, so they
/// run one at a time. Status and info never take the lock.
///
/// The pipeline runs on its own task. A caller that goes away mid-request
/// (an HTTP client hanging up, a timeout) only stops waiting; the modem
/// session still runs to completion and disconnects.
pub struct Provider {
    session: SharedSession,
    lookup: Arc<OpenCellIdClient>,
    shutdown: watch::Sender<bool>,
}

impl Provider {
    #[must_use]
    pub fn new(
        backend: Box<dyn ModemBackend>,
        settings: SessionSettings,
        lookup: OpenCellIdClient,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            session: Arc::new(Mutex::new(ModemSession::new(backend, settings))),
            lookup: Arc::new(lookup),
            shutdown,
        }
    }

    /// Builds the production provider: gammu backend plus OpenCellID client.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Setup`] if the lookup client cannot be built
    /// from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let backend = GammuCli::new(config.gammu_bin.clone(), config.gammurc_path.clone());
        let lookup = OpenCellIdClient::new(&ClientSettings::from(config))?;
        Ok(Self::new(
            Box::new(backend),
            SessionSettings::from(config),
            lookup,
        ))
    }

    /// Always [`ProviderStatus::Available`]; the modem is not queried.
    #[must_use]
    pub fn status(&self) -> ProviderStatus {
        ProviderStatus::Available
    }

    #[must_use]
    pub fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: PROVIDER_NAME,
            description: PROVIDER_DESCRIPTION,
        }
    }

    /// Reads and normalizes the identity of the serving cell.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotAvailable`] if the modem or the
    /// normalizer fails.
    pub async fn cell_identity(&self) -> Result<CellIdentity, ProviderError> {
        let session = Arc::clone(&self.session);
        join(tokio::spawn(async move {
            let mut session = session.lock_owned().await;
            read_cell(&mut session).await
        }))
        .await
    }

    /// Runs the full pipeline once.
    ///
    /// A lookup answer without coordinates is a success with no fields set.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotAvailable`] if any stage fails.
    pub async fn position(&self) -> Result<PositionResult, ProviderError> {
        let started_at = chrono::Utc::now().timestamp();
        let session = Arc::clone(&self.session);
        let lookup = Arc::clone(&self.lookup);

        let (cell, found) = join(tokio::spawn(async move {
            let mut session = session.lock_owned().await;
            let cell = read_cell(&mut session).await?;
            let found = lookup
                .lookup(&cell)
                .await
                .map_err(|e| unavailable("lookup", &e))?;
            Ok::<_, ProviderError>((cell, found))
        }))
        .await?;

        let position = gsmloc_core::synthesize(
            started_at,
            found.latitude,
            found.longitude,
            None,
        );
        tracing::info!(
            mcc = %cell.mcc,
            mnc = %cell.mnc,
            lac = cell.lac,
            cid = cell.cid,
            fields = ?position.fields,
            "position resolved"
        );
        Ok(position)
    }

    /// Asks the hosting process to stop. Idempotent.
    pub fn shutdown(&self) {
        tracing::info!("shutdown requested");
        self.shutdown.send_replace(true);
    }

    /// Resolves once [`Provider::shutdown`] has been called.
    pub async fn shutdown_requested(&self) {
        let mut rx = self.shutdown.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|requested| *requested).await;
    }

    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        *self.shutdown.borrow()
    }
}

async fn read_cell(
    session: &mut ModemSession<Box<dyn ModemBackend>>,
) -> Result<CellIdentity, ProviderError> {
    let raw = session
        .acquire_cell_identity()
        .await
        .map_err(|e| unavailable("modem", &e))?;
    gsmloc_core::normalize(&raw).map_err(|e| unavailable("normalize", &e))
}

async fn join<T>(task: JoinHandle<Result<T, ProviderError>>) -> Result<T, ProviderError> {
    task.await.map_err(|e| unavailable("pipeline", &e))?
}

fn unavailable(stage: &'static str, error: &dyn Display) -> ProviderError {
    tracing::warn!(stage, error = %error, "position pipeline failed");
    ProviderError::cell_data_unavailable()
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;

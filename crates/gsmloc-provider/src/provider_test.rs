use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gsmloc_core::RawNetworkInfo;
use gsmloc_modem::BackendError;

use super::*;

/// Backend whose connect always fails, as with an unplugged modem.
struct UnpluggedModem;

#[async_trait]
impl ModemBackend for UnpluggedModem {
    async fn find_config(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn read_config(&mut self, _profile_index: u32) -> Result<(), BackendError> {
        Ok(())
    }

    async fn connect(&mut self, _retries: u32) -> Result<(), BackendError> {
        Err(BackendError::CommandFailed {
            command: "gammu identify".to_string(),
            stderr: "Error opening device".to_string(),
        })
    }

    fn is_connected(&self) -> bool {
        false
    }

    async fn network_info(&mut self) -> Result<RawNetworkInfo, BackendError> {
        Err(BackendError::NotConnected)
    }

    async fn disconnect(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
}

fn unplugged_provider() -> Provider {
    // Never contacted: the pipeline fails before the lookup stage.
    let lookup = OpenCellIdClient::new(&ClientSettings::with_base_url(
        "http://127.0.0.1:9/cell/get",
    ))
    .expect("client construction should not fail");
    Provider::new(Box::new(UnpluggedModem), SessionSettings::default(), lookup)
}

/// Backend that connects, then takes a while to report the network.
struct SlowModem {
    connected: bool,
    disconnects: Arc<AtomicUsize>,
}

#[async_trait]
impl ModemBackend for SlowModem {
    async fn find_config(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn read_config(&mut self, _profile_index: u32) -> Result<(), BackendError> {
        Ok(())
    }

    async fn connect(&mut self, _retries: u32) -> Result<(), BackendError> {
        self.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn network_info(&mut self) -> Result<RawNetworkInfo, BackendError> {
        tokio::time::sleep(Duration::from_millis(300)).await;
        Ok(RawNetworkInfo {
            network_code: "246 81".to_string(),
            lac: "1A2B".to_string(),
            cid: "3F".to_string(),
        })
    }

    async fn disconnect(&mut self) -> Result<(), BackendError> {
        self.connected = false;
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

async fn wait_for_disconnects(counter: &AtomicUsize, expected: usize) {
    for _ in 0..100 {
        if counter.load(Ordering::SeqCst) >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!(
        "expected {expected} disconnects, saw {}",
        counter.load(Ordering::SeqCst)
    );
}

#[tokio::test]
async fn abandoned_position_request_still_disconnects_the_modem() {
    let disconnects = Arc::new(AtomicUsize::new(0));
    let lookup = OpenCellIdClient::new(&ClientSettings::with_base_url(
        "http://127.0.0.1:9/cell/get",
    ))
    .expect("client construction should not fail");
    let provider = Provider::new(
        Box::new(SlowModem {
            connected: false,
            disconnects: Arc::clone(&disconnects),
        }),
        SessionSettings::default(),
        lookup,
    );

    let abandoned =
        tokio::time::timeout(Duration::from_millis(20), provider.position()).await;
    assert!(abandoned.is_err(), "request should still be in flight");

    wait_for_disconnects(&disconnects, 1).await;

    let cell = provider
        .cell_identity()
        .await
        .expect("session should be usable after an abandoned request");
    assert_eq!(cell.lac, 6699);
    assert_eq!(disconnects.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn abandoned_cell_identity_request_still_disconnects_the_modem() {
    let disconnects = Arc::new(AtomicUsize::new(0));
    let lookup = OpenCellIdClient::new(&ClientSettings::default())
        .expect("client construction should not fail");
    let provider = Provider::new(
        Box::new(SlowModem {
            connected: false,
            disconnects: Arc::clone(&disconnects),
        }),
        SessionSettings::default(),
        lookup,
    );

    drop(tokio::time::timeout(Duration::from_millis(20), provider.cell_identity()).await);

    wait_for_disconnects(&disconnects, 1).await;
}

#[test]
fn info_names_the_provider() {
    let info = unplugged_provider().info();
    assert_eq!(info.name, "Gsmloc");
    assert_eq!(info.description, "opencellid.org and gammu based provider");
}

#[tokio::test]
async fn failed_connect_is_not_available_and_status_stays_available() {
    let provider = unplugged_provider();

    let err = provider.position().await.unwrap_err();

    assert!(
        matches!(err, ProviderError::NotAvailable(ref m) if m == "cell data unavailable"),
        "got {err:?}"
    );
    assert_eq!(provider.status(), ProviderStatus::Available);
}

#[tokio::test]
async fn failed_connect_fails_cell_identity_too() {
    let provider = unplugged_provider();
    assert!(matches!(
        provider.cell_identity().await,
        Err(ProviderError::NotAvailable(_))
    ));
}

#[tokio::test]
async fn shutdown_wakes_waiters() {
    let provider = Arc::new(unplugged_provider());
    assert!(!provider.is_shutdown_requested());

    let waiter = {
        let provider = Arc::clone(&provider);
        tokio::spawn(async move { provider.shutdown_requested().await })
    };
    provider.shutdown();

    tokio::time::timeout(Duration::from_secs(5), waiter)
        .await
        .expect("waiter should wake")
        .expect("waiter task should not panic");
    assert!(provider.is_shutdown_requested());
}

#[tokio::test]
async fn shutdown_before_waiting_resolves_immediately() {
    let provider = unplugged_provider();
    provider.shutdown();
    provider.shutdown();

    tokio::time::timeout(Duration::from_secs(5), provider.shutdown_requested())
        .await
        .expect("already-requested shutdown should resolve");
}

#[test]
fn from_config_rejects_bad_lookup_url() {
    let mut config = test_app_config();
    config.lookup_url = "::not a url::".to_string();
    assert!(matches!(
        Provider::from_config(&config),
        Err(ProviderError::Setup(_))
    ));
}

#[test]
fn from_config_builds_with_defaults() {
    let provider = Provider::from_config(&test_app_config()).expect("defaults should build");
    assert_eq!(provider.status(), ProviderStatus::Available);
}

fn test_app_config() -> AppConfig {
    AppConfig {
        env: gsmloc_core::Environment::Test,
        bind_addr: "127.0.0.1:0".parse().expect("valid addr"),
        log_level: "debug".to_string(),
        api_keys: Vec::new(),
        lookup_url: gsmloc_opencellid::DEFAULT_BASE_URL.to_string(),
        opencellid_api_key: None,
        lookup_timeout_secs: 30,
        user_agent: "gsmloc-test".to_string(),
        latitude_path: gsmloc_core::config::DEFAULT_LATITUDE_PATH.to_string(),
        longitude_path: gsmloc_core::config::DEFAULT_LONGITUDE_PATH.to_string(),
        gammu_bin: "gammu".to_string(),
        gammurc_path: None,
        modem_profile: 0,
        modem_connect_retries: 3,
        modem_connect_timeout_secs: 60,
    }
}

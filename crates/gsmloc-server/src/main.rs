mod api;
mod middleware;

use std::sync::Arc;

use gsmloc_provider::Provider;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::ControlAuth,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = gsmloc_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "loaded configuration");

    let provider = Arc::new(Provider::from_config(&config)?);
    let auth = ControlAuth::from_config(&config)?;
    let app = build_app(
        AppState {
            provider: Arc::clone(&provider),
        },
        auth,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "gsmloc server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(provider))
        .await?;
    Ok(())
}

async fn shutdown_signal(provider: Arc<Provider>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
        () = provider.shutdown_requested() => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}

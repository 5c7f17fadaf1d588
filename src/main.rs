// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use kubepulse::config::Config;
use kubepulse::health::HealthService;
use kubepulse::server::{serve, AppState};
use kubepulse::kubernetes::{initialize, PodLister};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting kubepulse");

    // Load configuration
    let config = Config::from_env()?;
    config.log_settings();
    info!(
        "Configuration loaded: namespace={}, api_prefix={}",
        config.namespace, config.api_prefix
    );

    // Resolve credentials and build clients once; everything below shares them
    let bootstrapped = initialize(&config).await?;
    info!("Kubernetes credentials: {:?}", bootstrapped.credentials);

    let health = HealthService::new(bootstrapped.checker);
    let pods = PodLister::new(bootstrapped.clients.core_v1.clone(), config.namespace.clone());
    let state = Arc::new(AppState::from_config(health, pods, &config));

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    serve(listener, state, shutdown_signal()).await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! One-time Kubernetes client initialization at service startup

use crate::config::Config;
use crate::constants::probe::DEFAULT_TIMEOUT;
use crate::error::Result;
use crate::health::{CheckOptions, HealthChecker};
use crate::kubernetes::client::{
    in_cluster_from_env, resolve_credentials, ClusterCredentials, KubeClients,
};
use crate::types::HealthCheckResult;
use tracing::{error, info};

/// Everything the rest of the service needs from the cluster connection
pub struct Bootstrapped {
    pub clients: KubeClients,
    pub credentials: ClusterCredentials,
    pub checker: HealthChecker,
}

/// Resolve credentials, build the clients, and run one diagnostic probe.
///
/// Credential problems degrade to default resolution and never fail startup;
/// only client construction errors are returned.
pub async fn initialize(config: &Config) -> Result<Bootstrapped> {
    info!("=============== Kubernetes - Initializing Kubernetes client... ===============");

    let (kube_config, credentials) =
        resolve_credentials(in_cluster_from_env(), &config.local_config_path).await;

    let clients = KubeClients::from_config(kube_config)?;
    info!("Kubernetes API server: {}", clients.config.cluster_url);
    let checker = HealthChecker::new(clients.core_v1.clone());

    let result = checker.check(CheckOptions::fresh(DEFAULT_TIMEOUT)).await;
    log_startup_probe(&result);

    info!("=============== Kubernetes - Initialization complete =========================");

    Ok(Bootstrapped {
        clients,
        credentials,
        checker,
    })
}

fn log_startup_probe(result: &HealthCheckResult) {
    match result.error() {
        None => info!(
            "Kubernetes health check: success ({}ms, {})",
            result.latency_ms(),
            result.mode().as_str()
        ),
        Some(err) => error!(
            kind = err.kind.as_str(),
            status_code = ?err.status_code,
            mode = result.mode().as_str(),
            latency_ms = result.latency_ms(),
            checked_at = %result.checked_at(),
            "Kubernetes health check - failed ({}): {}",
            err.kind.as_str(),
            err.message
        ),
    }
}

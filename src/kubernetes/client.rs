// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Credential resolution and Kubernetes client construction

use crate::constants::{defaults, env as keys};
use crate::error::{KubePulseError, Result};
use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResourceList;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config as KConfig};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Where the cluster credentials came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterCredentials {
    /// Mounted service-account token of the pod we run in
    InCluster,
    /// Explicit kubeconfig file
    OutOfClusterFile(PathBuf),
    /// Whatever default resolution produced after the preferred source failed
    DefaultFallback,
}

/// Both in-cluster signals must be present and non-empty
pub fn is_in_cluster(host: Option<&str>, port: Option<&str>) -> bool {
    matches!((host, port), (Some(h), Some(p)) if !h.is_empty() && !p.is_empty())
}

/// Read the in-cluster signal from the process environment
pub fn in_cluster_from_env() -> bool {
    let host = env::var(keys::SERVICE_HOST).ok();
    let port = env::var(keys::SERVICE_PORT).ok();
    is_in_cluster(host.as_deref(), port.as_deref())
}

/// Resolve client configuration. Never fails: any error loading the preferred
/// credentials is logged and replaced by default resolution.
pub async fn resolve_credentials(
    in_cluster: bool,
    local_config_path: &Path,
) -> (KConfig, ClusterCredentials) {
    let preferred = if in_cluster {
        KConfig::incluster()
            .map(|c| (c, ClusterCredentials::InCluster))
            .map_err(|e| e.to_string())
    } else {
        let path = resolve_local_path(local_config_path);
        load_kubeconfig_file(&path)
            .await
            .map(|c| (c, ClusterCredentials::OutOfClusterFile(path)))
    };

    match preferred {
        Ok((config, ClusterCredentials::InCluster)) => {
            info!("Kubernetes auth: in-cluster (ServiceAccount)");
            (config, ClusterCredentials::InCluster)
        }
        Ok((config, credentials)) => {
            info!("Kubernetes auth: out-of-cluster (using local kubeconfig file)");
            (config, credentials)
        }
        Err(e) => {
            error!("Kubeconfig file load failed: {}", e);
            let config = default_config().await;
            warn!("Kubernetes auth: fallback to default path (~/.kube/config)");
            (config, ClusterCredentials::DefaultFallback)
        }
    }
}

/// Resolve a kubeconfig path relative to the working directory
fn resolve_local_path(path: &Path) -> PathBuf {
    match env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

async fn load_kubeconfig_file(path: &Path) -> std::result::Result<KConfig, String> {
    let kubeconfig = Kubeconfig::read_from(path)
        .map_err(|e| format!("{}: {}", path.display(), e))?;

    KConfig::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|e| format!("{}: {}", path.display(), e))
}

/// Default resolution ($KUBECONFIG, ~/.kube/config, in-cluster). If nothing
/// resolves, point at the conventional local apiserver address unauthenticated.
async fn default_config() -> KConfig {
    match KConfig::infer().await {
        Ok(config) => config,
        Err(e) => {
            warn!(
                "Default kubeconfig resolution failed: {}, using {}",
                e,
                defaults::FALLBACK_CLUSTER_URL
            );
            KConfig::new(http::Uri::from_static(defaults::FALLBACK_CLUSTER_URL))
        }
    }
}

/// Typed client for the core (`v1`) API group
#[derive(Clone)]
pub struct CoreV1Client {
    client: Client,
}

impl CoreV1Client {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Lightweight discovery call (`GET /api/v1`)
    pub async fn api_resources(&self) -> std::result::Result<APIResourceList, kube::Error> {
        self.client.list_core_api_resources("v1").await
    }

    pub fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

/// Typed client for the `apps/v1` API group
#[derive(Clone)]
pub struct AppsV1Client {
    client: Client,
}

impl AppsV1Client {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Discovery call for the group (`GET /apis/apps/v1`), the counterpart of
    /// [`CoreV1Client::api_resources`]
    pub async fn api_resources(&self) -> std::result::Result<APIResourceList, kube::Error> {
        self.client.list_api_group_resources("apps/v1").await
    }
}

/// Resolved configuration plus the typed clients built from it
#[derive(Clone)]
pub struct KubeClients {
    pub config: KConfig,
    pub core_v1: CoreV1Client,
    pub apps_v1: AppsV1Client,
}

impl KubeClients {
    /// Build the clients. Failure here is fatal for startup.
    pub fn from_config(config: KConfig) -> Result<Self> {
        let client = Client::try_from(config.clone())
            .map_err(|e| KubePulseError::KubeconfigError(format!("Failed to create client: {}", e)))?;
        Ok(Self::from_client(config, client))
    }

    /// Wrap an existing client, e.g. one backed by a custom tower service
    pub fn from_client(config: KConfig, client: Client) -> Self {
        Self {
            config,
            core_v1: CoreV1Client::new(client.clone()),
            apps_v1: AppsV1Client::new(client),
        }
    }
}

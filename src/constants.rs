// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Environment variable names read by the service
pub mod env {
    /// Set by the kubelet inside every pod; half of the in-cluster signal
    pub const SERVICE_HOST: &str = "KUBERNETES_SERVICE_HOST";
    /// Set by the kubelet inside every pod; other half of the in-cluster signal
    pub const SERVICE_PORT: &str = "KUBERNETES_SERVICE_PORT";

    pub const APP_ENV: &str = "APP_ENV";
    pub const APP_PORT: &str = "APP_PORT";
    pub const API_PREFIX: &str = "API_PREFIX";
    pub const CORS_ORIGINS: &str = "CORS_ORIGINS";
    pub const NAMESPACE: &str = "KUBERNETES_NAMESPACE";
    pub const LOCAL_CONFIG_PATH: &str = "KUBERNETES_LOCAL_CONFIG_PATH";
}

/// Configuration defaults
pub mod defaults {
    pub const APP_PORT: u16 = 3000;
    pub const API_PREFIX: &str = "api";
    pub const NAMESPACE: &str = "default";
    pub const LOCAL_CONFIG_PATH: &str = "./kube/kubeconfig.yaml";
    /// Apiserver address used when no credentials can be resolved at all
    pub const FALLBACK_CLUSTER_URL: &str = "http://localhost:8080";
}

/// Kubernetes API health probe configuration
pub mod probe {
    use std::time::Duration;

    /// How long a probe result (success or failure) is served from cache
    pub const DEFAULT_TTL: Duration = Duration::from_millis(10_000);
    /// Upper bound for a single probe request
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1_500);
}

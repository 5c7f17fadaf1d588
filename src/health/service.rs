// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Health payload composition for the HTTP layer

use crate::health::checker::{CheckOptions, HealthChecker};
use crate::types::{HealthStatus, KubernetesHealth};
use chrono::Utc;

#[derive(Clone)]
pub struct HealthService {
    checker: HealthChecker,
}

impl HealthService {
    pub fn new(checker: HealthChecker) -> Self {
        Self { checker }
    }

    /// Without the API check only the process itself is reported, always `ok`.
    /// With it, an unreachable API turns the status into `degraded`.
    pub async fn get_health(&self, include_api_check: bool) -> KubernetesHealth {
        let timestamp = Utc::now();

        if !include_api_check {
            return KubernetesHealth {
                status: HealthStatus::Ok,
                timestamp,
                kubernetes_api: None,
            };
        }

        let api = self.checker.check(CheckOptions::default()).await;
        let status = if api.ok() {
            HealthStatus::Ok
        } else {
            HealthStatus::Degraded
        };

        KubernetesHealth {
            status,
            timestamp,
            kubernetes_api: Some(api),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubernetes::client::CoreV1Client;
    use crate::test_utils::{api_resource_list_json, status_json, MockService};

    fn service_for(mock: &MockService) -> HealthService {
        let checker = HealthChecker::new(CoreV1Client::new(mock.clone().into_client()))
            .with_mode_detector(|| false);
        HealthService::new(checker)
    }

    #[tokio::test]
    async fn test_without_api_check_never_probes() {
        let mock = MockService::new().on_get("/api/v1", 500, &status_json(500, "InternalError", "down"));
        let service = service_for(&mock);

        let health = service.get_health(false).await;

        assert_eq!(health.status, HealthStatus::Ok);
        assert!(health.kubernetes_api.is_none());
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_reachable_api_is_ok() {
        let mock = MockService::new().on_get("/api/v1", 200, &api_resource_list_json("v1", "pods", "Pod"));
        let service = service_for(&mock);

        let health = service.get_health(true).await;

        assert_eq!(health.status, HealthStatus::Ok);
        assert!(health.kubernetes_api.unwrap().ok());
    }

    #[tokio::test]
    async fn test_unreachable_api_is_degraded() {
        let mock = MockService::new().on_get("/api/v1", 401, &status_json(401, "Unauthorized", "Unauthorized"));
        let service = service_for(&mock);

        let health = service.get_health(true).await;

        assert_eq!(health.status, HealthStatus::Degraded);
        assert!(!health.kubernetes_api.unwrap().ok());
    }
}

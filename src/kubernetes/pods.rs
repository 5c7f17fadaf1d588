// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pod listing

use crate::error::Result;
use crate::kubernetes::client::CoreV1Client;
use k8s_openapi::api::core::v1::Pod;
use kube::api::ListParams;
use tracing::{error, instrument};

#[derive(Clone)]
pub struct PodLister {
    core_v1: CoreV1Client,
    default_namespace: String,
}

impl PodLister {
    pub fn new(core_v1: CoreV1Client, default_namespace: impl Into<String>) -> Self {
        Self {
            core_v1,
            default_namespace: default_namespace.into(),
        }
    }

    /// List pods in `namespace`, or the configured default namespace
    #[instrument(skip(self))]
    pub async fn list_pods(&self, namespace: Option<&str>) -> Result<Vec<Pod>> {
        let namespace = namespace.unwrap_or(self.default_namespace.as_str());

        match self.core_v1.pods(namespace).list(&ListParams::default()).await {
            Ok(list) => Ok(list.items),
            Err(e) => {
                error!("Failed to list pods in namespace \"{}\": {}", namespace, e);
                Err(e.into())
            }
        }
    }
}

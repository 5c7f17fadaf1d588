// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// How the service reaches the cluster API
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    InCluster,
    OutOfCluster,
}

impl Mode {
    pub fn from_in_cluster(in_cluster: bool) -> Self {
        if in_cluster {
            Mode::InCluster
        } else {
            Mode::OutOfCluster
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::InCluster => "in-cluster",
            Mode::OutOfCluster => "out-of-cluster",
        }
    }
}

/// Category of a failed Kubernetes API probe
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Timeout,
    Auth,
    Http,
    Network,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::Auth => "auth",
            ErrorKind::Http => "http",
            ErrorKind::Network => "network",
            ErrorKind::Unknown => "unknown",
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProbeError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// Outcome of one Kubernetes API reachability probe
#[derive(Clone, Debug, PartialEq)]
pub enum HealthCheckResult {
    Reachable {
        checked_at: DateTime<Utc>,
        latency_ms: u64,
        mode: Mode,
    },
    Unreachable {
        checked_at: DateTime<Utc>,
        latency_ms: u64,
        mode: Mode,
        error: ProbeError,
    },
}

impl HealthCheckResult {
    pub fn ok(&self) -> bool {
        matches!(self, HealthCheckResult::Reachable { .. })
    }

    pub fn checked_at(&self) -> DateTime<Utc> {
        match self {
            HealthCheckResult::Reachable { checked_at, .. }
            | HealthCheckResult::Unreachable { checked_at, .. } => *checked_at,
        }
    }

    pub fn latency_ms(&self) -> u64 {
        match self {
            HealthCheckResult::Reachable { latency_ms, .. }
            | HealthCheckResult::Unreachable { latency_ms, .. } => *latency_ms,
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            HealthCheckResult::Reachable { mode, .. }
            | HealthCheckResult::Unreachable { mode, .. } => *mode,
        }
    }

    pub fn error(&self) -> Option<&ProbeError> {
        match self {
            HealthCheckResult::Reachable { .. } => None,
            HealthCheckResult::Unreachable { error, .. } => Some(error),
        }
    }
}

/// Flat wire shape shared by both variants
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthCheckWire<'a> {
    ok: bool,
    checked_at: DateTime<Utc>,
    latency_ms: u64,
    mode: Mode,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a ProbeError>,
}

impl Serialize for HealthCheckResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        HealthCheckWire {
            ok: self.ok(),
            checked_at: self.checked_at(),
            latency_ms: self.latency_ms(),
            mode: self.mode(),
            error: self.error(),
        }
        .serialize(serializer)
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
}

/// Payload returned by the health endpoint
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesHealth {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubernetes_api: Option<HealthCheckResult>,
}

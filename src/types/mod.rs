// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Value types exchanged between the health checker, services, and the HTTP layer.

pub mod health;

pub use health::{ErrorKind, HealthCheckResult, HealthStatus, KubernetesHealth, Mode, ProbeError};

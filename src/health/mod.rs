// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes API health checking: probe, classification, and reporting.

pub mod checker;
pub mod classify;
pub mod service;

pub use checker::{CheckOptions, HealthChecker};
pub use classify::ProbeFailure;
pub use service::HealthService;

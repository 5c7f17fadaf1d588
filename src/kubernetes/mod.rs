// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for credential resolution, client construction, and pod listing.

pub mod bootstrap;
pub mod client;
pub mod pods;

pub use bootstrap::{initialize, Bootstrapped};
pub use client::{ClusterCredentials, KubeClients};
pub use pods::PodLister;

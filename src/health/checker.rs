// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cached, timeout-bounded Kubernetes API reachability probe

use crate::constants::probe::{DEFAULT_TIMEOUT, DEFAULT_TTL};
use crate::health::classify::ProbeFailure;
use crate::kubernetes::client::{in_cluster_from_env, CoreV1Client};
use crate::types::{HealthCheckResult, Mode};
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOptions {
    /// Maximum age of a cached result; zero forces a fresh probe
    pub ttl: Duration,
    /// Upper bound for the probe request
    pub timeout: Duration,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CheckOptions {
    /// Options for a one-off probe that bypasses the cache
    pub fn fresh(timeout: Duration) -> Self {
        Self {
            ttl: Duration::ZERO,
            timeout,
        }
    }
}

struct CachedProbe {
    /// When the probe that produced `value` started
    taken_at: Instant,
    value: HealthCheckResult,
}

type ModeDetector = Arc<dyn Fn() -> bool + Send + Sync>;

/// Probes the core API with a discovery call and caches the outcome,
/// failures included, for the requested TTL.
#[derive(Clone)]
pub struct HealthChecker {
    core_v1: CoreV1Client,
    cache: Arc<Mutex<Option<CachedProbe>>>,
    in_cluster: ModeDetector,
}

impl HealthChecker {
    pub fn new(core_v1: CoreV1Client) -> Self {
        Self {
            core_v1,
            cache: Arc::new(Mutex::new(None)),
            in_cluster: Arc::new(in_cluster_from_env),
        }
    }

    /// Replace the in-cluster signal source, consulted on every probe
    pub fn with_mode_detector<F>(mut self, detector: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.in_cluster = Arc::new(detector);
        self
    }

    /// Return a cached result if still fresh, otherwise probe the API.
    ///
    /// Never fails; every failure mode ends up in the returned result. The
    /// cache lock is only held to read or store, never across the probe, so
    /// every caller is bounded by its own timeout. Concurrent misses may each
    /// probe; the result of the most recently started probe wins the slot.
    #[instrument(skip(self))]
    pub async fn check(&self, options: CheckOptions) -> HealthCheckResult {
        if !options.ttl.is_zero() {
            let cache = self.cache.lock().await;
            if let Some(cached) = cache.as_ref() {
                if cached.taken_at.elapsed() < options.ttl {
                    debug!("Serving cached Kubernetes API health result");
                    return cached.value.clone();
                }
            }
        }

        let taken_at = Instant::now();
        let value = self.probe(options.timeout).await;

        let mut cache = self.cache.lock().await;
        // A slower probe that started earlier must not replace a newer result
        let stale = cache.as_ref().is_some_and(|c| c.taken_at > taken_at);
        if !stale {
            *cache = Some(CachedProbe {
                taken_at,
                value: value.clone(),
            });
        }

        value
    }

    async fn probe(&self, timeout: Duration) -> HealthCheckResult {
        let mode = Mode::from_in_cluster((self.in_cluster)());
        let start = Instant::now();

        // Both branches are owned by the select; the loser is dropped on return,
        // cancelling either the timer or the in-flight request.
        let outcome = tokio::select! {
            res = self.core_v1.api_resources() => res.map_err(|e| ProbeFailure::from(&e)),
            _ = tokio::time::sleep(timeout) => Err(ProbeFailure::timeout(timeout)),
        };

        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let checked_at = Utc::now();

        match outcome {
            Ok(_) => HealthCheckResult::Reachable {
                checked_at,
                latency_ms,
                mode,
            },
            Err(failure) => HealthCheckResult::Unreachable {
                checked_at,
                latency_ms,
                mode,
                error: failure.into_probe_error(),
            },
        }
    }
}

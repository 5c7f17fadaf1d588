// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Failure classification for Kubernetes API probes

use crate::types::{ErrorKind, ProbeError};
use std::error::Error as StdError;
use std::time::Duration;

/// Substrings identifying DNS, connection-refused and connect-timeout failures,
/// matched case-insensitively against the whole error chain.
const NETWORK_SIGNATURES: &[&str] = &[
    "enotfound",
    "econnrefused",
    "etimedout",
    "dns error",
    "failed to lookup address",
    "name or service not known",
    "connection refused",
    "connection timed out",
];

/// Everything known about a failed probe before it is classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeFailure {
    /// The race timer fired before the request settled
    pub timed_out: bool,
    pub status_code: Option<u16>,
    /// Top-level message reported to callers
    pub message: String,
    /// Top-level message plus every source in the error chain
    pub detail: String,
}

impl ProbeFailure {
    pub fn timeout(after: Duration) -> Self {
        let message = format!(
            "Kubernetes API request timed out after {}ms",
            after.as_millis()
        );
        Self {
            timed_out: true,
            status_code: None,
            detail: message.clone(),
            message,
        }
    }

    /// Precedence: timeout, auth (401/403), http (other status), network, unknown
    pub fn classify(&self) -> ErrorKind {
        if self.timed_out {
            return ErrorKind::Timeout;
        }

        match self.status_code {
            Some(401) | Some(403) => ErrorKind::Auth,
            Some(_) => ErrorKind::Http,
            None if is_network_failure(&self.detail) => ErrorKind::Network,
            None => ErrorKind::Unknown,
        }
    }

    pub fn into_probe_error(self) -> ProbeError {
        ProbeError {
            kind: self.classify(),
            message: self.message,
            status_code: self.status_code,
        }
    }
}

impl From<&kube::Error> for ProbeFailure {
    fn from(err: &kube::Error) -> Self {
        let status_code = match err {
            kube::Error::Api(response) => Some(response.code),
            _ => None,
        };

        Self {
            timed_out: false,
            status_code,
            message: err.to_string(),
            detail: error_chain(err),
        }
    }
}

fn is_network_failure(detail: &str) -> bool {
    let detail = detail.to_lowercase();
    NETWORK_SIGNATURES.iter().any(|sig| detail.contains(sig))
}

/// Render an error and all of its sources as one line
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

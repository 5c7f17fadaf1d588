// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Context, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use crate::constants::{defaults, env as keys};

/// Deployment environment the service runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
    Test,
}

impl AppEnv {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppEnv::Development => "development",
            AppEnv::Production => "production",
            AppEnv::Test => "test",
        }
    }

    /// Whether effective settings should be echoed to the log at startup
    pub fn logs_settings(&self) -> bool {
        matches!(self, AppEnv::Development | AppEnv::Test)
    }
}

impl FromStr for AppEnv {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "development" => Ok(AppEnv::Development),
            "production" => Ok(AppEnv::Production),
            "test" => Ok(AppEnv::Test),
            other => bail!(
                "{} must be one of development, production, test (got '{}')",
                keys::APP_ENV,
                other
            ),
        }
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub app_env: AppEnv,
    pub port: u16,
    /// Path segment every route is mounted under; empty means no prefix
    pub api_prefix: String,
    /// Allowed CORS origins; `None` reflects whatever origin the request carries
    pub cors_origins: Option<Vec<String>>,
    /// Namespace used when listing pods without an explicit namespace
    pub namespace: String,
    /// Kubeconfig used when not running in-cluster, relative to the working directory
    pub local_config_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = match lookup(keys::APP_ENV) {
            Some(v) => v.parse()?,
            None => AppEnv::Development,
        };

        let port = match lookup(keys::APP_PORT) {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .with_context(|| format!("{} must be a valid port (got '{}')", keys::APP_PORT, v))?,
            None => defaults::APP_PORT,
        };
        if port == 0 {
            bail!("{} must be a valid port (got '0')", keys::APP_PORT);
        }

        let api_prefix = lookup(keys::API_PREFIX)
            .unwrap_or_else(|| defaults::API_PREFIX.to_string())
            .trim()
            .trim_matches('/')
            .to_string();

        let cors_origins = match non_blank(&lookup, keys::CORS_ORIGINS)? {
            Some(v) => {
                let origins = parse_origins(&v);
                if origins.is_empty() {
                    bail!("{} must list at least one origin (got '{}')", keys::CORS_ORIGINS, v);
                }
                Some(origins)
            }
            None => None,
        };

        let namespace = non_blank(&lookup, keys::NAMESPACE)?
            .unwrap_or_else(|| defaults::NAMESPACE.to_string());

        let local_config_path = non_blank(&lookup, keys::LOCAL_CONFIG_PATH)?
            .unwrap_or_else(|| defaults::LOCAL_CONFIG_PATH.to_string())
            .into();

        Ok(Config {
            app_env,
            port,
            api_prefix,
            cors_origins,
            namespace,
            local_config_path,
        })
    }

    /// Log the effective value of every recognized setting (development and test only)
    pub fn log_settings(&self) {
        if !self.app_env.logs_settings() {
            return;
        }

        let cors = self
            .cors_origins
            .as_ref()
            .map(|o| o.join(","))
            .unwrap_or_default();

        info!("Env ({}): {}={}", self.app_env, keys::APP_ENV, self.app_env);
        info!("Env ({}): {}={}", self.app_env, keys::APP_PORT, self.port);
        info!("Env ({}): {}={}", self.app_env, keys::API_PREFIX, self.api_prefix);
        info!("Env ({}): {}={}", self.app_env, keys::CORS_ORIGINS, cors);
        info!("Env ({}): {}={}", self.app_env, keys::NAMESPACE, self.namespace);
        info!(
            "Env ({}): {}={}",
            self.app_env,
            keys::LOCAL_CONFIG_PATH,
            self.local_config_path.display()
        );
    }
}

/// Unset is fine, set-but-blank is a configuration error
fn non_blank<F>(lookup: &F, key: &str) -> Result<Option<String>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) if v.trim().is_empty() => bail!("{} must not be empty", key),
        other => Ok(other),
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.port, 3000);
        assert_eq!(config.api_prefix, "api");
        assert!(config.cors_origins.is_none());
        assert_eq!(config.namespace, "default");
        assert_eq!(config.local_config_path, PathBuf::from("./kube/kubeconfig.yaml"));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("APP_ENV", "production"),
            ("APP_PORT", "8081"),
            ("API_PREFIX", "/v1/"),
            ("KUBERNETES_NAMESPACE", "staging"),
            ("KUBERNETES_LOCAL_CONFIG_PATH", "/etc/kube/config"),
        ])
        .unwrap();

        assert_eq!(config.app_env, AppEnv::Production);
        assert_eq!(config.port, 8081);
        assert_eq!(config.api_prefix, "v1");
        assert_eq!(config.namespace, "staging");
        assert_eq!(config.local_config_path, PathBuf::from("/etc/kube/config"));
    }

    #[test]
    fn test_blank_prefix_disables_prefix() {
        let config = load(&[("API_PREFIX", "  ")]).unwrap();
        assert_eq!(config.api_prefix, "");
    }

    #[test]
    fn test_invalid_app_env_rejected() {
        let err = load(&[("APP_ENV", "staging")]).unwrap_err();
        assert!(err.to_string().contains("APP_ENV"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(load(&[("APP_PORT", "not-a-port")]).is_err());
        assert!(load(&[("APP_PORT", "70000")]).is_err());
        assert!(load(&[("APP_PORT", "0")]).is_err());
    }

    #[test]
    fn test_blank_values_rejected() {
        for key in ["KUBERNETES_NAMESPACE", "KUBERNETES_LOCAL_CONFIG_PATH", "CORS_ORIGINS"] {
            let err = load(&[(key, "")]).unwrap_err();
            assert!(err.to_string().contains(key), "{key}: {err}");
            assert!(load(&[(key, "   ")]).is_err(), "{key}");
        }
    }

    #[test]
    fn test_cors_origins_without_any_origin_rejected() {
        assert!(load(&[("CORS_ORIGINS", " , ,")]).is_err());

        let config = load(&[("CORS_ORIGINS", "https://a.example")]).unwrap();
        assert_eq!(config.cors_origins, Some(vec!["https://a.example".to_string()]));
    }

    #[test]
    fn test_parse_origins_trims_and_drops_blanks() {
        assert_eq!(
            parse_origins(" https://a.example , ,https://b.example,"),
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn test_logs_settings_only_outside_production() {
        assert!(AppEnv::Development.logs_settings());
        assert!(AppEnv::Test.logs_settings());
        assert!(!AppEnv::Production.logs_settings());
    }
}

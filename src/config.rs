// ⚙️ Portal configuration from the environment (and an optional `.env`)

use crate::error::{PortalError, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

pub const DEFAULT_API_BASE: &str = "http://localhost:3001";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalConfig {
    pub api: ApiConfig,
    pub refresh: RefreshConfig,
    pub paging: PagingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

/// Poll intervals in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Customers, accounts, transactions, withdrawals on the accounts view
    pub list_ms: u64,
    pub dashboard_ms: u64,
    /// Exchange rate and agent fee
    pub rate_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingConfig {
    pub default_take: u32,
    pub max_take: u32,
}

impl Default for PortalConfig {
    fn default() -> Self {
        PortalConfig {
            api: ApiConfig {
                base_url: DEFAULT_API_BASE.to_string(),
                timeout_ms: 15_000,
            },
            refresh: RefreshConfig {
                list_ms: 10_000,
                dashboard_ms: 60_000,
                rate_ms: 60_000,
            },
            paging: PagingConfig {
                default_take: 50,
                max_take: 200,
            },
        }
    }
}

impl PortalConfig {
    /// Load from `AGENT_PORTAL_*` variables, after reading `.env` if present
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PortalConfig::default();

        let base_url = lookup("AGENT_PORTAL_API_BASE")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.api.base_url);

        let config = PortalConfig {
            api: ApiConfig {
                base_url,
                timeout_ms: parse_var(&lookup, "AGENT_PORTAL_TIMEOUT_MS", defaults.api.timeout_ms)?,
            },
            refresh: RefreshConfig {
                list_ms: parse_var(&lookup, "AGENT_PORTAL_LIST_REFRESH_MS", defaults.refresh.list_ms)?,
                dashboard_ms: parse_var(&lookup, "AGENT_PORTAL_DASHBOARD_REFRESH_MS", defaults.refresh.dashboard_ms)?,
                rate_ms: parse_var(&lookup, "AGENT_PORTAL_RATE_REFRESH_MS", defaults.refresh.rate_ms)?,
            },
            paging: PagingConfig {
                default_take: parse_var(&lookup, "AGENT_PORTAL_DEFAULT_TAKE", defaults.paging.default_take)?,
                max_take: parse_var(&lookup, "AGENT_PORTAL_MAX_TAKE", defaults.paging.max_take)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.paging.max_take == 0 {
            return Err(PortalError::Config("AGENT_PORTAL_MAX_TAKE must be at least 1".to_string()));
        }
        if self.paging.default_take == 0 || self.paging.default_take > self.paging.max_take {
            return Err(PortalError::Config(format!(
                "AGENT_PORTAL_DEFAULT_TAKE must be within 1..={}",
                self.paging.max_take
            )));
        }
        Ok(())
    }

    /// Clamp a requested page size into `1..=max_take` (a zero `max_take` counts as 1)
    pub fn clamp_take(&self, take: Option<u32>) -> u32 {
        take.unwrap_or(self.paging.default_take).clamp(1, self.paging.max_take.max(1))
    }

    pub fn list_refresh(&self) -> Duration {
        millis(self.refresh.list_ms)
    }

    pub fn dashboard_refresh(&self) -> Duration {
        millis(self.refresh.dashboard_ms)
    }

    pub fn rate_refresh(&self) -> Duration {
        millis(self.refresh.rate_ms)
    }
}

fn millis(ms: u64) -> Duration {
    Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX))
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| PortalError::Config(format!("{} must be a non-negative integer, got {:?}", name, raw))),
    }
}

// 🗄️ Query Cache - polled API responses owned by the portal shell
//
// Lifecycle:
//   populated on first fetch → served while fresh → marked stale by a
//   successful mutation or by age → refetched → cleared on navigation away
//
// The shell owns one cache and hands it to its views; there is no global
// instance.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Key segment constants used by the portal views
pub mod keys {
    pub const CUSTOMERS: &str = "customers";
    pub const ACCOUNTS: &str = "accounts";
    pub const TRANSACTIONS: &str = "transactions";
    pub const WITHDRAWALS: &str = "withdrawals";
    pub const BALANCE_SUMMARY: &str = "balance-summary";
    pub const WITHDRAWAL_WHITELIST: &str = "withdrawal-whitelist";
    pub const EUR_USD_RATE: &str = "eur-usd-rate";
    pub const AGENT_EUR_USD_FEE: &str = "agent-eur-usd-fee";
}

// ============================================================================
// QUERY KEY
// ============================================================================

/// Ordered key segments, e.g. `["withdrawals", "200"]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryKey(segments.into_iter().map(Into::into).collect())
    }

    /// `["transactions", take]`
    pub fn paged(name: &str, take: u32) -> Self {
        QueryKey(vec![name.to_string(), take.to_string()])
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Prefix match on whole segments
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl From<&str> for QueryKey {
    fn from(name: &str) -> Self {
        QueryKey(vec![name.to_string()])
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

// ============================================================================
// MUTATIONS
// ============================================================================

/// Writes that invalidate cached reads when they succeed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    CreateCustomer,
    CreateAccount,
    CreateWithdrawal,
}

impl Mutation {
    pub fn invalidates(&self) -> &'static [&'static str] {
        match self {
            Mutation::CreateCustomer => &[keys::CUSTOMERS],
            Mutation::CreateAccount => &[
                keys::ACCOUNTS,
                keys::BALANCE_SUMMARY,
                keys::TRANSACTIONS,
                keys::WITHDRAWALS,
            ],
            Mutation::CreateWithdrawal => &[keys::ACCOUNTS, keys::WITHDRAWALS, keys::BALANCE_SUMMARY],
        }
    }
}

// ============================================================================
// CACHE
// ============================================================================

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64) / (total as f64) * 100.0
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: DateTime<Utc>,
    stale: bool,
}

#[derive(Debug, Clone)]
pub struct QueryCache<V> {
    entries: HashMap<QueryKey, CacheEntry<V>>,
    metrics: CacheMetrics,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        QueryCache {
            entries: HashMap::new(),
            metrics: CacheMetrics::default(),
        }
    }
}

impl<V> QueryCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a successful fetch
    pub fn insert(&mut self, key: QueryKey, value: V, now: DateTime<Utc>) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: now,
                stale: false,
            },
        );
    }

    /// Last fetched value, fresh or not (views keep showing it while refetching)
    pub fn get(&self, key: &QueryKey) -> Option<&V> {
        self.entries.get(key).map(|e| &e.value)
    }

    /// Value only if it was fetched less than `refresh` ago and not invalidated
    pub fn get_fresh(&mut self, key: &QueryKey, now: DateTime<Utc>, refresh: Duration) -> Option<&V> {
        let fresh = self
            .entries
            .get(key)
            .map(|e| !e.stale && now - e.fetched_at < refresh)
            .unwrap_or(false);

        if fresh {
            self.metrics.hits += 1;
            self.entries.get(key).map(|e| &e.value)
        } else {
            self.metrics.misses += 1;
            None
        }
    }

    pub fn needs_refetch(&self, key: &QueryKey, now: DateTime<Utc>, refresh: Duration) -> bool {
        match self.entries.get(key) {
            Some(e) => e.stale || now - e.fetched_at >= refresh,
            None => true,
        }
    }

    /// Mark every entry under `prefix` stale; returns how many were marked
    pub fn invalidate(&mut self, prefix: &QueryKey) -> usize {
        let mut marked = 0;
        for (key, entry) in self.entries.iter_mut() {
            if key.starts_with(prefix) && !entry.stale {
                entry.stale = true;
                marked += 1;
            }
        }
        self.metrics.invalidations += marked as u64;
        debug!(prefix = %prefix, marked, "cache invalidated");
        marked
    }

    /// Invalidate everything a successful mutation may have changed
    pub fn apply_mutation(&mut self, mutation: Mutation) -> usize {
        mutation
            .invalidates()
            .iter()
            .map(|name| self.invalidate(&QueryKey::from(*name)))
            .sum()
    }

    /// Drop all entries, e.g. when the operator navigates away or logs out
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }
}

// Entity Models - REST view-models polled from the portal backend
//
// Every entity is ephemeral: rebuilt from JSON on each poll and never
// persisted here. Money fields stay minor-unit strings until formatted.

pub mod customer;
pub mod account;
pub mod transaction;
pub mod withdrawal;

pub use customer::{Customer, CustomerKind};
pub use account::{Account, CustomerMap};
pub use transaction::TransactionEvent;
pub use withdrawal::{Withdrawal, WithdrawalAccountMap, WithdrawalWhitelistItem};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// `{ "items": [...] }` envelope used by every list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Default for ListResponse<T> {
    fn default() -> Self {
        ListResponse { items: Vec::new() }
    }
}

/// `GET /api/agents/me/balance-summary`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    /// Currency code → total balance in minor units, e.g. `{ "EUR": "4995" }`.
    /// Keeps the order the backend sent.
    #[serde(default)]
    pub by_currency: IndexMap<String, String>,
    #[serde(default)]
    pub accounts_count: u64,
}

/// Latest EUR→USD rate, scaled by 10,000
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    #[serde(default)]
    pub rate_minor: Option<i64>,
}

/// Agent EUR→USD fee, scaled by 10,000
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentFee {
    #[serde(default)]
    pub fee_minor: Option<i64>,
}

/// First non-blank value, for name fallbacks
pub(crate) fn first_present<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|s| !s.trim().is_empty())
}

/// `"First Last"` from optional parts, blank parts skipped
pub(crate) fn full_name(first: Option<&str>, last: Option<&str>) -> String {
    [first, last]
        .iter()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_response_tolerates_missing_items() {
        let resp: ListResponse<Customer> = serde_json::from_value(json!({})).unwrap();
        assert!(resp.items.is_empty());
    }

    #[test]
    fn test_balance_summary() {
        let summary: BalanceSummary = serde_json::from_value(json!({
            "byCurrency": { "EUR": "4995", "USD": "100" },
            "accountsCount": 3
        }))
        .unwrap();
        assert_eq!(summary.by_currency.get("EUR").map(String::as_str), Some("4995"));
        assert_eq!(summary.accounts_count, 3);
    }

    #[test]
    fn test_rate_and_fee_null_stays_unknown() {
        let rate: ExchangeRate = serde_json::from_value(json!({ "rateMinor": null })).unwrap();
        let fee: AgentFee = serde_json::from_value(json!({})).unwrap();
        assert_eq!(rate.rate_minor, None);
        assert_eq!(fee.fee_minor, None);
    }

    #[test]
    fn test_name_helpers() {
        assert_eq!(first_present(&[None, Some(" "), Some("Acme")]), Some("Acme"));
        assert_eq!(first_present(&[None, Some("")]), None);
        assert_eq!(full_name(Some("Ada"), Some("Lovelace")), "Ada Lovelace");
        assert_eq!(full_name(None, Some("Lovelace")), "Lovelace");
        assert_eq!(full_name(Some(""), None), "");
    }
}

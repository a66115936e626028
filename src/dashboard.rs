// 📊 Dashboard Aggregates - KPIs over the primary currency
//
// All sums are exact minor-unit integers. Time windows are half-open
// `[start, end)` in epoch milliseconds and days are UTC calendar days.

use crate::entities::{Account, BalanceSummary, TransactionEvent, Withdrawal};
use crate::money::parse_minor;
use crate::reconciliation::{sort_by_created_desc, Timestamped};
use crate::temporal::{day_key, DAY_MS};
use num_bigint::{BigInt, Sign};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

pub const DEFAULT_CURRENCY: &str = "EUR";
pub const WEEK_MS: i64 = 7 * DAY_MS;

/// Unparseable or missing amounts count as zero
fn lenient_minor(raw: Option<&str>) -> BigInt {
    raw.and_then(|s| parse_minor(s).ok()).unwrap_or_default()
}

fn currency_or_unknown(ccy: Option<&str>) -> String {
    match ccy.map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) => c.to_uppercase(),
        None => "UNKNOWN".to_string(),
    }
}

/// EUR when the agent holds any, else the first currency, else EUR
pub fn primary_currency(summary: &BalanceSummary) -> String {
    if summary.by_currency.keys().any(|k| k.eq_ignore_ascii_case(DEFAULT_CURRENCY)) {
        return DEFAULT_CURRENCY.to_string();
    }
    summary
        .by_currency
        .keys()
        .next()
        .map(|k| k.to_uppercase())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
}

// ============================================================================
// WINDOW SUMS
// ============================================================================

pub fn sum_deposits_in_range(transactions: &[TransactionEvent], start: i64, end: i64, ccy: &str) -> BigInt {
    transactions
        .iter()
        .filter(|t| {
            let ts = t.created_at_millis();
            ts >= start && ts < end
        })
        .filter(|t| currency_or_unknown(t.settlement_currency.as_deref()).eq_ignore_ascii_case(ccy))
        .map(|t| lenient_minor(t.settlement_amount.as_deref()))
        .sum()
}

pub fn sum_withdrawals_in_range(withdrawals: &[Withdrawal], start: i64, end: i64, ccy: &str) -> BigInt {
    withdrawals
        .iter()
        .filter(|w| {
            let ts = w.created_at_millis();
            ts >= start && ts < end
        })
        .filter(|w| currency_or_unknown(Some(w.currency.as_str())).eq_ignore_ascii_case(ccy))
        .map(|w| lenient_minor(Some(w.amount_minor.as_str())))
        .sum()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowTotals {
    pub deposits: BigInt,
    pub withdrawals: BigInt,
    pub net: BigInt,
}

impl WindowTotals {
    fn compute(transactions: &[TransactionEvent], withdrawals: &[Withdrawal], start: i64, end: i64, ccy: &str) -> Self {
        let deposits = sum_deposits_in_range(transactions, start, end, ccy);
        let withdrawals = sum_withdrawals_in_range(withdrawals, start, end, ccy);
        let net = &deposits - &withdrawals;
        WindowTotals {
            deposits,
            withdrawals,
            net,
        }
    }
}

/// Last 7 days against the 7 days before
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyKpis {
    pub currency: String,
    pub current: WindowTotals,
    pub previous: WindowTotals,
}

impl WeeklyKpis {
    pub fn deposit_trend(&self) -> Trend {
        trend(&self.current.deposits, &self.previous.deposits)
    }

    pub fn withdrawal_trend(&self) -> Trend {
        trend(&self.current.withdrawals, &self.previous.withdrawals)
    }

    pub fn net_trend(&self) -> Trend {
        trend(&self.current.net, &self.previous.net)
    }
}

pub fn weekly_kpis(transactions: &[TransactionEvent], withdrawals: &[Withdrawal], ccy: &str, now: i64) -> WeeklyKpis {
    let since = now - WEEK_MS;
    WeeklyKpis {
        currency: ccy.to_string(),
        current: WindowTotals::compute(transactions, withdrawals, since, now, ccy),
        previous: WindowTotals::compute(transactions, withdrawals, now - 2 * WEEK_MS, since, ccy),
    }
}

// ============================================================================
// TREND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Up,
    Down,
}

/// Period-over-period change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Trend {
    Unchanged,
    /// `hundredths` of a percent, absent when the previous period was zero
    Changed {
        direction: Direction,
        hundredths: Option<BigInt>,
    },
}

/// Change from `prev` to `now`, percentage rounded half-up to 2 decimals
pub fn trend(now: &BigInt, prev: &BigInt) -> Trend {
    let diff = now - prev;
    let direction = match diff.sign() {
        Sign::NoSign => return Trend::Unchanged,
        Sign::Plus => Direction::Up,
        Sign::Minus => Direction::Down,
    };

    if prev.sign() == Sign::NoSign {
        return Trend::Changed {
            direction,
            hundredths: None,
        };
    }

    let diff_abs = BigInt::from_biguint(Sign::Plus, diff.magnitude().clone());
    let prev_abs = BigInt::from_biguint(Sign::Plus, prev.magnitude().clone());
    // round(|diff| / |prev| * 10000)
    let doubled = diff_abs * BigInt::from(20_000) / prev_abs;
    let hundredths = (doubled + BigInt::from(1)) / BigInt::from(2);

    Trend::Changed {
        direction,
        hundredths: Some(hundredths),
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Unchanged => write!(f, "0%"),
            Trend::Changed { direction, hundredths } => {
                let arrow = match direction {
                    Direction::Up => "↑",
                    Direction::Down => "↓",
                };
                match hundredths {
                    None => write!(f, "{}", arrow),
                    Some(h) => {
                        let hundred = BigInt::from(100);
                        write!(f, "{} {}.{:0>2}%", arrow, h / &hundred, (h % &hundred).to_string())
                    }
                }
            }
        }
    }
}

// ============================================================================
// DAILY SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyRow {
    pub day: String,
    pub deposit: BigInt,
    pub withdraw: BigInt,
    pub net: BigInt,
}

/// One row per day for the last `days` days, oldest first, the current day last
pub fn daily_summary(
    transactions: &[TransactionEvent],
    withdrawals: &[Withdrawal],
    ccy: &str,
    now: i64,
    days: u32,
) -> Vec<DailyRow> {
    let start = now - i64::from(days) * DAY_MS;
    let mut deposits: HashMap<String, BigInt> = HashMap::new();
    let mut payouts: HashMap<String, BigInt> = HashMap::new();

    for t in transactions {
        let ts = t.created_at_millis();
        if ts < start || !currency_or_unknown(t.settlement_currency.as_deref()).eq_ignore_ascii_case(ccy) {
            continue;
        }
        *deposits.entry(day_key(ts)).or_default() += lenient_minor(t.settlement_amount.as_deref());
    }

    for w in withdrawals {
        let ts = w.created_at_millis();
        if ts < start || !currency_or_unknown(Some(w.currency.as_str())).eq_ignore_ascii_case(ccy) {
            continue;
        }
        *payouts.entry(day_key(ts)).or_default() += lenient_minor(Some(w.amount_minor.as_str()));
    }

    (0..i64::from(days))
        .rev()
        .map(|i| {
            let day = day_key(now - i * DAY_MS);
            let deposit = deposits.get(&day).cloned().unwrap_or_default();
            let withdraw = payouts.get(&day).cloned().unwrap_or_default();
            let net = &deposit - &withdraw;
            DailyRow {
                day,
                deposit,
                withdraw,
                net,
            }
        })
        .collect()
}

// ============================================================================
// LISTS
// ============================================================================

/// Largest balances first; ties keep input order
pub fn top_accounts_by_balance(accounts: &[Account], n: usize) -> Vec<&Account> {
    let mut sorted: Vec<(BigInt, &Account)> = accounts
        .iter()
        .map(|a| (lenient_minor(Some(a.balance_minor.as_str())), a))
        .collect();
    sorted.sort_by(|a, b| b.0.cmp(&a.0));
    sorted.into_iter().take(n).map(|(_, a)| a).collect()
}

pub fn recent_deposits(transactions: &[TransactionEvent], n: usize) -> Vec<&TransactionEvent> {
    let mut list: Vec<&TransactionEvent> = transactions.iter().collect();
    sort_by_created_desc(&mut list);
    list.truncate(n);
    list
}

pub fn recent_withdrawals(withdrawals: &[Withdrawal], n: usize) -> Vec<&Withdrawal> {
    let mut list: Vec<&Withdrawal> = withdrawals.iter().collect();
    sort_by_created_desc(&mut list);
    list.truncate(n);
    list
}

pub fn active_account_count(accounts: &[Account]) -> usize {
    accounts.iter().filter(|a| a.is_active()).count()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceEntry {
    pub currency: String,
    pub minor: BigInt,
}

/// Per-currency totals, largest first
pub fn balance_entries(summary: &BalanceSummary) -> Vec<BalanceEntry> {
    let mut entries: Vec<BalanceEntry> = summary
        .by_currency
        .iter()
        .map(|(ccy, minor)| BalanceEntry {
            currency: ccy.to_uppercase(),
            minor: lenient_minor(Some(minor.as_str())),
        })
        .collect();
    entries.sort_by(|a, b| b.minor.cmp(&a.minor));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    // 2024-01-15T00:00:00Z
    const NOW: i64 = 1_705_276_800_000;

    fn deposit(amount: &str, ccy: &str, received_at: &str) -> TransactionEvent {
        TransactionEvent {
            id: format!("t-{}", received_at),
            settlement_amount: Some(amount.into()),
            settlement_currency: Some(ccy.into()),
            received_at: Some(received_at.into()),
            ..Default::default()
        }
    }

    fn payout(amount: &str, ccy: &str, created_at: &str) -> Withdrawal {
        Withdrawal {
            id: format!("w-{}", created_at),
            amount_minor: amount.into(),
            currency: ccy.into(),
            created_at: Some(created_at.into()),
            ..Default::default()
        }
    }

    fn summary(pairs: &[(&str, &str)]) -> BalanceSummary {
        BalanceSummary {
            by_currency: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<IndexMap<_, _>>(),
            accounts_count: 0,
        }
    }

    #[test]
    fn test_primary_currency() {
        assert_eq!(primary_currency(&summary(&[("USD", "1"), ("eur", "2")])), "EUR");
        assert_eq!(primary_currency(&summary(&[("usd", "1")])), "USD");
        assert_eq!(primary_currency(&summary(&[])), "EUR");
    }

    #[test]
    fn test_primary_currency_follows_backend_order() {
        let parsed: BalanceSummary = serde_json::from_str(r#"{ "byCurrency": { "usd": "5", "gbp": "7" } }"#).unwrap();
        assert_eq!(primary_currency(&parsed), "USD");
        assert_eq!(primary_currency(&summary(&[("GBP", "7"), ("USD", "5")])), "GBP");
    }

    #[test]
    fn test_window_sums_are_half_open_and_currency_scoped() {
        let txs = vec![
            deposit("100", "EUR", "2024-01-14T00:00:00Z"),
            deposit("200", "eur", "2024-01-08T00:00:00Z"),
            deposit("400", "USD", "2024-01-10T00:00:00Z"),
            deposit("garbage", "EUR", "2024-01-10T00:00:00Z"),
            deposit("800", "EUR", "2024-01-15T00:00:00Z"),
        ];
        let sum = sum_deposits_in_range(&txs, NOW - WEEK_MS, NOW, "EUR");
        assert_eq!(sum, BigInt::from(300));
    }

    #[test]
    fn test_weekly_kpis() {
        let txs = vec![
            deposit("1000", "EUR", "2024-01-14T00:00:00Z"),
            deposit("500", "EUR", "2024-01-02T00:00:00Z"),
        ];
        let wds = vec![payout("300", "EUR", "2024-01-12T00:00:00Z")];
        let kpis = weekly_kpis(&txs, &wds, "EUR", NOW);
        assert_eq!(kpis.current.deposits, BigInt::from(1000));
        assert_eq!(kpis.current.net, BigInt::from(700));
        assert_eq!(kpis.previous.deposits, BigInt::from(500));
        assert_eq!(kpis.previous.withdrawals, BigInt::from(0));
        assert_eq!(kpis.deposit_trend().to_string(), "↑ 100.00%");
        assert_eq!(kpis.withdrawal_trend().to_string(), "↑");
    }

    #[test]
    fn test_trend_display() {
        assert_eq!(trend(&BigInt::from(5), &BigInt::from(5)).to_string(), "0%");
        assert_eq!(trend(&BigInt::from(5), &BigInt::from(0)).to_string(), "↑");
        assert_eq!(trend(&BigInt::from(-5), &BigInt::from(0)).to_string(), "↓");
        assert_eq!(trend(&BigInt::from(150), &BigInt::from(100)).to_string(), "↑ 50.00%");
        assert_eq!(trend(&BigInt::from(2), &BigInt::from(3)).to_string(), "↓ 33.33%");
        assert_eq!(trend(&BigInt::from(1), &BigInt::from(3)).to_string(), "↓ 66.67%");
        assert_eq!(trend(&BigInt::from(-50), &BigInt::from(-100)).to_string(), "↑ 50.00%");
    }

    #[test]
    fn test_daily_summary() {
        let txs = vec![
            deposit("1000", "EUR", "2024-01-15T00:00:00Z"),
            deposit("250", "EUR", "2024-01-14T08:00:00Z"),
            deposit("999", "EUR", "2023-12-01T00:00:00Z"),
        ];
        let wds = vec![payout("100", "EUR", "2024-01-14T12:00:00Z")];
        let rows = daily_summary(&txs, &wds, "EUR", NOW, 14);
        assert_eq!(rows.len(), 14);
        assert_eq!(rows[0].day, "2024-01-02");
        let last = &rows[13];
        assert_eq!(last.day, "2024-01-15");
        assert_eq!(last.deposit, BigInt::from(1000));
        let prev = &rows[12];
        assert_eq!(prev.net, BigInt::from(150));
        assert!(rows.iter().all(|r| r.deposit != BigInt::from(999)));
    }

    #[test]
    fn test_lists() {
        let accounts = vec![
            Account {
                id: "small".into(),
                balance_minor: "5".into(),
                status: Some("ACTIVE".into()),
                ..Default::default()
            },
            Account {
                id: "big".into(),
                balance_minor: "500".into(),
                ..Default::default()
            },
        ];
        let top: Vec<_> = top_accounts_by_balance(&accounts, 1).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(top, vec!["big"]);
        assert_eq!(active_account_count(&accounts), 1);

        let txs = vec![
            deposit("1", "EUR", "2024-01-01T00:00:00Z"),
            deposit("2", "EUR", "2024-01-03T00:00:00Z"),
        ];
        assert_eq!(recent_deposits(&txs, 1)[0].settlement_amount.as_deref(), Some("2"));

        let wds = vec![payout("1", "EUR", "2024-01-01"), payout("2", "EUR", "2024-01-02")];
        assert_eq!(recent_withdrawals(&wds, 5)[0].amount_minor, "2");
    }

    #[test]
    fn test_balance_entries_sorted_desc() {
        let entries = balance_entries(&summary(&[("eur", "10"), ("USD", "99")]));
        assert_eq!(entries[0].currency, "USD");
        assert_eq!(entries[1].currency, "EUR");
    }
}

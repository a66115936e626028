// Agent Portal - Core Library
// Money codec, rate formatting and status reconciliation behind the portal views

pub mod error;
pub mod money;          // Minor-unit codec
pub mod rate;           // Fixed-point rate/fee formatting & USD preview
pub mod status;         // Best-effort status classification
pub mod temporal;       // Timestamp parsing
pub mod reconciliation; // Rejected-resubmission filter
pub mod entities;       // REST view-models
pub mod portfolio;      // Customer rows & next actions
pub mod withdrawal;     // Withdrawal validation & payload
pub mod dashboard;      // KPI aggregates
pub mod cache;          // Explicit query cache
pub mod config;

// Re-export commonly used types
pub use error::{PortalError, Result};
pub use money::{
    currency_decimals, decimal_to_minor, decimal_to_minor_f64,
    format_minor, format_minor_str, minor_to_decimal_string, parse_minor,
};
pub use rate::{
    compute_usd_preview_from_minor, format_exchange_rate_minor,
    format_fee_percent_from_minor, ExchangeMeta,
};
pub use status::{
    classify_account_status, classify_customer_status,
    is_active_account_status, is_approved_status, is_rejected_status, is_reviewing_status,
    status_tone, withdrawal_status_tone, StatusBucket, StatusTone,
};
pub use reconciliation::{filter_rejected_with_newer_submission, sort_by_created_desc, Timestamped};
pub use entities::{
    Account, AgentFee, BalanceSummary, Customer, CustomerKind, CustomerMap, ExchangeRate,
    ListResponse, TransactionEvent, Withdrawal, WithdrawalAccountMap, WithdrawalWhitelistItem,
};
pub use portfolio::{build_customer_rows, customer_activity, CustomerAction, CustomerRow};
pub use withdrawal::{
    is_likely_tron_address, prepare_withdrawal, validate_amount, withdrawals_enabled, WithdrawalRequest,
};
pub use dashboard::{daily_summary, primary_currency, trend, weekly_kpis, DailyRow, Trend, WeeklyKpis};
pub use cache::{Mutation, QueryCache, QueryKey};
pub use config::PortalConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

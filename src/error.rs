// ❗ Error taxonomy for the portal core
// Every failure is synchronous and returned to the immediate caller.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    /// Decimal input does not match `\d+(\.\d{0,2})?`
    #[error("Invalid amount format: {input:?} (at most two decimal places)")]
    InvalidAmountFormat { input: String },

    /// Minor-unit string is not a base-10 integer
    #[error("Invalid minor-unit amount: {input:?}")]
    InvalidMinorAmount { input: String },

    #[error("Amount must be greater than zero, got {amount_minor} minor")]
    NonPositiveAmount { amount_minor: String },

    #[error("Insufficient balance: requested {requested_minor} minor, available {available_minor} minor")]
    InsufficientBalance {
        requested_minor: String,
        available_minor: String,
    },

    /// Exchange rate or agent fee is unknown
    #[error("No exchange rate or fee available, withdrawals are disabled")]
    MissingExchangeMeta,

    /// Administrators have not approved any payout address yet
    #[error("No whitelisted withdrawal address, withdrawals are disabled")]
    NoWithdrawalAddresses,

    #[error("Invalid Tron address: {address:?}")]
    InvalidTronAddress { address: String },

    #[error("Address {address:?} is not on the withdrawal whitelist")]
    AddressNotWhitelisted { address: String },

    #[error("Account not found: {account_id}")]
    AccountNotFound { account_id: String },

    #[error("Account {account_id} is not active (status {status})")]
    AccountNotActive { account_id: String, status: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PortalError>;

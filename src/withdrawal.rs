// 🧾 Withdrawal Submission - caller-level checks before `POST /api/withdrawals`
//
// Order of checks mirrors what the operator sees:
//   1. rate & fee known      → MissingExchangeMeta
//   2. whitelist non-empty   → NoWithdrawalAddresses
//   3. account is active     → AccountNotActive
//   4. Tron address shape    → InvalidTronAddress
//   5. address whitelisted   → AddressNotWhitelisted
//   6. amount format         → InvalidAmountFormat
//   7. amount > 0            → NonPositiveAmount
//   8. amount <= balance     → InsufficientBalance

use crate::entities::{Account, WithdrawalWhitelistItem};
use crate::error::{PortalError, Result};
use crate::money::{decimal_to_minor, parse_minor};
use crate::rate::ExchangeMeta;
use num_bigint::BigInt;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

fn tron_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Base58 alphabet: no 0, O, I or l
    PATTERN.get_or_init(|| Regex::new(r"^T[1-9A-HJ-NP-Za-km-z]{33}$").expect("static tron pattern"))
}

/// `T` followed by 33 base58 characters. Shape check only, no checksum.
pub fn is_likely_tron_address(address: &str) -> bool {
    tron_pattern().is_match(address)
}

/// Convert and bound-check a withdrawal amount.
///
/// `balance_minor` is the account's last known balance; `None` skips the
/// balance check (the backend still enforces it).
pub fn validate_amount(input: &str, balance_minor: Option<&str>) -> Result<BigInt> {
    let minor_str = decimal_to_minor(input)?;
    let amount = parse_minor(&minor_str)?;

    if amount <= BigInt::from(0) {
        return Err(PortalError::NonPositiveAmount {
            amount_minor: minor_str,
        });
    }

    if let Some(balance_raw) = balance_minor {
        let balance = parse_minor(balance_raw)?;
        if amount > balance {
            return Err(PortalError::InsufficientBalance {
                requested_minor: minor_str,
                available_minor: balance.to_string(),
            });
        }
    }

    Ok(amount)
}

/// Body of `POST /api/withdrawals`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    pub account_map_id: String,
    pub tron_address: String,
    pub amount_minor: String,
    pub exchange_rate_minor: i64,
    pub agent_fee_minor: i64,
}

/// Withdrawal actions are offered only with a non-empty whitelist and a
/// known rate and fee.
pub fn withdrawals_enabled(whitelist: &[WithdrawalWhitelistItem], meta: &ExchangeMeta) -> bool {
    !whitelist.is_empty() && meta.is_available()
}

/// Validate operator input and build the submission payload.
///
/// `tron_address` must be one of the `whitelist` addresses.
pub fn prepare_withdrawal(
    account: &Account,
    whitelist: &[WithdrawalWhitelistItem],
    tron_address: &str,
    amount_input: &str,
    meta: &ExchangeMeta,
) -> Result<WithdrawalRequest> {
    let (rate, fee) = meta.known().ok_or(PortalError::MissingExchangeMeta)?;

    if whitelist.is_empty() {
        return Err(PortalError::NoWithdrawalAddresses);
    }

    if !account.is_active() {
        return Err(PortalError::AccountNotActive {
            account_id: account.id.clone(),
            status: account.status.clone().unwrap_or_default(),
        });
    }

    let tron = tron_address.trim();
    if !is_likely_tron_address(tron) {
        return Err(PortalError::InvalidTronAddress {
            address: tron.to_string(),
        });
    }

    if !whitelist.iter().any(|item| item.address.trim() == tron) {
        return Err(PortalError::AddressNotWhitelisted {
            address: tron.to_string(),
        });
    }

    let amount = validate_amount(amount_input, Some(account.balance_minor.as_str()))?;

    debug!(
        account_id = %account.id,
        amount_minor = %amount,
        rate_minor = rate,
        fee_minor = fee,
        "withdrawal request prepared"
    );

    Ok(WithdrawalRequest {
        account_map_id: account.id.clone(),
        tron_address: tron.to_string(),
        amount_minor: amount.to_string(),
        exchange_rate_minor: rate,
        agent_fee_minor: fee,
    })
}

/// Look an account up by portal id among the withdrawable ones.
pub fn find_account<'a>(accounts: &[&'a Account], account_id: &str) -> Result<&'a Account> {
    accounts
        .iter()
        .copied()
        .find(|a| a.id == account_id)
        .ok_or_else(|| PortalError::AccountNotFound {
            account_id: account_id.to_string(),
        })
}

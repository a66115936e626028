// 💱 Fixed-Point Rate Formatter & USD Preview Calculator
//
// Exchange rates and agent fees arrive as integers scaled by 10,000:
//   rate 11000 == 1.1000 USD per EUR
//   fee    250 == 2.50%   (fee / 100 is the percentage)
// `None` means "unknown" and is never coerced to zero.

use crate::error::Result;
use crate::money::{decimal_to_minor, parse_minor};
use num_bigint::{BigInt, Sign};
use serde::{Deserialize, Serialize};

/// Fixed-point base shared by exchange rates and fees
pub const PRECISION: i64 = 10_000;

/// Digits after the decimal point in a rendered rate
const RATE_DIGITS: usize = 4;

// ============================================================================
// FORMATTERS
// ============================================================================

/// `123456` → `"12.3456"`; `None` stays `None`.
pub fn format_exchange_rate_minor(rate: Option<i64>) -> Option<String> {
    let rate = rate?;
    let sign = if rate < 0 { "-" } else { "" };
    let abs = rate.unsigned_abs();
    let integer = abs / PRECISION as u64;
    let fraction = abs % PRECISION as u64;
    Some(format!("{}{}.{:0>width$}", sign, integer, fraction, width = RATE_DIGITS))
}

/// `250` → `"2.5%"`, `300` → `"3%"`, `5` → `"0.05%"`; `None` stays `None`.
///
/// The percentage is shown with at most two decimals and trailing zeros
/// removed. An integer fee always divides by 100 exactly into two decimals,
/// so the split is done on integers.
pub fn format_fee_percent_from_minor(fee: Option<i64>) -> Option<String> {
    let fee = fee?;
    let sign = if fee < 0 { "-" } else { "" };
    let abs = fee.unsigned_abs();
    let integer = abs / 100;
    let fraction = abs % 100;

    if fraction == 0 {
        return Some(format!("{}{}%", sign, integer));
    }

    let fraction = format!("{:02}", fraction);
    Some(format!("{}{}.{}%", sign, integer, fraction.trim_end_matches('0')))
}

// ============================================================================
// USD PREVIEW
// ============================================================================

/// Estimated USD payout for a EUR-minor withdrawal, integer arithmetic only:
///
/// ```text
/// usd_minor = amount * rate * (10000 - fee) / (10000 * 10000)   (truncating)
/// ```
///
/// Rendered as `"{dollars}.{cents}"`. Display only: the settlement amount is
/// computed by the backend.
pub fn compute_usd_preview_from_minor(amount_minor: &str, rate_minor: i64, fee_minor: i64) -> Result<String> {
    let amount = parse_minor(amount_minor)?;
    let precision = BigInt::from(PRECISION);
    let fee_factor = &precision - BigInt::from(fee_minor);

    let numerator = amount * BigInt::from(rate_minor) * fee_factor;
    let denominator = &precision * &precision;
    // BigInt division truncates toward zero
    let usd_minor = numerator / denominator;

    let sign = if usd_minor.sign() == Sign::Minus { "-" } else { "" };
    let abs = BigInt::from_biguint(Sign::Plus, usd_minor.magnitude().clone());
    let hundred = BigInt::from(100u32);
    let dollars = &abs / &hundred;
    let cents = &abs % &hundred;

    Ok(format!("{}{}.{:0>2}", sign, dollars, cents.to_string()))
}

// ============================================================================
// EXCHANGE META
// ============================================================================

/// Latest EUR→USD rate and agent fee as polled from the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeMeta {
    pub rate_minor: Option<i64>,
    pub fee_minor: Option<i64>,
}

impl ExchangeMeta {
    pub fn new(rate_minor: Option<i64>, fee_minor: Option<i64>) -> Self {
        ExchangeMeta { rate_minor, fee_minor }
    }

    /// Both values known, rate positive and fee non-negative
    pub fn is_available(&self) -> bool {
        self.known().is_some()
    }

    /// `(rate, fee)` when both are usable
    pub fn known(&self) -> Option<(i64, i64)> {
        match (self.rate_minor, self.fee_minor) {
            (Some(rate), Some(fee)) if rate > 0 && fee >= 0 => Some((rate, fee)),
            _ => None,
        }
    }

    pub fn rate_display(&self) -> Option<String> {
        format_exchange_rate_minor(self.rate_minor)
    }

    pub fn fee_display(&self) -> Option<String> {
        format_fee_percent_from_minor(self.fee_minor)
    }

    /// Live preview for a decimal withdrawal input.
    ///
    /// Blank (`None`) while the input is empty or malformed, or while the
    /// rate or fee is unknown.
    pub fn preview_usd(&self, amount_input: &str) -> Option<String> {
        let (rate, fee) = self.known()?;
        let raw = amount_input.trim();
        if raw.is_empty() {
            return None;
        }
        let minor = decimal_to_minor(raw).ok()?;
        compute_usd_preview_from_minor(&minor, rate, fee).ok()
    }
}

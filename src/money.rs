// 💶 Minor-Unit Money Codec
// Decimal strings <-> integer minor units (cents for EUR/USD, whole yen for JPY)
//
// Minor amounts are carried as unbounded integers (`BigInt`) or as their
// decimal-digit strings. No floating point touches an amount.

use crate::error::{PortalError, Result};
use num_bigint::{BigInt, Sign};
use regex::Regex;
use std::sync::OnceLock;

/// Decimal places accepted by `decimal_to_minor`
pub const INPUT_DECIMALS: usize = 2;

fn amount_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // ASCII digits only: `\d` would accept every Unicode decimal digit
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]+(\.[0-9]{0,2})?$").expect("static amount pattern"))
}

// ============================================================================
// CURRENCY TABLE
// ============================================================================

/// Number of decimal digits D for a currency: one major unit == 10^D minor.
///
/// Case-insensitive. JPY has no minor unit; every other code (including
/// unknown or empty ones) uses 2.
pub fn currency_decimals(ccy: &str) -> u32 {
    match ccy.trim().to_uppercase().as_str() {
        "JPY" => 0,
        _ => 2,
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse a minor-unit string (`"1234"`, `"-50"`) into an integer.
pub fn parse_minor(input: &str) -> Result<BigInt> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PortalError::InvalidMinorAmount {
            input: input.to_string(),
        });
    }

    BigInt::parse_bytes(trimmed.as_bytes(), 10).ok_or_else(|| PortalError::InvalidMinorAmount {
        input: input.to_string(),
    })
}

/// Convert a human decimal string (`"12.3"`) into a minor-unit digit string (`"1230"`).
///
/// The input is trimmed first. Leading zeros of the integer part are dropped
/// and the fraction is right-padded to two digits. Anything outside
/// `^\d+(\.\d{0,2})?$` fails with `InvalidAmountFormat`.
pub fn decimal_to_minor(input: &str) -> Result<String> {
    let s = input.trim();
    if !amount_pattern().is_match(s) {
        return Err(PortalError::InvalidAmountFormat {
            input: input.to_string(),
        });
    }

    let (int_raw, frac_raw) = s.split_once('.').unwrap_or((s, ""));
    let int_part = int_raw.trim_start_matches('0');
    let int_part = if int_part.is_empty() { "0" } else { int_part };

    let mut frac = frac_raw.to_string();
    while frac.len() < INPUT_DECIMALS {
        frac.push('0');
    }

    let joined = format!("{}{}", int_part, frac);
    let minor = parse_minor(&joined)?;
    Ok(minor.to_string())
}

/// Magnitude from which numeric input is written in exponent form and so
/// can never match the amount pattern
const PLAIN_NOTATION_LIMIT: f64 = 1e21;

/// Numeric variant of `decimal_to_minor`: the number is first rendered with
/// exactly two decimals, then converted like a string input.
///
/// A value exactly halfway between two cents rounds up (`0.125` → `"13"`).
/// Non-finite values and magnitudes of `1e21` or more fail with
/// `InvalidAmountFormat`.
pub fn decimal_to_minor_f64(value: f64) -> Result<String> {
    if !value.is_finite() || value.abs() >= PLAIN_NOTATION_LIMIT {
        return Err(PortalError::InvalidAmountFormat {
            input: value.to_string(),
        });
    }
    // covers -0.0 as well
    if value == 0.0 {
        return Ok("0".to_string());
    }

    // Exact cent ties are the odd multiples of 1/8
    let eighths = value * 8.0;
    let is_tie = eighths.fract() == 0.0 && eighths % 2.0 != 0.0;
    if is_tie && value > 0.0 {
        let thousandths = parse_minor(&format!("{:.3}", value).replace('.', ""))?;
        return Ok(((thousandths + BigInt::from(5)) / BigInt::from(10)).to_string());
    }

    decimal_to_minor(&format!("{:.2}", value))
}

// ============================================================================
// FORMATTING
// ============================================================================

/// Render a minor amount as `"{sign}{integer}.{fraction} {CCY}"`.
///
/// Zero-decimal currencies render without a separator (`"100 JPY"`).
/// The sign only appears for negative values.
pub fn format_minor(minor: &BigInt, ccy: &str) -> String {
    let decimals = currency_decimals(ccy);
    let sign = if minor.sign() == Sign::Minus { "-" } else { "" };
    let abs = BigInt::from_biguint(Sign::Plus, minor.magnitude().clone());

    if decimals == 0 {
        return format!("{}{} {}", sign, abs, ccy);
    }

    let base = BigInt::from(10u32).pow(decimals);
    let integer = &abs / &base;
    let frac = &abs % &base;

    format!(
        "{}{}.{:0>width$} {}",
        sign,
        integer,
        frac.to_string(),
        ccy,
        width = decimals as usize
    )
}

/// `format_minor` for a minor-unit string straight from an API payload.
pub fn format_minor_str(minor: &str, ccy: &str) -> Result<String> {
    Ok(format_minor(&parse_minor(minor)?, ccy))
}

/// General inverse of the codec: `"1234"` with 2 decimals becomes `"12.34"`.
///
/// Non-digit characters (other than a leading `-`) are ignored and an empty
/// digit string reads as zero. The digits are left-padded to `decimals + 1`
/// before splitting so amounts under one major unit render as `"0.xx"`.
pub fn minor_to_decimal_string(value: &str, decimals: u32) -> String {
    let value = value.trim();
    let negative = value.starts_with('-');
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    let sign = if negative { "-" } else { "" };

    let significant = digits.trim_start_matches('0');

    if decimals == 0 {
        let integer = if significant.is_empty() { "0" } else { significant };
        return format!("{}{}", sign, integer);
    }

    let width = decimals as usize;
    let padded = format!("{:0>width$}", significant, width = width + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - width);
    format!("{}{}.{}", sign, int_part, frac_part)
}

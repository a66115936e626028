// 🏷️ Status Classification
// Best-effort classification of upstream lifecycle statuses.
//
// The backend's status vocabulary is undocumented and not enumerable ahead of
// time, so statuses are matched by canonical fragments (case-insensitive
// substring test). The one exact match is a customer's plain `ACTIVE`.

use serde::{Deserialize, Serialize};

// Canonical fragments per bucket
const REVIEWING_FRAGMENTS: &[&str] = &["REVIEW"];
const REJECTED_FRAGMENTS: &[&str] = &["REJECT", "FAIL"];
const APPROVED_FRAGMENTS: &[&str] = &["APPROV"];
/// Approved customers may also report plain `ACTIVE`, matched exactly
const APPROVED_EXACT: &[&str] = &["ACTIVE"];
const ACTIVE_ACCOUNT_FRAGMENTS: &[&str] = &["ACTIVE", "APPROV", "SUCCESS"];

/// Trimmed, upper-cased status; absent statuses become `""`.
pub fn normalize_status(status: Option<&str>) -> String {
    status.unwrap_or_default().trim().to_uppercase()
}

fn matches_any(status: Option<&str>, fragments: &[&str]) -> bool {
    let normalized = normalize_status(status);
    fragments.iter().any(|f| normalized.contains(f))
}

pub fn is_reviewing_status(status: Option<&str>) -> bool {
    matches_any(status, REVIEWING_FRAGMENTS)
}

pub fn is_rejected_status(status: Option<&str>) -> bool {
    matches_any(status, REJECTED_FRAGMENTS)
}

pub fn is_approved_status(status: Option<&str>) -> bool {
    let normalized = normalize_status(status);
    APPROVED_EXACT.contains(&normalized.as_str()) || matches_any(status, APPROVED_FRAGMENTS)
}

pub fn is_active_account_status(status: Option<&str>) -> bool {
    matches_any(status, ACTIVE_ACCOUNT_FRAGMENTS)
}

// ============================================================================
// STATUS BUCKETS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusBucket {
    Reviewing,
    Rejected,
    Approved,
    Active,
    Other,
}

/// Customer lifecycle bucket. Checked in the order the accounts view does:
/// reviewing, then rejected, then approved.
pub fn classify_customer_status(status: Option<&str>) -> StatusBucket {
    if is_reviewing_status(status) {
        StatusBucket::Reviewing
    } else if is_rejected_status(status) {
        StatusBucket::Rejected
    } else if is_approved_status(status) {
        StatusBucket::Approved
    } else {
        StatusBucket::Other
    }
}

/// Account lifecycle bucket: active wins over everything else.
pub fn classify_account_status(status: Option<&str>) -> StatusBucket {
    if is_active_account_status(status) {
        StatusBucket::Active
    } else if is_rejected_status(status) {
        StatusBucket::Rejected
    } else if is_reviewing_status(status) {
        StatusBucket::Reviewing
    } else {
        StatusBucket::Other
    }
}

// ============================================================================
// DISPLAY TONE
// ============================================================================

/// Colour family a status tag is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusTone {
    /// In flight (blue)
    Processing,
    /// Done (green)
    Success,
    /// Failed (red)
    Error,
    /// Unrecognised status
    Neutral,
    /// No status at all
    Unknown,
}

/// Tone for customer, account and deposit statuses
pub fn status_tone(status: Option<&str>) -> StatusTone {
    let Some(raw) = status.filter(|s| !s.is_empty()) else {
        return StatusTone::Unknown;
    };
    let v = raw.to_uppercase();
    if ["SUBMIT", "REVIEW", "PENDING"].iter().any(|f| v.contains(f)) {
        StatusTone::Processing
    } else if ["SUCCESS", "APPROV", "ACTIVE"].iter().any(|f| v.contains(f)) {
        StatusTone::Success
    } else if ["FAIL", "REJECT", "ERROR"].iter().any(|f| v.contains(f)) {
        StatusTone::Error
    } else {
        StatusTone::Neutral
    }
}

/// Tone for withdrawal statuses (`PENDING` → `SENT`, or failed)
pub fn withdrawal_status_tone(status: Option<&str>) -> StatusTone {
    let Some(raw) = status.filter(|s| !s.is_empty()) else {
        return StatusTone::Unknown;
    };
    let v = raw.to_uppercase();
    if v.contains("PENDING") {
        StatusTone::Processing
    } else if v.contains("SENT") || v.contains("APPROV") {
        StatusTone::Success
    } else if v.contains("FAIL") || v.contains("REJECT") {
        StatusTone::Error
    } else {
        StatusTone::Neutral
    }
}

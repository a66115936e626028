//! Property-based tests for the money codec and submission reconciliation

use agent_portal::{
    compute_usd_preview_from_minor, decimal_to_minor, filter_rejected_with_newer_submission, format_minor,
    is_rejected_status, minor_to_decimal_string, parse_minor, Customer, Timestamped,
};
use num_bigint::BigInt;
use proptest::prelude::*;
use std::collections::HashSet;

const STATUSES: [&str; 4] = ["REVIEWING", "REJECTED", "APPROVED", "ACTIVE"];

fn customer(i: usize, email: Option<String>, status: &str, day: u32) -> Customer {
    Customer {
        id: format!("c{}", i),
        customer_email: email,
        status: Some(status.to_string()),
        created_at: Some(format!("2024-01-{:02}T08:00:00Z", day)),
        ..Default::default()
    }
}

fn submissions() -> impl Strategy<Value = Vec<Customer>> {
    prop::collection::vec((prop::option::of(0usize..4), 0usize..STATUSES.len(), 1u32..29), 0..24).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (email, status, day))| {
                customer(i, email.map(|e| format!("user{}@example.com", e)), STATUSES[status], day)
            })
            .collect()
    })
}

fn reconcile(items: &[Customer]) -> Vec<&Customer> {
    filter_rejected_with_newer_submission(items, |c| c.customer_email.as_deref(), |c| c.status.as_deref())
}

// ============================================================================
// Money codec
// ============================================================================

proptest! {
    /// Property: minor → decimal → minor is the identity
    #[test]
    fn minor_decimal_roundtrip(n in 0u64..u64::MAX) {
        let decimal = minor_to_decimal_string(&n.to_string(), 2);
        prop_assert_eq!(decimal_to_minor(&decimal).unwrap(), n.to_string());
    }

    /// Property: decimal → minor → decimal yields the canonical two-decimal form
    #[test]
    fn decimal_minor_roundtrip_canonicalizes(input in "0{0,3}[0-9]{1,15}(\\.[0-9]{0,2})?") {
        let (int_raw, frac_raw) = input.split_once('.').unwrap_or((input.as_str(), ""));
        let int_part = match int_raw.trim_start_matches('0') {
            "" => "0",
            digits => digits,
        };
        let canonical = format!("{}.{:0<2}", int_part, frac_raw);

        let minor = decimal_to_minor(&input).unwrap();
        prop_assert_eq!(minor_to_decimal_string(&minor, 2), canonical);
    }

    /// Property: integer and two-digit fraction concatenate into the minor value
    #[test]
    fn decimal_to_minor_concatenates(int in 0u64..1_000_000_000_000u64, frac in 0u32..100) {
        let input = format!("{}.{:02}", int, frac);
        let expected = BigInt::from(int) * 100u32 + frac;
        prop_assert_eq!(decimal_to_minor(&input).unwrap(), expected.to_string());
    }

    /// Property: more than two fraction digits never parse
    #[test]
    fn decimal_to_minor_rejects_extra_precision(int in 0u64..1_000_000u64, frac in 100u32..100_000) {
        let input = format!("{}.{}", int, frac);
        prop_assert!(decimal_to_minor(&input).is_err());
    }

    /// Property: formatted amounts carry the currency and a sign only when negative
    #[test]
    fn format_minor_sign_and_suffix(n in any::<i64>()) {
        let text = format_minor(&BigInt::from(n), "EUR");
        prop_assert!(text.ends_with(" EUR"));
        prop_assert_eq!(text.starts_with('-'), n < 0);
    }

    /// Property: the USD preview never decreases as the amount grows
    #[test]
    fn usd_preview_monotonic(
        a in 0u64..10_000_000u64,
        b in 0u64..10_000_000u64,
        rate in 1i64..100_000,
        fee in 0i64..10_000,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let preview_lo = compute_usd_preview_from_minor(&lo.to_string(), rate, fee).unwrap();
        let preview_hi = compute_usd_preview_from_minor(&hi.to_string(), rate, fee).unwrap();
        let lo_minor = parse_minor(&decimal_to_minor(&preview_lo).unwrap()).unwrap();
        let hi_minor = parse_minor(&decimal_to_minor(&preview_hi).unwrap()).unwrap();
        prop_assert!(lo_minor <= hi_minor);
    }
}

// ============================================================================
// Reconciliation
// ============================================================================

proptest! {
    /// Property: every identity in the input keeps at least one row
    #[test]
    fn reconciliation_never_empties_an_identity(items in submissions()) {
        let kept = reconcile(&items);
        let before: HashSet<_> = items.iter().filter_map(|c| c.customer_email.clone()).collect();
        let after: HashSet<_> = kept.iter().filter_map(|c| c.customer_email.clone()).collect();
        prop_assert_eq!(before, after);
    }

    /// Property: only rejected rows are ever dropped
    #[test]
    fn reconciliation_drops_only_rejected(items in submissions()) {
        let kept: HashSet<&str> = reconcile(&items).iter().map(|c| c.id.as_str()).collect();
        for c in &items {
            if !kept.contains(c.id.as_str()) {
                prop_assert!(is_rejected_status(c.status.as_deref()));
            }
        }
    }

    /// Property: rows without an email are never merged with anything
    #[test]
    fn reconciliation_keeps_anonymous_rows(items in submissions()) {
        let anonymous = items.iter().filter(|c| c.customer_email.is_none()).count();
        let kept_anonymous = reconcile(&items).iter().filter(|c| c.customer_email.is_none()).count();
        prop_assert_eq!(anonymous, kept_anonymous);
    }

    /// Property: output is ordered newest first
    #[test]
    fn reconciliation_output_is_newest_first(items in submissions()) {
        let kept = reconcile(&items);
        for pair in kept.windows(2) {
            prop_assert!(pair[0].created_at_millis() >= pair[1].created_at_millis());
        }
    }

    /// Property: distinct identities pass through untouched
    #[test]
    fn distinct_identities_never_merge(statuses in prop::collection::vec(0usize..STATUSES.len(), 0..16)) {
        let items: Vec<Customer> = statuses
            .iter()
            .enumerate()
            .map(|(i, s)| customer(i, Some(format!("only{}@example.com", i)), STATUSES[*s], 1 + (i as u32 % 28)))
            .collect();
        prop_assert_eq!(reconcile(&items).len(), items.len());
    }
}

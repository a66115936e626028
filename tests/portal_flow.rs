//! End-to-end flow over backend-shaped JSON: reconcile, pick an account,
//! prepare a withdrawal, invalidate cached reads.

use agent_portal::cache::keys;
use agent_portal::portfolio::withdrawable_accounts;
use agent_portal::*;
use chrono::{TimeZone, Utc};
use serde_json::json;

const ADDRESS: &str = "TQ5NtP1Yx7XyZ3bKpmqJ8vGdWcRsA2Ur9h";

fn whitelist() -> Vec<WithdrawalWhitelistItem> {
    let body = json!({ "items": [ { "address": ADDRESS, "label": "Treasury" } ] });
    serde_json::from_value::<ListResponse<WithdrawalWhitelistItem>>(body).unwrap().items
}

fn customers() -> Vec<Customer> {
    let body = json!({
        "items": [
            { "id": "c1", "customerEmail": "alice@example.com", "customerType": "INDIVIDUAL",
              "firstName": "Alice", "lastName": "Martin", "status": "REJECTED",
              "createdAt": "2024-01-01T09:00:00Z" },
            { "id": "c2", "customerEmail": "alice@example.com", "customerType": "INDIVIDUAL",
              "firstName": "Alice", "lastName": "Martin", "status": "APPROVED",
              "createdAt": "2024-01-05T09:00:00Z" },
            { "id": "c3", "customerEmail": "bob@example.com", "customerType": "COMPANY",
              "companyName": "Bob GmbH", "status": "UNDER_REVIEW",
              "createdAt": "2024-01-03T09:00:00Z" }
        ]
    });
    serde_json::from_value::<ListResponse<Customer>>(body).unwrap().items
}

fn accounts() -> Vec<Account> {
    let owner = json!({ "id": "c2", "customerEmail": "alice@example.com",
                        "firstName": "Alice", "lastName": "Martin" });
    let body = json!({
        "items": [
            { "id": "a1", "sunpayAccountId": "SP-1", "currency": "EUR", "status": "REJECTED",
              "createdAt": "2024-01-06T09:00:00Z", "customerMap": owner.clone() },
            { "id": "a2", "sunpayAccountId": "SP-2", "currency": "EUR", "status": "ACTIVE",
              "balanceMinor": "50000", "createdAt": "2024-01-07T09:00:00Z", "customerMap": owner }
        ]
    });
    serde_json::from_value::<ListResponse<Account>>(body).unwrap().items
}

#[test]
fn test_customer_rows_from_backend_payload() {
    let customers = customers();
    let accounts = accounts();
    let rows = build_customer_rows(&customers, &accounts);

    let ids: Vec<&str> = rows.iter().map(|r| r.customer.id.as_str()).collect();
    assert_eq!(ids, vec!["c2", "c3"]);

    let alice = &rows[0];
    assert_eq!(alice.accounts.len(), 1);
    assert_eq!(alice.accounts[0].id, "a2");
    assert!(alice.has_active_account);
    assert_eq!(alice.next_action(), CustomerAction::Ready);
    assert_eq!(alice.customer.display_name(), "Alice Martin");

    let bob = &rows[1];
    assert!(bob.accounts.is_empty());
    assert_eq!(bob.next_action(), CustomerAction::AwaitingReview);
    assert_eq!(bob.customer.display_name(), "Bob GmbH");
}

#[test]
fn test_missing_balance_defaults_to_zero() {
    let accounts = accounts();
    assert_eq!(accounts[0].balance_minor, "0");
    assert_eq!(accounts[0].balance_display(), "0.00 EUR");
    assert_eq!(accounts[1].balance_display(), "500.00 EUR");
    assert_eq!(accounts[1].option_label(), "Alice Martin · 500.00 EUR");
}

#[test]
fn test_withdrawal_flow_invalidates_balances() {
    let accounts = accounts();
    let withdrawable = withdrawable_accounts(&accounts);
    assert_eq!(withdrawable.len(), 1);

    let meta = ExchangeMeta::new(Some(11000), Some(250));
    let whitelist = whitelist();
    assert!(withdrawals_enabled(&whitelist, &meta));
    assert_eq!(whitelist[0].option_label(), format!("Treasury ({})", ADDRESS));
    assert_eq!(meta.rate_display().as_deref(), Some("1.1000"));
    assert_eq!(meta.preview_usd("12.5").as_deref(), Some("13.40"));

    let request = prepare_withdrawal(withdrawable[0], &whitelist, ADDRESS, "12.5", &meta).unwrap();
    assert_eq!(request.account_map_id, "a2");
    assert_eq!(request.amount_minor, "1250");

    let now = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
    let mut cache = QueryCache::new();
    cache.insert(QueryKey::from(keys::ACCOUNTS), accounts.len(), now);
    cache.insert(QueryKey::from(keys::EUR_USD_RATE), 1, now);
    assert_eq!(cache.apply_mutation(Mutation::CreateWithdrawal), 1);

    let refresh = chrono::Duration::seconds(10);
    assert!(cache.needs_refetch(&QueryKey::from(keys::ACCOUNTS), now, refresh));
    assert!(!cache.needs_refetch(&QueryKey::from(keys::EUR_USD_RATE), now, refresh));
}

#[test]
fn test_withdrawal_over_balance_is_rejected() {
    let accounts = accounts();
    let meta = ExchangeMeta::new(Some(11000), Some(250));
    let err = prepare_withdrawal(&accounts[1], &whitelist(), ADDRESS, "500.01", &meta).unwrap_err();
    assert!(matches!(err, PortalError::InsufficientBalance { .. }));
}

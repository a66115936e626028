// 🗂️ Customer Rows - reconciled customers joined with their accounts
//
// Data flow per poll:
//   customers ──reconcile(customerEmail)──┐
//   accounts  ──reconcile(email)──group by customer id──► CustomerRow
// Each row knows which action the operator can take next.

use crate::entities::{Account, Customer, TransactionEvent, Withdrawal};
use crate::reconciliation::{filter_rejected_with_newer_submission, sort_by_created_desc};
use crate::status::{is_rejected_status, StatusBucket};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

// ============================================================================
// CUSTOMER ROW
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CustomerRow<'a> {
    pub customer: &'a Customer,
    /// Newest first
    pub accounts: Vec<&'a Account>,
    pub has_active_account: bool,
}

/// What the operator can do next with a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CustomerAction {
    /// KYC still under review
    AwaitingReview,
    /// KYC rejected, the customer may be submitted again
    ResubmitCustomer,
    /// Approved, no account yet
    CreateAccount,
    /// Approved, latest account application rejected
    ResubmitAccount,
    /// Approved, account application in flight
    AccountPending,
    /// Approved with an active account
    Ready,
    /// Unrecognised customer status
    None,
}

impl<'a> CustomerRow<'a> {
    pub fn latest_account(&self) -> Option<&'a Account> {
        self.accounts.first().copied()
    }

    pub fn next_action(&self) -> CustomerAction {
        match self.customer.status_bucket() {
            StatusBucket::Reviewing => CustomerAction::AwaitingReview,
            StatusBucket::Rejected => CustomerAction::ResubmitCustomer,
            StatusBucket::Approved => {
                if self.accounts.is_empty() {
                    CustomerAction::CreateAccount
                } else if self.has_active_account {
                    CustomerAction::Ready
                } else if is_rejected_status(self.latest_account().and_then(|a| a.status.as_deref())) {
                    CustomerAction::ResubmitAccount
                } else {
                    CustomerAction::AccountPending
                }
            }
            _ => CustomerAction::None,
        }
    }

    /// Accounts the operator may withdraw from
    pub fn withdrawable_accounts(&self) -> Vec<&'a Account> {
        self.accounts.iter().copied().filter(|a| a.is_active()).collect()
    }
}

/// Accounts with superseded rejected applications removed
pub fn reconcile_accounts(accounts: &[Account]) -> Vec<&Account> {
    filter_rejected_with_newer_submission(accounts, |a| a.identity_email(), |a| a.status.as_deref())
}

pub fn reconcile_customers(customers: &[Customer]) -> Vec<&Customer> {
    filter_rejected_with_newer_submission(customers, |c| c.customer_email.as_deref(), |c| c.status.as_deref())
}

/// One row per reconciled customer, newest customer first.
///
/// Accounts without an owning customer id are left out.
pub fn build_customer_rows<'a>(customers: &'a [Customer], accounts: &'a [Account]) -> Vec<CustomerRow<'a>> {
    let mut by_customer: HashMap<&'a str, Vec<&'a Account>> = HashMap::new();
    for account in reconcile_accounts(accounts) {
        if let Some(customer_id) = account.customer_id() {
            by_customer.entry(customer_id).or_default().push(account);
        }
    }
    for list in by_customer.values_mut() {
        sort_by_created_desc(list);
    }

    reconcile_customers(customers)
        .into_iter()
        .map(|customer| {
            let accounts = by_customer.remove(customer.id.as_str()).unwrap_or_default();
            let has_active_account = accounts.iter().any(|a| a.is_active());
            CustomerRow {
                customer,
                accounts,
                has_active_account,
            }
        })
        .collect()
}

/// Active accounts among the reconciled ones
pub fn withdrawable_accounts(accounts: &[Account]) -> Vec<&Account> {
    reconcile_accounts(accounts)
        .into_iter()
        .filter(|a| a.is_active())
        .collect()
}

// ============================================================================
// CUSTOMER ACTIVITY
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Labeled<'a, T> {
    pub item: &'a T,
    pub account_label: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomerActivity<'a> {
    pub deposits: Vec<Labeled<'a, TransactionEvent>>,
    pub withdrawals: Vec<Labeled<'a, Withdrawal>>,
}

/// Deposits and withdrawals touching a customer's accounts, newest first.
///
/// Empty while the customer has no active account.
pub fn customer_activity<'a>(
    row: &CustomerRow<'_>,
    transactions: &'a [TransactionEvent],
    withdrawals: &'a [Withdrawal],
) -> CustomerActivity<'a> {
    if !row.has_active_account {
        return CustomerActivity::default();
    }

    let mut by_upstream_id: HashMap<&str, String> = HashMap::new();
    let mut by_account_id: HashMap<&str, String> = HashMap::new();
    for account in &row.accounts {
        let label = account.label();
        if !account.sunpay_account_id.is_empty() {
            by_upstream_id.insert(account.sunpay_account_id.as_str(), label.clone());
        }
        by_account_id.insert(account.id.as_str(), label);
    }

    let mut deposits: Vec<&TransactionEvent> = transactions
        .iter()
        .filter(|t| {
            t.recipient_account_id
                .as_deref()
                .map(|id| by_upstream_id.contains_key(id))
                .unwrap_or(false)
        })
        .collect();
    sort_by_created_desc(&mut deposits);

    let mut payouts: Vec<&Withdrawal> = withdrawals
        .iter()
        .filter(|w| by_account_id.contains_key(w.account_map_id.as_str()))
        .collect();
    sort_by_created_desc(&mut payouts);

    CustomerActivity {
        deposits: deposits
            .into_iter()
            .map(|t| Labeled {
                account_label: t
                    .recipient_account_id
                    .as_deref()
                    .and_then(|id| by_upstream_id.get(id))
                    .cloned()
                    .unwrap_or_default(),
                item: t,
            })
            .collect(),
        withdrawals: payouts
            .into_iter()
            .map(|w| Labeled {
                account_label: by_account_id.get(w.account_map_id.as_str()).cloned().unwrap_or_default(),
                item: w,
            })
            .collect(),
    }
}

/// Distinct customer ids that own at least one active account
pub fn customers_with_active_accounts(accounts: &[Account]) -> HashSet<&str> {
    accounts
        .iter()
        .filter(|a| a.is_active())
        .filter_map(|a| a.customer_id())
        .collect()
}

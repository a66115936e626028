// 💳 Account Entity - a currency account opened for an approved customer
//
// Balance is a minor-unit string in `balance_currency` (falling back to
// `currency`). Identity for reconciliation is the owning customer's email.

use crate::money::format_minor_str;
use crate::reconciliation::Timestamped;
use crate::status::{classify_account_status, is_active_account_status, StatusBucket};
use serde::{Deserialize, Serialize};

use super::{first_present, full_name};

/// Currency shown when neither `balance_currency` nor `currency` is set
pub const UNKNOWN_CURRENCY: &str = "UNKNOWN";

/// Customer summary embedded in each account row
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerMap {
    pub id: String,
    #[serde(default)]
    pub out_user_id: Option<String>,
    #[serde(default)]
    pub sunpay_customer_id: Option<String>,
    #[serde(default)]
    pub customer_type: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,

    #[serde(default)]
    pub sunpay_account_id: String,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    /// Minor units, always a string on the wire
    #[serde(default = "zero_minor")]
    pub balance_minor: String,

    #[serde(default)]
    pub balance_currency: Option<String>,

    /// Applicant email, used when `customer_map` carries none
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub address_line: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub post_code: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,

    /// Raw upstream payload (IBAN, SWIFT, ...)
    #[serde(default)]
    pub raw_json: Option<String>,

    #[serde(default)]
    pub customer_map: Option<CustomerMap>,
}

fn zero_minor() -> String {
    "0".to_string()
}

impl Account {
    /// Reconciliation identity: the customer's email, else the applicant email
    pub fn identity_email(&self) -> Option<&str> {
        self.customer_map
            .as_ref()
            .and_then(|m| m.customer_email.as_deref())
            .or(self.email.as_deref())
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.customer_map.as_ref().map(|m| m.id.as_str()).filter(|id| !id.is_empty())
    }

    pub fn status_bucket(&self) -> StatusBucket {
        classify_account_status(self.status.as_deref())
    }

    pub fn is_active(&self) -> bool {
        is_active_account_status(self.status.as_deref())
    }

    /// Currency the balance is held in; may be `""` if the backend sent nothing
    pub fn balance_ccy(&self) -> &str {
        self.balance_currency
            .as_deref()
            .or(self.currency.as_deref())
            .unwrap_or("")
    }

    /// Like `balance_ccy`, with `UNKNOWN` instead of an empty code
    pub fn effective_currency(&self) -> &str {
        match self.balance_ccy() {
            "" => UNKNOWN_CURRENCY,
            ccy => ccy,
        }
    }

    pub fn display_name(&self) -> String {
        let Some(cm) = &self.customer_map else {
            return "-".to_string();
        };
        let is_company = cm
            .customer_type
            .as_deref()
            .map(|t| t.trim().eq_ignore_ascii_case("COMPANY"))
            .unwrap_or(false);

        if is_company {
            return first_present(&[
                cm.company_name.as_deref(),
                cm.display_name.as_deref(),
                cm.out_user_id.as_deref(),
            ])
            .unwrap_or("-")
            .to_string();
        }

        let full = full_name(cm.first_name.as_deref(), cm.last_name.as_deref());
        if !full.is_empty() {
            return full;
        }
        first_present(&[cm.display_name.as_deref(), cm.out_user_id.as_deref()])
            .unwrap_or("-")
            .to_string()
    }

    /// `"Acme GmbH (EUR)"`, or just the name when no currency is known
    pub fn label(&self) -> String {
        let name = self.display_name();
        match self.balance_ccy() {
            "" => name,
            ccy => format!("{} ({})", name, ccy),
        }
    }

    /// Formatted balance; the raw string is shown if it is not an integer
    pub fn balance_display(&self) -> String {
        let ccy = self.effective_currency();
        format_minor_str(&self.balance_minor, ccy).unwrap_or_else(|_| format!("{} {}", self.balance_minor, ccy))
    }

    /// Withdrawal account picker entry: `"Acme GmbH · 12.34 EUR"`
    pub fn option_label(&self) -> String {
        format!("{} · {}", self.display_name(), self.balance_display())
    }
}

impl Timestamped for Account {
    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn account() -> Account {
        serde_json::from_value(json!({
            "id": "a1",
            "sunpayAccountId": "SP-1",
            "currency": "EUR",
            "status": "ACTIVE",
            "balanceMinor": "1234",
            "customerMap": {
                "id": "c1",
                "outUserId": "COM-1",
                "customerType": "COMPANY",
                "customerEmail": "ops@acme.io",
                "companyName": "Acme GmbH"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_identity_prefers_customer_map() {
        let mut acc = account();
        acc.email = Some("applicant@acme.io".into());
        assert_eq!(acc.identity_email(), Some("ops@acme.io"));

        acc.customer_map = None;
        assert_eq!(acc.identity_email(), Some("applicant@acme.io"));
    }

    #[test]
    fn test_labels() {
        let acc = account();
        assert!(acc.is_active());
        assert_eq!(acc.customer_id(), Some("c1"));
        assert_eq!(acc.label(), "Acme GmbH (EUR)");
        assert_eq!(acc.balance_display(), "12.34 EUR");
        assert_eq!(acc.option_label(), "Acme GmbH · 12.34 EUR");
    }

    #[test]
    fn test_balance_currency_wins() {
        let mut acc = account();
        acc.balance_currency = Some("JPY".into());
        acc.balance_minor = "500".into();
        assert_eq!(acc.balance_display(), "500 JPY");

        acc.balance_currency = None;
        acc.currency = None;
        assert_eq!(acc.effective_currency(), "UNKNOWN");
        assert_eq!(acc.label(), "Acme GmbH");
    }

    #[test]
    fn test_individual_display_name() {
        let mut acc = account();
        if let Some(cm) = acc.customer_map.as_mut() {
            cm.customer_type = Some("INDIVIDUAL".into());
            cm.first_name = Some("Ada".into());
            cm.last_name = Some("Lovelace".into());
        }
        assert_eq!(acc.display_name(), "Ada Lovelace");

        acc.customer_map = None;
        assert_eq!(acc.display_name(), "-");
    }

    #[test]
    fn test_missing_balance_defaults_to_zero() {
        let acc: Account = serde_json::from_value(json!({ "id": "a2" })).unwrap();
        assert_eq!(acc.balance_minor, "0");
        assert_eq!(acc.balance_display(), "0.00 UNKNOWN");
    }
}

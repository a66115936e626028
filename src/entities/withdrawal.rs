// 📤 Withdrawals - fiat balance paid out in crypto to a Tron address

use crate::money::format_minor_str;
use crate::reconciliation::Timestamped;
use crate::status::{withdrawal_status_tone, StatusTone};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalAccountMap {
    pub id: String,
    #[serde(default)]
    pub sunpay_account_id: String,
    #[serde(default)]
    pub balance_minor: Option<String>,
    #[serde(default)]
    pub balance_currency: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    pub id: String,
    #[serde(default)]
    pub agent_id: String,
    /// Portal id of the debited account (`Account::id`)
    #[serde(default)]
    pub account_map_id: String,
    #[serde(default)]
    pub tron_address: String,
    #[serde(default)]
    pub amount_minor: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub status: String,
    /// Whether the ops notification went out
    #[serde(default)]
    pub lark_sent: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub account_map: Option<WithdrawalAccountMap>,
}

impl Withdrawal {
    pub fn tone(&self) -> StatusTone {
        withdrawal_status_tone(Some(self.status.as_str()))
    }

    pub fn amount_display(&self) -> String {
        format_minor_str(&self.amount_minor, &self.currency)
            .unwrap_or_else(|_| format!("{} {}", self.amount_minor, self.currency))
    }

    /// Upstream account id when embedded, else the portal account id
    pub fn account_ref(&self) -> &str {
        self.account_map
            .as_ref()
            .map(|m| m.sunpay_account_id.as_str())
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.account_map_id)
    }
}

impl Timestamped for Withdrawal {
    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

/// Payout address approved by an administrator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalWhitelistItem {
    pub address: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl WithdrawalWhitelistItem {
    pub fn option_label(&self) -> String {
        match self.label.as_deref().filter(|l| !l.is_empty()) {
            Some(label) => format!("{} ({})", label, self.address),
            None => self.address.clone(),
        }
    }
}

// 📥 Deposit events received on agent accounts

use crate::money::format_minor_str;
use crate::reconciliation::Timestamped;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEvent {
    pub id: String,
    #[serde(default)]
    pub biz_type: String,
    #[serde(default)]
    pub biz_status: String,
    #[serde(default)]
    pub order_no: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub out_user_id: Option<String>,
    /// Upstream (`sunpayAccountId`) id of the credited account
    #[serde(default)]
    pub recipient_account_id: Option<String>,
    #[serde(default)]
    pub settlement_amount: Option<String>,
    #[serde(default)]
    pub settlement_currency: Option<String>,
    #[serde(default)]
    pub received_at: Option<String>,
    #[serde(default)]
    pub settlement_time: Option<String>,
}

impl TransactionEvent {
    /// Upper-cased settlement currency, `UNKNOWN` when absent
    pub fn currency(&self) -> String {
        self.settlement_currency
            .as_deref()
            .unwrap_or("UNKNOWN")
            .to_uppercase()
    }

    pub fn is_success(&self) -> bool {
        self.biz_status.to_uppercase().contains("SUCCESS")
    }

    pub fn amount_display(&self) -> String {
        let amount = self.settlement_amount.as_deref().unwrap_or("0");
        let ccy = self.currency();
        format_minor_str(amount, &ccy).unwrap_or_else(|_| format!("{} {}", amount, ccy))
    }
}

/// Deposits are ordered by when they were received
impl Timestamped for TransactionEvent {
    fn created_at(&self) -> Option<&str> {
        self.received_at.as_deref()
    }
}

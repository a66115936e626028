// 👤 Customer Entity - a KYC submission made by the agent
//
// The same person or company may appear several times (one row per
// submission). `customer_email` is the identity shared by resubmissions.

use crate::reconciliation::Timestamped;
use crate::status::{classify_customer_status, StatusBucket};
use serde::{Deserialize, Serialize};

use super::{first_present, full_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CustomerKind {
    Individual,
    Company,
}

impl CustomerKind {
    /// Anything that is not explicitly `INDIVIDUAL` is treated as a company
    pub fn from_type(customer_type: Option<&str>) -> Self {
        match customer_type.map(|t| t.trim().to_uppercase()).as_deref() {
            Some("INDIVIDUAL") => CustomerKind::Individual,
            _ => CustomerKind::Company,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerKind::Individual => "INDIVIDUAL",
            CustomerKind::Company => "COMPANY",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,

    #[serde(default)]
    pub out_user_id: Option<String>,

    #[serde(default)]
    pub sunpay_customer_id: Option<String>,

    /// `INDIVIDUAL` or `COMPANY`
    #[serde(default)]
    pub customer_type: Option<String>,

    #[serde(default)]
    pub customer_email: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub country_code: Option<String>,

    #[serde(default)]
    pub company_name: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,
}

impl Customer {
    pub fn kind(&self) -> CustomerKind {
        CustomerKind::from_type(self.customer_type.as_deref())
    }

    pub fn status_bucket(&self) -> StatusBucket {
        classify_customer_status(self.status.as_deref())
    }

    /// Company name for companies, "First Last" for individuals, then the
    /// agent's own user id, then `"-"`.
    pub fn display_name(&self) -> String {
        let is_company = self
            .customer_type
            .as_deref()
            .map(|t| t.trim().eq_ignore_ascii_case("COMPANY"))
            .unwrap_or(false);

        let name = if is_company {
            first_present(&[self.company_name.as_deref(), self.out_user_id.as_deref()]).map(str::to_string)
        } else {
            let full = full_name(self.first_name.as_deref(), self.last_name.as_deref());
            if full.is_empty() {
                first_present(&[self.out_user_id.as_deref()]).map(str::to_string)
            } else {
                Some(full)
            }
        };
        name.unwrap_or_else(|| "-".to_string())
    }
}

impl Timestamped for Customer {
    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

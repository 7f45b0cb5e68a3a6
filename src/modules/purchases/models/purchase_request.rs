use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Purchase request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseRequestStatus {
    /// Editable; its allocations still count against availability
    Draft,
    /// Sent to the vendor; allocations are locked in
    Confirmed,
    Cancelled,
}

impl std::fmt::Display for PurchaseRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PurchaseRequestStatus::Draft => write!(f, "draft"),
            PurchaseRequestStatus::Confirmed => write!(f, "confirmed"),
            PurchaseRequestStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for PurchaseRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PurchaseRequestStatus::Draft),
            "confirmed" => Ok(PurchaseRequestStatus::Confirmed),
            "cancelled" => Ok(PurchaseRequestStatus::Cancelled),
            _ => Err(format!("Invalid purchase request status: {}", s)),
        }
    }
}

/// A vendor purchase request raised from estimation items
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseRequest {
    pub id: i32,
    pub pr_number: String,
    pub project_id: i32,
    pub vendor_id: Option<i32>,
    pub status: PurchaseRequestStatus,
    pub expected_delivery_date: Option<NaiveDate>,
    pub total_amount: Decimal,
    pub gst_amount: Decimal,
    pub final_amount: Decimal,
    pub remarks: Option<String>,
    pub payment_terms: Option<String>,
    pub items_count: i64,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_round_trip() {
        assert_eq!(
            PurchaseRequestStatus::from_str("confirmed").unwrap(),
            PurchaseRequestStatus::Confirmed
        );
        assert_eq!(PurchaseRequestStatus::Draft.to_string(), "draft");
        assert!(PurchaseRequestStatus::from_str("submitted").is_err());
    }
}

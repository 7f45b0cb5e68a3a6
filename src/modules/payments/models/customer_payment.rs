use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Approval state of a customer payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Recorded, awaiting finance approval
    Pending,
    /// Counted towards collections
    Approved,
    Rejected,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Approved => write!(f, "approved"),
            PaymentStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "approved" => Ok(PaymentStatus::Approved),
            "rejected" => Ok(PaymentStatus::Rejected),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

/// Kind of ledger entry a payment represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentType {
    #[serde(rename = "REGULAR")]
    Regular,
    /// Negative-amount entry issued against an overpaid revision
    #[serde(rename = "CREDIT_NOTE")]
    CreditNote,
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentType::Regular => write!(f, "REGULAR"),
            PaymentType::CreditNote => write!(f, "CREDIT_NOTE"),
        }
    }
}

impl std::str::FromStr for PaymentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "REGULAR" => Ok(PaymentType::Regular),
            "CREDIT_NOTE" => Ok(PaymentType::CreditNote),
            _ => Err(format!("Invalid payment type: {}", s)),
        }
    }
}

/// A customer payment recorded against a project
#[derive(Debug, Clone, Serialize)]
pub struct CustomerPayment {
    pub id: i32,
    pub project_id: i32,
    pub customer_id: Option<i32>,
    pub milestone_id: Option<i32>,
    pub payment_type: PaymentType,
    /// GST-inclusive amount as received
    pub amount: Decimal,
    pub gst_amount: Decimal,
    pub gst_percentage: Decimal,
    pub payment_date: DateTime<Utc>,
    pub mode: String,
    pub reference_number: Option<String>,
    pub remarks: Option<String>,
    pub status: PaymentStatus,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_round_trip() {
        assert_eq!(
            PaymentStatus::from_str("approved").unwrap(),
            PaymentStatus::Approved
        );
        assert_eq!(PaymentStatus::Pending.to_string(), "pending");
    }

    #[test]
    fn test_unrecognized_status_rejected() {
        assert!(PaymentStatus::from_str("settled").is_err());
    }

    #[test]
    fn test_payment_type_wire_format() {
        assert_eq!(
            PaymentType::from_str("CREDIT_NOTE").unwrap(),
            PaymentType::CreditNote
        );
        assert_eq!(
            serde_json::to_string(&PaymentType::Regular).unwrap(),
            r#""REGULAR""#
        );
    }
}

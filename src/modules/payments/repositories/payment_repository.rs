use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::core::{AppError, Result};
use crate::modules::payments::models::{CustomerPayment, PaymentStatus, PaymentType};

/// Repository for customer payment reads and aggregates
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Sum of approved collections for a project.
    ///
    /// Collection is tracked project-wide, not per category. Statuses are
    /// parsed row by row so an unrecognized enumeration in storage surfaces
    /// as a validation error instead of silently skewing the sum.
    pub async fn collected_total(&self, project_id: i32) -> Result<Decimal> {
        let rows: Vec<(Decimal, String)> = sqlx::query_as(
            r#"
            SELECT amount, status
            FROM customer_payments
            WHERE project_id = $1
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        let mut total = Decimal::ZERO;
        for (amount, status) in rows {
            let status = PaymentStatus::from_str(&status).map_err(|e| {
                AppError::validation(format!("Cannot compute collected total: {}", e))
            })?;
            if status == PaymentStatus::Approved {
                total += amount;
            }
        }

        Ok(total)
    }

    /// Payments recorded for a project, latest first
    pub async fn list_for_project(&self, project_id: i32) -> Result<Vec<CustomerPayment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT id, project_id, customer_id, milestone_id, payment_type,
                   amount, gst_amount, gst_percentage, payment_date, mode,
                   reference_number, remarks, status, created_at
            FROM customer_payments
            WHERE project_id = $1
            ORDER BY payment_date DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PaymentRow::into_payment).collect()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: i32,
    project_id: i32,
    customer_id: Option<i32>,
    milestone_id: Option<i32>,
    payment_type: String,
    amount: Decimal,
    gst_amount: Decimal,
    gst_percentage: Decimal,
    payment_date: chrono::DateTime<chrono::Utc>,
    mode: String,
    reference_number: Option<String>,
    remarks: Option<String>,
    status: String,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl PaymentRow {
    fn into_payment(self) -> Result<CustomerPayment> {
        let status = PaymentStatus::from_str(&self.status)
            .map_err(|e| AppError::internal(format!("Invalid status in database: {}", e)))?;
        let payment_type = PaymentType::from_str(&self.payment_type)
            .map_err(|e| AppError::internal(format!("Invalid payment type in database: {}", e)))?;

        Ok(CustomerPayment {
            id: self.id,
            project_id: self.project_id,
            customer_id: self.customer_id,
            milestone_id: self.milestone_id,
            payment_type,
            amount: self.amount,
            gst_amount: self.gst_amount,
            gst_percentage: self.gst_percentage,
            payment_date: self.payment_date,
            mode: self.mode,
            reference_number: self.reference_number,
            remarks: self.remarks,
            status,
            created_at: self.created_at,
        })
    }
}

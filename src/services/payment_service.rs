use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::Payment;
use crate::types::PaymentStatus;

/// Flat activation fee for newly registered institutions, in rupiah.
const ACTIVATION_FEE_IDR: i64 = 250_000;

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment not found: {0}")]
    NotFound(Uuid),
    #[error("Payment already settled: {0}")]
    AlreadySettled(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    Manager(#[from] DatabaseError),
}

pub struct PaymentService {
    pool: PgPool,
}

impl PaymentService {
    pub async fn new() -> Result<Self, PaymentError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Open the activation-fee invoice for an approved pesantren_baru
    /// claim. Idempotent per claim: re-approval does not duplicate it.
    pub async fn open_for_claim(&self, claim_id: Uuid) -> Result<Payment, PaymentError> {
        if let Some(existing) =
            sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE claim_id = $1")
                .bind(claim_id)
                .fetch_optional(&self.pool)
                .await?
        {
            return Ok(existing);
        }

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (id, claim_id, amount, status)
            VALUES ($1, $2, $3, 'unpaid')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(claim_id)
        .bind(Decimal::from(ACTIVATION_FEE_IDR))
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Opened payment {} for claim {}", payment.id, claim_id);
        Ok(payment)
    }

    pub async fn list(&self, status: Option<PaymentStatus>) -> Result<Vec<Payment>, PaymentError> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }

    /// Finance sign-off on a received transfer.
    pub async fn settle(&self, payment_id: Uuid) -> Result<Payment, PaymentError> {
        let current = sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(payment_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(PaymentError::NotFound(payment_id))?;

        if current.status == PaymentStatus::Settled {
            return Err(PaymentError::AlreadySettled(payment_id));
        }

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET status = 'settled', paid_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(payment_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Payment {} settled", payment.id);
        Ok(payment)
    }
}

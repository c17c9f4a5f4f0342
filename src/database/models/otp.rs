use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OtpCode {
    pub id: Uuid,
    pub phone: String,
    /// sha256 hex of the 6-digit code; the plaintext is never stored
    pub code_hash: String,
    pub claim_id: Option<Uuid>,
    pub attempts: i32,
    pub verified: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

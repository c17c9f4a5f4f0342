use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::{AccountStatus, Role};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub nama: String,
    pub phone: String,
    pub role: Role,
    pub status_account: AccountStatus,
    /// Region scope for admin_regional accounts; the two digits that
    /// appear in NIP/NIAM identifiers ("01", "02", ...)
    pub region_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

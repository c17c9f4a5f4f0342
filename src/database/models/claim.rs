use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::{ClaimStatus, JenisPengajuan};

/// One live claim per user at most, looked up by `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Claim {
    pub id: Uuid,
    pub user_id: Uuid,
    pub jenis_pengajuan: JenisPengajuan,
    pub status: ClaimStatus,
    pub pesantren_nama: String,
    /// Clean 7-digit institution code. Required for klaim submissions
    /// (the legacy record being claimed), assigned later for pesantren_baru.
    pub nip: Option<String>,
    pub region_code: String,
    pub approved_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
